//! Inspect command - Show how a .vue file is parsed

use cadre::atelier_sfc::{parse_sfc, resolve_wrap_target, SfcParseOptions};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectArgs {
    /// The .vue file to parse
    pub file: PathBuf,

    /// Only print the nodes the provider would wrap
    #[arg(long)]
    pub target: bool,
}

pub fn run(args: InspectArgs) {
    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    let options = SfcParseOptions {
        filename: args.file.to_string_lossy().into_owned(),
    };
    let descriptor = match parse_sfc(&source, options) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            eprintln!(
                "{}: {} [{}] at offset {:?}",
                args.file.display(),
                e,
                e.code(),
                e.offset
            );
            std::process::exit(1);
        }
    };

    let json = if args.target {
        let target = descriptor
            .template
            .as_ref()
            .map(resolve_wrap_target)
            .unwrap_or_default();
        serde_json::to_string_pretty(target)
    } else {
        serde_json::to_string_pretty(&descriptor)
    };

    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    }
}
