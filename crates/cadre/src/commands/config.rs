//! Config and resolve commands - Inspect configuration resolution

use cadre::carton::RESOLVED_VIRTUAL_CONFIG_ID;
use cadre::{load_options, Cadre};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Default)]
pub struct ConfigArgs {
    /// Configuration module (overrides cadre.config.json)
    #[arg(long)]
    pub config_file: Option<String>,

    /// Do not merge the configuration with FormKit's defaults
    #[arg(long)]
    pub no_defaults: bool,

    /// Project root (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

fn plugin(args: ConfigArgs) -> Cadre {
    let mut options = load_options(args.root.as_deref());
    if let Some(config_file) = args.config_file {
        options.config_file = Some(config_file);
    }
    if args.no_defaults {
        options.default_config = false;
    }
    match args.root {
        Some(root) => Cadre::with_root(options, root),
        None => Cadre::new(options),
    }
}

pub fn run_config(args: ConfigArgs) {
    let cadre = plugin(args);
    if let Some(module) = cadre.load(RESOLVED_VIRTUAL_CONFIG_ID) {
        print!("{}", module);
    }
}

pub fn run_resolve(args: ConfigArgs) {
    let cadre = plugin(args);
    match cadre.resolved_config() {
        Some(path) => println!("{}", path.display()),
        None => {
            let requested = cadre.options().config_file.as_deref().unwrap_or("(disabled)");
            eprintln!(
                "No configuration file found for {} in {}",
                requested,
                cadre.root().display()
            );
            std::process::exit(1);
        }
    }
}
