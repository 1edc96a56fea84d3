//! Transform command - Rewrite .vue files

use cadre::{load_options, Cadre, CadreError, CadreResult, RewriteMode, TransformOutput};
use clap::Args;
use glob::glob;
use ignore::Walk;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

const DEFAULT_PATTERN: &str = "./**/*.vue";

/// Compiled output is not found by extension glob, so walk the directory.
const DEFAULT_COMPILED_PATTERN: &str = ".";

const SOURCE_EXTENSIONS: &[&str] = &["vue"];
const COMPILED_EXTENSIONS: &[&str] = &["js", "mjs"];

#[derive(Args, Default)]
pub struct TransformArgs {
    /// Glob pattern(s), directories or files to rewrite (default: ./**/*.vue,
    /// or the current directory with --mode compiled)
    pub patterns: Vec<String>,

    /// Output directory; rewritten files are printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a source map next to each rewritten file
    #[arg(long)]
    pub sourcemap: bool,

    /// Representation of the input files; `compiled` collects .js/.mjs
    /// files instead of .vue
    #[arg(long, value_enum)]
    pub mode: Option<RewriteMode>,

    /// Configuration module (overrides cadre.config.json)
    #[arg(long)]
    pub config_file: Option<String>,

    /// Number of threads (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Continue on errors
    #[arg(long)]
    pub continue_on_error: bool,
}

#[derive(Debug, Default)]
struct TransformStats {
    rewritten: AtomicUsize,
    unchanged: AtomicUsize,
    failed: AtomicUsize,
}

pub fn run(args: TransformArgs) {
    let start = Instant::now();

    if let Some(threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            tracing::warn!("failed to configure thread pool: {}", e);
        }
    }

    let mut options = load_options(None);
    if args.sourcemap {
        options.sourcemap = true;
    }
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(config_file) = args.config_file.clone() {
        options.config_file = Some(config_file);
    }
    let (default_pattern, extensions) = match options.mode {
        RewriteMode::Compiled => (DEFAULT_COMPILED_PATTERN, COMPILED_EXTENSIONS),
        RewriteMode::Auto | RewriteMode::Source => (DEFAULT_PATTERN, SOURCE_EXTENSIONS),
    };
    let cadre = Cadre::new(options);

    let patterns = if args.patterns.is_empty() {
        vec![default_pattern.to_string()]
    } else {
        args.patterns.clone()
    };
    let files = collect_files(&patterns, extensions);

    if files.is_empty() {
        eprintln!(
            "No {} files found matching patterns: {:?}",
            extensions.join("/"),
            patterns
        );
        std::process::exit(1);
    }

    let stats = TransformStats::default();
    let results: Vec<_> = files
        .par_iter()
        .filter_map(|path| match transform_file(&cadre, path) {
            Ok(Some(output)) => {
                stats.rewritten.fetch_add(1, Ordering::Relaxed);
                Some((path.clone(), output))
            }
            Ok(None) => {
                stats.unchanged.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error transforming {}: {}", path.display(), e);

                if !args.continue_on_error {
                    std::process::exit(1);
                }

                None
            }
        })
        .collect();

    match &args.output {
        Some(dir) => {
            for (path, output) in &results {
                if let Err(e) = write_output(dir, path, output) {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    eprintln!("Failed to write {}: {}", path.display(), e);
                }
            }
        }
        None => {
            for (path, output) in &results {
                if results.len() > 1 {
                    println!("==> {} <==", path.display());
                }
                println!("{}", output.code);
            }
        }
    }

    let rewritten = stats.rewritten.load(Ordering::Relaxed);
    let unchanged = stats.unchanged.load(Ordering::Relaxed);
    let failed = stats.failed.load(Ordering::Relaxed);
    let elapsed = start.elapsed().as_secs_f64();

    if failed > 0 {
        eprintln!(
            "✗ {} file(s) failed, {} rewritten, {} unchanged in {:.4}s",
            failed, rewritten, unchanged, elapsed
        );
        std::process::exit(1);
    }

    let file_word = if rewritten == 1 { "file" } else { "files" };
    eprintln!(
        "✓ {} {} rewritten, {} unchanged in {:.4}s",
        rewritten, file_word, unchanged, elapsed
    );
}

fn transform_file(cadre: &Cadre, path: &Path) -> CadreResult<Option<TransformOutput>> {
    let source = fs::read_to_string(path)?;
    let id = path.to_string_lossy().replace('\\', "/");
    cadre.transform(&source, &id)
}

fn write_output(dir: &Path, path: &Path, output: &TransformOutput) -> Result<(), CadreError> {
    let out_path = dir.join(output_relative_path(path));
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, &output.code)?;

    if let Some(map) = &output.map {
        let mut map_path = out_path.into_os_string();
        map_path.push(".map");
        fs::write(map_path, map)?;
    }
    Ok(())
}

/// Relative location of `path` inside the output directory.
fn output_relative_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output.vue"));
    }
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

fn in_node_modules(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "node_modules")
}

fn collect_files(patterns: &[String], extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = patterns
        .iter()
        .flat_map(|pattern| {
            // Check if pattern contains glob characters
            if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
                glob(pattern)
                    .ok()
                    .into_iter()
                    .flatten()
                    .filter_map(|r| r.ok())
                    .filter(|p| has_extension(p, extensions) && !in_node_modules(p))
                    .collect::<Vec<_>>()
            } else {
                // Use directory walking for paths (respects .gitignore)
                Walk::new(pattern)
                    .filter_map(|e| e.ok())
                    .map(|e| e.into_path())
                    .filter(|p| has_extension(p, extensions) && !in_node_modules(p))
                    .collect::<Vec<_>>()
            }
        })
        .collect();

    files.sort();
    files.dedup();
    files
}
