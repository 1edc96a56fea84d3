//! `cadre` command-line interface.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cadre")]
#[command(about = "Wrap FormKit components in the lazy provider", long_about = None)]
#[command(version)]
struct Cli {
    /// Log rewrite decisions
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite .vue files (default command)
    Transform(commands::transform::TransformArgs),

    /// Print the virtual configuration module
    Config(commands::config::ConfigArgs),

    /// Print the resolved configuration file
    Resolve(commands::config::ConfigArgs),

    /// Print the parsed blocks of a .vue file as JSON
    Inspect(commands::inspect::InspectArgs),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Transform(args)) => commands::transform::run(args),
        Some(Commands::Config(args)) => commands::config::run_config(args),
        Some(Commands::Resolve(args)) => commands::config::run_resolve(args),
        Some(Commands::Inspect(args)) => commands::inspect::run(args),
        None => commands::transform::run(commands::transform::TransformArgs::default()),
    }
}
