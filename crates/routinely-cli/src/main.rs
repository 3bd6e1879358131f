use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "routinely", version, about = "Routinely CLI")]
struct Cli {
    /// Use this config file instead of ~/.config/routinely/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a plan file
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Run one list of a plan file as a live countdown
    Run(commands::run::RunArgs),
    /// Duration and time conversions
    Codec {
        #[command(subcommand)]
        action: commands::codec::CodecAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "routinely=debug,routinely_core=debug"
    } else {
        "routinely=info,routinely_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action, config_path),
        Commands::Run(args) => commands::run::run(args, config_path),
        Commands::Codec { action } => commands::codec::run(action),
        Commands::Config { action } => commands::config::run(action, config_path),
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout();
            clap_complete::generate(shell, &mut Cli::command(), "routinely", &mut stdout);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
