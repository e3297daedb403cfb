//! cssmerge CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cssmerge_core::BuildMode;

mod commands;

#[derive(Parser)]
#[command(name = "cssmerge")]
#[command(version)]
#[command(about = "Merge application stylesheets into one", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge stylesheets, in the order given
    Bundle {
        /// Stylesheets to merge; `<file>.map` next to a file is read as its source map
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory paths in the bundle are relative to (defaults to current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// package.json holding the `postcss` configuration (defaults to <root>/package.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Build mode (development, production)
        #[arg(long, default_value_t = BuildMode::Development)]
        mode: BuildMode,

        /// Write output to DIR
        #[arg(short = 'o', long, default_value = ".")]
        out_dir: PathBuf,

        /// Split production output into stylesheets of at most N selectors
        #[arg(long, value_name = "N")]
        max_selectors: Option<usize>,
    },

    /// List the built-in plugins
    Plugins,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cssmerge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bundle {
            files,
            root,
            config,
            mode,
            out_dir,
            max_selectors,
        } => {
            commands::bundle::execute(commands::bundle::BundleArgs {
                files,
                root,
                config,
                mode,
                out_dir,
                max_selectors,
            })
            .await
        }
        Commands::Plugins => commands::plugins::execute(),
    }
}
