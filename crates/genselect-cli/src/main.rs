use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "genselect",
    about = "genselect — round-robin select over lazy sources",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a select plan and print every emitted value.
    ///
    /// Without --plan, the built-in scaffold plan is used: two ranges
    /// (0..100 and 5..20) stopped above 10 and paused on even values.
    Run {
        /// Path to a select.toml plan
        #[arg(short, long)]
        plan: Option<PathBuf>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Emit bare values instead of labeled ones
        #[arg(long)]
        plain: bool,
        /// Stop after this many values
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Write a scaffold select.toml
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("genselect=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { plan, format, plain, limit } => {
            commands::run::run(plan.as_deref(), &format, plain, limit)
        }
        Commands::Init { path } => commands::init::init(&path),
    }
}
