mod cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scriptgen",
    about = "Generate basic automation scripts from an integration definition",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one automation script per command in the definition
    Generate {
        /// Path to the integration definition YAML file
        definition: PathBuf,

        /// Directory the generated scripts are written to
        #[arg(long, short = 'o', env = "SCRIPTGEN_OUT_DIR")]
        out_dir: PathBuf,

        /// Script body template: 'table-formatting' or 'no-parse'
        #[arg(long, default_value = "table-formatting")]
        template: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Generate {
            definition,
            out_dir,
            template,
        } => cmd::generate::run(&definition, &out_dir, &template, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
