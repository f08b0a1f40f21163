//! radar: validate, build and edit a technology radar from the command line.

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use radar_cli::{execute_command, Commands, Workspace};

#[derive(Parser)]
#[command(name = "radar")]
#[command(about = "Validate, build and edit a technology radar")]
struct Cli {
    /// Path to the radar configuration file
    #[arg(short, long, env = "RADAR_CONFIG", default_value = "radar.config.yml")]
    config: PathBuf,

    /// Directory holding the blip markdown files
    #[arg(short, long, env = "RADAR_DIR", default_value = "radar")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("radar=info".parse()?)
                .add_directive("radar_cli=info".parse()?)
                .add_directive("radar_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("Config file: {}", cli.config.display());
    info!("Content dir: {}", cli.dir.display());

    let workspace = Workspace {
        config_path: cli.config,
        content_dir: cli.dir,
    };

    match execute_command(&workspace, cli.command, Utc::now()) {
        Ok(output) => {
            print!("{}", output.text);
            if !output.success {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
