//! Flora CLI - generate and export procedural flowers
//!
//! # Commands
//!
//! - `flora presets` - List the built-in presets
//! - `flora init` - Write a preset as an editable flower.toml
//! - `flora generate` - Generate a flower and print a summary or JSON dump
//! - `flora export` - Generate a flower and write it as an OBJ mesh
//! - `flora batch` - Export many seeds of one flower in parallel
//!
//! # Usage
//!
//! ```bash
//! # Start from a preset and tweak it
//! flora init --preset spiral-rose
//!
//! # Inspect the layout for a seed
//! flora generate --config flower.toml --seed 42 --json
//!
//! # Bake to a mesh
//! flora export --preset tulip --seed 7 -o tulip.obj
//! ```

mod batch;
mod export;
mod generate;
mod init;
mod presets;
mod source;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Flora CLI - procedural flower generator
#[derive(Parser)]
#[command(name = "flora")]
#[command(about = "Generate and export procedural flowers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in presets
    Presets,

    /// Write a preset as an editable flower.toml
    Init(init::InitArgs),

    /// Generate a flower and print a summary
    Generate(generate::GenerateArgs),

    /// Generate a flower and write it as an OBJ mesh
    Export(export::ExportArgs),

    /// Export a range of seeds in parallel
    Batch(batch::BatchArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Presets => presets::execute(),
        Commands::Init(args) => init::execute(args),
        Commands::Generate(args) => generate::execute(args),
        Commands::Export(args) => export::execute(args),
        Commands::Batch(args) => batch::execute(args),
    }
}
