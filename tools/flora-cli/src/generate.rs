use anyhow::{Context, Result};
use clap::Args;
use flora_gen::prelude::{generate, Seed};
use std::path::PathBuf;

use crate::source::SourceArgs;

/// Arguments for the generate command
#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Generation seed (non-negative integer)
    #[arg(short, long, default_value = "0")]
    pub seed: Seed,

    /// Print the full instance lists as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the JSON dump to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = args.source.load()?;
    let flower = generate(&config, args.seed);
    let summary = flower.summary();

    if args.json || args.output.is_some() {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode flower")?;
        match &args.output {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
            None => println!("{}", json),
        }
        return Ok(());
    }

    println!("Flower: {} (seed {})", summary.name, summary.seed);
    println!(
        "  Pool: {} geometries, {} materials",
        summary.geometry_variants, summary.material_variants
    );
    println!("  Petals: {}", summary.petal_count);
    println!("  Leaves: {}", summary.leaf_count);
    println!("  Thorns: {}", summary.thorn_count);
    Ok(())
}
