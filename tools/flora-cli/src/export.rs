use anyhow::{Context, Result};
use clap::Args;
use flora_gen::prelude::{generate, write_obj, Seed};
use std::path::PathBuf;

use crate::source::SourceArgs;

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Generation seed (non-negative integer)
    #[arg(short, long, default_value = "0")]
    pub seed: Seed,

    /// Output .obj path (defaults to <name>-<seed>.obj)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the export command
pub fn execute(args: ExportArgs) -> Result<()> {
    let config = args.source.load()?;
    let flower = generate(&config, args.seed);
    let mesh = flower.assemble_mesh();

    let output = args
        .output
        .unwrap_or_else(|| default_output_name(&config.name, args.seed));
    write_obj(&mesh, &output, &config.name)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Exported {} ({} vertices, {} triangles)",
        output.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}

pub fn default_output_name(name: &str, seed: Seed) -> PathBuf {
    let stem = if name.is_empty() { "flower" } else { name };
    PathBuf::from(format!("{}-{}.obj", stem, seed))
}
