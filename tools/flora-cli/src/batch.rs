use anyhow::{Context, Result};
use clap::Args;
use flora_gen::prelude::{generate_with_pool, write_obj, ResourcePool, Seed};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::export::default_output_name;
use crate::source::SourceArgs;

/// Arguments for the batch command
#[derive(Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// First seed
    #[arg(long, default_value = "0")]
    pub start: u64,

    /// Number of seeds to export
    #[arg(short = 'n', long, default_value = "8")]
    pub count: u64,

    /// Output directory
    #[arg(short, long, default_value = "flowers")]
    pub output: PathBuf,
}

/// Execute the batch command
pub fn execute(args: BatchArgs) -> Result<()> {
    let config = args.source.load()?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    // One pool for every seed; flowers only differ in layout and organs.
    let pool = Arc::new(ResourcePool::build(&config.style, &config.palette, &config.organs));
    let end = args.start.saturating_add(args.count);

    let results: Vec<Result<usize>> = (args.start..end)
        .into_par_iter()
        .map(|seed| {
            let seed = Seed::new(seed);
            let flower = generate_with_pool(&config, seed, Arc::clone(&pool));
            let mesh = flower.assemble_mesh();
            let path = args.output.join(default_output_name(&config.name, seed));
            write_obj(&mesh, &path, &config.name)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!("Wrote {}", path.display());
            Ok(mesh.vertex_count())
        })
        .collect();

    let mut vertices = 0;
    for result in results {
        vertices += result?;
    }

    println!(
        "Exported {} flowers to {} ({} vertices total)",
        args.count,
        args.output.display(),
        vertices
    );
    Ok(())
}
