//! Where a command gets its flower config from

use anyhow::{Context, Result};
use clap::Args;
use flora_gen::prelude::{FlowerConfig, Preset};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Built-in preset (see `flora presets`)
    #[arg(short, long, conflicts_with = "config")]
    pub preset: Option<Preset>,

    /// Path to a flower TOML config
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load the config file, or the preset, or the default preset
    pub fn load(&self) -> Result<FlowerConfig> {
        match (&self.config, self.preset) {
            (Some(path), _) => FlowerConfig::load(path)
                .with_context(|| format!("Failed to load flower config: {}", path.display())),
            (None, Some(preset)) => Ok(preset.config()),
            (None, None) => Ok(Preset::default().config()),
        }
    }
}
