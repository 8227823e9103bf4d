use anyhow::{bail, Context, Result};
use clap::Args;
use flora_gen::prelude::Preset;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Args)]
pub struct InitArgs {
    /// Preset to start from
    #[arg(short, long, default_value = "classic-rose")]
    pub preset: Preset,

    /// Output path
    #[arg(short, long, default_value = "flower.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let text = args
        .preset
        .config()
        .to_toml_string()
        .context("Failed to serialize preset")?;
    std::fs::write(&args.output, text)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Created {} from preset {}", args.output.display(), args.preset);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flora_gen::prelude::FlowerConfig;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("flower.toml");
        execute(InitArgs { preset: Preset::Tulip, output: output.clone(), force: false }).unwrap();

        let loaded = FlowerConfig::load(&output).unwrap();
        assert_eq!(loaded, Preset::Tulip.config());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("flower.toml");
        std::fs::write(&output, "keep me").unwrap();

        let result = execute(InitArgs { preset: Preset::Tulip, output: output.clone(), force: false });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");

        execute(InitArgs { preset: Preset::Tulip, output: output.clone(), force: true }).unwrap();
        assert_ne!(std::fs::read_to_string(&output).unwrap(), "keep me");
    }
}
