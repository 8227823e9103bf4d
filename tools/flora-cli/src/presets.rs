use anyhow::Result;
use flora_gen::prelude::{LayoutConfig, Preset};

/// Execute the presets command
pub fn execute() -> Result<()> {
    println!("Available presets:");
    for preset in Preset::ALL {
        let config = preset.config();
        let layout = match &config.layout {
            LayoutConfig::Whorls(w) => format!("{} whorls", w.whorls.len()),
            LayoutConfig::Spiral(s) => format!("spiral of {}", s.total_petals),
        };
        println!("  {:<14} {} ({})", preset.name(), preset.description(), layout);
    }
    Ok(())
}
