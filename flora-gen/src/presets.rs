//! Named flower presets
//!
//! Each rose form is a data row over the same engine, differing only in
//! layout, deformation and palette values.

use serde::{Deserialize, Serialize};

use crate::config::{FlowerConfig, MaterialPalette, OrganStyle, PetalStyleConfig};
use crate::layout::{LayoutConfig, Ramp, SpiralSpec, WhorlLayoutConfig, WhorlSpec};
use crate::petal::DeformParams;
use crate::stem::{LeafSpec, StemConfig, ThornSpec};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Three staggered whorls, deep red
    #[default]
    ClassicRose,
    /// Five loose whorls with ruffled outer petals, pink
    GardenRose,
    /// Dense golden-angle spiral, crimson
    SpiralRose,
    /// Tight upright bud
    BudRose,
    /// Wide, flat bloom with strong backward curl
    OpenRose,
    /// Two cupped whorls of three petals, no thorns
    Tulip,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::ClassicRose,
        Preset::GardenRose,
        Preset::SpiralRose,
        Preset::BudRose,
        Preset::OpenRose,
        Preset::Tulip,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::ClassicRose => "classic-rose",
            Preset::GardenRose => "garden-rose",
            Preset::SpiralRose => "spiral-rose",
            Preset::BudRose => "bud-rose",
            Preset::OpenRose => "open-rose",
            Preset::Tulip => "tulip",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::ClassicRose => "three staggered whorls, deep red",
            Preset::GardenRose => "five loose whorls with ruffled outer petals",
            Preset::SpiralRose => "dense golden-angle spiral",
            Preset::BudRose => "tight upright bud",
            Preset::OpenRose => "wide flat bloom with curled-back petals",
            Preset::Tulip => "two cupped whorls, smooth stem",
        }
    }

    /// Full configuration for this preset
    pub fn config(&self) -> FlowerConfig {
        let (layout, style, palette, stem) = match self {
            Preset::ClassicRose => (
                LayoutConfig::Whorls(WhorlLayoutConfig::default()),
                PetalStyleConfig::default(),
                MaterialPalette::default(),
                StemConfig::default(),
            ),
            Preset::GardenRose => garden_rose(),
            Preset::SpiralRose => spiral_rose(),
            Preset::BudRose => bud_rose(),
            Preset::OpenRose => open_rose(),
            Preset::Tulip => tulip(),
        };

        FlowerConfig {
            name: self.name().to_string(),
            layout,
            style,
            palette,
            organs: OrganStyle::default(),
            stem: Some(stem),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Preset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

type PresetParts = (LayoutConfig, PetalStyleConfig, MaterialPalette, StemConfig);

fn params(cup: f32, backward_curl: f32, edge_curl: f32, ruffle: f32, base_pinch: f32, twist: f32, tip_fold: f32) -> DeformParams {
    DeformParams { cup, backward_curl, edge_curl, ruffle, base_pinch, twist, tip_fold }
}

fn whorl(count: u32, radius: f32, height: f32, tilt: f32, scale: f32, layer: u32) -> WhorlSpec {
    WhorlSpec { count, radius, height, tilt, scale, layer }
}

fn garden_rose() -> PresetParts {
    let layout = LayoutConfig::Whorls(WhorlLayoutConfig {
        whorls: vec![
            whorl(3, 0.015, 0.13, 0.04, 0.45, 0),
            whorl(5, 0.035, 0.11, 0.2, 0.6, 1),
            whorl(7, 0.055, 0.08, 0.4, 0.75, 2),
            whorl(9, 0.075, 0.05, 0.6, 0.9, 3),
            whorl(11, 0.095, 0.02, 0.78, 1.0, 4),
        ],
        stagger: 1.0,
        angle_jitter: 0.08,
        roll_jitter: 0.08,
        scale_jitter: 0.08,
        lean: 0.15,
        droop: 0.0,
    });
    let style = PetalStyleConfig {
        layers: vec![
            params(0.24, 0.0, 0.02, 0.006, 0.5, 0.15, 0.0),
            params(0.2, 0.04, 0.03, 0.01, 0.45, 0.12, 0.05),
            params(0.16, 0.1, 0.05, 0.016, 0.4, 0.1, 0.1),
            params(0.12, 0.2, 0.07, 0.024, 0.35, 0.08, 0.2),
            params(0.08, 0.32, 0.09, 0.032, 0.3, 0.05, 0.35),
        ],
        variants_per_layer: 4,
        ..Default::default()
    };
    let palette = MaterialPalette {
        inner: [0.7, 0.2, 0.35],
        outer: [0.98, 0.62, 0.72],
        edge_tint: [1.0, 0.9, 0.92],
        count: 8,
        roughness: 0.6,
        sheen: 0.35,
    };
    let stem = StemConfig {
        thorns: ThornSpec { count: 12, ..Default::default() },
        ..Default::default()
    };
    (layout, style, palette, stem)
}

fn spiral_rose() -> PresetParts {
    let layout = LayoutConfig::Spiral(SpiralSpec::default());
    let style = PetalStyleConfig {
        layers: vec![
            params(0.26, 0.0, 0.02, 0.004, 0.55, 0.2, 0.0),
            params(0.18, 0.1, 0.05, 0.01, 0.4, 0.12, 0.1),
            params(0.1, 0.3, 0.08, 0.014, 0.3, 0.06, 0.3),
        ],
        ..Default::default()
    };
    let palette = MaterialPalette {
        inner: [0.3, 0.0, 0.04],
        outer: [0.78, 0.04, 0.1],
        count: 8,
        ..Default::default()
    };
    (layout, style, palette, StemConfig::default())
}

fn bud_rose() -> PresetParts {
    let layout = LayoutConfig::Spiral(SpiralSpec {
        total_petals: 40,
        radius: Ramp::new(0.0, 0.05, 0.6),
        height: Ramp::new(0.12, 0.04, 1.5),
        tilt: Ramp::new(0.02, 0.35, 1.4),
        scale: Ramp::new(0.5, 0.85, 0.8),
        wrap: 0.9,
        lean: 0.4,
        ..Default::default()
    });
    let style = PetalStyleConfig {
        layers: vec![
            params(0.3, 0.0, 0.01, 0.002, 0.6, 0.25, 0.0),
            params(0.26, 0.0, 0.02, 0.004, 0.55, 0.2, 0.0),
            params(0.22, 0.04, 0.03, 0.006, 0.5, 0.15, 0.05),
        ],
        ..Default::default()
    };
    let stem = StemConfig {
        leaves: vec![LeafSpec { t: 0.5, side: 1.0, roll: 0.2, scale: 0.9, phase: 0.4 }],
        ..Default::default()
    };
    (layout, style, MaterialPalette::default(), stem)
}

fn open_rose() -> PresetParts {
    let layout = LayoutConfig::Whorls(WhorlLayoutConfig {
        whorls: vec![
            whorl(4, 0.02, 0.08, 0.2, 0.55, 0),
            whorl(6, 0.06, 0.05, 0.55, 0.8, 1),
            whorl(9, 0.1, 0.02, 0.85, 1.0, 2),
            whorl(12, 0.13, 0.0, 0.95, 1.1, 3),
        ],
        stagger: 1.0,
        angle_jitter: 0.05,
        roll_jitter: 0.06,
        scale_jitter: 0.06,
        lean: 0.0,
        droop: 0.4,
    });
    let style = PetalStyleConfig {
        layers: vec![
            params(0.16, 0.05, 0.04, 0.008, 0.45, 0.1, 0.05),
            params(0.1, 0.2, 0.07, 0.012, 0.35, 0.06, 0.2),
            params(0.06, 0.4, 0.1, 0.018, 0.3, 0.04, 0.4),
            params(0.04, 0.55, 0.12, 0.02, 0.25, 0.03, 0.5),
        ],
        ..Default::default()
    };
    let palette = MaterialPalette {
        inner: [0.55, 0.05, 0.08],
        outer: [0.95, 0.3, 0.3],
        ..Default::default()
    };
    (layout, style, palette, StemConfig::default())
}

fn tulip() -> PresetParts {
    let layout = LayoutConfig::Whorls(WhorlLayoutConfig {
        whorls: vec![
            whorl(3, 0.02, 0.02, 0.12, 1.0, 0),
            whorl(3, 0.03, 0.0, 0.18, 1.05, 1),
        ],
        stagger: 1.0,
        angle_jitter: 0.02,
        roll_jitter: 0.02,
        scale_jitter: 0.03,
        lean: 0.0,
        droop: 0.0,
    });
    let style = PetalStyleConfig {
        layers: vec![
            params(0.3, 0.0, 0.0, 0.0, 0.35, 0.0, 0.0),
            params(0.28, 0.02, 0.01, 0.0, 0.35, 0.0, 0.0),
        ],
        variants_per_layer: 2,
        ..Default::default()
    };
    let palette = MaterialPalette {
        inner: [0.85, 0.35, 0.02],
        outer: [0.98, 0.75, 0.1],
        edge_tint: [1.0, 0.95, 0.6],
        count: 4,
        roughness: 0.35,
        sheen: 0.1,
    };
    let stem = StemConfig {
        radius: 0.016,
        taper: 0.1,
        thorns: ThornSpec { count: 0, ..Default::default() },
        leaves: vec![
            LeafSpec { t: 0.15, side: 1.0, roll: 0.0, scale: 1.8, phase: 0.0 },
            LeafSpec { t: 0.25, side: -1.0, roll: 0.1, scale: 1.6, phase: 2.1 },
        ],
        ..Default::default()
    };
    (layout, style, palette, stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!("Spiral_Rose".parse::<Preset>().unwrap(), Preset::SpiralRose);
        assert!("daisy".parse::<Preset>().is_err());
    }

    #[test]
    fn test_presets_are_distinct() {
        let configs: Vec<_> = Preset::ALL.iter().map(|p| p.config()).collect();
        for (i, a) in configs.iter().enumerate() {
            for b in &configs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_preset_whorl_tilts_increase() {
        for preset in Preset::ALL {
            if let LayoutConfig::Whorls(config) = preset.config().layout {
                for pair in config.whorls.windows(2) {
                    assert!(pair[1].tilt >= pair[0].tilt, "{preset}");
                }
            }
        }
    }

    #[test]
    fn test_layer_indices_fit_style() {
        for preset in Preset::ALL {
            let config = preset.config();
            if let LayoutConfig::Whorls(layout) = &config.layout {
                for w in &layout.whorls {
                    assert!((w.layer as usize) < config.style.layer_count(), "{preset}");
                }
            }
        }
    }

    #[test]
    fn test_presets_survive_toml() {
        for preset in Preset::ALL {
            let config = preset.config();
            let text = config.to_toml_string().unwrap();
            assert_eq!(FlowerConfig::from_toml_str(&text).unwrap(), config);
        }
    }
}
