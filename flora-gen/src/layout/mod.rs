//! Petal layout engine
//!
//! Two interchangeable strategies, concentric whorls and a golden-angle
//! spiral, share one output contract: an ordered list of `PetalInstance`.

mod instance;
mod orientation;
mod spiral;
mod variant;
mod whorl;

use serde::{Deserialize, Serialize};

pub use instance::PetalInstance;
pub use orientation::{petal_direction, petal_orientation, radial, tangential, DirectionTerms, CONCAVE_AXIS};
pub use spiral::{golden_angle, Ramp, SpiralLayout, SpiralSample, SpiralSpec};
pub use variant::VariantPicker;
pub use whorl::{WhorlLayout, WhorlLayoutConfig, WhorlSpec};

use crate::pool::ResourcePool;
use crate::rng::PseudoRandomSource;

/// A strategy turning layout parameters into petal instances
pub trait LayoutStrategy {
    fn layout(&self, pool: &ResourcePool, rng: &mut PseudoRandomSource) -> Vec<PetalInstance>;
}

/// Which strategy to use and its parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutConfig {
    Whorls(WhorlLayoutConfig),
    Spiral(SpiralSpec),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::Whorls(WhorlLayoutConfig::default())
    }
}

impl LayoutConfig {
    /// Build the strategy for this config
    pub fn strategy(&self) -> Box<dyn LayoutStrategy> {
        match self {
            Self::Whorls(config) => Box::new(WhorlLayout::new(config)),
            Self::Spiral(spec) => Box::new(SpiralLayout::new(spec)),
        }
    }

    /// Run the configured strategy
    pub fn layout(&self, pool: &ResourcePool, rng: &mut PseudoRandomSource) -> Vec<PetalInstance> {
        self.strategy().layout(pool, rng)
    }
}
