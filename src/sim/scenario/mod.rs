mod config;
mod factory;

pub use config::{
    HeatSpreadConfig, LayeredStripConfig, MAX_RESOLUTION, MIN_RESOLUTION, Scenario,
    ScenarioConfig, WallChartConfig,
};
pub use factory::{ScenarioFactory, ScenarioKind};
