pub mod sim;
pub mod timefmt;
mod id;

// Prelude
pub use sim::materials::{AIR_CONDUCTIVITY, InsulationMaterial, Layer, MaterialCatalog};
pub use sim::scenario::{Scenario, ScenarioFactory, ScenarioKind};
use id::random_id;
