use crate::sim::scenario::Scenario;

/// Shared read-only context passed to simulation modules.
///
/// The scenario is the single source of truth for user-adjustable parameters
/// (material, thickness, resolution, temperatures, duration). Modules read
/// the variant they understand during `init()` and keep derived state (grids,
/// networks) in their own structs.
pub struct SimContext<'a> {
    pub scenario: &'a Scenario,
}

impl<'a> SimContext<'a> {
    pub fn new(scenario: &'a Scenario) -> Self {
        Self { scenario }
    }
}
