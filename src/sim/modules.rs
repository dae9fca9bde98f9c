use anyhow::Result;
use log::debug;

use crate::sim::diffusion::plane::PlaneSolver;
use crate::sim::diffusion::strip::StripSolver;
use crate::sim::framework::{Bus, SimContext, SimModule};
use crate::sim::materials::MaterialCatalog;
use crate::sim::network::model::ThermalNetwork;
use crate::sim::network::solve::step_euler;
use crate::sim::network::wall::{WallNetworkConfig, build_wall_network};
use crate::sim::scenario::ScenarioConfig;

/// Bus message toggling the run state of the diffusion modules (the
/// user-facing play/pause control).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToggle(pub bool);

/// Per-tick output of [`PlaneDiffusionModule`].
#[derive(Debug, Clone)]
pub struct PlaneStepResult {
    pub step: usize,
    pub resolution: usize,
    /// Full temperature field, row-major.
    pub temperatures: Vec<f64>,
    /// The row through the heat source.
    pub center_row: Vec<f64>,
    pub source_value: f64,
}

/// Drives the 2D house-slice diffusion solver.
///
/// Inputs (via [`Bus`]): optional [`RunToggle`].
/// Outputs (via [`Bus`]): [`PlaneStepResult`] for the latest tick.
pub struct PlaneDiffusionModule {
    catalog: MaterialCatalog,
    source_value: f64,
    solver: Option<PlaneSolver>,
    step_index: usize,
}

impl PlaneDiffusionModule {
    pub fn new(catalog: MaterialCatalog) -> Self {
        Self {
            catalog,
            source_value: 1.0,
            solver: None,
            step_index: 0,
        }
    }

    pub fn with_source_value(mut self, source_value: f64) -> Self {
        self.source_value = source_value;
        self
    }
}

impl SimModule for PlaneDiffusionModule {
    fn name(&self) -> &'static str {
        "plane_diffusion"
    }

    fn init(&mut self, ctx: &SimContext, _bus: &mut Bus) -> Result<()> {
        let ScenarioConfig::HeatSpread(config) = &ctx.scenario.config else {
            anyhow::bail!("PlaneDiffusionModule requires a heat-spread scenario");
        };
        let config = config.clone().clamped();
        let domain = config.domain(&self.catalog);
        let mut solver = PlaneSolver::new(&domain, config.resolution, self.source_value)?;
        solver.set_running(config.running);
        debug!(
            "plane_diffusion: {}x{} grid, material '{}'",
            config.resolution, config.resolution, config.material
        );
        self.solver = Some(solver);
        self.step_index = 0;
        Ok(())
    }

    fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let Some(solver) = self.solver.as_mut() else {
            anyhow::bail!("PlaneDiffusionModule not initialized");
        };
        if let Some(&RunToggle(running)) = bus.get::<RunToggle>() {
            solver.set_running(running);
        }
        solver.step();
        self.step_index += 1;
        bus.put(PlaneStepResult {
            step: self.step_index,
            resolution: solver.resolution(),
            temperatures: solver.temperatures().to_vec(),
            center_row: solver.center_row().to_vec(),
            source_value: solver.source_value(),
        });
        Ok(())
    }
}

/// Per-tick output of [`StripDiffusionModule`].
#[derive(Debug, Clone)]
pub struct StripStepResult {
    pub step: usize,
    pub temperatures: Vec<f64>,
    /// Layer index per cell, for drawing layer overlays.
    pub layer_of_cell: Vec<usize>,
    pub source_value: f64,
}

/// Drives the 1D layer-stack diffusion solver.
///
/// Inputs (via [`Bus`]): optional [`RunToggle`].
/// Outputs (via [`Bus`]): [`StripStepResult`] for the latest tick.
pub struct StripDiffusionModule {
    catalog: MaterialCatalog,
    source_value: f64,
    solver: Option<StripSolver>,
    step_index: usize,
}

impl StripDiffusionModule {
    pub fn new(catalog: MaterialCatalog) -> Self {
        Self {
            catalog,
            source_value: 1.0,
            solver: None,
            step_index: 0,
        }
    }
}

impl SimModule for StripDiffusionModule {
    fn name(&self) -> &'static str {
        "strip_diffusion"
    }

    fn init(&mut self, ctx: &SimContext, _bus: &mut Bus) -> Result<()> {
        let ScenarioConfig::LayeredStrip(config) = &ctx.scenario.config else {
            anyhow::bail!("StripDiffusionModule requires a layered-strip scenario");
        };
        let config = config.clone().clamped();
        let mut solver = StripSolver::new(
            &config.layers,
            &self.catalog,
            config.resolution,
            self.source_value,
        )?;
        solver.set_running(config.running);
        self.solver = Some(solver);
        self.step_index = 0;
        Ok(())
    }

    fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let Some(solver) = self.solver.as_mut() else {
            anyhow::bail!("StripDiffusionModule not initialized");
        };
        if let Some(&RunToggle(running)) = bus.get::<RunToggle>() {
            solver.set_running(running);
        }
        solver.step();
        self.step_index += 1;
        let layer_of_cell = (0..solver.resolution())
            .map(|c| solver.layer_of_cell(c))
            .collect();
        bus.put(StripStepResult {
            step: self.step_index,
            temperatures: solver.temperatures().to_vec(),
            layer_of_cell,
            source_value: solver.source_value(),
        });
        Ok(())
    }
}

/// Per-tick output of [`WallNetworkModule`].
#[derive(Debug, Clone)]
pub struct NetworkStepResult {
    pub step: usize,
    pub time_s: f64,
    pub names: Vec<String>,
    pub temperatures: Vec<f64>,
}

/// Integrates the wall resistance network one time step per pipeline tick.
///
/// Outputs (via [`Bus`]): [`NetworkStepResult`] for the latest step.
pub struct WallNetworkModule {
    catalog: MaterialCatalog,
    network: Option<ThermalNetwork>,
    temperatures: Vec<f64>,
    time_step_s: f64,
    step_index: usize,
}

impl WallNetworkModule {
    pub fn new(catalog: MaterialCatalog) -> Self {
        Self {
            catalog,
            network: None,
            temperatures: vec![],
            time_step_s: 0.0,
            step_index: 0,
        }
    }
}

impl SimModule for WallNetworkModule {
    fn name(&self) -> &'static str {
        "wall_network"
    }

    fn init(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let ScenarioConfig::WallChart(config) = &ctx.scenario.config else {
            anyhow::bail!("WallNetworkModule requires a wall-chart scenario");
        };
        let config = config.clone().clamped();
        let network = build_wall_network(
            &config.layers,
            &self.catalog,
            &WallNetworkConfig {
                inside_temperature: config.inside_temperature,
                outside_temperature: config.outside_temperature,
                ..Default::default()
            },
        )?;
        self.temperatures = network.initial_temperatures();
        self.time_step_s = config.time_step_s();
        self.step_index = 0;

        // Publish the initial state so recorders capture t = 0.
        bus.put(NetworkStepResult {
            step: 0,
            time_s: 0.0,
            names: network.node_names(),
            temperatures: self.temperatures.clone(),
        });
        self.network = Some(network);
        Ok(())
    }

    fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let Some(network) = self.network.as_ref() else {
            anyhow::bail!("WallNetworkModule not initialized");
        };
        step_euler(network, &mut self.temperatures, self.time_step_s)?;
        self.step_index += 1;
        bus.put(NetworkStepResult {
            step: self.step_index,
            time_s: self.step_index as f64 * self.time_step_s,
            names: network.node_names(),
            temperatures: self.temperatures.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::framework::Pipeline;
    use crate::sim::scenario::{ScenarioFactory, ScenarioKind};

    #[test]
    fn test_plane_module_requires_matching_scenario() {
        let scenario = ScenarioFactory::create(ScenarioKind::WallChart, "chart");
        let ctx = SimContext::new(&scenario);
        let mut bus = Bus::new();
        let mut module = PlaneDiffusionModule::new(MaterialCatalog::with_presets());
        assert!(module.init(&ctx, &mut bus).is_err());
    }

    #[test]
    fn test_plane_module_publishes_steps() {
        let mut scenario = ScenarioFactory::create(ScenarioKind::HeatSpread, "spread");
        if let ScenarioConfig::HeatSpread(c) = &mut scenario.config {
            c.resolution = 15;
            c.running = true;
        }
        let ctx = SimContext::new(&scenario);
        let mut bus = Bus::new();

        let mut pipeline =
            Pipeline::new().with_module(PlaneDiffusionModule::new(MaterialCatalog::with_presets()));
        pipeline.init(&ctx, &mut bus).unwrap();
        for _ in 0..10 {
            pipeline.step(&ctx, &mut bus).unwrap();
        }

        let result = bus.get::<PlaneStepResult>().unwrap();
        assert_eq!(result.step, 10);
        assert_eq!(result.resolution, 15);
        assert_eq!(result.temperatures.len(), 15 * 15);
        assert!((result.source_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_toggle_pauses_solver() {
        let mut scenario = ScenarioFactory::create(ScenarioKind::HeatSpread, "spread");
        if let ScenarioConfig::HeatSpread(c) = &mut scenario.config {
            c.resolution = 15;
            c.running = true;
        }
        let ctx = SimContext::new(&scenario);
        let mut bus = Bus::new();

        let mut module = PlaneDiffusionModule::new(MaterialCatalog::with_presets());
        module.init(&ctx, &mut bus).unwrap();
        module.step(&ctx, &mut bus).unwrap();
        let warm = bus.get::<PlaneStepResult>().unwrap().temperatures.clone();

        bus.put(RunToggle(false));
        module.step(&ctx, &mut bus).unwrap();
        let frozen = bus.get::<PlaneStepResult>().unwrap().temperatures.clone();
        assert_eq!(warm, frozen);
    }

    #[test]
    fn test_strip_module_end_to_end() {
        let mut scenario = ScenarioFactory::create(ScenarioKind::LayeredStrip, "strip");
        if let ScenarioConfig::LayeredStrip(c) = &mut scenario.config {
            c.running = true;
        }
        let ctx = SimContext::new(&scenario);
        let mut bus = Bus::new();

        let mut module = StripDiffusionModule::new(MaterialCatalog::with_presets());
        module.init(&ctx, &mut bus).unwrap();
        for _ in 0..20 {
            module.step(&ctx, &mut bus).unwrap();
        }
        let result = bus.get::<StripStepResult>().unwrap();
        assert_eq!(result.temperatures.len(), 50);
        assert_eq!(result.layer_of_cell.len(), 50);
        assert!((result.temperatures[0] - 1.0).abs() < 1e-12);
        assert!(result.temperatures[1] > 0.0);
    }

    #[test]
    fn test_network_module_time_axis() {
        let scenario = ScenarioFactory::create(ScenarioKind::WallChart, "chart");
        let ctx = SimContext::new(&scenario);
        let mut bus = Bus::new();

        let mut module = WallNetworkModule::new(MaterialCatalog::with_presets());
        module.init(&ctx, &mut bus).unwrap();
        assert_eq!(bus.get::<NetworkStepResult>().unwrap().step, 0);

        for _ in 0..24 {
            module.step(&ctx, &mut bus).unwrap();
        }
        let result = bus.get::<NetworkStepResult>().unwrap();
        assert_eq!(result.step, 24);
        assert!((result.time_s - 86_400.0).abs() < 1e-6);
        assert_eq!(result.names[0], "Inside");
    }
}
