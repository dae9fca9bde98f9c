use log::debug;
use serde::{Deserialize, Serialize};

use crate::sim::diffusion::domain::{HouseSize, SliceDomain};
use crate::sim::materials::{Layer, MaterialCatalog};

pub const MIN_RESOLUTION: usize = 8;
pub const MAX_RESOLUTION: usize = 512;

const MIN_THICKNESS_CM: f64 = 1.0;
const MAX_THICKNESS_CM: f64 = 100.0;

/// Default wall duration for the chart scenario: one day, hourly.
const DEFAULT_DURATION_S: f64 = 86_400.0;
const DEFAULT_STEPS: usize = 24;

/// Parameters of the house-slice heat-spread simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSpreadConfig {
    /// Insulation material name (catalog lookup).
    pub material: String,
    /// Shell thickness in centimeters.
    pub thickness_cm: f64,
    /// Height of the simulated cross-section plane in meters.
    pub y_plane: f64,
    /// Grid cells per axis.
    pub resolution: usize,
    pub house_size: HouseSize,
    /// Whether the animation starts running.
    pub running: bool,
}

impl Default for HeatSpreadConfig {
    fn default() -> Self {
        Self {
            material: "Extruded Expanded Polystyrene".to_string(),
            thickness_cm: 30.0,
            y_plane: 0.7,
            resolution: 50,
            house_size: HouseSize::cube(1.5),
            running: false,
        }
    }
}

impl HeatSpreadConfig {
    /// Returns a copy with every parameter forced into its valid range.
    pub fn clamped(mut self) -> Self {
        self.resolution = clamp_resolution(self.resolution);
        self.thickness_cm = clamp_thickness(self.thickness_cm);
        if !self.y_plane.is_finite() {
            debug!("Non-finite y_plane reset to 0");
            self.y_plane = 0.0;
        }
        self
    }

    /// Builds the slice-plane classifier for this config.
    pub fn domain(&self, catalog: &MaterialCatalog) -> SliceDomain {
        SliceDomain {
            house: self.house_size,
            y_plane: self.y_plane,
            insulation_thickness_cm: self.thickness_cm,
            insulation_conductivity: catalog.conductivity(&self.material),
        }
    }
}

/// Parameters of the 1D layer-stack simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredStripConfig {
    pub layers: Vec<Layer>,
    pub resolution: usize,
    pub running: bool,
}

impl Default for LayeredStripConfig {
    fn default() -> Self {
        Self {
            layers: vec![Layer::new("Extruded Expanded Polystyrene", 30.0)],
            resolution: 50,
            running: false,
        }
    }
}

impl LayeredStripConfig {
    pub fn clamped(mut self) -> Self {
        self.resolution = clamp_resolution(self.resolution);
        if self.layers.is_empty() {
            debug!("Empty layer stack replaced by default");
            self.layers = Self::default().layers;
        }
        for layer in &mut self.layers {
            layer.thickness_cm = clamp_thickness(layer.thickness_cm);
        }
        self
    }
}

/// Parameters of the temperature-over-time wall chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallChartConfig {
    pub layers: Vec<Layer>,
    pub inside_temperature: f64,
    pub outside_temperature: f64,
    /// Simulated duration in seconds.
    pub duration_s: f64,
    /// Number of integration steps over the duration.
    pub steps: usize,
}

impl Default for WallChartConfig {
    fn default() -> Self {
        Self {
            layers: vec![Layer::new("Extruded Expanded Polystyrene", 30.0)],
            inside_temperature: 20.0,
            outside_temperature: 10.0,
            duration_s: DEFAULT_DURATION_S,
            steps: DEFAULT_STEPS,
        }
    }
}

impl WallChartConfig {
    /// Integration step length in seconds.
    pub fn time_step_s(&self) -> f64 {
        self.duration_s / self.steps as f64
    }

    pub fn clamped(mut self) -> Self {
        if self.layers.is_empty() {
            debug!("Empty layer stack replaced by default");
            self.layers = Self::default().layers;
        }
        for layer in &mut self.layers {
            layer.thickness_cm = clamp_thickness(layer.thickness_cm);
        }
        self.steps = self.steps.max(1);
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            debug!("Invalid duration {} reset to default", self.duration_s);
            self.duration_s = DEFAULT_DURATION_S;
        }
        if !self.inside_temperature.is_finite() {
            self.inside_temperature = 20.0;
        }
        if !self.outside_temperature.is_finite() {
            self.outside_temperature = 10.0;
        }
        self
    }
}

/// A scenario variant with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioConfig {
    HeatSpread(HeatSpreadConfig),
    LayeredStrip(LayeredStripConfig),
    WallChart(WallChartConfig),
}

impl ScenarioConfig {
    pub fn clamped(self) -> Self {
        match self {
            Self::HeatSpread(c) => Self::HeatSpread(c.clamped()),
            Self::LayeredStrip(c) => Self::LayeredStrip(c.clamped()),
            Self::WallChart(c) => Self::WallChart(c.clamped()),
        }
    }
}

/// A named, identified simulation setup — what a front end would show as one
/// tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub config: ScenarioConfig,
}

fn clamp_resolution(resolution: usize) -> usize {
    let clamped = resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION);
    if clamped != resolution {
        debug!("Resolution {resolution} clamped to {clamped}");
    }
    clamped
}

fn clamp_thickness(thickness_cm: f64) -> f64 {
    if !thickness_cm.is_finite() {
        debug!("Non-finite thickness reset to {MIN_THICKNESS_CM} cm");
        return MIN_THICKNESS_CM;
    }
    let clamped = thickness_cm.clamp(MIN_THICKNESS_CM, MAX_THICKNESS_CM);
    if clamped != thickness_cm {
        debug!("Thickness {thickness_cm} cm clamped to {clamped} cm");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_clamping() {
        let a = HeatSpreadConfig::default();
        assert_eq!(a.clone().clamped(), a);
        let b = LayeredStripConfig::default();
        assert_eq!(b.clone().clamped(), b);
        let c = WallChartConfig::default();
        assert_eq!(c.clone().clamped(), c);
    }

    #[test]
    fn test_resolution_clamped() {
        let mut cfg = HeatSpreadConfig::default();
        cfg.resolution = 2;
        assert_eq!(cfg.clone().clamped().resolution, MIN_RESOLUTION);
        cfg.resolution = 10_000;
        assert_eq!(cfg.clamped().resolution, MAX_RESOLUTION);
    }

    #[test]
    fn test_thickness_clamped() {
        let mut cfg = HeatSpreadConfig::default();
        cfg.thickness_cm = 0.0;
        assert!((cfg.clone().clamped().thickness_cm - 1.0).abs() < 1e-12);
        cfg.thickness_cm = 500.0;
        assert!((cfg.clamped().thickness_cm - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_layers_replaced() {
        let mut cfg = WallChartConfig::default();
        cfg.layers.clear();
        let cfg = cfg.clamped();
        assert!(!cfg.layers.is_empty());
    }

    #[test]
    fn test_time_step_derived() {
        let cfg = WallChartConfig::default();
        assert!((cfg.time_step_s() - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_domain_uses_material_conductivity() {
        let catalog = MaterialCatalog::with_presets();
        let cfg = HeatSpreadConfig {
            material: "Concrete Block".to_string(),
            ..Default::default()
        };
        let domain = cfg.domain(&catalog);
        assert!((domain.insulation_conductivity - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_json_round_trip() {
        let scenario = Scenario {
            id: "abc".to_string(),
            title: "Wall chart".to_string(),
            config: ScenarioConfig::WallChart(WallChartConfig::default()),
        };
        let json = serde_json::to_string(&scenario).unwrap();
        let back: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scenario);
    }
}
