use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::sim::framework::{Bus, SimContext, SimModule};
use crate::sim::modules::{NetworkStepResult, PlaneStepResult};

/// Chart-ready temperature trajectories recorded from a network simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureHistory {
    pub names: Vec<String>,
    pub time_s: Vec<f64>,
    /// `series[n][k]` is node `n` at `time_s[k]`.
    pub series: Vec<Vec<f64>>,
}

impl TemperatureHistory {
    /// Final temperature of each node (the chart's boundary readout).
    pub fn final_temperatures(&self) -> Vec<f64> {
        self.series
            .iter()
            .map(|s| s.last().copied().unwrap_or(0.0))
            .collect()
    }
}

/// Mutable, Bus-stored recording buffer for the wall network simulation.
///
/// The intended workflow is:
/// 1) `NetworkRecorderModule` initializes this on the Bus,
/// 2) the recorder appends one sample per step,
/// 3) the caller takes the finalized [`TemperatureHistory`] off the Bus.
#[derive(Debug, Default)]
pub struct NetworkRecorderData {
    names: Vec<String>,
    time_s: Vec<f64>,
    series: Vec<Vec<f64>>,
    last_step: Option<usize>,
}

impl NetworkRecorderData {
    fn push_step(&mut self, step: &NetworkStepResult) -> Result<()> {
        if self.names.is_empty() {
            self.names = step.names.clone();
            self.series = vec![Vec::new(); step.names.len()];
        }
        anyhow::ensure!(
            step.temperatures.len() == self.names.len(),
            "NetworkRecorderData::push_step: inconsistent node count \
             (expected {}, got {})",
            self.names.len(),
            step.temperatures.len()
        );
        // A module may publish the same sample twice (init + first tick of a
        // paused pipeline); keep one.
        if self.last_step == Some(step.step) {
            return Ok(());
        }
        self.last_step = Some(step.step);

        self.time_s.push(step.time_s);
        for (n, &t) in step.temperatures.iter().enumerate() {
            self.series[n].push(t);
        }
        Ok(())
    }

    pub fn finalize(self) -> TemperatureHistory {
        TemperatureHistory {
            names: self.names,
            time_s: self.time_s,
            series: self.series,
        }
    }
}

/// Records [`NetworkStepResult`] samples into a [`NetworkRecorderData`]
/// stored on the Bus.
pub struct NetworkRecorderModule;

impl NetworkRecorderModule {
    /// Removes the recorder data from the Bus and finalizes it.
    pub fn take_result(bus: &mut Bus) -> Result<TemperatureHistory> {
        let Some(data) = bus.take::<NetworkRecorderData>() else {
            anyhow::bail!("NetworkRecorderData not found on Bus");
        };
        Ok(data.finalize())
    }
}

impl SimModule for NetworkRecorderModule {
    fn name(&self) -> &'static str {
        "network_recorder"
    }

    fn init(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        if bus.get::<NetworkRecorderData>().is_none() {
            bus.put(NetworkRecorderData::default());
        }
        // Capture the t = 0 sample the network module publishes during init.
        if let Some(step) = bus.get::<NetworkStepResult>().cloned() {
            let Some(data) = bus.get_mut::<NetworkRecorderData>() else {
                anyhow::bail!("NetworkRecorderData not initialized on Bus");
            };
            data.push_step(&step)?;
        }
        Ok(())
    }

    fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let Some(step) = bus.get::<NetworkStepResult>().cloned() else {
            anyhow::bail!("NetworkRecorderModule requires NetworkStepResult on the Bus");
        };
        let Some(data) = bus.get_mut::<NetworkRecorderData>() else {
            anyhow::bail!("NetworkRecorderData not initialized on Bus");
        };
        data.push_step(&step)?;
        Ok(())
    }
}

/// History of the plane simulation: the source row over time plus the final
/// field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneHistory {
    pub resolution: usize,
    pub source_value: f64,
    /// One center-row snapshot per recorded tick.
    pub center_rows: Vec<Vec<f64>>,
    /// Full field at the last recorded tick, row-major.
    pub final_field: Vec<f64>,
}

/// Bus-stored recording buffer for the plane diffusion simulation.
///
/// Keeps the center row per tick (enough for profile charts) and only the
/// most recent full field, so long runs stay small.
#[derive(Debug, Default)]
pub struct PlaneRecorderData {
    resolution: usize,
    source_value: f64,
    center_rows: Vec<Vec<f64>>,
    final_field: Vec<f64>,
    last_step: Option<usize>,
}

impl PlaneRecorderData {
    fn push_step(&mut self, step: &PlaneStepResult) -> Result<()> {
        if self.resolution == 0 {
            self.resolution = step.resolution;
            self.source_value = step.source_value;
        }
        anyhow::ensure!(
            step.resolution == self.resolution,
            "PlaneRecorderData::push_step: resolution changed mid-run \
             ({} -> {})",
            self.resolution,
            step.resolution
        );
        if self.last_step == Some(step.step) {
            return Ok(());
        }
        self.last_step = Some(step.step);

        self.center_rows.push(step.center_row.clone());
        self.final_field = step.temperatures.clone();
        Ok(())
    }

    pub fn finalize(self) -> PlaneHistory {
        PlaneHistory {
            resolution: self.resolution,
            source_value: self.source_value,
            center_rows: self.center_rows,
            final_field: self.final_field,
        }
    }
}

/// Records [`PlaneStepResult`] samples into a [`PlaneRecorderData`] stored on
/// the Bus.
pub struct PlaneRecorderModule;

impl PlaneRecorderModule {
    pub fn take_result(bus: &mut Bus) -> Result<PlaneHistory> {
        let Some(data) = bus.take::<PlaneRecorderData>() else {
            anyhow::bail!("PlaneRecorderData not found on Bus");
        };
        Ok(data.finalize())
    }
}

impl SimModule for PlaneRecorderModule {
    fn name(&self) -> &'static str {
        "plane_recorder"
    }

    fn init(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        if bus.get::<PlaneRecorderData>().is_none() {
            bus.put(PlaneRecorderData::default());
        }
        Ok(())
    }

    fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let Some(step) = bus.get::<PlaneStepResult>().cloned() else {
            anyhow::bail!("PlaneRecorderModule requires PlaneStepResult on the Bus");
        };
        let Some(data) = bus.get_mut::<PlaneRecorderData>() else {
            anyhow::bail!("PlaneRecorderData not initialized on Bus");
        };
        data.push_step(&step)?;
        Ok(())
    }
}
