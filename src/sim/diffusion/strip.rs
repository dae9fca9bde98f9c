use anyhow::Result;
use log::warn;

use crate::sim::materials::{Layer, MaterialCatalog, cumulative_thickness_m};

/// Stability bound for the 1D explicit stencil (`T' = (1 - 2c)T + c * sum`).
const MAX_COEFF_1D: f64 = 0.5;

/// Explicit finite-difference heat diffusion through a 1D stack of material
/// layers.
///
/// The grid spans `[0, total_thickness]` with the hot face at cell 0 (held at
/// the source temperature) and the cold face at the last cell (held at 0).
/// Each cell takes the conductivity of the layer containing its center.
pub struct StripSolver {
    resolution: usize,
    temperatures: Vec<f64>,
    /// Per-cell stencil coefficient (conductivity / total thickness, clamped).
    coeff: Vec<f64>,
    /// Layer index of each cell, for legends and layer overlays.
    layer_of_cell: Vec<usize>,
    /// Cumulative layer thicknesses in meters.
    boundaries_m: Vec<f64>,
    source_value: f64,
    running: bool,
    steps_taken: usize,
}

impl StripSolver {
    pub fn new(
        layers: &[Layer],
        catalog: &MaterialCatalog,
        resolution: usize,
        source_value: f64,
    ) -> Result<Self> {
        anyhow::ensure!(!layers.is_empty(), "Layer stack must not be empty");
        anyhow::ensure!(
            resolution >= 3,
            "Strip resolution must be at least 3, got {resolution}"
        );
        anyhow::ensure!(
            source_value.is_finite(),
            "Source temperature must be finite"
        );

        let boundaries_m = cumulative_thickness_m(layers);
        let total = *boundaries_m.last().expect("non-empty layers");
        anyhow::ensure!(total > 0.0, "Total stack thickness must be positive");

        let mut coeff = Vec::with_capacity(resolution);
        let mut layer_of_cell = Vec::with_capacity(resolution);
        let mut clamped = 0usize;
        for x in 0..resolution {
            // Cell centers, so the first and last cells land inside the
            // first and last layers instead of exactly on the faces.
            let pos = (x as f64 + 0.5) / resolution as f64 * total;
            let layer_idx = boundaries_m
                .iter()
                .position(|&b| pos < b)
                .unwrap_or(layers.len() - 1);
            let c = catalog.conductivity(&layers[layer_idx].material) / total;
            if c > MAX_COEFF_1D {
                clamped += 1;
            }
            coeff.push(c.min(MAX_COEFF_1D));
            layer_of_cell.push(layer_idx);
        }
        if clamped > 0 {
            warn!(
                "{clamped} strip cells exceeded the explicit-stencil stability bound; \
                 coefficients clamped to {MAX_COEFF_1D}"
            );
        }

        let mut temperatures = vec![0.0; resolution];
        temperatures[0] = source_value;

        Ok(Self {
            resolution,
            temperatures,
            coeff,
            layer_of_cell,
            boundaries_m,
            source_value,
            running: true,
            steps_taken: 0,
        })
    }

    /// Advances one tick and returns the updated temperatures.
    ///
    /// A no-op while paused; the two face cells stay fixed.
    pub fn step(&mut self) -> &[f64] {
        if !self.running {
            return &self.temperatures;
        }

        let prev = self.temperatures.clone();
        for x in 1..self.resolution - 1 {
            let laplacian = prev[x + 1] + prev[x - 1] - 2.0 * prev[x];
            self.temperatures[x] = prev[x] + self.coeff[x] * laplacian;
        }
        self.steps_taken += 1;
        &self.temperatures
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Index of the layer containing the given cell.
    pub fn layer_of_cell(&self, cell: usize) -> usize {
        self.layer_of_cell[cell]
    }

    /// Cumulative layer thicknesses in meters (one entry per layer).
    pub fn layer_boundaries_m(&self) -> &[f64] {
        &self.boundaries_m
    }

    /// Total stack thickness in meters.
    pub fn total_thickness_m(&self) -> f64 {
        *self.boundaries_m.last().expect("non-empty layers")
    }

    pub fn source_value(&self) -> f64 {
        self.source_value
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}
