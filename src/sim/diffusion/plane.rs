use anyhow::Result;
use log::warn;
use rayon::prelude::*;

use super::domain::SliceDomain;

/// Edge length (m) of the square world plane the grid is mapped onto.
pub const PLANE_SIZE_M: f64 = 4.0;

/// Stability bound for the 2D explicit stencil: the update
/// `T' = (1 - 4c)T + c * sum(neighbors)` stays a convex combination only for
/// `c <= 1/4`.
const MAX_COEFF_2D: f64 = 0.25;

/// Explicit finite-difference heat diffusion over a square slice of the
/// insulated house.
///
/// The grid covers a [`PLANE_SIZE_M`] x [`PLANE_SIZE_M`] plane centered on the
/// house. A constant-temperature source sits at the grid center; border cells
/// keep their initial value and act as a cold far-field boundary. Per tick,
/// every other cell moves by `c * (sum of 4 neighbors - 4 * self)` where `c`
/// is the per-cell conductivity coefficient from the [`SliceDomain`]
/// classifier.
pub struct PlaneSolver {
    resolution: usize,
    /// Current cell temperatures, row-major `resolution * resolution`.
    temperatures: Vec<f64>,
    /// Per-cell stencil coefficient (conductivity / plane size, clamped).
    coeff: Vec<f64>,
    /// Source cell (row, column), held at `source_value`.
    source: (usize, usize),
    source_value: f64,
    running: bool,
    steps_taken: usize,
}

impl PlaneSolver {
    /// Builds a solver for the given domain.
    ///
    /// `resolution` is the cell count per axis (minimum 3, so there is at
    /// least one movable cell between the borders).
    pub fn new(domain: &SliceDomain, resolution: usize, source_value: f64) -> Result<Self> {
        anyhow::ensure!(
            resolution >= 3,
            "Plane resolution must be at least 3, got {resolution}"
        );
        anyhow::ensure!(
            source_value.is_finite(),
            "Source temperature must be finite"
        );

        let mut coeff = Vec::with_capacity(resolution * resolution);
        let mut clamped = 0usize;
        for i in 0..resolution {
            for j in 0..resolution {
                let (x, z) = grid_to_world(i, j, resolution);
                let c = domain.conductivity(x, z) / PLANE_SIZE_M;
                if c > MAX_COEFF_2D {
                    clamped += 1;
                }
                coeff.push(c.min(MAX_COEFF_2D));
            }
        }
        if clamped > 0 {
            warn!(
                "{clamped} cells exceeded the explicit-stencil stability bound; \
                 coefficients clamped to {MAX_COEFF_2D}"
            );
        }

        let mut temperatures = vec![0.0; resolution * resolution];
        let source = (resolution / 2, resolution / 2);
        temperatures[source.0 * resolution + source.1] = source_value;

        Ok(Self {
            resolution,
            temperatures,
            coeff,
            source,
            source_value,
            running: true,
            steps_taken: 0,
        })
    }

    /// Advances one tick and returns the updated temperatures.
    ///
    /// A no-op while paused. Border cells and the source cell are left
    /// untouched.
    pub fn step(&mut self) -> &[f64] {
        if !self.running {
            return &self.temperatures;
        }

        let res = self.resolution;
        let source = self.source;
        let prev = &self.temperatures;
        let coeff = &self.coeff;

        let mut next = prev.clone();
        // Rows are independent given the previous field, so update them in
        // parallel. Border rows 0 and res-1 stay fixed.
        next.par_chunks_mut(res)
            .enumerate()
            .skip(1)
            .take(res - 2)
            .for_each(|(i, row)| {
                for j in 1..res - 1 {
                    if (i, j) == source {
                        continue;
                    }
                    let idx = i * res + j;
                    let laplacian = prev[(i + 1) * res + j]
                        + prev[(i - 1) * res + j]
                        + prev[idx + 1]
                        + prev[idx - 1]
                        - 4.0 * prev[idx];
                    row[j] = prev[idx] + coeff[idx] * laplacian;
                }
            });

        self.temperatures = next;
        self.steps_taken += 1;
        &self.temperatures
    }

    /// Current cell temperatures, row-major.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Temperature of cell `(i, j)`.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.temperatures[i * self.resolution + j]
    }

    /// The row passing through the source cell.
    pub fn center_row(&self) -> &[f64] {
        let i = self.source.0;
        &self.temperatures[i * self.resolution..(i + 1) * self.resolution]
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn source_cell(&self) -> (usize, usize) {
        self.source
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

    /// Pauses or resumes stepping (the user-facing run toggle).
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Grid cell containing the world point `(x, z)`, if it lies on the plane.
    pub fn cell_at_world(&self, x: f64, z: f64) -> Option<(usize, usize)> {
        world_to_grid(x, z, self.resolution)
    }
}

/// Maps cell indices to the world coordinates of the cell's sample point.
fn grid_to_world(i: usize, j: usize, resolution: usize) -> (f64, f64) {
    let x = (i as f64 / resolution as f64) * PLANE_SIZE_M - PLANE_SIZE_M / 2.0;
    let z = (j as f64 / resolution as f64) * PLANE_SIZE_M - PLANE_SIZE_M / 2.0;
    (x, z)
}

fn world_to_grid(x: f64, z: f64, resolution: usize) -> Option<(usize, usize)> {
    let half = PLANE_SIZE_M / 2.0;
    if !(-half..=half).contains(&x) || !(-half..=half).contains(&z) {
        return None;
    }
    let to_index = |w: f64| {
        let idx = ((w + half) / PLANE_SIZE_M * resolution as f64).floor() as usize;
        idx.min(resolution - 1)
    };
    Some((to_index(x), to_index(z)))
}
