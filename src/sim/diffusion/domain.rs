use serde::{Deserialize, Serialize};

use crate::sim::materials::AIR_CONDUCTIVITY;

/// Outer dimensions of the house box in meters.
///
/// The box is centered at the world origin: width along x, depth along z,
/// height along the vertical axis the slice plane moves on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseSize {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl HouseSize {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Uniform cube of the given edge length.
    pub fn cube(edge: f64) -> Self {
        Self::new(edge, edge, edge)
    }
}

/// Classification of a point on the slice plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Inside the house (warm interior air).
    Interior,
    /// Inside the insulation shell wrapped around the house.
    Insulation,
    /// Outside the shell (ambient air).
    Exterior,
}

/// A horizontal cross-section through the insulated house.
///
/// The slice sits at height `y_plane`; points are classified against the house
/// box and against the shell box obtained by growing every half-extent by half
/// the insulation thickness. When `y_plane` is above the shell, every point of
/// the slice is [`Region::Exterior`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceDomain {
    pub house: HouseSize,
    /// Height of the slice plane in meters (0 = house mid-height).
    pub y_plane: f64,
    /// Insulation shell thickness in centimeters.
    pub insulation_thickness_cm: f64,
    /// Conductivity of the selected insulation material in W/(m*K).
    pub insulation_conductivity: f64,
}

impl SliceDomain {
    /// Classifies a point `(x, z)` of the slice plane.
    pub fn classify(&self, x: f64, z: f64) -> Region {
        if self.inside_house(x, z) {
            return Region::Interior;
        }
        if self.inside_shell(x, z) {
            return Region::Insulation;
        }
        Region::Exterior
    }

    /// Conductivity at a point of the slice plane in W/(m*K).
    ///
    /// Interior and exterior are both air; only the shell picks up the
    /// selected material.
    pub fn conductivity(&self, x: f64, z: f64) -> f64 {
        match self.classify(x, z) {
            Region::Insulation => self.insulation_conductivity,
            Region::Interior | Region::Exterior => AIR_CONDUCTIVITY,
        }
    }

    fn inside_house(&self, x: f64, z: f64) -> bool {
        let hw = self.house.width / 2.0;
        let hh = self.house.height / 2.0;
        let hd = self.house.depth / 2.0;
        x.abs() <= hw && self.y_plane.abs() <= hh && z.abs() <= hd
    }

    fn inside_shell(&self, x: f64, z: f64) -> bool {
        // Half the thickness goes to each side of the box.
        let grow = self.insulation_thickness_cm / 2.0 / 100.0;
        let hw = self.house.width / 2.0 + grow;
        let hh = self.house.height / 2.0 + grow;
        let hd = self.house.depth / 2.0 + grow;
        x.abs() <= hw && self.y_plane.abs() <= hh && z.abs() <= hd
    }
}
