use serde::{Deserialize, Serialize};

/// Thermal conductivity of ambient air in W/(m*K).
///
/// Used for the house interior and for everything outside the insulation
/// shell. This is an effective value for gently circulating room air, not the
/// still-air textbook figure.
pub const AIR_CONDUCTIVITY: f64 = 0.25;

/// An insulation (or masonry) material available to the simulations.
///
/// `color` is the display color used for this material in legends and chart
/// series, as a `#RRGGBB` hex string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationMaterial {
    pub name: String,
    pub color: String,
    /// Thermal conductivity in W/(m*K).
    pub conductivity: f64,
}

impl InsulationMaterial {
    pub fn new(name: &str, color: &str, conductivity: f64) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            conductivity,
        }
    }

    /// Fallback returned for unknown material names.
    ///
    /// White, conductivity 1.0 — a typo in a config shows up immediately in
    /// the output instead of failing the run.
    pub fn unknown() -> Self {
        Self::new("unknown", "#FFFFFF", 1.0)
    }
}

/// A single layer in a wall build-up: a material name plus its thickness.
///
/// Thickness is kept in centimeters because that is the unit users type in;
/// conversion to meters happens at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub material: String,
    /// Thickness in centimeters.
    pub thickness_cm: f64,
}

impl Layer {
    pub fn new(material: &str, thickness_cm: f64) -> Self {
        Self {
            material: material.to_string(),
            thickness_cm,
        }
    }

    /// Thickness in meters.
    pub fn thickness_m(&self) -> f64 {
        self.thickness_cm / 100.0
    }

    /// Conductive thermal resistance of this layer in K/W:
    /// `R = (1/lambda) * thickness`.
    ///
    /// A zero-conductivity material yields `f64::INFINITY` (a perfect
    /// insulator); the transient network solver treats that as zero heat flow.
    pub fn resistance_k_per_w(&self, catalog: &MaterialCatalog) -> f64 {
        let material = catalog.get_or_unknown(&self.material);
        if material.conductivity <= 0.0 {
            return f64::INFINITY;
        }
        (1.0 / material.conductivity) * self.thickness_m()
    }
}

/// Running cumulative thickness of a layer stack in meters.
///
/// `result[i]` is the distance from the hot face to the far side of layer `i`.
pub fn cumulative_thickness_m(layers: &[Layer]) -> Vec<f64> {
    let mut out = Vec::with_capacity(layers.len());
    let mut total = 0.0;
    for layer in layers {
        total += layer.thickness_m();
        out.push(total);
    }
    out
}

/// Catalog of named materials.
///
/// Lookups are by display name. Unknown names resolve to
/// [`InsulationMaterial::unknown`] rather than an error so an interactive
/// front end never hard-fails on a stale selection.
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    materials: Vec<InsulationMaterial>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self { materials: vec![] }
    }

    pub fn add(&mut self, material: InsulationMaterial) {
        self.materials.push(material);
    }

    pub fn get(&self, name: &str) -> Option<&InsulationMaterial> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn get_or_unknown(&self, name: &str) -> InsulationMaterial {
        self.get(name)
            .cloned()
            .unwrap_or_else(InsulationMaterial::unknown)
    }

    /// Conductivity in W/(m*K) for a material name (1.0 for unknown names).
    pub fn conductivity(&self, name: &str) -> f64 {
        self.get_or_unknown(name).conductivity
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Catalog pre-populated with the insulation materials the tool ships with.
    ///
    /// Conductivities are mid-range literature values; where sources give a
    /// band, the mean is used (e.g. molded EPS 0.037-0.055 -> 0.046).
    pub fn with_presets() -> Self {
        let mut catalog = Self::new();
        catalog.add(InsulationMaterial::new("Cellulose Pulp", "#8FA9FD", 0.06));
        catalog.add(InsulationMaterial::new(
            "Molded Expanded Polystyrene",
            "#1E88E5",
            0.046,
        ));
        catalog.add(InsulationMaterial::new(
            "Extruded Expanded Polystyrene",
            "#43A047",
            0.037,
        ));
        catalog.add(InsulationMaterial::new("Mineral Wool", "#E53935", 0.043));
        catalog.add(InsulationMaterial::new(
            "Granules of Clay/Vermiculite/Perlite",
            "#795548",
            0.11,
        ));
        catalog.add(InsulationMaterial::new("Air Gap", "#80DEEA", 0.333));
        catalog.add(InsulationMaterial::new("Ceramic Brick", "#BF360C", 0.427));
        catalog.add(InsulationMaterial::new("Concrete Block", "#9E9E9E", 0.81));
        catalog.add(InsulationMaterial::new(
            "Woven Fabric Waste",
            "#7B1FA2",
            0.044,
        ));
        catalog.add(InsulationMaterial::new(
            "Woven Fabric Subwaste",
            "#AB47BC",
            0.103,
        ));
        catalog.add(InsulationMaterial::new("Cellulose (Blown)", "#5D4037", 0.04));
        catalog.add(InsulationMaterial::new("Cellulose (Spray)", "#00695C", 0.0));
        catalog.add(InsulationMaterial::new("PET Flakes/Fibers", "#00897B", 0.195));
        catalog
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_complete() {
        let catalog = MaterialCatalog::with_presets();
        assert_eq!(catalog.len(), 13);
        assert!(catalog.get("Mineral Wool").is_some());
        assert!(catalog.get("Concrete Block").is_some());
        assert!(catalog.get("granite").is_none());
    }

    #[test]
    fn test_unknown_material_fallback() {
        let catalog = MaterialCatalog::with_presets();
        let m = catalog.get_or_unknown("granite");
        assert_eq!(m.name, "unknown");
        assert_eq!(m.color, "#FFFFFF");
        assert!((m.conductivity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_layer_resistance() {
        let catalog = MaterialCatalog::with_presets();
        // Mineral wool, 10 cm: R = (1/0.043) * 0.10
        let layer = Layer::new("Mineral Wool", 10.0);
        let r = layer.resistance_k_per_w(&catalog);
        assert!((r - 0.10 / 0.043).abs() < 1e-10, "R = {r}");
    }

    #[test]
    fn test_zero_conductivity_is_infinite_resistance() {
        let catalog = MaterialCatalog::with_presets();
        let layer = Layer::new("Cellulose (Spray)", 5.0);
        assert!(layer.resistance_k_per_w(&catalog).is_infinite());
    }

    #[test]
    fn test_cumulative_thickness() {
        let layers = vec![
            Layer::new("Mineral Wool", 10.0),
            Layer::new("Ceramic Brick", 25.0),
            Layer::new("Air Gap", 5.0),
        ];
        let cum = cumulative_thickness_m(&layers);
        assert_eq!(cum.len(), 3);
        assert!((cum[0] - 0.10).abs() < 1e-12);
        assert!((cum[1] - 0.35).abs() < 1e-12);
        assert!((cum[2] - 0.40).abs() < 1e-12);
    }

    #[test]
    fn test_thicker_layer_more_resistance() {
        let catalog = MaterialCatalog::with_presets();
        let thin = Layer::new("Cellulose Pulp", 10.0);
        let thick = Layer::new("Cellulose Pulp", 30.0);
        let ratio = thick.resistance_k_per_w(&catalog) / thin.resistance_k_per_w(&catalog);
        assert!((ratio - 3.0).abs() < 1e-10);
    }
}
