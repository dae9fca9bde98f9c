use anyhow::Result;

use crate::sim::materials::{AIR_CONDUCTIVITY, Layer, MaterialCatalog};

use super::model::{ThermalNetwork, ThermalNode};

/// Heat capacitance assigned to every node of the wall chain in J/K.
///
/// A deliberately coarse lump: the chart compares materials against each
/// other, not absolute thermal mass.
const NODE_CAPACITANCE_J_PER_K: f64 = 10_000.0;

/// Parameters for building the wall chain network.
#[derive(Debug, Clone, PartialEq)]
pub struct WallNetworkConfig {
    /// Indoor air temperature in degrees C.
    pub inside_temperature: f64,
    /// Outdoor air temperature in degrees C.
    pub outside_temperature: f64,
    /// Hold the inside node at its temperature.
    pub hold_inside: bool,
    /// Hold the outside node at its temperature.
    pub hold_outside: bool,
}

impl Default for WallNetworkConfig {
    fn default() -> Self {
        Self {
            inside_temperature: 20.0,
            outside_temperature: 10.0,
            hold_inside: false,
            hold_outside: true,
        }
    }
}

/// Builds the chain network behind the temperature-over-time chart.
///
/// Topology: `Inside` — layer 1 — … — layer N — `Outside`. Layer nodes start
/// at the mean of the two air temperatures; layer-to-layer resistances come
/// from each layer's material and thickness, and the last layer couples to
/// the outside air through a `1 / AIR_CONDUCTIVITY` film resistance.
pub fn build_wall_network(
    layers: &[Layer],
    catalog: &MaterialCatalog,
    config: &WallNetworkConfig,
) -> Result<ThermalNetwork> {
    anyhow::ensure!(!layers.is_empty(), "Wall needs at least one layer");

    let mut net = ThermalNetwork::new();
    let mid = (config.inside_temperature + config.outside_temperature) / 2.0;

    let mut inside = ThermalNode::new("Inside", config.inside_temperature, NODE_CAPACITANCE_J_PER_K);
    inside.is_boundary = config.hold_inside;
    let inside = net.add_node(inside)?;

    let mut prev = inside;
    for layer in layers {
        let node = net.add_node(ThermalNode::new(
            &layer.material,
            mid,
            NODE_CAPACITANCE_J_PER_K,
        ))?;
        net.connect(prev, node, layer.resistance_k_per_w(catalog))?;
        prev = node;
    }

    let mut outside = ThermalNode::new(
        "Outside",
        config.outside_temperature,
        NODE_CAPACITANCE_J_PER_K,
    );
    outside.is_boundary = config.hold_outside;
    let outside = net.add_node(outside)?;
    net.connect(prev, outside, 1.0 / AIR_CONDUCTIVITY)?;

    Ok(net)
}
