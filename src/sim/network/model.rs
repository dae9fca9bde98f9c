use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A lumped thermal mass in the resistance network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalNode {
    pub name: String,
    /// Current (or initial) temperature in degrees C.
    pub temperature: f64,
    /// Heat capacitance in J/K.
    pub capacitance: f64,
    /// Internally generated power in W.
    pub power: f64,
    /// Boundary nodes hold their temperature; free nodes integrate it.
    pub is_boundary: bool,
}

impl ThermalNode {
    pub fn new(name: &str, temperature: f64, capacitance: f64) -> Self {
        Self {
            name: name.to_string(),
            temperature,
            capacitance,
            power: 0.0,
            is_boundary: false,
        }
    }

    /// A fixed-temperature boundary node.
    pub fn boundary(name: &str, temperature: f64) -> Self {
        Self {
            name: name.to_string(),
            temperature,
            capacitance: 1.0,
            power: 0.0,
            is_boundary: true,
        }
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }
}

/// A conductive connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub first: usize,
    pub second: usize,
    /// Thermal resistance in K/W. `INFINITY` is allowed and carries no heat.
    pub resistance: f64,
}

/// A thermal resistance network: nodes plus conductive connections.
///
/// Construction is validating: node parameters must be finite, capacitances
/// positive, and connections must reference distinct existing nodes with
/// positive resistance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermalNetwork {
    nodes: Vec<ThermalNode>,
    connections: Vec<Connection>,
}

impl ThermalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, node: ThermalNode) -> Result<usize> {
        anyhow::ensure!(
            node.temperature.is_finite(),
            "Node '{}': temperature must be finite",
            node.name
        );
        anyhow::ensure!(
            node.power.is_finite(),
            "Node '{}': power must be finite",
            node.name
        );
        anyhow::ensure!(
            node.capacitance > 0.0 && node.capacitance.is_finite(),
            "Node '{}': capacitance must be positive, got {}",
            node.name,
            node.capacitance
        );
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    /// Connects two nodes with a conductive resistance and returns the
    /// connection index.
    pub fn connect(&mut self, first: usize, second: usize, resistance: f64) -> Result<usize> {
        let n = self.nodes.len();
        anyhow::ensure!(
            first < n && second < n,
            "Connection references node {} but only {n} nodes exist",
            first.max(second)
        );
        anyhow::ensure!(
            first != second,
            "Connection must join two distinct nodes (got {first} twice)"
        );
        anyhow::ensure!(
            resistance > 0.0 && !resistance.is_nan(),
            "Resistance between nodes {first} and {second} must be positive, got {resistance}"
        );
        self.connections.push(Connection {
            first,
            second,
            resistance,
        });
        Ok(self.connections.len() - 1)
    }

    pub fn nodes(&self) -> &[ThermalNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Initial node temperatures, in node order.
    pub fn initial_temperatures(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.temperature).collect()
    }

    /// Node names, in node order.
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    pub fn has_boundary(&self) -> bool {
        self.nodes.iter().any(|n| n.is_boundary)
    }
}
