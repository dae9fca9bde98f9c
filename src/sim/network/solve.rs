use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use super::model::ThermalNetwork;

/// Temperature trajectories produced by the transient solver.
///
/// `temperatures[n][k]` is the temperature of node `n` at `time_s[k]`; the
/// first sample is the initial state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientResult {
    pub names: Vec<String>,
    pub time_s: Vec<f64>,
    pub temperatures: Vec<Vec<f64>>,
}

impl TransientResult {
    /// Final temperature of each node.
    pub fn final_temperatures(&self) -> Vec<f64> {
        self.temperatures
            .iter()
            .map(|series| *series.last().expect("at least the initial sample"))
            .collect()
    }

    /// Trajectory of the node with the given name.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.temperatures[idx])
    }
}

/// Advances node temperatures by one forward-Euler step of length `dt_s`.
///
/// Each connection carries `Q = (T_first - T_second) / R`; free nodes then
/// move by `dT = (P_gen + sum Q_in) * dt / C` while boundary nodes stay put.
pub fn step_euler(network: &ThermalNetwork, temperatures: &mut [f64], dt_s: f64) -> Result<()> {
    let n = network.len();
    anyhow::ensure!(
        temperatures.len() == n,
        "Temperature buffer length {} does not match node count {n}",
        temperatures.len()
    );
    anyhow::ensure!(dt_s > 0.0 && dt_s.is_finite(), "Time step must be positive");

    let mut heat_in = vec![0.0; n];
    for c in network.connections() {
        let q = (temperatures[c.first] - temperatures[c.second]) / c.resistance;
        heat_in[c.first] -= q;
        heat_in[c.second] += q;
    }

    for (i, node) in network.nodes().iter().enumerate() {
        if node.is_boundary {
            continue;
        }
        temperatures[i] += (heat_in[i] + node.power) * dt_s / node.capacitance;
    }

    Ok(())
}

/// Integrates the network over `total_time_s` in steps of `time_step_s`.
///
/// The step count is rounded to the nearest whole number of steps (minimum
/// one); the result holds `steps + 1` samples per node including the initial
/// state.
pub fn run_transient(
    network: &ThermalNetwork,
    time_step_s: f64,
    total_time_s: f64,
) -> Result<TransientResult> {
    anyhow::ensure!(!network.is_empty(), "Network has no nodes");
    anyhow::ensure!(
        time_step_s > 0.0 && time_step_s.is_finite(),
        "Time step must be positive, got {time_step_s}"
    );
    anyhow::ensure!(
        total_time_s >= time_step_s,
        "Total time {total_time_s} is shorter than one step {time_step_s}"
    );

    check_step_stability(network, time_step_s);

    let steps = (total_time_s / time_step_s).round().max(1.0) as usize;
    let n = network.len();

    let mut temperatures = network.initial_temperatures();
    let mut series: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut v = Vec::with_capacity(steps + 1);
            v.push(temperatures[i]);
            v
        })
        .collect();
    let mut time_s = Vec::with_capacity(steps + 1);
    time_s.push(0.0);

    for k in 1..=steps {
        step_euler(network, &mut temperatures, time_step_s)?;
        for (i, &t) in temperatures.iter().enumerate() {
            anyhow::ensure!(
                t.is_finite(),
                "Node '{}' diverged at step {k} (t = {:.0} s)",
                network.nodes()[i].name,
                k as f64 * time_step_s
            );
            series[i].push(t);
        }
        time_s.push(k as f64 * time_step_s);
    }

    Ok(TransientResult {
        names: network.node_names(),
        time_s,
        temperatures: series,
    })
}

/// Solves the steady-state nodal equations directly.
///
/// Boundary nodes contribute Dirichlet rows; each free node balances the
/// conductive flows from its neighbors against its generated power. Returns
/// one temperature per node in node order.
pub fn steady_state(network: &ThermalNetwork) -> Result<Vec<f64>> {
    let n = network.len();
    if n == 0 {
        return Ok(vec![]);
    }
    anyhow::ensure!(
        network.has_boundary(),
        "Steady-state solve needs at least one boundary node"
    );

    let mut a = vec![vec![0.0; n]; n];
    let mut b = vec![0.0; n];

    for (i, node) in network.nodes().iter().enumerate() {
        if node.is_boundary {
            a[i][i] = 1.0;
            b[i] = node.temperature;
        } else {
            b[i] = node.power;
        }
    }

    for c in network.connections() {
        let g = 1.0 / c.resistance;
        if g == 0.0 {
            continue;
        }
        if !network.nodes()[c.first].is_boundary {
            a[c.first][c.first] += g;
            a[c.first][c.second] -= g;
        }
        if !network.nodes()[c.second].is_boundary {
            a[c.second][c.second] += g;
            a[c.second][c.first] -= g;
        }
    }

    solve_dense(a, b)
}

/// Warns when the explicit time step is large relative to the smallest RC
/// time constant, which makes forward Euler oscillate or diverge.
fn check_step_stability(network: &ThermalNetwork, dt_s: f64) {
    let mut conductance_sum = vec![0.0; network.len()];
    for c in network.connections() {
        let g = 1.0 / c.resistance;
        conductance_sum[c.first] += g;
        conductance_sum[c.second] += g;
    }
    for (i, node) in network.nodes().iter().enumerate() {
        if node.is_boundary || conductance_sum[i] <= 0.0 {
            continue;
        }
        let tau = node.capacitance / conductance_sum[i];
        if dt_s > tau {
            warn!(
                "Time step {dt_s} s exceeds the RC time constant {tau:.1} s of node '{}'; \
                 the explicit integration may oscillate",
                node.name
            );
        }
    }
}

/// Solves a dense linear system `A * x = b` using Gaussian elimination with
/// partial pivoting.
///
/// Networks here have a handful of nodes, so a dense direct solve is both
/// sufficient and deterministic.
fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = a.len();
    if n == 0 {
        return Ok(vec![]);
    }
    anyhow::ensure!(b.len() == n, "b length mismatch");
    for (i, row) in a.iter().enumerate() {
        anyhow::ensure!(row.len() == n, "A row {i} length mismatch");
    }

    // Forward elimination
    for col in 0..n {
        // Pivot selection
        let mut pivot_row = col;
        let mut pivot_val = a[col][col].abs();
        for r in (col + 1)..n {
            let v = a[r][col].abs();
            if v > pivot_val {
                pivot_val = v;
                pivot_row = r;
            }
        }

        anyhow::ensure!(
            pivot_val > 1e-14,
            "Singular matrix (pivot too small) at column {col}"
        );

        if pivot_row != col {
            a.swap(pivot_row, col);
            b.swap(pivot_row, col);
        }

        let pivot = a[col][col];
        for r in (col + 1)..n {
            let factor = a[r][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            a[r][col] = 0.0;
            for c in (col + 1)..n {
                a[r][c] -= factor * a[col][c];
            }
            b[r] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut rhs = b[i];
        for j in (i + 1)..n {
            rhs -= a[i][j] * x[j];
        }
        x[i] = rhs / a[i][i];
    }

    // Basic sanity: reject NaNs/Infs early.
    for (i, xi) in x.iter().enumerate() {
        xi.is_finite()
            .then_some(())
            .with_context(|| format!("Non-finite solution at index {i}: {xi}"))?;
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::network::model::ThermalNode;

    /// Boundary at 100 C feeding a free node through R=10 K/W, C=100 J/K.
    fn heating_pair() -> ThermalNetwork {
        let mut net = ThermalNetwork::new();
        let hot = net.add_node(ThermalNode::boundary("hot", 100.0)).unwrap();
        let cold = net.add_node(ThermalNode::new("cold", 0.0, 100.0)).unwrap();
        net.connect(hot, cold, 10.0).unwrap();
        net
    }

    #[test]
    fn test_transient_matches_exponential_charging() {
        // Analytical: T(t) = 100 * (1 - exp(-t / (R*C))), tau = 1000 s.
        let net = heating_pair();
        let dt = 1.0;
        let total = 2000.0;
        let result = run_transient(&net, dt, total).unwrap();

        let cold = result.series("cold").unwrap();
        let tau = 1000.0;
        for (k, &t) in cold.iter().enumerate().step_by(250) {
            let expected = 100.0 * (1.0 - (-(k as f64) * dt / tau).exp());
            assert!(
                (t - expected).abs() < 0.5,
                "t({k}) = {t}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_boundary_nodes_hold_temperature() {
        let net = heating_pair();
        let result = run_transient(&net, 60.0, 3600.0).unwrap();
        for &t in result.series("hot").unwrap() {
            assert!((t - 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sample_count_and_time_axis() {
        let net = heating_pair();
        let result = run_transient(&net, 3600.0, 86_400.0).unwrap();
        assert_eq!(result.time_s.len(), 25);
        assert!((result.time_s[0] - 0.0).abs() < 1e-12);
        assert!((result.time_s[24] - 86_400.0).abs() < 1e-9);
        assert_eq!(result.temperatures[0].len(), 25);
    }

    #[test]
    fn test_invalid_steps_rejected() {
        let net = heating_pair();
        assert!(run_transient(&net, 0.0, 100.0).is_err());
        assert!(run_transient(&net, -5.0, 100.0).is_err());
        assert!(run_transient(&net, 200.0, 100.0).is_err());
    }

    #[test]
    fn test_steady_state_chain_middle_is_mean() {
        // 20 C | R | node | R | 10 C with equal resistances -> middle = 15 C.
        let mut net = ThermalNetwork::new();
        let a = net.add_node(ThermalNode::boundary("Inside", 20.0)).unwrap();
        let m = net.add_node(ThermalNode::new("Wall", 0.0, 10_000.0)).unwrap();
        let b = net.add_node(ThermalNode::boundary("Outside", 10.0)).unwrap();
        net.connect(a, m, 3.0).unwrap();
        net.connect(m, b, 3.0).unwrap();

        let t = steady_state(&net).unwrap();
        assert!((t[0] - 20.0).abs() < 1e-12);
        assert!((t[1] - 15.0).abs() < 1e-9);
        assert!((t[2] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_steady_state_unequal_resistances() {
        // Conductance-weighted: g1 = 1, g2 = 1/4 ->
        // T = (20*1 + 10*0.25) / 1.25 = 18.
        let mut net = ThermalNetwork::new();
        let a = net.add_node(ThermalNode::boundary("Inside", 20.0)).unwrap();
        let m = net.add_node(ThermalNode::new("Wall", 0.0, 1.0)).unwrap();
        let b = net.add_node(ThermalNode::boundary("Outside", 10.0)).unwrap();
        net.connect(a, m, 1.0).unwrap();
        net.connect(m, b, 4.0).unwrap();

        let t = steady_state(&net).unwrap();
        assert!((t[1] - 18.0).abs() < 1e-9, "got {}", t[1]);
    }

    #[test]
    fn test_steady_state_requires_boundary() {
        let mut net = ThermalNetwork::new();
        let a = net.add_node(ThermalNode::new("a", 5.0, 1.0)).unwrap();
        let b = net.add_node(ThermalNode::new("b", 15.0, 1.0)).unwrap();
        net.connect(a, b, 1.0).unwrap();
        assert!(steady_state(&net).is_err());
    }

    #[test]
    fn test_transient_approaches_steady_state() {
        let mut net = ThermalNetwork::new();
        let a = net.add_node(ThermalNode::boundary("Inside", 20.0)).unwrap();
        let m = net.add_node(ThermalNode::new("Wall", 15.0, 1000.0)).unwrap();
        let b = net.add_node(ThermalNode::boundary("Outside", 10.0)).unwrap();
        net.connect(a, m, 2.0).unwrap();
        net.connect(m, b, 2.0).unwrap();

        let expected = steady_state(&net).unwrap();
        let result = run_transient(&net, 10.0, 100_000.0).unwrap();
        let finals = result.final_temperatures();
        assert!(
            (finals[1] - expected[1]).abs() < 1e-6,
            "transient {} vs steady {}",
            finals[1],
            expected[1]
        );
    }

    #[test]
    fn test_infinite_resistance_carries_no_heat() {
        let mut net = ThermalNetwork::new();
        let a = net.add_node(ThermalNode::boundary("hot", 100.0)).unwrap();
        let m = net.add_node(ThermalNode::new("isolated", 5.0, 10.0)).unwrap();
        net.connect(a, m, f64::INFINITY).unwrap();

        let result = run_transient(&net, 1.0, 100.0).unwrap();
        for &t in result.series("isolated").unwrap() {
            assert!((t - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_power_generation_raises_steady_temperature() {
        // Free node with generation connected to one boundary:
        // T = T_b + P * R.
        let mut net = ThermalNetwork::new();
        let b = net.add_node(ThermalNode::boundary("ambient", 10.0)).unwrap();
        let m = net
            .add_node(ThermalNode::new("heater", 10.0, 100.0).with_power(5.0))
            .unwrap();
        net.connect(b, m, 2.0).unwrap();

        let t = steady_state(&net).unwrap();
        assert!((t[1] - 20.0).abs() < 1e-9, "got {}", t[1]);
    }
}
