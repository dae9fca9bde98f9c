pub mod model;
pub mod solve;
pub mod wall;

pub use model::{Connection, ThermalNetwork, ThermalNode};
pub use solve::{TransientResult, run_transient, steady_state};
pub use wall::{WallNetworkConfig, build_wall_network};
