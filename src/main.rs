use anyhow::Result;
use insulsim::sim::materials::{Layer, MaterialCatalog};
use insulsim::sim::network::solve::run_transient;
use insulsim::sim::network::wall::{WallNetworkConfig, build_wall_network};
use insulsim::timefmt::format_hms;

fn main() -> Result<()> {
    let catalog = MaterialCatalog::with_presets();
    let layers = vec![
        Layer::new("Mineral Wool", 10.0),
        Layer::new("Ceramic Brick", 25.0),
    ];

    let network = build_wall_network(&layers, &catalog, &WallNetworkConfig::default())?;
    let result = run_transient(&network, 3600.0, 86_400.0)?;

    println!(
        "Wall cooldown over {}:",
        format_hms(*result.time_s.last().unwrap() as u64)
    );
    for (name, temp) in result.names.iter().zip(result.final_temperatures()) {
        println!("  {name:>14}: {temp:6.2} C");
    }
    Ok(())
}
