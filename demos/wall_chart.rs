use anyhow::Result;
use insulsim::sim::colormap::parse_hex_color;
use insulsim::sim::framework::{Bus, Pipeline, SimContext};
use insulsim::sim::materials::{Layer, MaterialCatalog};
use insulsim::sim::modules::WallNetworkModule;
use insulsim::sim::network::solve::steady_state;
use insulsim::sim::network::wall::{WallNetworkConfig, build_wall_network};
use insulsim::sim::recorder::NetworkRecorderModule;
use insulsim::sim::scenario::{ScenarioConfig, ScenarioFactory, ScenarioKind};
use insulsim::timefmt::format_hms_compact;

/// Run the temperature-over-time wall chart for a two-layer wall and verify
/// the transient trajectory against the steady-state solve.
fn main() -> Result<()> {
    env_logger::init();

    let catalog = MaterialCatalog::with_presets();
    let layers = vec![
        Layer::new("Mineral Wool", 10.0),
        Layer::new("Ceramic Brick", 25.0),
    ];

    let mut scenario = ScenarioFactory::create(ScenarioKind::WallChart, "two-layer wall");
    let ScenarioConfig::WallChart(config) = &mut scenario.config else {
        unreachable!("factory returned the requested kind");
    };
    config.layers = layers.clone();
    config.duration_s = 7.0 * 86_400.0;
    config.steps = 7 * 24;
    let chart_config = config.clone();

    println!("Wall Temperature Over Time");
    println!("{:=<60}", "");
    println!();
    println!(
        "  Inside {} C, outside {} C, {} steps of {}",
        chart_config.inside_temperature,
        chart_config.outside_temperature,
        chart_config.steps,
        format_hms_compact(chart_config.time_step_s() as u64),
    );
    println!();

    let ctx = SimContext::new(&scenario);
    let mut bus = Bus::new();
    let mut pipeline = Pipeline::new()
        .with_module(WallNetworkModule::new(catalog.clone()))
        .with_module(NetworkRecorderModule);
    pipeline.init(&ctx, &mut bus)?;
    for _ in 0..chart_config.steps {
        pipeline.step(&ctx, &mut bus)?;
    }
    let history = NetworkRecorderModule::take_result(&mut bus)?;

    // Series header with each material's chart color.
    print!("  {:>10}", "time");
    for name in &history.names {
        let color = catalog
            .get(name)
            .map(|m| m.color.clone())
            .unwrap_or_else(|| "black".to_string());
        let rgb = if color.starts_with('#') {
            let [r, g, b] = parse_hex_color(&color)?;
            format!("({r:.2},{g:.2},{b:.2})")
        } else {
            color
        };
        print!("  {name:>14} {rgb}");
    }
    println!();

    for (k, &t) in history.time_s.iter().enumerate().step_by(24) {
        print!("  {:>10}", format_hms_compact(t as u64));
        for series in &history.series {
            print!("  {:>14.3}", series[k]);
        }
        println!();
    }

    // Cross-check: the trajectory must approach the steady-state solution of
    // the same network with both air nodes held.
    let steady_config = WallNetworkConfig {
        hold_inside: true,
        ..Default::default()
    };
    let network = build_wall_network(&layers, &catalog, &steady_config)?;
    let steady = steady_state(&network)?;
    println!();
    println!("  Steady state with both air temperatures held:");
    for (name, temp) in network.node_names().iter().zip(&steady) {
        println!("    {name:>14}: {temp:6.2} C");
    }

    Ok(())
}
