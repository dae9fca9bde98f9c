use anyhow::Result;
use insulsim::sim::colormap::{field_colors, legend};
use insulsim::sim::framework::{Bus, Pipeline, SimContext};
use insulsim::sim::materials::MaterialCatalog;
use insulsim::sim::modules::PlaneDiffusionModule;
use insulsim::sim::recorder::PlaneRecorderModule;
use insulsim::sim::scenario::{ScenarioConfig, ScenarioFactory, ScenarioKind};

/// Compare how different shell materials slow the heat spreading out of the
/// house, by running the slice simulation once per material and probing a
/// point outside the insulation shell.
fn main() -> Result<()> {
    env_logger::init();

    let catalog = MaterialCatalog::with_presets();
    let materials = [
        "Extruded Expanded Polystyrene",
        "Mineral Wool",
        "Ceramic Brick",
        "Concrete Block",
    ];
    let resolution = 41;
    let ticks = 3000;

    println!("Heat Spread Through an Insulated House Slice");
    println!("{:=<60}", "");
    println!();
    println!(
        "  Grid: {resolution}x{resolution}, {ticks} ticks, 30 cm shell, probe outside the shell"
    );
    println!();
    println!("  {:<38}  {:>8}  {:>10}", "Material", "lambda", "T(probe)");

    for material in materials {
        let mut scenario = ScenarioFactory::create(ScenarioKind::HeatSpread, material);
        let ScenarioConfig::HeatSpread(config) = &mut scenario.config else {
            unreachable!("factory returned the requested kind");
        };
        config.material = material.to_string();
        config.resolution = resolution;
        config.running = true;

        let ctx = SimContext::new(&scenario);
        let mut bus = Bus::new();
        let mut pipeline = Pipeline::new()
            .with_module(PlaneDiffusionModule::new(catalog.clone()))
            .with_module(PlaneRecorderModule);
        pipeline.init(&ctx, &mut bus)?;
        for _ in 0..ticks {
            pipeline.step(&ctx, &mut bus)?;
        }

        let history = PlaneRecorderModule::take_result(&mut bus)?;
        // Probe at x = 1.3 m (shell ends at 0.9 m), on the source row.
        let probe_col = ((1.3 + 2.0) / 4.0 * resolution as f64) as usize;
        let probe = history.center_rows.last().unwrap()[probe_col];
        let lambda = catalog.conductivity(material);
        println!("  {material:<38}  {lambda:>8.3}  {probe:>10.6}");
    }

    println!();
    println!("  Color legend (normalized temperature -> RGB):");
    for stop in legend(5) {
        let [r, g, b] = stop.color;
        println!("    {:>4.2}  ({r:.2}, {g:.2}, {b:.2})", stop.value);
    }

    // Show that the color buffer lines up with the field size.
    let mut scenario = ScenarioFactory::create(ScenarioKind::HeatSpread, "colors");
    let ScenarioConfig::HeatSpread(config) = &mut scenario.config else {
        unreachable!("factory returned the requested kind");
    };
    config.resolution = resolution;
    config.running = true;
    let ctx = SimContext::new(&scenario);
    let mut bus = Bus::new();
    let mut pipeline = Pipeline::new()
        .with_module(PlaneDiffusionModule::new(catalog.clone()))
        .with_module(PlaneRecorderModule);
    pipeline.init(&ctx, &mut bus)?;
    for _ in 0..10 {
        pipeline.step(&ctx, &mut bus)?;
    }
    let history = PlaneRecorderModule::take_result(&mut bus)?;
    let colors = field_colors(&history.final_field, history.source_value);
    println!();
    println!(
        "  Field of {} cells -> {} RGB components",
        history.final_field.len(),
        colors.len()
    );

    Ok(())
}
