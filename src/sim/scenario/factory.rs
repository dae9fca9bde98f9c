use serde::{Deserialize, Serialize};

use super::config::{
    HeatSpreadConfig, LayeredStripConfig, Scenario, ScenarioConfig, WallChartConfig,
};

/// The simulation variants a user can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    HeatSpread,
    LayeredStrip,
    WallChart,
}

/// Creates scenarios with default parameters and fresh ids.
pub struct ScenarioFactory;

impl ScenarioFactory {
    pub fn create(kind: ScenarioKind, title: &str) -> Scenario {
        let config = match kind {
            ScenarioKind::HeatSpread => ScenarioConfig::HeatSpread(HeatSpreadConfig::default()),
            ScenarioKind::LayeredStrip => {
                ScenarioConfig::LayeredStrip(LayeredStripConfig::default())
            }
            ScenarioKind::WallChart => ScenarioConfig::WallChart(WallChartConfig::default()),
        };
        Scenario {
            id: crate::random_id(),
            title: title.to_string(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_each_kind() {
        let a = ScenarioFactory::create(ScenarioKind::HeatSpread, "spread");
        let b = ScenarioFactory::create(ScenarioKind::LayeredStrip, "strip");
        let c = ScenarioFactory::create(ScenarioKind::WallChart, "chart");

        assert!(matches!(a.config, ScenarioConfig::HeatSpread(_)));
        assert!(matches!(b.config, ScenarioConfig::LayeredStrip(_)));
        assert!(matches!(c.config, ScenarioConfig::WallChart(_)));
        assert_eq!(a.title, "spread");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ScenarioFactory::create(ScenarioKind::HeatSpread, "x");
        let b = ScenarioFactory::create(ScenarioKind::HeatSpread, "x");
        assert_ne!(a.id, b.id);
    }
}
