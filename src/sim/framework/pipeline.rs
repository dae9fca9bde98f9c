use anyhow::Result;

use super::{Bus, SimContext, SimModule};

/// Executes a sequence of simulation modules.
pub struct Pipeline {
    modules: Vec<Box<dyn SimModule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { modules: vec![] }
    }

    pub fn with_module<M: SimModule + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn init(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        for module in self.modules.iter_mut() {
            module.init(ctx, bus)?;
        }
        Ok(())
    }

    pub fn step(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        for module in self.modules.iter_mut() {
            module.step(ctx, bus)?;
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scenario::{ScenarioFactory, ScenarioKind};

    struct Push(u32);
    impl SimModule for Push {
        fn name(&self) -> &'static str {
            "push"
        }

        fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
            let mut v = bus.take::<Vec<u32>>().unwrap_or_default();
            v.push(self.0);
            bus.put(v);
            Ok(())
        }
    }

    #[test]
    fn test_modules_run_in_order() {
        let scenario = ScenarioFactory::create(ScenarioKind::WallChart, "chart");
        let ctx = SimContext::new(&scenario);
        let mut bus = Bus::new();

        let mut pipeline = Pipeline::new().with_module(Push(1)).with_module(Push(2));
        pipeline.init(&ctx, &mut bus).unwrap();
        pipeline.step(&ctx, &mut bus).unwrap();
        pipeline.step(&ctx, &mut bus).unwrap();

        assert_eq!(bus.get::<Vec<u32>>(), Some(&vec![1, 2, 1, 2]));
    }
}
