//! Render-pass planning
//!
//! Sensors whose specs capture the same geometry can reuse one rendered
//! buffer. The planner walks the suite in uuid order and puts each sensor
//! into the first pass whose source it can borrow from, otherwise it opens a
//! new pass with itself as the source.

use std::sync::Arc;

use contracts::{Describable, SensorId, SensorSpec};

use crate::suite::SensorSuite;

/// One render pass: the source is rendered, borrowers reuse its buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    pub source: SensorId,
    pub borrowers: Vec<SensorId>,
}

impl RenderPass {
    pub fn sensors(&self) -> impl Iterator<Item = &SensorId> {
        std::iter::once(&self.source).chain(self.borrowers.iter())
    }
}

/// Render passes for a whole suite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub passes: Vec<RenderPass>,

    /// Sensors without a spec; they are not rendered
    pub unplaced: Vec<SensorId>,
}

impl RenderPlan {
    /// Number of render passes issued
    pub fn render_count(&self) -> usize {
        self.passes.len()
    }

    /// Number of sensors served from another sensor's pass
    pub fn borrowed_count(&self) -> usize {
        self.passes.iter().map(|pass| pass.borrowers.len()).sum()
    }

    pub fn sensor_count(&self) -> usize {
        self.render_count() + self.borrowed_count()
    }

    /// Pass that renders `uuid`, as source or borrower
    pub fn pass_for(&self, uuid: &str) -> Option<&RenderPass> {
        self.passes
            .iter()
            .find(|pass| pass.sensors().any(|id| id.as_str() == uuid))
    }
}

pub fn plan_render_passes(suite: &SensorSuite, allow_semantic_borrow: bool) -> RenderPlan {
    let mut plan = RenderPlan::default();
    let mut sources: Vec<Arc<SensorSpec>> = Vec::new();

    for uuid in suite.uuids() {
        let Some(spec) = suite
            .get(uuid.as_str())
            .ok()
            .and_then(|sensor| sensor.specification())
        else {
            plan.unplaced.push(uuid);
            continue;
        };

        let shared = sources
            .iter()
            .position(|source| spec.can_borrow_rendering_from(source, allow_semantic_borrow));
        match shared {
            Some(index) => plan.passes[index].borrowers.push(uuid),
            None => {
                sources.push(spec);
                plan.passes.push(RenderPass {
                    source: uuid,
                    borrowers: Vec::new(),
                });
            }
        }
    }
    plan
}
