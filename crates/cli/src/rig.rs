//! In-memory rig session: spawn, plan, collect stats.

use std::sync::Arc;

use contracts::{Describable, SensorRigBlueprint, Vec3f};
use observability::metrics::{record_render_plan, record_sensor_attached};
use observability::{RenderShareStats, TracingDiagnostics};
use sensor::{plan_render_passes, RenderPlan, SceneGraph, SensorFactory, SensorRig};
use tracing::info;

use crate::error::Result;

/// A blueprint spawned into a scene graph, with its render plan
pub struct RigSession {
    pub blueprint: SensorRigBlueprint,
    pub graph: SceneGraph,
    pub rig: SensorRig,
    pub plan: RenderPlan,
    pub stats: RenderShareStats,
}

impl RigSession {
    /// Spawn `blueprint` and plan its render passes
    pub fn build(blueprint: SensorRigBlueprint, allow_semantic_borrow: bool) -> Result<Self> {
        let mut graph = SceneGraph::new();
        let factory = SensorFactory::new(Arc::new(TracingDiagnostics));
        let rig = factory.spawn_from_blueprint(&mut graph, &blueprint)?;

        for spec in blueprint.all_sensors() {
            record_sensor_attached(spec.sensor_type);
        }

        let plan = plan_render_passes(&rig.suite, allow_semantic_borrow);
        record_render_plan(plan.render_count(), plan.borrowed_count());

        let mut stats = RenderShareStats::new();
        for pass in &plan.passes {
            let source_type = rig
                .suite
                .get(pass.source.as_str())
                .ok()
                .and_then(|sensor| sensor.specification())
                .map(|spec| spec.sensor_type)
                .unwrap_or_default();
            stats.record_pass(source_type, pass.borrowers.len());
        }
        for _ in &plan.unplaced {
            stats.record_unplaced();
        }

        info!(
            sensors = rig.sensor_count(),
            render_passes = plan.render_count(),
            borrowed = plan.borrowed_count(),
            "rig planned"
        );

        Ok(Self {
            blueprint,
            graph,
            rig,
            plan,
            stats,
        })
    }

    /// Sensor position in scene coordinates
    pub fn world_position(&self, uuid: &str) -> Option<Vec3f> {
        let node = *self.rig.sensor_nodes.get(uuid)?;
        let transform = self.graph.absolute_transformation(node).ok()?;
        Some(Vec3f::new(
            transform[(0, 3)],
            transform[(1, 3)],
            transform[(2, 3)],
        ))
    }

    /// Source sensor of the pass that renders `uuid`
    pub fn render_source(&self, uuid: &str) -> Option<&str> {
        self.plan.pass_for(uuid).map(|pass| pass.source.as_str())
    }
}
