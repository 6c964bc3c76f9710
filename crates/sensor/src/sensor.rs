//! Sensor bound to a scene node
//!
//! A sensor is attached to its node as a feature. The node keeps the sensor
//! alive; the sensor only holds a weak handle back to the node.

use std::fmt;
use std::sync::{Arc, MutexGuard, PoisonError, RwLock};

use contracts::{
    Describable, Diagnostic, Diagnostics, Feature, Placed, SceneNode, SceneNodeRef, SceneNodeType,
    SensorId, SensorSpec, WeakSceneNodeRef,
};

pub struct Sensor {
    uuid: SensorId,
    node: WeakSceneNodeRef,
    spec: RwLock<Option<Arc<SensorSpec>>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Sensor {
    /// Bind `spec` to `node`.
    ///
    /// Marks the node as sensor-bearing, attaches the sensor to it and
    /// applies the spec's placement.
    pub fn new(
        node: &SceneNodeRef,
        spec: Arc<SensorSpec>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Arc<Self> {
        let sensor = Arc::new(Self {
            uuid: spec.uuid.clone(),
            node: Arc::downgrade(node),
            spec: RwLock::new(Some(spec)),
            diagnostics,
        });

        {
            let mut guard = lock_node(node);
            guard.set_type(SceneNodeType::Sensor);
            guard.attach_feature(sensor.clone());
        }
        sensor.set_transformation_from_spec();
        sensor
    }

    /// Bind a spec that may be absent.
    ///
    /// # Panics
    /// When `spec` is `None`. A sensor without a spec has no type, placement
    /// or output shape, so this is treated as a programming error.
    pub fn from_optional_spec(
        node: &SceneNodeRef,
        spec: Option<Arc<SensorSpec>>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Arc<Self> {
        match spec {
            Some(spec) => Self::new(node, spec, diagnostics),
            None => {
                diagnostics.report(Diagnostic::error(
                    None,
                    "cannot create a sensor without a specification",
                ));
                panic!("invalid sensor spec: a sensor requires a specification");
            }
        }
    }

    /// Drop the bound spec, leaving the sensor attached but unplaceable.
    pub fn release_specification(&self) -> Option<Arc<SensorSpec>> {
        self.spec
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

fn lock_node(node: &SceneNodeRef) -> MutexGuard<'_, dyn SceneNode + 'static> {
    node.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Placed for Sensor {
    /// Reset the node, translate by `position`, then rotate about the local
    /// X, Y and Z axes by the `orientation` components in that order.
    fn set_transformation_from_spec(&self) {
        let Some(spec) = self.specification() else {
            self.diagnostics.report(Diagnostic::error(
                Some(self.uuid.clone()),
                "cannot place sensor: specification is missing",
            ));
            return;
        };
        let Some(node) = self.node.upgrade() else {
            self.diagnostics.report(Diagnostic::warning(
                Some(self.uuid.clone()),
                "cannot place sensor: scene node no longer exists",
            ));
            return;
        };

        let mut node = lock_node(&node);
        node.reset_transformation();
        node.translate(&spec.position);
        node.rotate_x_local(spec.orientation.x);
        node.rotate_y_local(spec.orientation.y);
        node.rotate_z_local(spec.orientation.z);
    }

    fn node(&self) -> Option<SceneNodeRef> {
        self.node.upgrade()
    }
}

impl Describable for Sensor {
    fn uuid(&self) -> &SensorId {
        &self.uuid
    }

    fn specification(&self) -> Option<Arc<SensorSpec>> {
        self.spec
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Feature for Sensor {
    fn feature_name(&self) -> &str {
        "sensor"
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("uuid", &self.uuid)
            .field("spec", &self.specification())
            .field("attached", &(self.node.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;
    use contracts::{
        CollectingDiagnostics, Mat4f, NullDiagnostics, SensorType, Severity, Vec3f,
    };
    use nalgebra::Vector3;
    use std::f32::consts::FRAC_PI_2;

    fn node_in(graph: &mut SceneGraph) -> SceneNodeRef {
        let id = graph.create_node(graph.root()).unwrap();
        graph.node(id).unwrap()
    }

    fn transform_of(node: &SceneNodeRef) -> Mat4f {
        node.lock().unwrap().transformation()
    }

    fn spec(uuid: &str, position: Vec3f, orientation: Vec3f) -> Arc<SensorSpec> {
        Arc::new(SensorSpec {
            position,
            orientation,
            ..SensorSpec::new(uuid, SensorType::Color)
        })
    }

    #[test]
    fn test_construction_places_and_attaches() {
        let mut graph = SceneGraph::new();
        let node = node_in(&mut graph);
        let spec = spec("rgb", Vec3f::new(0.0, 1.5, 0.0), Vec3f::zeros());

        let sensor = Sensor::new(&node, spec.clone(), Arc::new(NullDiagnostics));

        let guard = node.lock().unwrap();
        assert_eq!(guard.node_type(), SceneNodeType::Sensor);
        assert_eq!(guard.features().len(), 1);
        assert_eq!(guard.features()[0].feature_name(), "sensor");
        assert_eq!(
            guard.transformation(),
            Mat4f::new_translation(&Vec3f::new(0.0, 1.5, 0.0))
        );
        drop(guard);

        assert_eq!(sensor.uuid(), "rgb");
        assert!(Arc::ptr_eq(&sensor.specification().unwrap(), &spec));
    }

    #[test]
    fn test_placement_is_deterministic() {
        let mut graph = SceneGraph::new();
        let spec = spec("rgb", Vec3f::new(0.3, 1.2, -0.4), Vec3f::new(0.1, 0.7, -0.2));

        let a = node_in(&mut graph);
        let b = node_in(&mut graph);
        b.lock().unwrap().translate(&Vec3f::new(9.0, 9.0, 9.0));
        b.lock().unwrap().rotate_y_local(1.0);

        let sensor_a = Sensor::new(&a, spec.clone(), Arc::new(NullDiagnostics));
        let _sensor_b = Sensor::new(&b, spec, Arc::new(NullDiagnostics));
        assert_eq!(transform_of(&a), transform_of(&b));

        // re-applying yields the same transform
        let before = transform_of(&a);
        sensor_a.set_transformation_from_spec();
        sensor_a.set_transformation_from_spec();
        assert_eq!(transform_of(&a), before);
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        let mut graph = SceneGraph::new();
        let node = node_in(&mut graph);
        let orientation = Vec3f::new(FRAC_PI_2, FRAC_PI_2, 0.0);
        Sensor::new(
            &node,
            spec("rgb", Vec3f::zeros(), orientation),
            Arc::new(NullDiagnostics),
        );

        let x_then_y = Mat4f::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2)
            * Mat4f::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        let y_then_x = Mat4f::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2)
            * Mat4f::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);

        let placed = transform_of(&node);
        assert!((placed - x_then_y).amax() < 1e-5);
        assert!((placed - y_then_x).amax() > 0.5);
    }

    #[test]
    #[should_panic(expected = "invalid sensor spec")]
    fn test_missing_spec_is_fatal_at_construction() {
        let mut graph = SceneGraph::new();
        let node = node_in(&mut graph);
        Sensor::from_optional_spec(&node, None, Arc::new(NullDiagnostics));
    }

    #[test]
    fn test_missing_spec_is_reported_on_reapply() {
        let mut graph = SceneGraph::new();
        let node = node_in(&mut graph);
        let diagnostics = Arc::new(CollectingDiagnostics::new());
        let sensor = Sensor::from_optional_spec(
            &node,
            Some(spec("rgb", Vec3f::new(1.0, 0.0, 0.0), Vec3f::zeros())),
            diagnostics.clone(),
        );
        assert!(diagnostics.is_empty());

        assert!(sensor.release_specification().is_some());
        node.lock().unwrap().reset_transformation();
        sensor.set_transformation_from_spec();

        assert_eq!(diagnostics.count(Severity::Error), 1);
        assert_eq!(
            diagnostics.entries()[0].sensor.as_deref(),
            Some("rgb")
        );
        // node left untouched, sensor still usable
        assert_eq!(transform_of(&node), Mat4f::identity());
        assert_eq!(sensor.uuid(), "rgb");
    }

    #[test]
    fn test_removed_node_is_reported_as_warning() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node(graph.root()).unwrap();
        let diagnostics = Arc::new(CollectingDiagnostics::new());
        let sensor = {
            let node = graph.node(id).unwrap();
            Sensor::new(
                &node,
                spec("rgb", Vec3f::zeros(), Vec3f::zeros()),
                diagnostics.clone(),
            )
        };

        graph.remove_node(id).unwrap();
        assert!(sensor.node().is_none());
        sensor.set_transformation_from_spec();
        assert_eq!(diagnostics.count(Severity::Warning), 1);
    }
}
