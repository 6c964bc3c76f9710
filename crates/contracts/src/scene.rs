//! Scene-graph node contract
//!
//! The host engine owns nodes and their hierarchy. Sensors only see a node
//! through [`SceneNode`] and attach themselves as a [`Feature`]; the node then
//! keeps the feature alive, the feature keeps a weak handle back to the node.

use std::sync::{Arc, Mutex, Weak};

use crate::{Mat4f, SensorId, SensorSpec, Vec3f};

/// Role tag of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneNodeType {
    #[default]
    Empty,
    Agent,
    Sensor,
    Object,
}

/// Behaviour attached to a node
pub trait Feature: Send + Sync {
    /// Name used for diagnostics and lookup
    fn feature_name(&self) -> &str;
}

/// Operations a node must support for sensor placement
///
/// Rotations are about the node's own (local) axes, i.e. they are composed on
/// the right of the current rotation. Translation is in the parent frame.
pub trait SceneNode: Send {
    fn node_type(&self) -> SceneNodeType;

    fn set_type(&mut self, node_type: SceneNodeType);

    /// Set the local transformation to identity
    fn reset_transformation(&mut self);

    fn translate(&mut self, vector: &Vec3f);

    /// Angle in radians
    fn rotate_x_local(&mut self, angle: f32);

    /// Angle in radians
    fn rotate_y_local(&mut self, angle: f32);

    /// Angle in radians
    fn rotate_z_local(&mut self, angle: f32);

    /// Local transformation relative to the parent node
    fn transformation(&self) -> Mat4f;

    fn attach_feature(&mut self, feature: Arc<dyn Feature>);

    fn features(&self) -> &[Arc<dyn Feature>];
}

/// Shared handle to a node
pub type SceneNodeRef = Arc<Mutex<dyn SceneNode>>;

/// Non-owning handle to a node
pub type WeakSceneNodeRef = Weak<Mutex<dyn SceneNode>>;

/// Something whose node placement derives from a spec
pub trait Placed {
    /// Re-apply the placement described by the spec to the node
    fn set_transformation_from_spec(&self);

    /// The node, if it still exists
    fn node(&self) -> Option<SceneNodeRef>;
}

/// Something described by a sensor spec
pub trait Describable {
    fn uuid(&self) -> &SensorId;

    /// Read-only view of the bound spec
    fn specification(&self) -> Option<Arc<SensorSpec>>;
}
