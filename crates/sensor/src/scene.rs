//! In-memory scene graph
//!
//! Arena of nodes with parent links. Each node keeps a local transform as a
//! translation plus a unit quaternion; the absolute transform is the product
//! of the local transforms from the root down.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use contracts::{Feature, Mat4f, SceneNode, SceneNodeRef, SceneNodeType, Vec3f};
use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

use crate::error::{Result, SensorError};

/// Handle to a node in a [`SceneGraph`].
///
/// Freed slots are reused; the generation makes handles to a removed node
/// stay invalid after its slot is taken by a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// Node stored in a [`SceneGraph`]
pub struct GraphNode {
    node_type: SceneNodeType,
    translation: Vec3f,
    rotation: UnitQuaternion<f32>,
    features: Vec<Arc<dyn Feature>>,
}

impl Default for GraphNode {
    fn default() -> Self {
        Self {
            node_type: SceneNodeType::Empty,
            translation: Vec3f::zeros(),
            rotation: UnitQuaternion::identity(),
            features: Vec::new(),
        }
    }
}

impl GraphNode {
    pub fn translation(&self) -> Vec3f {
        self.translation
    }

    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    fn rotate_local(&mut self, axis: Unit<Vector3<f32>>, angle: f32) {
        self.rotation *= UnitQuaternion::from_axis_angle(&axis, angle);
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("node_type", &self.node_type)
            .field("translation", &self.translation)
            .field("rotation", &self.rotation)
            .field(
                "features",
                &self
                    .features
                    .iter()
                    .map(|feature| feature.feature_name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl SceneNode for GraphNode {
    fn node_type(&self) -> SceneNodeType {
        self.node_type
    }

    fn set_type(&mut self, node_type: SceneNodeType) {
        self.node_type = node_type;
    }

    fn reset_transformation(&mut self) {
        self.translation = Vec3f::zeros();
        self.rotation = UnitQuaternion::identity();
    }

    fn translate(&mut self, vector: &Vec3f) {
        self.translation += vector;
    }

    fn rotate_x_local(&mut self, angle: f32) {
        self.rotate_local(Vector3::x_axis(), angle);
    }

    fn rotate_y_local(&mut self, angle: f32) {
        self.rotate_local(Vector3::y_axis(), angle);
    }

    fn rotate_z_local(&mut self, angle: f32) {
        self.rotate_local(Vector3::z_axis(), angle);
    }

    fn transformation(&self) -> Mat4f {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
            .to_homogeneous()
    }

    fn attach_feature(&mut self, feature: Arc<dyn Feature>) {
        self.features.push(feature);
    }

    fn features(&self) -> &[Arc<dyn Feature>] {
        &self.features
    }
}

struct Slot {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    node: Arc<Mutex<GraphNode>>,
}

#[derive(Default)]
struct Entry {
    generation: u32,
    slot: Option<Slot>,
}

/// Scene hierarchy with a single root
pub struct SceneGraph {
    entries: Vec<Entry>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = Slot {
            parent: None,
            children: Vec::new(),
            node: Arc::new(Mutex::new(GraphNode::default())),
        };
        Self {
            entries: vec![Entry {
                generation: 0,
                slot: Some(root),
            }],
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create an empty node with identity transform under `parent`
    pub fn create_node(&mut self, parent: NodeId) -> Result<NodeId> {
        self.slot(parent)?;
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.entries.push(Entry::default());
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[index];
        entry.slot = Some(Slot {
            parent: Some(parent),
            children: Vec::new(),
            node: Arc::new(Mutex::new(GraphNode::default())),
        });
        let id = NodeId {
            index,
            generation: entry.generation,
        };
        self.slot_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Shared handle to a node
    pub fn node(&self, id: NodeId) -> Result<SceneNodeRef> {
        let node: SceneNodeRef = self.slot(id)?.node.clone();
        Ok(node)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_ok()
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.slot(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.slot(id)?.children)
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.entries.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local transform of `id` composed with all its ancestors
    pub fn absolute_transformation(&self, id: NodeId) -> Result<Mat4f> {
        let mut transform = Mat4f::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let slot = self.slot(node_id)?;
            let local = slot
                .node
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .transformation();
            transform = local * transform;
            current = slot.parent;
        }
        Ok(transform)
    }

    /// Remove a node and its whole subtree.
    ///
    /// Features attached to the removed nodes are released with them. The
    /// root cannot be removed; returns the number of nodes removed.
    pub fn remove_node(&mut self, id: NodeId) -> Result<usize> {
        if id == self.root {
            return Ok(0);
        }
        let parent = self.slot(id)?.parent;
        if let Some(parent) = parent {
            self.slot_mut(parent)?.children.retain(|child| *child != id);
        }

        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let Some(entry) = self.entries.get_mut(next.index) else {
                continue;
            };
            if entry.generation != next.generation {
                continue;
            }
            if let Some(slot) = entry.slot.take() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(next.index);
                pending.extend(slot.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn slot(&self, id: NodeId) -> Result<&Slot> {
        self.entries
            .get(id.index)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.slot.as_ref())
            .ok_or(SensorError::NodeNotFound { node: id })
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot> {
        self.entries
            .get_mut(id.index)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.slot.as_mut())
            .ok_or(SensorError::NodeNotFound { node: id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: &Mat4f, b: &Mat4f) {
        assert!((a - b).amax() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_local_rotations_compose_on_the_right() {
        let mut node = GraphNode::default();
        node.translate(&Vec3f::new(1.0, 2.0, 3.0));
        node.rotate_x_local(FRAC_PI_2);
        node.rotate_y_local(FRAC_PI_2);

        let expected = Mat4f::new_translation(&Vec3f::new(1.0, 2.0, 3.0))
            * Mat4f::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2)
            * Mat4f::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        assert_close(&node.transformation(), &expected);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut node = GraphNode::default();
        node.translate(&Vec3f::new(0.0, 1.0, 0.0));
        node.rotate_z_local(0.3);
        node.reset_transformation();
        assert_eq!(node.transformation(), Mat4f::identity());
    }

    #[test]
    fn test_absolute_transformation_walks_parents() {
        let mut graph = SceneGraph::new();
        let agent = graph.create_node(graph.root()).unwrap();
        let sensor = graph.create_node(agent).unwrap();

        graph
            .node(agent)
            .unwrap()
            .lock()
            .unwrap()
            .translate(&Vec3f::new(5.0, 0.0, 0.0));
        graph
            .node(sensor)
            .unwrap()
            .lock()
            .unwrap()
            .translate(&Vec3f::new(0.0, 1.5, 0.0));

        let absolute = graph.absolute_transformation(sensor).unwrap();
        assert_close(
            &absolute,
            &Mat4f::new_translation(&Vec3f::new(5.0, 1.5, 0.0)),
        );
    }

    #[test]
    fn test_remove_subtree() {
        let mut graph = SceneGraph::new();
        let agent = graph.create_node(graph.root()).unwrap();
        let a = graph.create_node(agent).unwrap();
        let b = graph.create_node(agent).unwrap();
        assert_eq!(graph.len(), 4);

        assert_eq!(graph.remove_node(agent).unwrap(), 3);
        assert_eq!(graph.len(), 1);
        assert!(!graph.contains(a));
        assert!(matches!(
            graph.node(b),
            Err(SensorError::NodeNotFound { .. })
        ));
        assert!(graph.children(graph.root()).unwrap().is_empty());
        assert_eq!(graph.remove_node(graph.root()).unwrap(), 0);
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut graph = SceneGraph::new();
        for _ in 0..3 {
            let agent = graph.create_node(graph.root()).unwrap();
            graph.create_node(agent).unwrap();
            graph.remove_node(agent).unwrap();
        }
        assert_eq!(graph.entries.len(), 3);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_stale_handle_does_not_reach_new_node() {
        let mut graph = SceneGraph::new();
        let old = graph.create_node(graph.root()).unwrap();
        graph.remove_node(old).unwrap();
        let new = graph.create_node(graph.root()).unwrap();

        assert_eq!(new.index, old.index);
        assert!(graph.contains(new));
        assert!(!graph.contains(old));
        assert!(graph.remove_node(old).is_err());
        assert_eq!(graph.len(), 2);
    }
}
