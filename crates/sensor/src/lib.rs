//! # Sensor
//!
//! Sensors bound to scene-graph nodes.
//!
//! Responsibilities:
//! - Bind a shared [`SensorSpec`](contracts::SensorSpec) to a node and derive the node's placement from it
//! - Address sensors by uuid through a [`SensorSuite`]
//! - Plan which sensors can share a render pass
//! - Spawn and tear down a whole rig from a `SensorRigBlueprint`
//! - Provide an in-memory [`SceneGraph`] implementing the node contract

pub mod error;
pub mod factory;
pub mod render_share;
pub mod scene;
pub mod sensor;
pub mod suite;

pub use contracts::{Describable, Placed, SensorRigBlueprint};
pub use error::{Result, SensorError};
pub use factory::{SensorFactory, SensorRig};
pub use render_share::{plan_render_passes, RenderPass, RenderPlan};
pub use scene::{GraphNode, NodeId, SceneGraph};
pub use sensor::Sensor;
pub use suite::SensorSuite;
