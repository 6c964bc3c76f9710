//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the sensor rig:
//! sensor descriptors, identifiers, errors, the scene-node contract and the
//! diagnostics sink. Business crates depend on this crate only, never on each
//! other's internals.
//!
//! ## Geometry
//! - Positions are node-local, in meters (`f32`)
//! - Orientations are radians, applied about local X, then Y, then Z

mod blueprint;
mod diagnostics;
mod error;
mod scene;
mod sensor_id;
mod sensor_spec;

pub use blueprint::*;
pub use diagnostics::*;
pub use error::*;
pub use scene::*;
pub use sensor_id::SensorId;
pub use sensor_spec::*;

pub use nalgebra;

/// 3D vector (positions, orientations)
pub type Vec3f = nalgebra::Vector3<f32>;

/// Rotation quaternion
pub type Quatf = nalgebra::Quaternion<f32>;

/// 2D extent (resolution)
pub type Vec2u = nalgebra::Vector2<u32>;

/// Homogeneous transformation
pub type Mat4f = nalgebra::Matrix4<f32>;
