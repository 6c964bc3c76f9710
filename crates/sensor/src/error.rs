//! Sensor error types

use contracts::{ContractError, SensorId};
use thiserror::Error;

use crate::scene::NodeId;

/// Sensor crate specific error
#[derive(Debug, Error)]
pub enum SensorError {
    /// Two agents share an id
    #[error("duplicate agent '{agent_id}'")]
    DuplicateAgent { agent_id: String },

    /// Two sensors share a uuid
    #[error("duplicate sensor '{uuid}' on agent '{agent_id}'")]
    DuplicateSensor { uuid: SensorId, agent_id: String },

    /// Node was removed or never existed
    #[error("scene node {node:?} does not exist")]
    NodeNotFound { node: NodeId },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SensorError {
    pub fn duplicate_sensor(uuid: impl Into<SensorId>, agent_id: impl Into<String>) -> Self {
        Self::DuplicateSensor {
            uuid: uuid.into(),
            agent_id: agent_id.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SensorError>;
