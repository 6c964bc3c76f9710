//! Sensors addressed by uuid

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{ContractError, Describable, SensorId};

use crate::sensor::Sensor;

/// Mapping from sensor uuid to sensor
///
/// At most one sensor per uuid; adding another with the same uuid replaces
/// the mapping. The suite never destroys sensors, their nodes own them.
#[derive(Debug, Clone, Default)]
pub struct SensorSuite {
    sensors: HashMap<SensorId, Arc<Sensor>>,
}

impl SensorSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sensor` under its uuid, returning the sensor it replaced
    pub fn add(&mut self, sensor: Arc<Sensor>) -> Option<Arc<Sensor>> {
        self.sensors.insert(sensor.uuid().clone(), sensor)
    }

    pub fn get(&self, uuid: &str) -> Result<Arc<Sensor>, ContractError> {
        self.sensors
            .get(uuid)
            .cloned()
            .ok_or_else(|| ContractError::key_not_found(uuid))
    }

    pub fn remove(&mut self, uuid: &str) -> Option<Arc<Sensor>> {
        self.sensors.remove(uuid)
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.sensors.contains_key(uuid)
    }

    pub fn clear(&mut self) {
        self.sensors.clear();
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Unordered
    pub fn iter(&self) -> impl Iterator<Item = (&SensorId, &Arc<Sensor>)> {
        self.sensors.iter()
    }

    /// Uuids in sorted order
    pub fn uuids(&self) -> Vec<SensorId> {
        let mut uuids: Vec<SensorId> = self.sensors.keys().cloned().collect();
        uuids.sort();
        uuids
    }
}
