//! SensorFactory
//!
//! Builds agent and sensor nodes from a blueprint and binds sensors to them.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use contracts::{AgentConfig, Diagnostics, SceneNodeType, SensorId, SensorRigBlueprint};
use tracing::{info, instrument, warn};

use crate::error::{Result, SensorError};
use crate::scene::{NodeId, SceneGraph};
use crate::sensor::Sensor;
use crate::suite::SensorSuite;

/// Nodes and sensors created for one blueprint
#[derive(Debug, Default)]
pub struct SensorRig {
    /// agent id → agent node
    pub agents: BTreeMap<String, NodeId>,

    /// sensor uuid → sensor node
    pub sensor_nodes: BTreeMap<SensorId, NodeId>,

    pub suite: SensorSuite,
}

impl SensorRig {
    pub fn sensor_count(&self) -> usize {
        self.suite.len()
    }
}

/// Sensor Factory
///
/// Spawns one node per agent under the scene root and one child node per
/// sensor, and provides teardown and rollback.
pub struct SensorFactory {
    diagnostics: Arc<dyn Diagnostics>,
}

impl SensorFactory {
    /// `diagnostics` is handed to every sensor created
    pub fn new(diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self { diagnostics }
    }

    /// Spawn every agent and sensor of `blueprint` into `graph`
    ///
    /// # Atomicity
    /// If any agent fails, all nodes created so far are removed again.
    #[instrument(
        name = "sensor_factory_spawn_blueprint",
        skip(self, graph, blueprint),
        fields(agent_count = blueprint.agents.len())
    )]
    pub fn spawn_from_blueprint(
        &self,
        graph: &mut SceneGraph,
        blueprint: &SensorRigBlueprint,
    ) -> Result<SensorRig> {
        let mut rig = SensorRig::default();

        for agent in &blueprint.agents {
            if let Err(e) = self.spawn_agent_with_sensors(graph, agent, &mut rig) {
                warn!(
                    error = %e,
                    agent_id = %agent.id,
                    "spawn failed, rolling back all nodes"
                );
                self.teardown(graph, &mut rig);
                return Err(e);
            }
        }

        info!(
            agents = rig.agents.len(),
            sensors = rig.suite.len(),
            "spawn_from_blueprint completed successfully"
        );
        Ok(rig)
    }

    #[instrument(
        name = "sensor_factory_spawn_agent",
        skip(self, graph, config, rig),
        fields(agent_id = %config.id)
    )]
    fn spawn_agent_with_sensors(
        &self,
        graph: &mut SceneGraph,
        config: &AgentConfig,
        rig: &mut SensorRig,
    ) -> Result<()> {
        if rig.agents.contains_key(&config.id) {
            return Err(SensorError::DuplicateAgent {
                agent_id: config.id.clone(),
            });
        }
        let mut seen = HashSet::new();
        for spec in &config.sensors {
            if rig.sensor_nodes.contains_key(&spec.uuid) || !seen.insert(&spec.uuid) {
                return Err(SensorError::duplicate_sensor(spec.uuid.clone(), &config.id));
            }
        }

        let agent_node = graph.create_node(graph.root())?;
        rig.agents.insert(config.id.clone(), agent_node);
        {
            let node = graph.node(agent_node)?;
            let mut node = node.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            node.set_type(SceneNodeType::Agent);
            node.translate(&config.position);
        }

        for spec in &config.sensors {
            let sensor_node = graph.create_node(agent_node)?;
            let sensor = Sensor::new(
                &graph.node(sensor_node)?,
                Arc::new(spec.clone()),
                self.diagnostics.clone(),
            );
            rig.sensor_nodes.insert(spec.uuid.clone(), sensor_node);
            rig.suite.add(sensor);

            info!(
                uuid = %spec.uuid,
                sensor_type = %spec.sensor_type,
                "sensor attached"
            );
        }
        Ok(())
    }

    /// Remove every node of `rig` and empty its suite
    ///
    /// # Idempotency
    /// Safe to call repeatedly; nodes already gone are skipped.
    #[instrument(
        name = "sensor_factory_teardown",
        skip(self, graph, rig),
        fields(agent_count = rig.agents.len(), sensor_count = rig.suite.len())
    )]
    pub fn teardown(&self, graph: &mut SceneGraph, rig: &mut SensorRig) {
        info!("starting teardown");
        rig.suite.clear();
        rig.sensor_nodes.clear();

        for (agent_id, node) in std::mem::take(&mut rig.agents) {
            match graph.remove_node(node) {
                Ok(removed) => info!(agent_id, removed, "agent node removed"),
                Err(e) => warn!(agent_id, error = %e, "agent node already gone"),
            }
        }
        info!("teardown completed");
    }
}
