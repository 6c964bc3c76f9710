//! Blueprint ↔ Configuration mapping
//!
//! Layout of a rig in the text format:
//!
//! ```text
//! version=1
//! [render]
//! allowSemanticBorrow=false
//! [agents/agent_0]
//! position=0.0 0.0 0.0
//! [agents/agent_0/sensors/rgba_camera]
//! sensorType=color
//! ...
//! [agents/agent_0/sensors/rgba_camera/parameters]
//! hfov="90"
//! ```

use std::collections::HashMap;

use contracts::{
    AgentConfig, ConfigVersion, ContractError, RenderConfig, Result, SensorId, SensorRigBlueprint,
    SensorSpec, SensorSubtype, SensorType, Vec2u, Vec3f,
};

use crate::configuration::Configuration;
use crate::format;
use crate::value::{ConfigEntry, ConfigType};

const AGENTS: &str = "agents";
const SENSORS: &str = "sensors";
const PARAMETERS: &str = "parameters";
const RENDER: &str = "render";

/// Parse rig text. Sensor `parameters` sections keep their values verbatim.
pub fn parse_rig_text(content: &str) -> Result<Configuration> {
    format::parse_with_raw_sections(content, is_parameter_section)
}

// `[parameters]` of a standalone sensor, or `[.../sensors/<uuid>/parameters]`
fn is_parameter_section(path: &[String]) -> bool {
    match path {
        [last] => last == PARAMETERS,
        [.., sensors, _, last] => sensors == SENSORS && last == PARAMETERS,
        _ => false,
    }
}

/// Write a blueprint into a fresh configuration
pub fn blueprint_to_configuration(blueprint: &SensorRigBlueprint) -> Configuration {
    let mut cfg = Configuration::new();
    cfg.set_int("version", 1);
    cfg.group_mut(RENDER)
        .set_bool("allowSemanticBorrow", blueprint.render.allow_semantic_borrow);

    for agent in &blueprint.agents {
        let agent_cfg = cfg.group_mut(AGENTS).group_mut(agent.id.as_str());
        agent_cfg.set_vec3("position", agent.position);
        for spec in &agent.sensors {
            *agent_cfg.group_mut(SENSORS).group_mut(spec.uuid.as_str()) =
                spec_to_configuration(spec);
        }
    }
    cfg
}

/// Read a blueprint from a configuration.
///
/// Agents and sensors come out ordered by section name.
pub fn blueprint_from_configuration(cfg: &Configuration) -> Result<SensorRigBlueprint> {
    let version = optional::<i32>(cfg, "version")?.unwrap_or(1);
    if version != 1 {
        return Err(ContractError::config_validation(
            "version",
            format!("unsupported version {version}"),
        ));
    }

    let render = match cfg.group(RENDER) {
        Some(render) => RenderConfig {
            allow_semantic_borrow: optional(render, "allowSemanticBorrow")?.unwrap_or(false),
        },
        None => RenderConfig::default(),
    };

    let mut agents = Vec::new();
    if let Some(agents_cfg) = cfg.group(AGENTS) {
        for (name, agent_cfg) in agents_cfg.groups() {
            agents.push(agent_from_configuration(name, agent_cfg)?);
        }
    }

    Ok(SensorRigBlueprint {
        version: ConfigVersion::V1,
        render,
        agents,
    })
}

fn agent_from_configuration(name: &str, cfg: &Configuration) -> Result<AgentConfig> {
    let mut sensors = Vec::new();
    if let Some(sensors_cfg) = cfg.group(SENSORS) {
        for (uuid, sensor_cfg) in sensors_cfg.groups() {
            let spec = spec_from_configuration(sensor_cfg, uuid).map_err(|e| {
                ContractError::config_validation(
                    format!("{AGENTS}/{name}/{SENSORS}/{uuid}"),
                    e.to_string(),
                )
            })?;
            sensors.push(spec);
        }
    }

    Ok(AgentConfig {
        id: optional::<String>(cfg, "id")?.unwrap_or_else(|| name.to_string()),
        position: optional(cfg, "position")?.unwrap_or_else(Vec3f::zeros),
        sensors,
    })
}

/// Serialize one spec as a configuration section
pub fn spec_to_configuration(spec: &SensorSpec) -> Configuration {
    let mut cfg = Configuration::new();
    cfg.set_string("uuid", spec.uuid.as_str());
    cfg.set_string("sensorType", spec.sensor_type.as_str());
    cfg.set_string("sensorSubtype", spec.sensor_subtype.as_str());
    cfg.set_vec3("position", spec.position);
    cfg.set_vec3("orientation", spec.orientation);
    cfg.set_int("resolutionRows", saturating_i32(spec.resolution.x));
    cfg.set_int("resolutionCols", saturating_i32(spec.resolution.y));
    cfg.set_int("channels", saturating_i32(spec.channels));
    cfg.set_string("encoding", spec.encoding.as_str());
    cfg.set_string("observationSpace", spec.observation_space.as_str());
    cfg.set_string("noiseModel", spec.noise_model.as_str());
    cfg.set_bool("gpu2gpuTransfer", spec.gpu2gpu_transfer);

    let parameters = cfg.group_mut(PARAMETERS);
    for (key, value) in &spec.parameters {
        parameters.set_string(key.as_str(), value.as_str());
    }
    cfg
}

/// Read one spec from a configuration section.
///
/// Missing keys take the [`SensorSpec`] defaults; `uuid` falls back to
/// `section_name`. Present keys must hold the expected kind.
pub fn spec_from_configuration(cfg: &Configuration, section_name: &str) -> Result<SensorSpec> {
    let defaults = SensorSpec::default();

    let sensor_type = match optional::<String>(cfg, "sensorType")? {
        Some(name) => SensorType::from_name(&name)
            .ok_or_else(|| ContractError::invalid_spec(format!("unknown sensor type '{name}'")))?,
        None => defaults.sensor_type,
    };
    let sensor_subtype = match optional::<String>(cfg, "sensorSubtype")? {
        Some(name) => SensorSubtype::from_name(&name).ok_or_else(|| {
            ContractError::invalid_spec(format!("unknown sensor subtype '{name}'"))
        })?,
        None => defaults.sensor_subtype,
    };

    let resolution = Vec2u::new(
        optional_count(cfg, "resolutionRows")?.unwrap_or(defaults.resolution.x),
        optional_count(cfg, "resolutionCols")?.unwrap_or(defaults.resolution.y),
    );

    let mut parameters = HashMap::new();
    if let Some(params) = cfg.group(PARAMETERS) {
        for (key, entry) in params.entries() {
            match entry {
                ConfigEntry::Scalar(value) => {
                    parameters.insert(key.to_string(), value.to_string());
                }
                ConfigEntry::Group(_) => {
                    return Err(ContractError::invalid_spec(format!(
                        "parameter '{key}' must be a single value"
                    )));
                }
            }
        }
    }

    Ok(SensorSpec {
        uuid: optional::<String>(cfg, "uuid")?
            .map(SensorId::from)
            .unwrap_or_else(|| SensorId::new(section_name)),
        sensor_type,
        sensor_subtype,
        parameters,
        position: optional(cfg, "position")?.unwrap_or(defaults.position),
        orientation: optional(cfg, "orientation")?.unwrap_or(defaults.orientation),
        resolution,
        channels: optional_count(cfg, "channels")?.unwrap_or(defaults.channels),
        encoding: optional(cfg, "encoding")?.unwrap_or(defaults.encoding),
        observation_space: optional(cfg, "observationSpace")?
            .unwrap_or(defaults.observation_space),
        noise_model: optional(cfg, "noiseModel")?.unwrap_or(defaults.noise_model),
        gpu2gpu_transfer: optional(cfg, "gpu2gpuTransfer")?.unwrap_or(defaults.gpu2gpu_transfer),
    })
}

fn optional<T: ConfigType>(cfg: &Configuration, key: &str) -> Result<Option<T>> {
    if cfg.has_value(key) {
        cfg.get(key).map(Some)
    } else {
        Ok(None)
    }
}

fn optional_count(cfg: &Configuration, key: &str) -> Result<Option<u32>> {
    match optional::<i32>(cfg, key)? {
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| ContractError::invalid_spec(format!("'{key}' must not be negative"))),
        None => Ok(None),
    }
}

fn saturating_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
