//! Blueprint parsing
//!
//! TOML and JSON go through serde; `.cfg` goes through the configuration
//! text format and the section mapping in `spec_config`.

use contracts::{ContractError, SensorRigBlueprint};

use crate::spec_config;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    /// Sectioned `key=value` text
    Cfg,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "cfg" => Some(Self::Cfg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
            Self::Cfg => "cfg",
        }
    }
}

pub fn parse_toml(content: &str) -> Result<SensorRigBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

pub fn parse_json(content: &str) -> Result<SensorRigBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

pub fn parse_cfg(content: &str) -> Result<SensorRigBlueprint, ContractError> {
    let cfg = spec_config::parse_rig_text(content)?;
    spec_config::blueprint_from_configuration(&cfg)
}

pub fn parse(content: &str, format: ConfigFormat) -> Result<SensorRigBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
        ConfigFormat::Cfg => parse_cfg(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SensorSubtype, SensorType, Vec2u};

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[render]
allow_semantic_borrow = true

[[agents]]
id = "agent_0"

[[agents.sensors]]
uuid = "rgb"
sensor_type = "color"
sensor_subtype = "pinhole"
resolution = [480, 640]
position = [0.0, 1.5, 0.0]
[agents.sensors.parameters]
hfov = "90"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert!(bp.render.allow_semantic_borrow);
        assert_eq!(bp.agents.len(), 1);
        let spec = &bp.agents[0].sensors[0];
        assert_eq!(spec.sensor_subtype, SensorSubtype::Pinhole);
        assert_eq!(spec.resolution, Vec2u::new(480, 640));
        assert_eq!(spec.parameters["hfov"], "90");
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "agents": [{
                "id": "agent_0",
                "sensors": [{ "uuid": "depth", "sensor_type": "depth", "channels": 1 }]
            }]
        }"#;
        let bp = parse_json(content).unwrap();
        assert_eq!(bp.agents[0].sensors[0].sensor_type, SensorType::Depth);
        assert_eq!(bp.agents[0].sensors[0].channels, 1);
    }

    #[test]
    fn test_parse_cfg_minimal() {
        let content = "\
version=1
[agents/agent_0/sensors/semantic]
sensorType=semantic
channels=1
";
        let bp = parse_cfg(content).unwrap();
        assert_eq!(bp.agents[0].id, "agent_0");
        assert_eq!(bp.agents[0].sensors[0].uuid, "semantic");
        assert_eq!(bp.agents[0].sensors[0].sensor_type, SensorType::Semantic);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let err = parse_toml("invalid toml [[[").unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("cfg"), Some(ConfigFormat::Cfg));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
