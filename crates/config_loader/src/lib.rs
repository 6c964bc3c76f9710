//! # Config Loader
//!
//! Typed key/value configuration store and sensor rig blueprint loading.
//!
//! Responsibilities:
//! - [`Configuration`]: string-keyed typed values, string groups and child sections
//! - Text format load/save for configurations (`format`)
//! - Parse TOML/JSON/cfg rig files into a validated [`SensorRigBlueprint`]
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("rig.toml")).unwrap();
//! println!("sensors: {}", blueprint.sensor_count());
//! ```

mod configuration;
pub mod format;
mod parser;
mod spec_config;
mod validator;
mod value;

pub use configuration::Configuration;
pub use contracts::SensorRigBlueprint;
pub use parser::ConfigFormat;
pub use spec_config::{
    blueprint_from_configuration, blueprint_to_configuration, parse_rig_text,
    spec_from_configuration, spec_to_configuration,
};
pub use value::{ConfigEntry, ConfigKind, ConfigType, ConfigValue};

use contracts::ContractError;
use std::path::Path;
use tracing::debug;

/// Blueprint and configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a blueprint from file path
    ///
    /// Format is detected from the extension (`.toml` / `.json` / `.cfg`).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SensorRigBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        debug!(path = %path.display(), ?format, "loading blueprint");
        Self::load_from_str(&content, format)
    }

    /// Load a blueprint from string
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SensorRigBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Check a blueprint built in code
    pub fn validate(blueprint: &SensorRigBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    pub fn to_toml(blueprint: &SensorRigBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    pub fn to_json(blueprint: &SensorRigBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    pub fn to_cfg(blueprint: &SensorRigBlueprint) -> Result<String, ContractError> {
        format::to_string(&blueprint_to_configuration(blueprint))
    }

    /// Serialize into the given format
    pub fn to_format(
        blueprint: &SensorRigBlueprint,
        format: ConfigFormat,
    ) -> Result<String, ContractError> {
        match format {
            ConfigFormat::Toml => Self::to_toml(blueprint),
            ConfigFormat::Json => Self::to_json(blueprint),
            ConfigFormat::Cfg => Self::to_cfg(blueprint),
        }
    }

    /// Load an arbitrary configuration in the text format
    pub fn load_configuration(path: &Path) -> Result<Configuration, ContractError> {
        let content = Self::read_file(path)?;
        debug!(path = %path.display(), "loading configuration");
        format::parse(&content)
    }

    /// Save a configuration in the text format
    pub fn save_configuration(cfg: &Configuration, path: &Path) -> Result<(), ContractError> {
        let content = format::to_string(cfg)?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), keys = cfg.key_count(), "saved configuration");
        Ok(())
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    pub fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SensorType, Vec3f};

    const MINIMAL_TOML: &str = r#"
[render]
allow_semantic_borrow = false

[[agents]]
id = "agent_0"
position = [0.0, 0.0, 0.0]

[[agents.sensors]]
uuid = "rgba_camera"
sensor_type = "color"
sensor_subtype = "pinhole"
position = [0.0, 1.5, 0.0]
orientation = [0.0, 0.0, 0.0]
resolution = [256, 256]
[agents.sensors.parameters]
hfov = "90"

[[agents.sensors]]
uuid = "depth_camera"
sensor_type = "depth"
sensor_subtype = "pinhole"
position = [0.0, 1.5, 0.0]
resolution = [256, 256]
channels = 1
encoding = "f32"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.sensor_count(), 2);
        assert_eq!(
            bp.find_sensor("depth_camera").map(|s| s.sensor_type),
            Some(SensorType::Depth)
        );
    }

    #[test]
    fn test_round_trip_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp, bp2);
    }

    #[test]
    fn test_round_trip_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp, bp2);
    }

    #[test]
    fn test_round_trip_cfg_keeps_specs() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let text = ConfigLoader::to_cfg(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&text, ConfigFormat::Cfg).unwrap();
        for spec in bp.all_sensors() {
            assert_eq!(bp2.find_sensor(spec.uuid.as_str()), Some(spec), "{text}");
        }
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[[agents]]
id = "agent_0"
[[agents.sensors]]
uuid = "cam"
sensor_type = "color"
[[agents.sensors]]
uuid = "cam"
sensor_type = "depth"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_configuration_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.cfg");

        let mut cfg = Configuration::new();
        cfg.set_string("scene", "apartment_1");
        cfg.set_vec3("gravity", Vec3f::new(0.0, -9.8, 0.0));
        cfg.add_string_to_group("datasets", "replica").unwrap();
        cfg.add_string_to_group("datasets", "mp3d").unwrap();
        cfg.group_mut("physics").set_double("timestep", 0.008);

        ConfigLoader::save_configuration(&cfg, &path).unwrap();
        let loaded = ConfigLoader::load_configuration(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigLoader::load_from_path(Path::new("rig.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn test_cfg_parameters_survive_load_and_export() {
        let text = "\
[agents/agent_0/sensors/rgb]
sensorType=color
[agents/agent_0/sensors/rgb/parameters]
serial=007
hfov=90.0
";
        let blueprint = ConfigLoader::load_from_str(text, ConfigFormat::Cfg).unwrap();
        let spec = blueprint.find_sensor("rgb").unwrap();
        assert_eq!(spec.parameters["serial"], "007");
        assert_eq!(spec.parameters["hfov"], "90.0");

        let exported = ConfigLoader::to_cfg(&blueprint).unwrap();
        let reloaded = ConfigLoader::load_from_str(&exported, ConfigFormat::Cfg).unwrap();
        assert_eq!(reloaded, blueprint);
    }
}
