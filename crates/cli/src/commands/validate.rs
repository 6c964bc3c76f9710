//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{SensorRigBlueprint, SensorType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    agent_count: usize,
    sensor_count: usize,
    allow_semantic_borrow: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    agent_count: blueprint.agents.len(),
                    sensor_count: blueprint.sensor_count(),
                    allow_semantic_borrow: blueprint.render.allow_semantic_borrow,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(blueprint: &SensorRigBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.agents.is_empty() {
        warnings.push("No agents configured".to_string());
    }

    for agent in &blueprint.agents {
        if agent.sensors.is_empty() {
            warnings.push(format!("Agent '{}' has no sensors configured", agent.id));
        }
    }

    for spec in blueprint.sensors_of_type(SensorType::None) {
        warnings.push(format!("Sensor '{}' has no sensor type", spec.uuid));
    }

    if !blueprint.render.allow_semantic_borrow
        && blueprint.sensors_of_type(SensorType::Semantic).count() > 1
    {
        warnings.push(
            "Several semantic sensors but allow_semantic_borrow is off - each renders separately"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Agents: {}", summary.agent_count);
            println!("  Sensors: {}", summary.sensor_count);
            println!("  Semantic borrow: {}", summary.allow_semantic_borrow);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
