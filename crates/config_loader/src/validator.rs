//! Blueprint validation
//!
//! Rules:
//! - field rules derived on the contract types (`channels >= 1`, non-empty `encoding`)
//! - agent ids unique and non-empty
//! - sensor uuids non-empty and unique across all agents
//! - resolution non-zero on both axes
//! - position and orientation finite

use std::collections::HashSet;

use contracts::{ContractError, SensorRigBlueprint, SensorSpec};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a blueprint.
///
/// Returns the first error encountered.
pub fn validate(blueprint: &SensorRigBlueprint) -> Result<(), ContractError> {
    blueprint.validate().map_err(derived_error)?;
    validate_agent_ids(blueprint)?;
    validate_sensor_uuids(blueprint)?;
    for agent in &blueprint.agents {
        for spec in &agent.sensors {
            validate_geometry(&agent.id, spec)?;
        }
    }
    Ok(())
}

fn derived_error(errors: ValidationErrors) -> ContractError {
    let mut failures = Vec::new();
    flatten(&errors, String::new(), &mut failures);
    failures.sort();
    match failures.into_iter().next() {
        Some((field, message)) => ContractError::config_validation(field, message),
        None => ContractError::config_validation("blueprint", errors.to_string()),
    }
}

/// Collect `(path, message)` pairs such as `agents[0].sensors[1].channels`
fn flatten(errors: &ValidationErrors, prefix: String, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' rule", error.code));
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(inner, path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(inner, format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Agent id uniqueness
fn validate_agent_ids(blueprint: &SensorRigBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for agent in &blueprint.agents {
        if agent.id.is_empty() {
            return Err(ContractError::config_validation(
                "agents[].id",
                "agent id cannot be empty",
            ));
        }
        if !seen.insert(agent.id.as_str()) {
            return Err(ContractError::config_validation(
                format!("agents[id={}]", agent.id),
                "duplicate agent id",
            ));
        }
    }
    Ok(())
}

/// Sensor uuid uniqueness (global)
fn validate_sensor_uuids(blueprint: &SensorRigBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for agent in &blueprint.agents {
        for spec in &agent.sensors {
            if spec.uuid.is_empty() {
                return Err(ContractError::config_validation(
                    format!("agents[{}].sensors[].uuid", agent.id),
                    "sensor uuid cannot be empty",
                ));
            }
            if !seen.insert(spec.uuid.as_str()) {
                return Err(ContractError::config_validation(
                    format!("agents[{}].sensors[uuid={}]", agent.id, spec.uuid),
                    "duplicate sensor uuid",
                ));
            }
        }
    }
    Ok(())
}

fn validate_geometry(agent: &str, spec: &SensorSpec) -> Result<(), ContractError> {
    let field = |name: &str| format!("agents[{agent}].sensors[{}].{name}", spec.uuid);

    if spec.resolution.x == 0 || spec.resolution.y == 0 {
        return Err(ContractError::config_validation(
            field("resolution"),
            format!(
                "resolution must be non-zero, got {}x{}",
                spec.resolution.x, spec.resolution.y
            ),
        ));
    }
    if !spec.position.iter().all(|v| v.is_finite()) {
        return Err(ContractError::config_validation(
            field("position"),
            "position must be finite",
        ));
    }
    if !spec.orientation.iter().all(|v| v.is_finite()) {
        return Err(ContractError::config_validation(
            field("orientation"),
            "orientation must be finite",
        ));
    }
    Ok(())
}
