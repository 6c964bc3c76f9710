//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;
use crate::rig::RigSession;

/// Rig info for JSON output
#[derive(Serialize)]
struct RigInfo {
    version: String,
    allow_semantic_borrow: bool,
    agents: Vec<AgentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    render: Option<RenderInfo>,
}

#[derive(Serialize)]
struct AgentInfo {
    id: String,
    position: [f32; 3],
    sensor_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sensors: Vec<SensorInfo>,
}

#[derive(Serialize)]
struct SensorInfo {
    uuid: String,
    sensor_type: String,
    sensor_subtype: String,
    resolution: [u32; 2],
    channels: u32,
    encoding: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    world_position: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    render_source: Option<String>,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    parameters: std::collections::HashMap<String, String>,
}

#[derive(Serialize)]
struct RenderInfo {
    render_passes: usize,
    borrowed: usize,
    passes: Vec<PassInfo>,
}

#[derive(Serialize)]
struct PassInfo {
    source: String,
    borrowers: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading rig info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let allow_semantic_borrow =
        args.allow_semantic_borrow || blueprint.render.allow_semantic_borrow;

    let session = RigSession::build(blueprint, allow_semantic_borrow)?;

    if args.json {
        let info = build_rig_info(&session, args, allow_semantic_borrow);
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize rig info")?;
        println!("{}", json);
    } else {
        print_rig_info(&session, args, allow_semantic_borrow);
    }

    Ok(())
}

fn build_rig_info(session: &RigSession, args: &InfoArgs, allow_semantic_borrow: bool) -> RigInfo {
    let blueprint = &session.blueprint;

    let agents = blueprint
        .agents
        .iter()
        .map(|agent| {
            let sensors = if args.sensors {
                agent
                    .sensors
                    .iter()
                    .map(|spec| SensorInfo {
                        uuid: spec.uuid.to_string(),
                        sensor_type: spec.sensor_type.to_string(),
                        sensor_subtype: spec.sensor_subtype.to_string(),
                        resolution: [spec.resolution.x, spec.resolution.y],
                        channels: spec.channels,
                        encoding: spec.encoding.clone(),
                        world_position: session.world_position(&spec.uuid).map(|p| [p.x, p.y, p.z]),
                        render_source: session.render_source(&spec.uuid).map(str::to_string),
                        parameters: spec.parameters.clone(),
                    })
                    .collect()
            } else {
                Vec::new()
            };

            AgentInfo {
                id: agent.id.clone(),
                position: [agent.position.x, agent.position.y, agent.position.z],
                sensor_count: agent.sensors.len(),
                sensors,
            }
        })
        .collect();

    let render = args.plan.then(|| RenderInfo {
        render_passes: session.plan.render_count(),
        borrowed: session.plan.borrowed_count(),
        passes: session
            .plan
            .passes
            .iter()
            .map(|pass| PassInfo {
                source: pass.source.to_string(),
                borrowers: pass.borrowers.iter().map(|id| id.to_string()).collect(),
            })
            .collect(),
    });

    RigInfo {
        version: format!("{:?}", blueprint.version),
        allow_semantic_borrow,
        agents,
        render,
    }
}

fn print_rig_info(session: &RigSession, args: &InfoArgs, allow_semantic_borrow: bool) {
    let blueprint = &session.blueprint;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Sensor Rig Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Rig");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Semantic borrow: {}", allow_semantic_borrow);
    println!("   └─ Sensors: {}", blueprint.sensor_count());

    println!("\nAgents ({})", blueprint.agents.len());
    for (i, agent) in blueprint.agents.iter().enumerate() {
        let is_last = i == blueprint.agents.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        let p = agent.position;
        println!("   {} {} at ({}, {}, {})", prefix, agent.id, p.x, p.y, p.z);

        if args.sensors && !agent.sensors.is_empty() {
            for (j, spec) in agent.sensors.iter().enumerate() {
                let sensor_is_last = j == agent.sensors.len() - 1;
                let sensor_prefix = if sensor_is_last { "└─" } else { "├─" };
                let source = session
                    .render_source(&spec.uuid)
                    .filter(|source| *source != spec.uuid.as_str())
                    .map(|source| format!(", borrows {source}"))
                    .unwrap_or_default();
                println!(
                    "   {}  {} {} ({}/{}, {}x{}x{}{})",
                    child_prefix,
                    sensor_prefix,
                    spec.uuid,
                    spec.sensor_type,
                    spec.sensor_subtype,
                    spec.resolution.x,
                    spec.resolution.y,
                    spec.channels,
                    source
                );
            }
        } else {
            println!("   {}  └─ {} sensors", child_prefix, agent.sensors.len());
        }
    }

    if args.plan {
        println!("\nRender passes ({})", session.plan.render_count());
        for (i, pass) in session.plan.passes.iter().enumerate() {
            let prefix = if i == session.plan.passes.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            if pass.borrowers.is_empty() {
                println!("   {} {}", prefix, pass.source);
            } else {
                let borrowers: Vec<&str> = pass.borrowers.iter().map(|id| id.as_str()).collect();
                println!("   {} {} → {}", prefix, pass.source, borrowers.join(", "));
            }
        }
        println!();
        print!("{}", session.stats.summary());
    }

    println!();
}
