//! # Integration Tests
//!
//! End-to-end flows across crates:
//! - contract snapshot checks
//! - config file → blueprint → scene graph → render plan
//! - configuration store persistence

#[cfg(test)]
mod contract_tests {
    use contracts::{is_borrowable_type, SensorSpec, SensorType};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_borrowable_type_table() {
        for flag in [false, true] {
            assert!(is_borrowable_type(SensorType::Color, flag));
            assert!(is_borrowable_type(SensorType::Depth, flag));
            assert_eq!(is_borrowable_type(SensorType::Semantic, flag), flag);
            assert!(!is_borrowable_type(SensorType::Normal, flag));
            assert!(!is_borrowable_type(SensorType::Text, flag));
        }
    }

    #[test]
    fn test_spec_json_snapshot() {
        let spec = SensorSpec::new("rgb", SensorType::Color);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["uuid"], "rgb");
        assert_eq!(json["sensor_type"], "color");
        assert_eq!(json["resolution"], serde_json::json!([84, 84]));
        assert_eq!(json["channels"], 4);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader, Configuration};
    use contracts::{
        CollectingDiagnostics, Describable, Placed, SceneNodeType, Severity, Vec3f,
    };
    use observability::RenderShareStats;
    use sensor::{plan_render_passes, SceneGraph, SensorFactory};

    const RIG_CFG: &str = "\
# two agents, mixed sensors
version=1

[render]
allowSemanticBorrow=false

[agents/agent_0]
position=0.0 0.0 0.0

[agents/agent_0/sensors/rgb]
sensorType=color
sensorSubtype=pinhole
resolutionRows=256
resolutionCols=256

[agents/agent_0/sensors/rgb/parameters]
hfov=90

[agents/agent_0/sensors/depth]
sensorType=depth
sensorSubtype=pinhole
resolutionRows=256
resolutionCols=256
channels=1
encoding=f32

[agents/agent_0/sensors/depth/parameters]
hfov=90

[agents/agent_0/sensors/semantic]
sensorType=semantic
sensorSubtype=pinhole
resolutionRows=256
resolutionCols=256
channels=1

[agents/agent_0/sensors/semantic/parameters]
hfov=90

[agents/agent_1]
position=4.0 0.0 0.0

[agents/agent_1/sensors/rear_rgb]
sensorType=color
orientation=0.0 3.1415927 0.0
";

    /// config text -> blueprint -> nodes + suite -> render plan
    #[test]
    fn test_e2e_cfg_rig_pipeline() {
        let blueprint = ConfigLoader::load_from_str(RIG_CFG, ConfigFormat::Cfg).unwrap();
        assert_eq!(blueprint.agents.len(), 2);
        assert_eq!(blueprint.sensor_count(), 4);

        let diagnostics = Arc::new(CollectingDiagnostics::new());
        let factory = SensorFactory::new(diagnostics.clone());
        let mut graph = SceneGraph::new();
        let mut rig = factory.spawn_from_blueprint(&mut graph, &blueprint).unwrap();

        // placement: agent translation + sensor default height
        let rear = rig.sensor_nodes[&contracts::SensorId::new("rear_rgb")];
        let absolute = graph.absolute_transformation(rear).unwrap();
        assert!((absolute[(0, 3)] - 4.0).abs() < 1e-6);
        assert!((absolute[(1, 3)] - 1.5).abs() < 1e-6);
        // half turn about local Y flips the viewing axis
        assert!((absolute[(2, 2)] + 1.0).abs() < 1e-5);

        let node = rig.suite.get("rgb").unwrap().node().unwrap();
        assert_eq!(node.lock().unwrap().node_type(), SceneNodeType::Sensor);

        // rgb and depth share one pass; semantic and rear_rgb render alone
        let plan = plan_render_passes(&rig.suite, blueprint.render.allow_semantic_borrow);
        assert_eq!(plan.render_count(), 3);
        assert_eq!(plan.borrowed_count(), 1);
        assert_eq!(plan.pass_for("rgb"), plan.pass_for("depth"));
        assert_ne!(plan.pass_for("rgb"), plan.pass_for("semantic"));

        let mut stats = RenderShareStats::new();
        for pass in &plan.passes {
            let source = rig.suite.get(pass.source.as_str()).unwrap();
            let source_type = source.specification().unwrap().sensor_type;
            stats.record_pass(source_type, pass.borrowers.len());
        }
        assert_eq!(stats.summary().sensors, 4);

        assert!(diagnostics.is_empty());
        factory.teardown(&mut graph, &mut rig);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_e2e_released_spec_is_reported_not_fatal() {
        let blueprint = ConfigLoader::load_from_str(RIG_CFG, ConfigFormat::Cfg).unwrap();
        let diagnostics = Arc::new(CollectingDiagnostics::new());
        let mut graph = SceneGraph::new();
        let rig = SensorFactory::new(diagnostics.clone())
            .spawn_from_blueprint(&mut graph, &blueprint)
            .unwrap();

        let semantic = rig.suite.get("semantic").unwrap();
        semantic.release_specification();
        semantic.set_transformation_from_spec();

        assert_eq!(diagnostics.count(Severity::Error), 1);
        let plan = plan_render_passes(&rig.suite, false);
        assert_eq!(plan.unplaced.len(), 1);
        assert_eq!(plan.sensor_count(), 3);
    }

    #[test]
    fn test_e2e_semantic_borrow_flag_changes_plan() {
        let text = RIG_CFG.replace("allowSemanticBorrow=false", "allowSemanticBorrow=true");
        let mut blueprint = ConfigLoader::load_from_str(&text, ConfigFormat::Cfg).unwrap();
        assert!(blueprint.render.allow_semantic_borrow);

        // a second semantic sensor with identical geometry
        let mut twin = blueprint.find_sensor("semantic").unwrap().clone();
        twin.uuid = "semantic_twin".into();
        twin.encoding = "u32".into();
        blueprint.agents[0].sensors.push(twin);

        let mut graph = SceneGraph::new();
        let rig = SensorFactory::new(Arc::new(CollectingDiagnostics::new()))
            .spawn_from_blueprint(&mut graph, &blueprint)
            .unwrap();

        let shared = plan_render_passes(&rig.suite, true);
        assert_eq!(shared.pass_for("semantic"), shared.pass_for("semantic_twin"));
        // semantic never pairs with color or depth
        assert_ne!(shared.pass_for("semantic"), shared.pass_for("rgb"));

        let separate = plan_render_passes(&rig.suite, false);
        assert_eq!(separate.render_count(), shared.render_count() + 1);
    }

    #[test]
    fn test_e2e_export_formats_agree() {
        let blueprint = ConfigLoader::load_from_str(RIG_CFG, ConfigFormat::Cfg).unwrap();
        let dir = tempfile::tempdir().unwrap();

        for format in [ConfigFormat::Toml, ConfigFormat::Json, ConfigFormat::Cfg] {
            let path = dir.path().join(format!("rig.{}", format.extension()));
            std::fs::write(&path, ConfigLoader::to_format(&blueprint, format).unwrap()).unwrap();
            let loaded = ConfigLoader::load_from_path(&path).unwrap();
            assert_eq!(loaded, blueprint, "{format:?}");
        }
    }

    #[test]
    fn test_e2e_configuration_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulator.cfg");
        std::fs::write(
            &path,
            "\
; simulator settings
scene=apartment_0
scene=castle
frustumCulling=true
gravity=0.0 -9.8 0.0
[physics]
timestep=0.008
",
        )
        .unwrap();

        let mut cfg = ConfigLoader::load_configuration(&path).unwrap();
        assert_eq!(cfg.get_string_group("scene"), vec!["apartment_0", "castle"]);
        assert!(cfg.get_bool("frustumCulling").unwrap());
        assert_eq!(cfg.get_vec3("gravity").unwrap(), Vec3f::new(0.0, -9.8, 0.0));
        assert_eq!(cfg.group("physics").unwrap().get_double("timestep").unwrap(), 0.008);

        assert_eq!(cfg.add_string_to_group("scene", "skokloster").unwrap(), 3);
        assert!(cfg.set_bool("frustumCulling", false));
        ConfigLoader::save_configuration(&cfg, &path).unwrap();

        let reloaded: Configuration = ConfigLoader::load_configuration(&path).unwrap();
        assert_eq!(reloaded, cfg);
    }
}
