// tests/warehouse_frame.rs
use glam::Vec3;
use warehouse_sim::{
    ConfigError, ForkliftConfig, GenerationError, Hold, InputState, MAX_DELTA, PrintSettings,
    PrinterPhase, SimulationConfig, Warehouse,
};

const DT: f32 = 1.0 / 30.0;

/// A scene whose forklift starts facing +X with its grabber hovering just
/// above the printer's build plate.
fn scene_at_printer() -> Warehouse {
    let config = SimulationConfig {
        forklift: ForkliftConfig {
            position: Vec3::new(-123.0, 0.0, 0.0),
            yaw: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    Warehouse::new(config)
}

fn press(warehouse: &mut Warehouse, input: &mut InputState, code: &str) -> f32 {
    input.key_down(code);
    let delta = warehouse.frame(DT, input);
    input.clear_pressed();
    delta
}

fn finish_print(warehouse: &mut Warehouse, settings: &PrintSettings) {
    warehouse.trigger_print(settings).expect("valid print");
    let input = InputState::new();
    for _ in 0..2_000 {
        if warehouse.printer().phase() == PrinterPhase::Finished {
            return;
        }
        warehouse.frame(DT, &input);
    }
    panic!("print never finished");
}

#[test]
fn test_frame_delta_is_clamped() {
    let mut warehouse = Warehouse::new(SimulationConfig::default());
    let input = InputState::new();
    assert_eq!(warehouse.frame(1.0, &input), MAX_DELTA);
    assert_eq!(warehouse.frame(-0.5, &input), 0.0);
    assert_eq!(warehouse.frame(0.01, &input), 0.01);
}

#[test]
fn test_held_keys_drive_the_forklift() {
    let mut warehouse = scene_at_printer();
    let mut input = InputState::new();
    let start = warehouse.forklift().position();

    input.key_down("KeyW");
    warehouse.frame(DT, &input);
    input.clear_pressed();
    warehouse.frame(DT, &input);
    let moved = warehouse.forklift().position() - start;
    assert!(moved.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-4), "{moved}");

    input.key_up("KeyW");
    warehouse.frame(DT, &input);
    assert!((warehouse.forklift().position() - start).abs_diff_eq(moved, 1e-6));
}

#[test]
fn test_opposing_keys_cancel_out() {
    let mut warehouse = scene_at_printer();
    let mut input = InputState::new();
    let start = warehouse.forklift().position();
    let yaw = warehouse.forklift().yaw();
    let lift = warehouse.forklift().lift_height();

    for (a, b) in [("KeyW", "KeyS"), ("KeyA", "KeyD"), ("KeyQ", "KeyE")] {
        input.key_down(a);
        input.key_down(b);
    }
    for _ in 0..10 {
        warehouse.frame(DT, &input);
        input.clear_pressed();
    }
    assert_eq!(warehouse.forklift().position(), start);
    assert_eq!(warehouse.forklift().yaw(), yaw);
    assert_eq!(warehouse.forklift().lift_height(), lift);
    assert_eq!(warehouse.forklift().wheel_spins(), [0.0; 4]);
}

#[test]
fn test_lift_keys_move_the_panel() {
    let mut warehouse = scene_at_printer();
    let mut input = InputState::new();
    let lift = warehouse.forklift().lift_height();

    input.key_down("KeyQ");
    warehouse.frame(DT, &input);
    assert!(warehouse.forklift().lift_height() > lift);

    input.key_up("KeyQ");
    input.key_down("KeyE");
    warehouse.frame(DT, &input);
    warehouse.frame(DT, &input);
    assert!(warehouse.forklift().lift_height() < lift);
}

#[test]
fn test_grab_fires_once_per_key_press() {
    let mut warehouse = scene_at_printer();
    finish_print(&mut warehouse, &PrintSettings::default());
    let mut input = InputState::new();

    press(&mut warehouse, &mut input, "KeyG");
    assert!(warehouse.forklift().grabber().has_object());
    assert!(!warehouse.printer().holder().has_object());
    assert_eq!(warehouse.printer().phase(), PrinterPhase::Idle);

    // Still held: no second interaction that would drop the object back.
    for _ in 0..5 {
        warehouse.frame(DT, &input);
    }
    assert!(warehouse.forklift().grabber().has_object());

    // Releasing and pressing again drops it back onto the plate.
    input.key_up("KeyG");
    warehouse.frame(DT, &input);
    press(&mut warehouse, &mut input, "KeyG");
    assert!(!warehouse.forklift().grabber().has_object());
    assert!(warehouse.printer().holder().has_object());
}

#[test]
fn test_grab_is_refused_while_printing() {
    let mut warehouse = scene_at_printer();
    warehouse
        .trigger_print(&PrintSettings::default())
        .expect("valid print");
    let mut input = InputState::new();

    press(&mut warehouse, &mut input, "KeyG");
    assert!(!warehouse.forklift().grabber().has_object());
    assert!(warehouse.printer().holder().has_object());
}

#[test]
fn test_unknown_shape_is_reported_and_ignored() {
    let mut warehouse = Warehouse::new(SimulationConfig::default());
    let settings = PrintSettings {
        shape: "C9".to_string(),
        ..Default::default()
    };
    assert_eq!(
        warehouse.trigger_print(&settings),
        Err(GenerationError::UnknownShape("C9".to_string()))
    );
    assert_eq!(warehouse.printer().phase(), PrinterPhase::Idle);
    assert!(warehouse.printer().printed_object().is_none());
}

#[test]
fn test_print_settings_are_clamped_to_the_panel_ranges() {
    let mut warehouse = Warehouse::new(SimulationConfig::default());
    let settings = PrintSettings {
        shape: "B2".to_string(),
        height: -4.0,
        twist_angle: 720.0,
    };
    warehouse.trigger_print(&settings).expect("clamped settings are valid");
    let solid = warehouse.printer().printed_object().expect("solid installed");
    assert_eq!(solid.height, 0.1);
    assert_eq!(solid.twist_angle, 360.0);
}

#[test]
fn test_shelf_stores_the_printed_object() {
    let mut warehouse = scene_at_printer();
    finish_print(&mut warehouse, &PrintSettings::default());
    let mut input = InputState::new();
    press(&mut warehouse, &mut input, "KeyG");
    assert!(warehouse.forklift().grabber().has_object());

    // Hand the object over to the first shelf space directly.
    let solid = warehouse
        .forklift_mut()
        .grabber_mut()
        .give()
        .expect("grabber holds the print");
    warehouse.shelf_mut().holders_mut()[0]
        .receive(solid)
        .expect("empty shelf space");
    assert_eq!(warehouse.shelf().stored(), 1);
    assert_eq!(warehouse.holders_mut().count(), 1 + 16);
}

#[test]
fn test_shutdown_releases_every_solid() {
    let mut warehouse = scene_at_printer();
    finish_print(&mut warehouse, &PrintSettings::default());
    let mut input = InputState::new();
    press(&mut warehouse, &mut input, "KeyG");
    let carried = warehouse
        .forklift()
        .grabber()
        .holder()
        .object()
        .map(|s| s.id())
        .expect("carried solid");

    finish_print(&mut warehouse, &PrintSettings::default());
    let printed = warehouse
        .printer()
        .printed_object()
        .map(|s| s.id())
        .expect("printed solid");

    let mut released = warehouse.shutdown();
    released.sort();
    let mut expected = vec![carried, printed];
    expected.sort();
    assert_eq!(released, expected);
}

#[test]
fn test_config_loads_partial_toml() {
    let config = SimulationConfig::from_toml_str(
        r#"
        max_delta = 0.05

        [printer]
        hand_speed = 5.0

        [forklift]
        position = [1.0, 2.0, 3.0]

        [controls]
        grab = "Space"
        "#,
    )
    .expect("valid config");

    assert_eq!(config.max_delta, 0.05);
    assert_eq!(config.printer.hand_speed, 5.0);
    assert_eq!(config.printer.hand_max_height, 25.0);
    assert_eq!(config.forklift.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(config.forklift.movement_speed, 60.0);
    assert_eq!(config.shelf.columns, 8);
    assert_eq!(config.controls.grab, "Space");
    assert_eq!(config.controls.forward, "KeyW");
}

#[test]
fn test_config_survives_a_toml_round_trip() {
    let config = SimulationConfig::default();
    let text = config.to_toml_string().expect("serializable");
    let parsed = SimulationConfig::from_toml_str(&text).expect("parsable");
    assert_eq!(parsed.max_delta, config.max_delta);
    assert_eq!(parsed.printer.print_material, config.printer.print_material);
    assert_eq!(parsed.shelf.rows, config.shelf.rows);
    assert_eq!(parsed.controls, config.controls);
}

#[test]
fn test_invalid_config_is_an_error() {
    assert!(matches!(
        SimulationConfig::from_toml_str("max_delta = \"soon\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_rebound_keys_are_honoured() {
    let mut config = SimulationConfig::default();
    config.controls.forward = "ArrowUp".to_string();
    let mut warehouse = Warehouse::new(config);
    let start = warehouse.forklift().position();
    let mut input = InputState::new();

    input.key_down("KeyW");
    warehouse.frame(DT, &input);
    assert_eq!(warehouse.forklift().position(), start);

    input.key_down("ArrowUp");
    warehouse.frame(DT, &input);
    assert_ne!(warehouse.forklift().position(), start);
}
