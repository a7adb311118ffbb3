use std::path::PathBuf;

use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use rendering::camera::CameraPlugin;
use roads::config::{RoadConfig, DEFAULT_BLEND_WEIGHT};
use roads::junction_builder::KnotRef;
use roads::spline::{Axis, Spline, SplineContainer};
use roads::{RoadCommand, RoadCommandEvent, SplineRoad};
use save::{LoadRoadEvent, RoadSavePlugin, SaveRoadEvent};

const CONFIG_ENV: &str = "SPLINE_ROADS_CONFIG";
const SAVE_ENV: &str = "SPLINE_ROADS_SAVE";
const DEFAULT_SAVE_PATH: &str = "spline_road.srds";
const BLEND_WEIGHT_STEP: f32 = 0.1;

/// Marks the road the keyboard controls act on.
#[derive(Component)]
struct DemoRoad;

#[derive(Resource)]
struct DemoSettings {
    config: RoadConfig,
    save_path: PathBuf,
}

fn main() {
    let settings = DemoSettings {
        config: load_config(std::env::var(CONFIG_ENV).ok()),
        save_path: std::env::var(SAVE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SAVE_PATH)),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Spline Roads".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
            unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
        })
        .insert_resource(settings)
        .add_plugins((
            roads::RoadsPlugin,
            rendering::RenderingPlugin,
            CameraPlugin,
            RoadSavePlugin,
        ))
        .add_systems(Startup, (setup_scene, spawn_demo_road))
        .add_systems(Update, keyboard_controls)
        .run();
}

/// Read a `RoadConfig` from the JSON file at `path`, falling back to the
/// defaults when there is no path or the file cannot be used.
fn load_config(path: Option<String>) -> RoadConfig {
    let Some(path) = path else {
        return RoadConfig::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| RoadConfig::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => {
            info!("Loaded road config from {path}");
            config
        }
        Err(e) => {
            warn!("Ignoring road config {path}: {e}");
            RoadConfig::default()
        }
    }
}

/// Four arms that curve away from a crossing at the origin. Arms 0 and 3 end
/// at the crossing, arms 1 and 2 start there.
fn demo_splines() -> Vec<Spline> {
    vec![
        Spline::through_points(&[
            Vec3::new(-60.0, 0.0, -20.0),
            Vec3::new(-35.0, 0.0, -5.0),
            Vec3::new(-8.0, 0.0, 0.0),
        ]),
        Spline::through_points(&[
            Vec3::new(8.0, 0.0, 0.0),
            Vec3::new(35.0, 0.0, 5.0),
            Vec3::new(60.0, 0.0, 25.0),
        ]),
        Spline::through_points(&[
            Vec3::new(0.0, 0.0, 8.0),
            Vec3::new(-5.0, 0.0, 35.0),
            Vec3::new(-20.0, 0.0, 60.0),
        ]),
        Spline::through_points(&[
            Vec3::new(15.0, 0.0, -60.0),
            Vec3::new(5.0, 0.0, -35.0),
            Vec3::new(0.0, 0.0, -8.0),
        ]),
    ]
}

fn center_junction() -> RoadCommand {
    RoadCommand::BuildJunction {
        selection: vec![
            KnotRef::new(0, 2),
            KnotRef::new(1, 0),
            KnotRef::new(2, 0),
            KnotRef::new(3, 2),
        ],
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(200.0, 200.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.5, 0.3),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.05, 0.0),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 80.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_demo_road(
    mut commands: Commands,
    settings: Res<DemoSettings>,
    mut road_commands: EventWriter<RoadCommandEvent>,
) {
    commands.insert_resource(SplineContainer::new(demo_splines()));
    let road = commands
        .spawn((DemoRoad, SplineRoad::new(settings.config)))
        .id();
    road_commands.send(RoadCommandEvent::new(road, center_junction()));
}

fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<DemoSettings>,
    roads: Query<(Entity, &SplineRoad), With<DemoRoad>>,
    mut road_commands: EventWriter<RoadCommandEvent>,
    mut saves: EventWriter<SaveRoadEvent>,
    mut loads: EventWriter<LoadRoadEvent>,
) {
    let Ok((entity, road)) = roads.get_single() else {
        return;
    };
    let mut send = |command| road_commands.send(RoadCommandEvent::new(entity, command));

    if keys.just_pressed(KeyCode::F5) {
        saves.send(SaveRoadEvent {
            road: entity,
            path: settings.save_path.clone(),
            compress: true,
        });
    }
    if keys.just_pressed(KeyCode::F9) {
        loads.send(LoadRoadEvent {
            road: entity,
            path: settings.save_path.clone(),
        });
    }
    if keys.just_pressed(KeyCode::KeyC) {
        send(RoadCommand::ClearIntersections);
    }
    if keys.just_pressed(KeyCode::KeyJ) {
        send(center_junction());
    }

    let weight_delta = if keys.just_pressed(KeyCode::BracketRight) {
        BLEND_WEIGHT_STEP
    } else if keys.just_pressed(KeyCode::BracketLeft) {
        -BLEND_WEIGHT_STEP
    } else {
        0.0
    };
    if weight_delta != 0.0 {
        if let Some(intersection) = road.intersections().iter().next() {
            let current = intersection
                .blend_weights
                .first()
                .copied()
                .unwrap_or(DEFAULT_BLEND_WEIGHT);
            send(RoadCommand::SetBlendWeight {
                intersection: intersection.id(),
                gap: 0,
                weight: current + weight_delta,
            });
        }
    }

    for (key, axis) in [
        (KeyCode::KeyX, Axis::X),
        (KeyCode::KeyY, Axis::Y),
        (KeyCode::KeyZ, Axis::Z),
    ] {
        if keys.just_pressed(key) {
            send(RoadCommand::AlignKnots(axis));
        }
    }
}
