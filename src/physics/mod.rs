use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub mod activation;
pub mod boundaries;
pub mod debug;
pub mod drag;
pub mod resize;
pub mod shapes;
pub mod world;

use crate::config::SHAPES_MANIFEST;
use crate::display::pixel_ratio;
use activation::{ActivationGate, observe_visibility, simulation_active};
use drag::{
    CursorWorld, DragConstraint, ScrollPassthrough, apply_drag, mouse_input, touch_input,
    update_cursor_world,
};
use resize::{handle_resize, rebuild_world};
use shapes::{ShapeManifest, spawn_shape_sprites, sync_transforms};
use world::SimWorld;

/// Plug this into your App with `.add_plugins(PhysicsPlugin)`.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app
            // The simulated world plus the shared pointer/drag state
            .init_resource::<SimWorld>()
            .init_resource::<CursorWorld>()
            .init_resource::<DragConstraint>()
            .init_resource::<ShapeManifest>()
            .init_resource::<ActivationGate>()
            // Populate the world before the gate can possibly fire
            .add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (
                    // pointer tracking feeds grabbing, so keep the order
                    (update_cursor_world, touch_input, mouse_input).chain(),
                    handle_resize,
                    observe_visibility,
                    exit_on_esc_or_q_if_native,
                    debug::draw_collider_wireframes.run_if(debug::wireframes_enabled),
                ),
            )
            // Drag pull, then the engine step, then write-back to sprites;
            // all of it held back until the window first becomes visible
            .add_systems(
                FixedUpdate,
                (apply_drag, world::step_world, sync_transforms)
                    .chain()
                    .run_if(simulation_active),
            );
    }
}

/// Build the initial scene: camera, pixel ratio, input policy, boundaries
/// and the decorative shape set.
fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut sim: ResMut<SimWorld>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    commands.spawn(Camera2d);

    let manifest = shapes::load_manifest(SHAPES_MANIFEST);

    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    window
        .resolution
        .set_scale_factor_override(Some(pixel_ratio()));
    ScrollPassthrough::rebind(&mut window);

    let container = Vec2::new(window.width(), window.height());
    let spawned = rebuild_world(&mut sim, container, &manifest);
    spawn_shape_sprites(&mut commands, &asset_server, spawned);
    commands.insert_resource(manifest);
}

/// Native-only quit: press Esc or Q to exit the app.
/// (No-op on wasm32.)
fn exit_on_esc_or_q_if_native(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if cfg!(not(target_arch = "wasm32")) {
        if keys.any_just_pressed([KeyCode::Escape, KeyCode::KeyQ]) {
            exit.write(AppExit::Success);
        }
    }
}
