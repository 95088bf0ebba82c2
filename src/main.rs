use bevy::prelude::*;
use bevy::window::WindowPlugin;

mod config;
mod display;
mod physics;

use config::PHYSICS_HZ;
use physics::PhysicsPlugin;

fn main() {
    App::new()
        // Transparent surface; the page (or desktop) shows through
        .insert_resource(ClearColor(Color::NONE))
        // Configure the fixed timestep clock (used in FixedUpdate)
        .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
        // Bevy's core engine features
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "shapefall".into(),
                transparent: true,
                // On the web: size the canvas from its parent element and
                // leave scrolling/zooming to the page
                fit_canvas_to_parent: true,
                prevent_default_event_handling: false,
                ..default()
            }),
            ..default()
        }))
        // Boundaries, shapes, drag constraint, resize + activation wiring
        .add_plugins(PhysicsPlugin)
        .run();
}
