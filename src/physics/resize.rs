use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use tracing::info;

use crate::display::{is_mobile_device, pixel_ratio};
use crate::physics::boundaries::create_boundaries;
use crate::physics::drag::{DragConstraint, ScrollPassthrough};
use crate::physics::shapes::{
    ShapeBody, ShapeManifest, SpawnedShape, populate_shapes, spawn_shape_sprites,
};
use crate::physics::world::SimWorld;

/// Clear and repopulate the world from the current container dimensions:
/// boundaries first, then the shape set. One logical operation; nothing
/// else mutates the world between the clear and the repopulation.
pub fn rebuild_world(
    world: &mut SimWorld,
    container: Vec2,
    manifest: &ShapeManifest,
) -> Vec<SpawnedShape> {
    world.clear();
    create_boundaries(world, container);
    populate_shapes(world, container, manifest)
}

/// Full layout reconciliation on window resize. Desktop only: mobile
/// layouts never reconcile after load.
pub fn handle_resize(
    mut events: MessageReader<WindowResized>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifest: Res<ShapeManifest>,
    mut world: ResMut<SimWorld>,
    mut drag: ResMut<DragConstraint>,
    shapes: Query<Entity, With<ShapeBody>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    if is_mobile_device() {
        return;
    }
    let container = Vec2::new(event.width, event.height);

    for entity in &shapes {
        commands.entity(entity).despawn();
    }
    let spawned = rebuild_world(&mut world, container, &manifest);
    spawn_shape_sprites(&mut commands, &asset_server, spawned);

    // the constraint object survives; only its registration is refreshed
    drag.reattach();

    if let Ok(mut window) = windows.single_mut() {
        window
            .resolution
            .set_scale_factor_override(Some(pixel_ratio()));
        ScrollPassthrough::rebind(&mut window);
    }
    info!(
        "world rebuilt for {:.0}x{:.0} ({} bodies)",
        container.x,
        container.y,
        world.body_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::shapes::ShapeEntry;

    fn manifest() -> ShapeManifest {
        ShapeManifest {
            shapes: vec![
                ShapeEntry {
                    sprite: "textures/blob.png".into(),
                    path: "M 0 0 L 100 0 L 100 100 L 0 100 Z".into(),
                    width: 400.0,
                },
                ShapeEntry {
                    sprite: "textures/star.png".into(),
                    path: "M 50 0 L 100 100 L 0 100 Z".into(),
                    width: 400.0,
                },
            ],
        }
    }

    #[test]
    fn rebuild_twice_yields_the_same_world() {
        let container = Vec2::new(1024.0, 768.0);
        let manifest = manifest();
        let mut world = SimWorld::new();

        let first = rebuild_world(&mut world, container, &manifest);
        let first_count = world.body_count();
        let first_positions: Vec<Vec2> = first.iter().map(|s| s.position).collect();

        let second = rebuild_world(&mut world, container, &manifest);
        let second_positions: Vec<Vec2> = second.iter().map(|s| s.position).collect();

        // 4 boundaries + 2 shapes, both times, at identical positions
        assert_eq!(first_count, 6);
        assert_eq!(world.body_count(), first_count);
        assert_eq!(first_positions, second_positions);
    }

    #[test]
    fn rebuild_tracks_new_dimensions() {
        let manifest = manifest();
        let mut world = SimWorld::new();

        let wide = rebuild_world(&mut world, Vec2::new(1600.0, 900.0), &manifest);
        let narrow = rebuild_world(&mut world, Vec2::new(640.0, 900.0), &manifest);

        // same shape count, different placement and scale
        assert_eq!(wide.len(), narrow.len());
        assert_ne!(wide[0].position, narrow[0].position);
        assert!(narrow[0].scale < wide[0].scale);
    }
}
