use bevy::prelude::*;

use crate::config::WIREFRAMES;
use crate::physics::world::SimWorld;

/// Run condition for the wireframe overlay.
pub fn wireframes_enabled() -> bool {
    WIREFRAMES
}

/// Outline every collider's AABB with gizmos. Debug aid for when the
/// sprites and the simulated outlines drift apart; off by default.
pub fn draw_collider_wireframes(mut gizmos: Gizmos, world: Res<SimWorld>) {
    for (_, collider) in world.colliders.iter() {
        let aabb = collider.compute_aabb();
        let center = Vec2::new(
            (aabb.mins.x + aabb.maxs.x) / 2.0,
            (aabb.mins.y + aabb.maxs.y) / 2.0,
        );
        let size = Vec2::new(aabb.maxs.x - aabb.mins.x, aabb.maxs.y - aabb.mins.y);
        gizmos.rect_2d(center, size, Color::srgba(1.0, 0.2, 0.2, 0.6));
    }
}
