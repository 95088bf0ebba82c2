use bevy::prelude::Vec2;

use crate::config::{BOUNDARY_HEIGHT_FACTOR, BOUNDARY_THICKNESS, BOUNDARY_WIDTH_FACTOR};
use crate::physics::world::SimWorld;

/// An axis-aligned boundary rectangle, in container coordinates
/// (origin at the top-left corner, +Y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Container coordinates (top-left origin, +Y down) to Bevy 2D world
/// coordinates (window-center origin, +Y up).
pub fn container_to_world(p: Vec2, container: Vec2) -> Vec2 {
    Vec2::new(p.x - container.x / 2.0, container.y / 2.0 - p.y)
}

/// The four static boundary rectangles (ceiling, floor, left wall, right
/// wall) enclosing a container of the given size. Each inner face sits
/// flush with the container edge; the ceiling/floor are ×100 wider and the
/// walls ×5 taller than the container, so bodies cannot slip past a corner.
pub fn boundary_rects(container: Vec2) -> [BoundaryRect; 4] {
    let t = BOUNDARY_THICKNESS;
    let w = container.x;
    let h = container.y;
    let horizontal = Vec2::new(w * BOUNDARY_WIDTH_FACTOR / 2.0, t / 2.0);
    let vertical = Vec2::new(t / 2.0, h * BOUNDARY_HEIGHT_FACTOR / 2.0);
    [
        // ceiling
        BoundaryRect {
            center: Vec2::new(w / 2.0, -t / 2.0),
            half_extents: horizontal,
        },
        // floor
        BoundaryRect {
            center: Vec2::new(w / 2.0, h + t / 2.0),
            half_extents: horizontal,
        },
        // left wall
        BoundaryRect {
            center: Vec2::new(-t / 2.0, h / 2.0),
            half_extents: vertical,
        },
        // right wall
        BoundaryRect {
            center: Vec2::new(w + t / 2.0, h / 2.0),
            half_extents: vertical,
        },
    ]
}

/// Insert the four boundary bodies into the world.
pub fn create_boundaries(world: &mut SimWorld, container: Vec2) {
    for rect in boundary_rects(container) {
        world.insert_static_rect(container_to_world(rect.center, container), rect.half_extents);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BOUNDARY_THICKNESS;

    #[test]
    fn boundaries_enclose_the_container_with_margin() {
        let t = BOUNDARY_THICKNESS;
        for (w, h) in [(1280.0_f32, 720.0_f32), (300.0, 900.0), (1.0, 1.0)] {
            let [ceiling, floor, left, right] = boundary_rects(Vec2::new(w, h));

            // inner faces flush with the container edges
            assert_eq!(ceiling.center.y + ceiling.half_extents.y, 0.0);
            assert_eq!(floor.center.y - floor.half_extents.y, h);
            assert_eq!(left.center.x + left.half_extents.x, 0.0);
            assert_eq!(right.center.x - right.half_extents.x, w);

            // ceiling/floor overhang the corners by at least t/2
            for r in [ceiling, floor] {
                assert!(r.center.x - r.half_extents.x <= -t / 2.0);
                assert!(r.center.x + r.half_extents.x >= w + t / 2.0);
            }
            // walls overhang the corners by at least t/2
            for r in [left, right] {
                assert!(r.center.y - r.half_extents.y <= -t / 2.0);
                assert!(r.center.y + r.half_extents.y >= h + t / 2.0);
            }
        }
    }

    #[test]
    fn zero_size_container_is_degenerate_but_well_defined() {
        let [ceiling, _, left, _] = boundary_rects(Vec2::ZERO);
        assert_eq!(ceiling.half_extents.x, 0.0);
        assert_eq!(left.half_extents.y, 0.0);
    }

    #[test]
    fn create_boundaries_inserts_four_static_bodies() {
        let mut world = SimWorld::new();
        create_boundaries(&mut world, Vec2::new(800.0, 600.0));
        assert_eq!(world.body_count(), 4);
        assert!(world.bodies.iter().all(|(_, b)| b.is_fixed()));
    }

    #[test]
    fn container_to_world_flips_y_about_the_center() {
        let container = Vec2::new(800.0, 600.0);
        assert_eq!(
            container_to_world(Vec2::ZERO, container),
            Vec2::new(-400.0, 300.0)
        );
        assert_eq!(container_to_world(container / 2.0, container), Vec2::ZERO);
        assert_eq!(
            container_to_world(Vec2::new(800.0, 600.0), container),
            Vec2::new(400.0, -300.0)
        );
    }
}
