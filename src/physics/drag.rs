use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rapier2d::prelude::*;
// Both bevy and rapier preludes export `Real`; pin it to rapier's (f32) so
// nalgebra's Point/vector machinery resolves.
use rapier2d::prelude::Real;

use crate::config::{DRAG_DAMPING, DRAG_STIFFNESS};
use crate::physics::world::SimWorld;

/// Pointer position in world coordinates (2D camera).
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CursorWorld(pub Vec2);

/// The single pointer-to-body drag constraint. Created once; survives
/// world rebuilds (only its grab state is refreshed). Never rendered.
#[derive(Resource)]
pub struct DragConstraint {
    pub stiffness: f32,
    pub damping: f32,
    grabbed: Option<Grab>,
    stale_force: Option<RigidBodyHandle>,
}

struct Grab {
    handle: RigidBodyHandle,
    local_anchor: Point<Real>,
}

impl Default for DragConstraint {
    fn default() -> Self {
        Self {
            stiffness: DRAG_STIFFNESS,
            damping: DRAG_DAMPING,
            grabbed: None,
            stale_force: None,
        }
    }
}

impl DragConstraint {
    pub fn is_grabbing(&self) -> bool {
        self.grabbed.is_some()
    }

    /// Try to grab the dynamic body under `point`, remembering the
    /// body-local anchor so the pull stays attached to the grabbed spot.
    pub fn grab_at(&mut self, world: &SimWorld, point: Vec2) {
        let Some(handle) = world.dynamic_body_at_point(point) else {
            return;
        };
        let body = &world.bodies[handle];
        let local_anchor = body
            .position()
            .inverse_transform_point(&point![point.x, point.y]);
        self.grabbed = Some(Grab {
            handle,
            local_anchor,
        });
    }

    /// Let go. The released body's applied force is cleared on the next
    /// [`DragConstraint::apply`] so it does not keep accelerating.
    pub fn release(&mut self) {
        if let Some(grab) = self.grabbed.take() {
            self.stale_force = Some(grab.handle);
        }
    }

    /// Refresh the constraint's world registration after a rebuild. The
    /// struct itself is not recreated; any in-flight grab is dropped since
    /// its handle points into the cleared world.
    pub fn reattach(&mut self) {
        self.grabbed = None;
        self.stale_force = None;
    }

    /// Pull the grabbed anchor toward `target`: correct `stiffness` of the
    /// displacement per tick, damped by the anchor velocity.
    pub fn apply(&mut self, world: &mut SimWorld, target: Vec2, dt: f32) {
        if let Some(handle) = self.stale_force.take() {
            if let Some(body) = world.bodies.get_mut(handle) {
                body.reset_forces(true);
            }
        }
        let Some(grab) = &self.grabbed else {
            return;
        };
        let Some(body) = world.bodies.get_mut(grab.handle) else {
            self.grabbed = None;
            return;
        };
        if dt <= 0.0 {
            return;
        }
        let anchor = body.position() * grab.local_anchor;
        let delta = vector![target.x - anchor.x, target.y - anchor.y];
        let vel = body.velocity_at_point(&anchor);
        let mass = body.mass();
        let force = delta * (self.stiffness * mass / (dt * dt)) - vel * (self.damping * mass / dt);
        body.reset_forces(true);
        body.add_force_at_point(force, anchor, true);
    }
}

/// Input policy: the render surface must never hijack page scrolling or
/// swiping. Touch presses always forward (they may begin a grab); touch
/// moves and releases forward only while a body is held.
pub struct ScrollPassthrough;

impl ScrollPassthrough {
    /// Re-assert the policy on the window. Re-applying is a no-op, so this
    /// is safe to call after every operation that touches the surface.
    pub fn rebind(window: &mut Window) {
        window.prevent_default_event_handling = false;
    }
}

/// Whether a touch transition reaches the drag constraint.
pub fn forwards_touch(started: bool, grabbing: bool) -> bool {
    started || grabbing
}

/// Update the cursor's world position each frame (2D camera).
pub fn update_cursor_world(
    windows: Query<&Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut cursor: ResMut<CursorWorld>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(screen_pos) = window.cursor_position() {
        if let Ok((camera, cam_xform)) = q_cam.single() {
            if let Ok(world_pos) = camera.viewport_to_world_2d(cam_xform, screen_pos) {
                cursor.0 = world_pos;
            }
        }
    }
}

/// Mouse: press grabs whatever is under the cursor, release lets go.
pub fn mouse_input(
    buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorWorld>,
    world: Res<SimWorld>,
    mut drag: ResMut<DragConstraint>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        drag.grab_at(&world, cursor.0);
    }
    if buttons.just_released(MouseButton::Left) {
        drag.release();
    }
}

/// Touch: conditional re-dispatch per the scroll-passthrough policy.
pub fn touch_input(
    touches: Res<Touches>,
    q_cam: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut cursor: ResMut<CursorWorld>,
    world: Res<SimWorld>,
    mut drag: ResMut<DragConstraint>,
) {
    let Ok((camera, cam_xform)) = q_cam.single() else {
        return;
    };

    for touch in touches.iter_just_pressed() {
        if let Ok(world_pos) = camera.viewport_to_world_2d(cam_xform, touch.position()) {
            cursor.0 = world_pos;
            drag.grab_at(&world, world_pos);
        }
    }
    for touch in touches.iter() {
        if !forwards_touch(false, drag.is_grabbing()) {
            continue;
        }
        if let Ok(world_pos) = camera.viewport_to_world_2d(cam_xform, touch.position()) {
            cursor.0 = world_pos;
        }
    }
    let ended = touches.iter_just_released().next().is_some()
        || touches.iter_just_canceled().next().is_some();
    if ended && forwards_touch(false, drag.is_grabbing()) {
        drag.release();
    }
}

/// Apply the drag pull once per fixed tick, before the world steps.
pub fn apply_drag(
    time: Res<Time>,
    cursor: Res<CursorWorld>,
    mut drag: ResMut<DragConstraint>,
    mut world: ResMut<SimWorld>,
) {
    let target = cursor.0;
    let dt = time.delta_secs();
    drag.apply(&mut world, target, dt);
}
