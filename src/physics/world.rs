use bevy::prelude::{Res, ResMut, Resource, Time, Vec2};
use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;

use crate::config::{AIR_FRICTION, FRICTION, GRAVITY, PHYSICS_HZ, RESTITUTION};

/// The simulated world: every rapier set plus the stepping pipeline, owned
/// as one context struct and passed by reference to whoever mutates it.
///
/// Rebuilt wholesale on resize via [`SimWorld::clear`]; gravity and the
/// integration parameters survive the clear.
#[derive(Resource)]
pub struct SimWorld {
    pipeline: PhysicsPipeline,
    pub gravity: Vector<Real>,
    pub params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    pub fn new() -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = (1.0 / PHYSICS_HZ) as Real;
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![GRAVITY.x, GRAVITY.y],
            params,
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.params.dt = dt as Real;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Drop every body, collider and joint. Gravity and the integration
    /// parameters are kept, so a subsequent repopulation steps identically.
    pub fn clear(&mut self) {
        self.islands = IslandManager::new();
        self.broad_phase = BroadPhaseBvh::new();
        self.narrow_phase = NarrowPhase::new();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ccd_solver = CCDSolver::new();
    }

    /// Insert a static rectangle (no render attachment) centered at
    /// `center`, in world coordinates.
    pub fn insert_static_rect(&mut self, center: Vec2, half_extents: Vec2) -> RigidBodyHandle {
        let body = self.bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![center.x, center.y])
                .build(),
        );
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y).build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        body
    }

    /// Insert a dynamic body whose collider is built from a closed polygon
    /// outline expressed relative to the body origin. Returns `None` when
    /// the outline has no usable geometry.
    pub fn insert_outline_body(&mut self, position: Vec2, outline: &[Vec2]) -> Option<RigidBodyHandle> {
        let shape = outline_shape(outline)?;
        let body = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![position.x, position.y])
                .linear_damping(AIR_FRICTION)
                .build(),
        );
        let collider = ColliderBuilder::new(shape)
            .friction(FRICTION)
            .restitution(RESTITUTION)
            .build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        Some(body)
    }

    /// The first dynamic body whose collider contains `point` (world
    /// coordinates). Static boundaries are never grabbable.
    pub fn dynamic_body_at_point(&self, point: Vec2) -> Option<RigidBodyHandle> {
        let p = point![point.x, point.y];
        for (_, collider) in self.colliders.iter() {
            let Some(parent) = collider.parent() else {
                continue;
            };
            let Some(body) = self.bodies.get(parent) else {
                continue;
            };
            if !body.is_dynamic() {
                continue;
            }
            if collider.shape().contains_point(collider.position(), &p) {
                return Some(parent);
            }
        }
        None
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// Collider shape for a closed outline: concave outlines become a compound
/// of convex parts; near-degenerate ones fall back to the convex hull.
fn outline_shape(outline: &[Vec2]) -> Option<SharedShape> {
    if outline.len() < 3 {
        return None;
    }
    let vertices: Vec<Point<Real>> = outline.iter().map(|v| point![v.x, v.y]).collect();
    if polygon_area(outline).abs() < 1.0e-3 {
        return SharedShape::convex_hull(&vertices);
    }
    let n = vertices.len() as u32;
    let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
    Some(SharedShape::convex_decomposition(&vertices, &indices))
}

/// Advance the engine by one fixed tick.
pub fn step_world(time: Res<Time>, mut world: ResMut<SimWorld>) {
    let dt = time.delta_secs();
    world.step(dt);
}

/// Signed polygon area (shoelace).
pub fn polygon_area(pts: &[Vec2]) -> f32 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    for i in 0..n {
        let p = pts[i];
        let q = pts[(i + 1) % n];
        a += p.x * q.y - p.y * q.x;
    }
    0.5 * a
}
