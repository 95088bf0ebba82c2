use bevy::prelude::*;
use rapier2d::prelude::RigidBodyHandle;
use serde::Deserialize;
use svgtypes::{SimplePathSegment, SimplifyingPathParser};
use tracing::warn;

use crate::config::{
    CURVE_SAMPLES, DESIGN_CANVAS_WIDTH, GRID_COLS, GRID_OFFSET, GRID_ROWS, SCALE_MAX, SCALE_MIN,
    SPACING_X_FACTOR, SPACING_Y_FACTOR,
};
use crate::physics::boundaries::container_to_world;
use crate::physics::world::{SimWorld, polygon_area};

/// One decorative shape: SVG path data, the sprite drawn over the body,
/// and the width of the canvas the path was authored in.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeEntry {
    pub sprite: String,
    pub path: String,
    pub width: f32,
}

/// The decorative shape set, in document order (the order is the
/// positional index used for grid placement).
#[derive(Resource, Default, Deserialize)]
pub struct ShapeManifest {
    pub shapes: Vec<ShapeEntry>,
}

/// Load the manifest from disk; on the web it is baked into the binary.
/// A missing or malformed manifest degrades to an empty scene.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_manifest(path: &str) -> ShapeManifest {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("shape manifest {path} unreadable: {err}");
            return ShapeManifest::default();
        }
    };
    parse_manifest(&text)
}

#[cfg(target_arch = "wasm32")]
pub fn load_manifest(_path: &str) -> ShapeManifest {
    parse_manifest(include_str!("../../assets/shapes.json"))
}

fn parse_manifest(text: &str) -> ShapeManifest {
    match serde_json::from_str(text) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!("shape manifest malformed: {err}");
            ShapeManifest::default()
        }
    }
}

/// Marker tying a rendered sprite entity to its simulated body.
#[derive(Component)]
pub struct ShapeBody {
    pub handle: RigidBodyHandle,
}

/// A shape successfully inserted into the world, with everything the
/// render side needs to spawn its sprite.
pub struct SpawnedShape {
    pub handle: RigidBodyHandle,
    pub sprite: String,
    pub scale: f32,
    pub index: usize,
    pub position: Vec2,
}

/// Outline vertex sequence for an SVG path: line segments are taken as-is,
/// curves are sampled at fixed parameter steps. Malformed data yields an
/// empty sequence.
pub fn outline_vertices(d: &str) -> Vec<Vec2> {
    let mut points: Vec<Vec2> = Vec::new();
    let mut cursor = Vec2::ZERO;
    for segment in SimplifyingPathParser::from(d) {
        let segment = match segment {
            Ok(segment) => segment,
            Err(err) => {
                warn!("unusable path data: {err}");
                return Vec::new();
            }
        };
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                cursor = Vec2::new(x as f32, y as f32);
                points.push(cursor);
            }
            SimplePathSegment::LineTo { x, y } => {
                cursor = Vec2::new(x as f32, y as f32);
                points.push(cursor);
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let p0 = cursor;
                let p1 = Vec2::new(x1 as f32, y1 as f32);
                let p2 = Vec2::new(x as f32, y as f32);
                for i in 1..=CURVE_SAMPLES {
                    let t = i as f32 / CURVE_SAMPLES as f32;
                    points.push(quadratic_point(p0, p1, p2, t));
                }
                cursor = p2;
            }
            SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let p0 = cursor;
                let p1 = Vec2::new(x1 as f32, y1 as f32);
                let p2 = Vec2::new(x2 as f32, y2 as f32);
                let p3 = Vec2::new(x as f32, y as f32);
                for i in 1..=CURVE_SAMPLES {
                    let t = i as f32 / CURVE_SAMPLES as f32;
                    points.push(cubic_point(p0, p1, p2, p3, t));
                }
                cursor = p3;
            }
            SimplePathSegment::ClosePath => {}
        }
    }
    points
}

fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Base scale factor: the shape's declared width normalized against the
/// design canvas, then rescaled by the container-to-source ratio.
pub fn base_scale(container_width: f32, source_width: f32) -> f32 {
    let regular = source_width / DESIGN_CANVAS_WIDTH;
    (container_width * regular) / source_width
}

/// Clamp a scale factor to the allowed closed range.
pub fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(SCALE_MIN, SCALE_MAX)
}

/// Grid placement as a pure function of the positional index. Note the
/// row is derived from the row count and the column from the column count.
pub fn grid_position(index: usize, spacing: Vec2, offset: f32) -> Vec2 {
    let col = index % GRID_COLS;
    let row = index / GRID_ROWS;
    Vec2::new(
        col as f32 * spacing.x + offset,
        row as f32 * spacing.y + offset,
    )
}

/// Area-weighted polygon centroid; falls back to the vertex average when
/// the outline is (near) degenerate.
pub fn centroid(pts: &[Vec2]) -> Vec2 {
    let area = polygon_area(pts);
    if area.abs() < 1.0e-3 {
        let n = pts.len().max(1) as f32;
        return pts.iter().copied().sum::<Vec2>() / n;
    }
    let mut c = Vec2::ZERO;
    let n = pts.len();
    for i in 0..n {
        let p = pts[i];
        let q = pts[(i + 1) % n];
        let cross = p.x * q.y - p.y * q.x;
        c += (p + q) * cross;
    }
    c / (6.0 * area)
}

/// Build and insert one dynamic body per manifest entry. Returns the
/// spawned set so the caller can attach sprites; entries with unusable
/// geometry are skipped.
pub fn populate_shapes(
    world: &mut SimWorld,
    container: Vec2,
    manifest: &ShapeManifest,
) -> Vec<SpawnedShape> {
    let mut spawned = Vec::with_capacity(manifest.shapes.len());
    for (index, entry) in manifest.shapes.iter().enumerate() {
        let vertices = outline_vertices(&entry.path);
        if vertices.len() < 3 {
            warn!("shape {index} ({}) has no usable outline", entry.sprite);
            continue;
        }

        let factor = clamp_scale(base_scale(container.x, entry.width));
        let scaled: Vec<Vec2> = vertices.iter().map(|v| *v * factor).collect();
        let center = centroid(&scaled);
        let outline: Vec<Vec2> = scaled.iter().map(|v| *v - center).collect();

        let spacing = Vec2::new(
            entry.width * SPACING_X_FACTOR,
            entry.width * SPACING_Y_FACTOR,
        );
        let position = container_to_world(grid_position(index, spacing, GRID_OFFSET), container);

        let Some(handle) = world.insert_outline_body(position, &outline) else {
            warn!("shape {index} ({}) rejected by the world", entry.sprite);
            continue;
        };
        spawned.push(SpawnedShape {
            handle,
            sprite: entry.sprite.clone(),
            scale: factor,
            index,
            position,
        });
    }
    spawned
}

/// Spawn the textured render entities for a freshly populated world.
pub fn spawn_shape_sprites(
    commands: &mut Commands,
    asset_server: &AssetServer,
    spawned: Vec<SpawnedShape>,
) {
    for shape in spawned {
        commands.spawn((
            ShapeBody {
                handle: shape.handle,
            },
            Sprite {
                image: asset_server.load(shape.sprite.clone()),
                ..default()
            },
            // manifest order doubles as a stable draw order
            Transform::from_xyz(shape.position.x, shape.position.y, shape.index as f32)
                .with_scale(Vec3::splat(shape.scale)),
        ));
    }
}

/// Copy simulated positions/rotations back onto the sprites. Sprite scale
/// carries the per-shape factor and is left untouched.
pub fn sync_transforms(world: Res<SimWorld>, mut q: Query<(&ShapeBody, &mut Transform)>) {
    for (shape, mut tf) in &mut q {
        let Some(body) = world.bodies.get(shape.handle) else {
            continue;
        };
        let pos = body.translation();
        tf.translation.x = pos.x;
        tf.translation.y = pos.y;
        tf.rotation = Quat::from_rotation_z(body.rotation().angle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_PATH: &str = "M 0 0 L 120 0 L 120 120 L 0 120 Z";

    fn test_manifest() -> ShapeManifest {
        ShapeManifest {
            shapes: vec![
                ShapeEntry {
                    sprite: "textures/blob.png".into(),
                    path: SQUARE_PATH.into(),
                    width: 400.0,
                },
                ShapeEntry {
                    sprite: "textures/star.png".into(),
                    path: "M 60 0 L 75 45 L 120 45 L 84 72 L 98 120 L 60 92 L 22 120 L 36 72 L 0 45 L 45 45 Z".into(),
                    width: 400.0,
                },
            ],
        }
    }

    #[test]
    fn scale_clamp_stays_in_range() {
        for c in [-3.0, 0.0, 0.3, 0.5, 0.77, 1.0, 1.4, 100.0] {
            let clamped = clamp_scale(c);
            assert!((SCALE_MIN..=SCALE_MAX).contains(&clamped));
            if (SCALE_MIN..=SCALE_MAX).contains(&c) {
                assert_eq!(clamped, c);
            }
        }
    }

    #[test]
    fn base_scale_follows_the_container_ratio() {
        // the source width cancels out of the two-step form
        assert!((base_scale(1500.0, 400.0) - 1.0).abs() < 1.0e-6);
        assert!((base_scale(750.0, 400.0) - 0.5).abs() < 1.0e-6);
        assert!((base_scale(750.0, 1000.0) - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn grid_position_matches_the_layout() {
        let spacing = Vec2::new(200.0, 80.0);
        assert_eq!(grid_position(0, spacing, 100.0), Vec2::new(100.0, 100.0));
        assert_eq!(grid_position(1, spacing, 100.0), Vec2::new(300.0, 100.0));
        assert_eq!(grid_position(3, spacing, 100.0), Vec2::new(100.0, 180.0));
    }

    #[test]
    fn line_paths_keep_their_corners() {
        let verts = outline_vertices(SQUARE_PATH);
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[2], Vec2::new(120.0, 120.0));
    }

    #[test]
    fn curves_are_sampled_into_segments() {
        let verts = outline_vertices("M 0 0 C 0 50 100 50 100 0 Z");
        assert_eq!(verts.len(), 1 + CURVE_SAMPLES);
        // the last sample is the curve endpoint
        let last = verts.last().unwrap();
        assert!((last.x - 100.0).abs() < 1.0e-4);
        assert!(last.y.abs() < 1.0e-4);
    }

    #[test]
    fn malformed_paths_yield_nothing() {
        assert!(outline_vertices("not a path").is_empty());
    }

    #[test]
    fn centroid_recentering_lands_on_the_origin() {
        let verts = outline_vertices(SQUARE_PATH);
        let c = centroid(&verts);
        assert!((c - Vec2::new(60.0, 60.0)).length() < 1.0e-3);
        let recentered: Vec<Vec2> = verts.iter().map(|v| *v - c).collect();
        assert!(centroid(&recentered).length() < 1.0e-3);
    }

    #[test]
    fn populate_inserts_one_body_per_usable_entry() {
        let mut world = SimWorld::new();
        let spawned = populate_shapes(&mut world, Vec2::new(1280.0, 720.0), &test_manifest());
        assert_eq!(spawned.len(), 2);
        assert_eq!(world.body_count(), 2);
        assert_eq!(spawned[0].index, 0);
    }

    #[test]
    fn unusable_entries_are_skipped_silently() {
        let mut manifest = test_manifest();
        manifest.shapes[1].path = "garbage".into();
        let mut world = SimWorld::new();
        let spawned = populate_shapes(&mut world, Vec2::new(1280.0, 720.0), &manifest);
        assert_eq!(spawned.len(), 1);
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn populate_is_deterministic_across_rebuilds() {
        let container = Vec2::new(1280.0, 720.0);
        let manifest = test_manifest();
        let mut world = SimWorld::new();

        let first = populate_shapes(&mut world, container, &manifest);
        let first_positions: Vec<Vec2> = first.iter().map(|s| s.position).collect();
        let count = world.body_count();

        world.clear();
        let second = populate_shapes(&mut world, container, &manifest);
        let second_positions: Vec<Vec2> = second.iter().map(|s| s.position).collect();

        assert_eq!(world.body_count(), count);
        assert_eq!(first_positions, second_positions);
    }
}
