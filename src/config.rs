use bevy::prelude::*;

/// Physics timing
pub const PHYSICS_HZ: f64 = 60.0;

/// Gravity (world units per second squared; +Y up)
pub const GRAVITY: Vec2 = Vec2::new(0.0, -980.0);

/// Width of the canvas the decorative shapes were authored against.
pub const DESIGN_CANVAS_WIDTH: f32 = 1500.0;

/// Boundary box configuration. The walls are made absurdly long so a body
/// can never slip past a corner even if the surface resolution changes.
pub const BOUNDARY_THICKNESS: f32 = 60.0;
pub const BOUNDARY_WIDTH_FACTOR: f32 = 100.0;
pub const BOUNDARY_HEIGHT_FACTOR: f32 = 5.0;

/// Initial grid layout for the spawned shapes
pub const GRID_ROWS: usize = 2;
pub const GRID_COLS: usize = 3;
pub const GRID_OFFSET: f32 = 100.0;
/// Horizontal / vertical spacing as fractions of a shape's source width
pub const SPACING_X_FACTOR: f32 = 0.5;
pub const SPACING_Y_FACTOR: f32 = 0.2;

/// Per-shape scale factor is clamped to this closed range
pub const SCALE_MIN: f32 = 0.5;
pub const SCALE_MAX: f32 = 1.0;

/// Shape material parameters
pub const FRICTION: f32 = 0.1;
pub const AIR_FRICTION: f32 = 0.00001;
pub const RESTITUTION: f32 = 0.8;

/// Fraction of the anchor-to-pointer displacement corrected per tick
/// while a body is grabbed
pub const DRAG_STIFFNESS: f32 = 0.2;
/// Damping ratio applied to the grabbed body's velocity at the anchor
pub const DRAG_DAMPING: f32 = 0.3;

/// How many line segments each curve segment is sampled into
pub const CURVE_SAMPLES: usize = 8;

/// The simulation starts once this fraction of the window is visible
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// Shape manifest location (relative to the working directory)
pub const SHAPES_MANIFEST: &str = "assets/shapes.json";

/// Draw collider outlines with gizmos instead of relying on the sprites
pub const WIREFRAMES: bool = false;
