//! Axis-aligned boxes and grid points shared by the simulations.

use rand::Rng;

/// Integer point, used for grid-aligned entities (snake segments, food).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn is_zero(self) -> bool {
        self == Point::ZERO
    }
}

/// Axis-aligned bounding box in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// A random grid-aligned position inside `[0, max_x) × [0, max_y)`.
pub fn random_grid_position<R: Rng + ?Sized>(rng: &mut R, max_x: i32, max_y: i32, grid: i32) -> Point {
    let cols = (max_x / grid).max(1);
    let rows = (max_y / grid).max(1);
    Point::new(rng.gen_range(0..cols) * grid, rng.gen_range(0..rows) * grid)
}
