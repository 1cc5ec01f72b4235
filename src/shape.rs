use serde::Serialize;

// ── Geometry ────────────────────────────────────────────────────────────────

/// Integer point or extent in image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: Vec2) -> Vec2 {
        Vec2::new(self.x.wrapping_add(delta.x), self.y.wrapping_add(delta.y))
    }

    pub fn delta_to(self, other: Vec2) -> Vec2 {
        Vec2::new(other.x.wrapping_sub(self.x), other.y.wrapping_sub(self.y))
    }

    pub fn manhattan_distance(self, other: Vec2) -> i64 {
        (other.x as i64 - self.x as i64).abs() + (other.y as i64 - self.y as i64).abs()
    }
}

impl From<(i32, i32)> for Vec2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

// ── Color ───────────────────────────────────────────────────────────────────

/// RGB color. Channels are nominally 0..=255 but are stored unchecked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn rgb(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }
}

// ── Shapes ──────────────────────────────────────────────────────────────────

/// Kind of a drawable shape.
///
/// The discriminants are written to disk as the record's first byte, so the
/// order of the variants is part of the file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    Circle = 0,
    Rectangle = 1,
    /// Present in the format but never drawn by the editor.
    Line = 2,
    Polygon = 3,
}

impl ShapeKind {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(ShapeKind::Circle),
            1 => Some(ShapeKind::Rectangle),
            2 => Some(ShapeKind::Line),
            3 => Some(ShapeKind::Polygon),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Line => "line",
            ShapeKind::Polygon => "polygon",
        }
    }
}

/// One persisted annotation.
///
/// `size` only means something for circles and rectangles. `vertices` is the
/// boundary of a polygon in drawing order; for every other kind the editor
/// keeps a single move handle there, which is never written to disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub vertices: Vec<Vec2>,
}

impl Shape {
    pub fn new(kind: ShapeKind, position: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            kind,
            position,
            size,
            color,
            vertices: Vec::new(),
        }
    }

    pub fn circle(position: Vec2, size: Vec2, color: Color) -> Self {
        Self::new(ShapeKind::Circle, position, size, color)
    }

    pub fn rectangle(position: Vec2, size: Vec2, color: Color) -> Self {
        Self::new(ShapeKind::Rectangle, position, size, color)
    }

    /// A polygon anchored at its first vertex. An empty vertex list anchors
    /// at the origin.
    pub fn polygon(vertices: Vec<Vec2>, color: Color) -> Self {
        let position = vertices.first().copied().unwrap_or_default();
        Self {
            kind: ShapeKind::Polygon,
            position,
            size: Vec2::ZERO,
            color,
            vertices,
        }
    }

    pub fn is_polygon(&self) -> bool {
        self.kind == ShapeKind::Polygon
    }

    /// Number of vertices that belong in the file.
    pub fn wire_vertex_count(&self) -> usize {
        if self.is_polygon() {
            self.vertices.len()
        } else {
            0
        }
    }

    /// Center point used as the drag handle of a non-polygon shape.
    pub fn handle_point(&self) -> Vec2 {
        self.position.offset(Vec2::new(self.size.x / 2, self.size.y / 2))
    }

    /// Rebuilds editor-side state after a load: non-polygon shapes get their
    /// move handle back. Polygons are left untouched.
    pub fn restore_move_handle(&mut self) {
        if !self.is_polygon() {
            let handle = self.handle_point();
            self.vertices.push(handle);
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position = self.position.offset(delta);
        for v in &mut self.vertices {
            *v = v.offset(delta);
        }
    }
}
