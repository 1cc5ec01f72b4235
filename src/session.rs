use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::project::{load_project, save_project, Project};
use crate::shape::{Color, Shape, ShapeKind, Vec2};

/// A click this close (Manhattan distance) to a polygon's anchor closes it.
pub const POLYGON_CLOSE_RADIUS: i64 = 40;

/// Circles and rectangles dragged no further than this are dropped on commit.
pub const MIN_DRAG_DISTANCE: i64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonStep {
    /// Vertex appended; holds the new vertex count.
    Added(usize),
    /// Polygon committed at this index of the shape list.
    Closed(usize),
    /// No polygon in progress.
    Ignored,
}

// ── Editing Session ─────────────────────────────────────────────────────────

/// The editor's view of one project: the committed shapes plus whatever is
/// being drawn right now.
///
/// Non-polygon shapes always carry one move-handle vertex here. It is
/// editor state only and is dropped when the project is encoded.
#[derive(Debug, Default)]
pub struct EditorSession {
    image_path: String,
    shapes: Vec<Shape>,
    current: Option<Shape>,
    selected: Option<usize>,
    color: Color,

    undo_stack: Vec<Vec<Shape>>,
    redo_stack: Vec<Vec<Shape>>,
}

impl EditorSession {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            ..Self::default()
        }
    }

    /// Installs a decoded project, giving every non-polygon its move handle.
    pub fn from_project(project: Project) -> Self {
        let Project {
            image_path,
            mut shapes,
        } = project;
        for shape in &mut shapes {
            shape.restore_move_handle();
        }
        Self {
            image_path,
            shapes,
            ..Self::default()
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let project = load_project(&bytes).inspect_err(|err| {
            warn!("refusing to open {}: {err}", path.display());
        })?;
        info!(
            "loaded {} shapes ({} bytes) from {}",
            project.shapes.len(),
            bytes.len(),
            path.display()
        );
        Ok(Self::from_project(project))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        info!("saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        save_project(&self.image_path, &self.shapes)
    }

    /// Snapshot of the committed shapes, move handles included.
    pub fn to_project(&self) -> Project {
        Project {
            image_path: self.image_path.clone(),
            shapes: self.shapes.clone(),
        }
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn set_image_path(&mut self, image_path: impl Into<String>) {
        self.image_path = image_path.into();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    pub fn current(&self) -> Option<&Shape> {
        self.current.as_ref()
    }

    /// Starts a new shape at `at`, dropping any unfinished one.
    pub fn begin_shape(&mut self, kind: ShapeKind, at: Vec2) {
        if self.current.is_some() {
            debug!("discarding unfinished shape");
        }
        let mut shape = Shape::new(kind, at, Vec2::ZERO, self.color);
        if kind != ShapeKind::Polygon {
            shape.vertices.push(at);
        }
        self.current = Some(shape);
    }

    /// Stretches an unfinished circle or rectangle so that `point` sits on
    /// its edge.
    pub fn drag_to(&mut self, point: Vec2) {
        let Some(shape) = self.current.as_mut() else {
            return;
        };
        if shape.is_polygon() {
            return;
        }
        let diff = shape.position.delta_to(point);
        shape.size = Vec2::new(diff.x.wrapping_mul(2), diff.y.wrapping_mul(2));
        match shape.vertices.first_mut() {
            Some(handle) => *handle = point,
            None => shape.vertices.push(point),
        }
    }

    pub fn place_vertex(&mut self, point: Vec2) -> PolygonStep {
        let closes = match self.current.as_ref() {
            Some(shape) if shape.is_polygon() => {
                !shape.vertices.is_empty()
                    && shape.position.manhattan_distance(point) <= POLYGON_CLOSE_RADIUS
            }
            _ => return PolygonStep::Ignored,
        };
        if closes {
            return match self.commit_shape() {
                Some(index) => PolygonStep::Closed(index),
                None => PolygonStep::Ignored,
            };
        }

        let Some(shape) = self.current.as_mut() else {
            return PolygonStep::Ignored;
        };
        if shape.vertices.is_empty() {
            shape.position = point;
        }
        shape.vertices.push(point);
        PolygonStep::Added(shape.vertices.len())
    }

    /// Moves the unfinished shape into the shape list. A circle or rectangle
    /// whose handle never left its start point is thrown away instead.
    pub fn commit_shape(&mut self) -> Option<usize> {
        let shape = self.current.take()?;
        if !shape.is_polygon() {
            let handle = shape.vertices.first().copied().unwrap_or(shape.position);
            if shape.position.manhattan_distance(handle) <= MIN_DRAG_DISTANCE {
                debug!("dropping {} that was not dragged", shape.kind.name());
                return None;
            }
        }
        debug!("committing {}", shape.kind.name());
        self.push_undo();
        self.shapes.push(shape);
        Some(self.shapes.len() - 1)
    }

    pub fn discard_shape(&mut self) -> Option<Shape> {
        self.current.take()
    }

    // ── Editing ─────────────────────────────────────────────────────────────

    pub fn add_shape(&mut self, mut shape: Shape) -> usize {
        if !shape.is_polygon() && shape.vertices.is_empty() {
            shape.restore_move_handle();
        }
        self.push_undo();
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn delete_shape(&mut self, index: usize) -> Option<Shape> {
        if index >= self.shapes.len() {
            warn!("no shape at index {index}");
            return None;
        }
        self.push_undo();
        self.current = None;
        self.selected = None;
        Some(self.shapes.remove(index))
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.shapes.len());
    }

    pub fn selected(&self) -> Option<&Shape> {
        self.selected.and_then(|i| self.shapes.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn move_shape(&mut self, index: usize, delta: Vec2) -> bool {
        if index >= self.shapes.len() {
            return false;
        }
        self.push_undo();
        self.shapes[index].translate(delta);
        true
    }

    /// Drags one vertex to `to`. Moving the handle of a circle or rectangle
    /// resizes it symmetrically around its anchor.
    pub fn move_vertex(&mut self, index: usize, vertex: usize, to: Vec2) -> bool {
        let in_range = self
            .shapes
            .get(index)
            .is_some_and(|s| vertex < s.vertices.len());
        if !in_range {
            return false;
        }
        self.push_undo();

        let shape = &mut self.shapes[index];
        let moved = shape.vertices[vertex].delta_to(to);
        shape.vertices[vertex] = to;
        if !shape.is_polygon() {
            shape.size = shape
                .size
                .offset(Vec2::new(moved.x.wrapping_mul(2), moved.y.wrapping_mul(2)));
        }
        true
    }

    // ── Undo ────────────────────────────────────────────────────────────────

    fn push_undo(&mut self) {
        self.undo_stack.push(self.shapes.clone());
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) -> bool {
        if let Some(prev) = self.undo_stack.pop() {
            self.redo_stack.push(std::mem::replace(&mut self.shapes, prev));
            self.selected = None;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(std::mem::replace(&mut self.shapes, next));
            self.selected = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_shapes() -> EditorSession {
        let mut session = EditorSession::new("img.png");
        session.add_shape(Shape::rectangle(
            Vec2::new(10, 10),
            Vec2::new(20, 30),
            Color::rgb(255, 0, 0),
        ));
        session.add_shape(Shape::polygon(
            vec![Vec2::new(0, 0), Vec2::new(100, 0), Vec2::new(50, 80)],
            Color::rgb(0, 0, 255),
        ));
        session
    }

    #[test]
    fn from_project_adds_handles_to_non_polygons_only() {
        let project = Project {
            image_path: "cat.png".into(),
            shapes: vec![
                Shape::circle(Vec2::new(10, 10), Vec2::new(7, 9), Color::BLACK),
                Shape::polygon(vec![Vec2::new(1, 1), Vec2::new(9, 9)], Color::BLACK),
            ],
        };
        let session = EditorSession::from_project(project);
        assert_eq!(session.image_path(), "cat.png");
        assert_eq!(session.shapes()[0].vertices, vec![Vec2::new(13, 14)]);
        assert_eq!(session.shapes()[1].vertices.len(), 2);
    }

    #[test]
    fn bytes_round_trip_through_session() {
        let session = session_with_shapes();
        let bytes = session.to_bytes().unwrap();
        let reopened = EditorSession::from_project(load_project(&bytes).unwrap());
        assert_eq!(reopened.shapes(), session.shapes());
    }

    #[test]
    fn drawing_a_rectangle() {
        let mut session = EditorSession::new("img.png");
        session.set_color(Color::rgb(1, 2, 3));
        session.begin_shape(ShapeKind::Rectangle, Vec2::new(10, 10));
        session.drag_to(Vec2::new(15, 20));

        let current = session.current().unwrap();
        assert_eq!(current.size, Vec2::new(10, 20));
        assert_eq!(current.vertices, vec![Vec2::new(15, 20)]);
        assert_eq!(current.color, Color::rgb(1, 2, 3));

        assert_eq!(session.commit_shape(), Some(0));
        assert!(session.current().is_none());
        assert_eq!(session.shapes().len(), 1);
    }

    #[test]
    fn drawing_a_polygon_closes_near_anchor() {
        let mut session = EditorSession::new("img.png");
        session.begin_shape(ShapeKind::Polygon, Vec2::new(0, 0));
        assert_eq!(session.place_vertex(Vec2::new(100, 100)), PolygonStep::Added(1));
        assert_eq!(session.current().unwrap().position, Vec2::new(100, 100));
        assert_eq!(session.place_vertex(Vec2::new(300, 100)), PolygonStep::Added(2));
        assert_eq!(session.place_vertex(Vec2::new(200, 300)), PolygonStep::Added(3));
        assert_eq!(session.place_vertex(Vec2::new(120, 110)), PolygonStep::Closed(0));

        let poly = &session.shapes()[0];
        assert_eq!(
            poly.vertices,
            vec![Vec2::new(100, 100), Vec2::new(300, 100), Vec2::new(200, 300)]
        );
        assert_eq!(session.place_vertex(Vec2::new(1, 1)), PolygonStep::Ignored);
    }

    #[test]
    fn barely_dragged_shapes_are_dropped() {
        let mut session = EditorSession::new("img.png");
        session.begin_shape(ShapeKind::Rectangle, Vec2::new(5, 5));
        session.drag_to(Vec2::new(6, 5));
        assert_eq!(session.commit_shape(), None);
        assert!(session.current().is_none());
        assert!(session.shapes().is_empty());
        assert!(!session.undo());

        session.begin_shape(ShapeKind::Circle, Vec2::new(5, 5));
        assert_eq!(session.commit_shape(), None);

        session.begin_shape(ShapeKind::Circle, Vec2::new(5, 5));
        session.drag_to(Vec2::new(6, 6));
        assert_eq!(session.commit_shape(), Some(0));
        assert_eq!(session.shapes()[0].size, Vec2::new(2, 2));
    }

    #[test]
    fn drag_does_not_touch_polygons() {
        let mut session = EditorSession::new("img.png");
        session.begin_shape(ShapeKind::Polygon, Vec2::new(0, 0));
        session.drag_to(Vec2::new(50, 50));
        assert_eq!(session.current().unwrap().size, Vec2::ZERO);
        assert!(session.discard_shape().is_some());
        assert!(session.current().is_none());
    }

    #[test]
    fn added_rectangles_get_a_handle() {
        let session = session_with_shapes();
        assert_eq!(session.shapes()[0].vertices, vec![Vec2::new(20, 25)]);
    }

    #[test]
    fn delete_clears_selection_and_current() {
        let mut session = session_with_shapes();
        session.select(Some(1));
        session.begin_shape(ShapeKind::Circle, Vec2::ZERO);
        let removed = session.delete_shape(0).unwrap();
        assert_eq!(removed.kind, ShapeKind::Rectangle);
        assert!(session.selected().is_none());
        assert!(session.current().is_none());
        assert_eq!(session.shapes().len(), 1);
        assert!(session.delete_shape(5).is_none());
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut session = session_with_shapes();
        session.select(Some(9));
        assert_eq!(session.selected_index(), None);
        session.select(Some(1));
        assert_eq!(session.selected().unwrap().kind, ShapeKind::Polygon);
    }

    #[test]
    fn moving_a_shape_moves_its_vertices() {
        let mut session = session_with_shapes();
        assert!(session.move_shape(1, Vec2::new(5, 5)));
        assert_eq!(session.shapes()[1].position, Vec2::new(5, 5));
        assert_eq!(session.shapes()[1].vertices[2], Vec2::new(55, 85));
        assert!(!session.move_shape(2, Vec2::new(1, 1)));
    }

    #[test]
    fn moving_a_handle_resizes() {
        let mut session = session_with_shapes();
        assert!(session.move_vertex(0, 0, Vec2::new(23, 24)));
        let rect = &session.shapes()[0];
        assert_eq!(rect.size, Vec2::new(26, 28));
        assert_eq!(rect.vertices[0], Vec2::new(23, 24));

        assert!(session.move_vertex(1, 1, Vec2::new(90, 10)));
        assert_eq!(session.shapes()[1].size, Vec2::ZERO);
        assert!(!session.move_vertex(1, 3, Vec2::ZERO));
    }

    #[test]
    fn undo_and_redo() {
        let mut session = session_with_shapes();
        assert!(session.undo());
        assert_eq!(session.shapes().len(), 1);
        assert!(session.redo());
        assert_eq!(session.shapes().len(), 2);

        session.undo();
        session.add_shape(Shape::circle(Vec2::ZERO, Vec2::new(2, 2), Color::BLACK));
        assert!(!session.redo());

        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert!(session.shapes().is_empty());
    }
}
