use std::fs;

use gk2::{
    load_project, save_project, Color, EditorSession, Error, PolygonStep, Shape, ShapeKind, Vec2,
};
use tempfile::TempDir;

fn draw_sample(session: &mut EditorSession) {
    session.set_color(Color::rgb(200, 10, 10));
    session.begin_shape(ShapeKind::Circle, Vec2::new(100, 100));
    session.drag_to(Vec2::new(110, 120));
    session.commit_shape();

    session.set_color(Color::rgb(0, 200, 0));
    session.begin_shape(ShapeKind::Polygon, Vec2::new(10, 10));
    for p in [Vec2::new(10, 10), Vec2::new(200, 10), Vec2::new(100, 150)] {
        session.place_vertex(p);
    }
    assert_eq!(session.place_vertex(Vec2::new(12, 9)), PolygonStep::Closed(1));

    session.add_shape(Shape::rectangle(
        Vec2::new(-4, -4),
        Vec2::new(9, 9),
        Color::rgb(0, 0, 255),
    ));
}

#[test]
fn save_then_open_restores_the_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.gk2");

    let mut session = EditorSession::new("images/scene.png");
    draw_sample(&mut session);
    session.save(&path).unwrap();

    let reopened = EditorSession::open(&path).unwrap();
    assert_eq!(reopened.image_path(), "images/scene.png");
    assert_eq!(reopened.shapes(), session.shapes());

    let circle = &reopened.shapes()[0];
    assert_eq!(circle.size, Vec2::new(20, 40));
    assert_eq!(circle.vertices, vec![Vec2::new(110, 120)]);

    let rect = &reopened.shapes()[2];
    // -4 + 9 / 2
    assert_eq!(rect.vertices, vec![Vec2::new(0, 0)]);
}

#[test]
fn file_matches_codec_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.gk2");

    let mut session = EditorSession::new("scene.png");
    draw_sample(&mut session);
    session.save(&path).unwrap();

    let on_disk = fs::read(&path).unwrap();
    assert_eq!(on_disk, save_project("scene.png", session.shapes()).unwrap());
    assert_eq!(&on_disk[..3], b"GK2");

    let raw = load_project(&on_disk).unwrap();
    assert!(raw.shapes[0].vertices.is_empty());
    assert_eq!(raw.shapes[1].vertices.len(), 3);
}

#[test]
fn open_rejects_foreign_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("picture.png");
    fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();

    assert!(matches!(
        EditorSession::open(&path),
        Err(Error::InvalidMagic { .. })
    ));
}

#[test]
fn open_rejects_truncated_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cut.gk2");

    let mut session = EditorSession::new("scene.png");
    draw_sample(&mut session);
    let bytes = session.to_bytes().unwrap();
    // drop the rectangle and half of the polygon's last vertex
    let rectangle_len = 37;
    fs::write(&path, &bytes[..bytes.len() - rectangle_len - 4]).unwrap();

    assert!(matches!(
        EditorSession::open(&path),
        Err(Error::TruncatedRecord { .. })
    ));
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        EditorSession::open(dir.path().join("nope.gk2")),
        Err(Error::Io(_))
    ));
}

#[test]
fn overlong_image_path_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("long.gk2");

    let session = EditorSession::new("x".repeat(255));
    assert!(matches!(
        session.save(&path),
        Err(Error::ImagePathTooLong { len: 255 })
    ));
    assert!(!path.exists());
}
