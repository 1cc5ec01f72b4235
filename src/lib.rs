//! Shape annotations over a reference image, stored in GK2 project files.
//!
//! [`shape`] holds the in-memory model, [`codec`] turns single shapes into
//! bytes and back, [`project`] wraps a list of shapes and an image path into
//! a project file, and [`session`] is the editor state that reads and writes
//! those files.

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod project;
pub mod session;
pub mod shape;
pub mod wire;

pub use codec::{decode_shape, encode_shape, encode_shape_into, encoded_len};
pub use error::{Error, Result};
pub use project::{load_project, save_project, Project, MAGIC};
pub use session::{EditorSession, PolygonStep};
pub use shape::{Color, Shape, ShapeKind, Vec2};
