//! GK2 project files.
//!
//! A project is the magic `GK2`, one byte holding the length of the image
//! path including its null terminator, the null-terminated path, then shape
//! records back to back until the end of the buffer.
//!
//! The single length byte limits image paths to 254 bytes. Longer paths are
//! refused on save rather than truncated.

use serde::Serialize;

use crate::codec::{decode_shape, encode_shape_into, encoded_len};
use crate::error::{Error, Result};
use crate::shape::Shape;

pub const MAGIC: &[u8; 3] = b"GK2";

/// Longest image path the header can describe.
pub const MAX_IMAGE_PATH_LEN: usize = u8::MAX as usize - 1;

/// Decoded contents of a project file, exactly as stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Project {
    pub image_path: String,
    pub shapes: Vec<Shape>,
}

pub fn save_project(image_path: &str, shapes: &[Shape]) -> Result<Vec<u8>> {
    let path = image_path.as_bytes();
    if path.len() > MAX_IMAGE_PATH_LEN {
        return Err(Error::ImagePathTooLong { len: path.len() });
    }
    if path.contains(&0) {
        return Err(Error::ImagePathContainsNul);
    }

    let body: usize = shapes.iter().map(encoded_len).sum();
    let mut buf = Vec::with_capacity(MAGIC.len() + 1 + path.len() + 1 + body);
    buf.extend_from_slice(MAGIC);
    buf.push((path.len() + 1) as u8);
    buf.extend_from_slice(path);
    buf.push(0);

    for shape in shapes {
        encode_shape_into(shape, &mut buf);
    }
    Ok(buf)
}

/// Parses a whole project buffer.
///
/// Any structural problem fails the entire load; nothing is recovered from a
/// partially readable file. Shapes come back as stored, without the move
/// handles the editor adds to non-polygons.
pub fn load_project(bytes: &[u8]) -> Result<Project> {
    if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
        return Err(Error::InvalidMagic {
            found: bytes[..bytes.len().min(MAGIC.len())].to_vec(),
        });
    }

    let (image_path, mut offset) = read_image_path(bytes)?;

    let mut shapes = Vec::new();
    while offset < bytes.len() {
        let (shape, consumed) = decode_shape(bytes, offset)?;
        shapes.push(shape);
        offset += consumed;
    }

    Ok(Project { image_path, shapes })
}

/// Returns the image path and the offset of the first shape record.
fn read_image_path(bytes: &[u8]) -> Result<(String, usize)> {
    let start = MAGIC.len() + 1;
    let declared = match bytes.get(MAGIC.len()) {
        Some(&len) => len as usize,
        None => {
            return Err(Error::CorruptHeader {
                reason: "missing image path length",
            })
        }
    };
    if declared == 0 {
        return Err(Error::CorruptHeader {
            reason: "image path length is zero",
        });
    }

    let region = bytes
        .get(start..start + declared)
        .ok_or(Error::CorruptHeader {
            reason: "image path runs past the end of the file",
        })?;

    // the first null must be the declared terminator
    let terminator = region.iter().position(|b| *b == 0);
    if terminator != Some(declared - 1) {
        return Err(Error::CorruptHeader {
            reason: "image path length does not match its terminator",
        });
    }

    let path = std::str::from_utf8(&region[..declared - 1]).map_err(|_| Error::CorruptHeader {
        reason: "image path is not valid UTF-8",
    })?;

    Ok((path.to_string(), start + declared))
}
