//! Single shape record encoding.
//!
//! Layout, all integers little-endian:
//!
//! | Field | Width |
//! |-------|-------|
//! | kind ordinal | u8 |
//! | position x, y | i32 × 2 |
//! | size x, y | i32 × 2 |
//! | color r, g, b | i32 × 3 |
//! | vertex count | u64 |
//! | vertices (x, y) | i32 × 2 per vertex |
//!
//! Records carry no length prefix, so a decoder has to consume exactly the
//! bytes the encoder wrote or every following record is misread.

use crate::error::{Error, Result};
use crate::shape::{Color, Shape, ShapeKind, Vec2};
use crate::wire::{ByteReader, ByteWriter};

/// Bytes taken by a record before its vertex array.
pub const FIXED_RECORD_LEN: usize = 1 + 4 * 4 + 4 * 3 + 8;

/// Bytes taken by one vertex.
pub const VERTEX_LEN: usize = 4 * 2;

pub fn encoded_len(shape: &Shape) -> usize {
    FIXED_RECORD_LEN + VERTEX_LEN * shape.wire_vertex_count()
}

pub fn encode_shape(shape: &Shape) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(shape));
    encode_shape_into(shape, &mut buf);
    buf
}

/// Appends the record for `shape` to `buf`.
///
/// Polygons are written with a zero size. Other kinds are written without
/// vertices, whatever the editor currently holds in `shape.vertices`.
pub fn encode_shape_into(shape: &Shape, buf: &mut Vec<u8>) {
    let mut w = ByteWriter::new(buf);
    let size = if shape.is_polygon() {
        Vec2::ZERO
    } else {
        shape.size
    };

    w.write_u8(shape.kind.ordinal());
    w.write_i32(shape.position.x);
    w.write_i32(shape.position.y);
    w.write_i32(size.x);
    w.write_i32(size.y);
    w.write_i32(shape.color.r);
    w.write_i32(shape.color.g);
    w.write_i32(shape.color.b);

    let count = shape.wire_vertex_count();
    w.write_u64(count as u64);
    for v in shape.vertices.iter().take(count) {
        w.write_i32(v.x);
        w.write_i32(v.y);
    }
}

/// Decodes the record starting at `offset`.
///
/// Returns the shape and the number of bytes it occupied. The decoded vertex
/// list is exactly what the file holds, so non-polygons come back without a
/// move handle.
pub fn decode_shape(bytes: &[u8], offset: usize) -> Result<(Shape, usize)> {
    let mut r = ByteReader::at(bytes, offset);
    let start = r.position();
    r.require(FIXED_RECORD_LEN as u64)?;

    let value = r.read_u8()?;
    let kind = ShapeKind::from_ordinal(value).ok_or(Error::UnknownShapeKind {
        offset: start,
        value,
    })?;
    let position = read_vec2(&mut r)?;
    let size = read_vec2(&mut r)?;
    let color = Color::rgb(r.read_i32()?, r.read_i32()?, r.read_i32()?);

    let count = r.read_u64()?;
    r.require(count.saturating_mul(VERTEX_LEN as u64))?;

    // the check above bounds count by the buffer length
    let mut vertices = Vec::with_capacity(count as usize);
    for _ in 0..count {
        vertices.push(read_vec2(&mut r)?);
    }

    let shape = Shape {
        kind,
        position,
        size,
        color,
        vertices,
    };
    Ok((shape, r.position() - start))
}

fn read_vec2(r: &mut ByteReader<'_>) -> Result<Vec2> {
    Ok(Vec2::new(r.read_i32()?, r.read_i32()?))
}
