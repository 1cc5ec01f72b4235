use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not a GK2 project file (magic {found:?})")]
    InvalidMagic { found: Vec<u8> },

    #[error("corrupt project header: {reason}")]
    CorruptHeader { reason: &'static str },

    #[error("truncated shape record at byte {offset}: needs {needed} bytes, {remaining} left")]
    TruncatedRecord {
        offset: usize,
        needed: u64,
        remaining: usize,
    },

    #[error("unknown shape kind {value} at byte {offset}")]
    UnknownShapeKind { offset: usize, value: u8 },

    #[error("image path is {len} bytes, the project header holds at most 254")]
    ImagePathTooLong { len: usize },

    #[error("image path contains a null byte")]
    ImagePathContainsNul,

    #[error("image path is not UTF-8: {}", .0.display())]
    ImagePathNotUtf8(PathBuf),

    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("no shape at index {index} ({len} shapes)")]
    NoSuchShape { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
