use std::io;
use thiserror::Error;

/// Malformed or short input. Always fatal to the operation in progress —
/// no partial collection survives one of these.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("{0}D not supported (only 3-D snapshots)")]
    UnsupportedDimension(i32),
    #[error("Unrecognized text header: expected 5 or 2 fields, got {0}")]
    BadTextHeader(usize),
    #[error("Bad particle row {row}: {reason}")]
    BadTextRow { row: usize, reason: String },
    #[error("Filename suffix {0:?} is not numeric")]
    BadSuffix(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
