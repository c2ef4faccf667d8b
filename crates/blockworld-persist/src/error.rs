/// Errors that can occur during save/load operations.
///
/// Only problems with the container are errors. A payload field that does
/// not decode is dropped with a warning instead.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("invalid magic bytes (expected BWLD)")]
    InvalidMagic,

    #[error("unsupported save format version {0}")]
    UnsupportedVersion(u16),

    #[error("unknown header flags {0:#06x}")]
    UnknownFlags(u16),

    #[error("file too small ({0} bytes, minimum {1})")]
    FileTooSmall(usize, usize),

    #[error("truncated file: expected {expected} bytes, got {actual}")]
    TruncatedFile { expected: usize, actual: usize },

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error("declared payload size {declared} exceeds limit {limit}")]
    RawLengthTooLarge { declared: usize, limit: usize },

    #[error("payload size mismatch: header says {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("payload too large to save ({0} bytes)")]
    PayloadTooLarge(usize),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    PayloadNotObject,
}
