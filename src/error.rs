use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("truncated input: needed {needed} more byte(s), {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("unknown type id {0}")]
    UnknownType(i64),

    #[error("malformed wire-type descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("struct field index {index} out of range (struct has {len} field(s))")]
    FieldIndexOutOfRange { index: i64, len: usize },

    #[error("segment length mismatch: declared {declared} byte(s), consumed {consumed}")]
    SegmentLengthMismatch { declared: usize, consumed: usize },

    #[error("{0} trailing byte(s) after the last decoded message")]
    TrailingBytes(usize),

    #[error("array length mismatch: descriptor declares {declared}, stream sent {actual}")]
    ArrayLengthMismatch { declared: usize, actual: usize },

    #[error("cannot encode value: {0}")]
    InvalidEncodeArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid utf-8 in type or field name: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    pub(crate) fn truncated(needed: usize, available: usize) -> Self {
        Error::Truncated { needed, available }
    }
}
