//! Error types and helpers.
use {core::str::Utf8Error, thiserror::Error};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Attempting to read {requested} bytes with {remaining} remaining")]
    EndOfData { requested: usize, remaining: usize },
    #[error("VarInt is too long (more than 5 groups)")]
    MalformedVarInt,
    #[error("Ordinal {ordinal} is outside the range of {count} enumerants")]
    InvalidOrdinal { ordinal: i64, count: usize },
    #[error("Missing required field `{0}`")]
    MissingField(String),
    #[error("Expected {expected}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("No variant for discriminator {0}")]
    UnionDispatchFailure(String),
    #[error("Invalid bool encoding: {0}")]
    InvalidBoolEncoding(u8),
    #[error("Encoded length is negative: {0}")]
    NegativeLength(i32),
    #[error("Length {0} does not fit the length prefix")]
    LengthOverflow(usize),
    #[error(
        "Encoded sequence length exceeded preallocation limit of {limit} bytes (needed {needed} \
         bytes)"
    )]
    PreallocationSizeLimit { needed: usize, limit: usize },
    #[error(transparent)]
    InvalidUtf8Encoding(#[from] Utf8Error),
    #[error("Recursive codec used after its owner was dropped")]
    DetachedRecursive,
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = core::result::Result<T, Error>;

#[cold]
pub const fn end_of_data(requested: usize, remaining: usize) -> Error {
    Error::EndOfData {
        requested,
        remaining,
    }
}

#[cold]
pub const fn malformed_varint() -> Error {
    Error::MalformedVarInt
}

#[cold]
pub const fn invalid_ordinal(ordinal: i64, count: usize) -> Error {
    Error::InvalidOrdinal { ordinal, count }
}

#[cold]
pub fn missing_field(name: impl Into<String>) -> Error {
    Error::MissingField(name.into())
}

#[cold]
pub fn shape_mismatch(expected: &'static str, found: impl Into<String>) -> Error {
    Error::ShapeMismatch {
        expected,
        found: found.into(),
    }
}

#[cold]
pub fn union_dispatch_failure(key: impl core::fmt::Debug) -> Error {
    Error::UnionDispatchFailure(format!("{key:?}"))
}

#[cold]
pub const fn invalid_bool_encoding(byte: u8) -> Error {
    Error::InvalidBoolEncoding(byte)
}

#[cold]
pub const fn negative_length(len: i32) -> Error {
    Error::NegativeLength(len)
}

#[cold]
pub const fn length_overflow(len: usize) -> Error {
    Error::LengthOverflow(len)
}

#[cold]
pub const fn preallocation_size_limit(needed: usize, limit: usize) -> Error {
    Error::PreallocationSizeLimit { needed, limit }
}

#[cold]
pub const fn invalid_utf8_encoding(error: Utf8Error) -> Error {
    Error::InvalidUtf8Encoding(error)
}

#[cold]
pub const fn detached_recursive() -> Error {
    Error::DetachedRecursive
}

#[cold]
pub fn invalid_value(message: impl Into<String>) -> Error {
    Error::InvalidValue(message.into())
}
