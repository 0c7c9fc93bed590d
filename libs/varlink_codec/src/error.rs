//! Error handling types.

use std::fmt;

use serde::ser;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Potential errors to encounter when encoding a message.
///
/// None of these leave the [`Encoder`](crate::Encoder) in a partially
/// written state: a failed write does not touch the buffer, and a struct that
/// fails to serialize partway through is rolled back.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An integer value does not fit the range of the type it was written as.
    #[error("value {value} is out of range for {kind}")]
    InvalidArgument {
        /// The name of the target type, f.e. `uint8`.
        kind: &'static str,
        /// The rejected value.
        value: i128,
    },
    /// A write or [`close`](crate::Encoder::close) was attempted after the
    /// encoder was already closed.
    #[error("the encoder was already closed")]
    InvalidState,
    /// A framing offset is too large for even the widest offset table entry.
    #[error("framing offset {0} cannot be represented in an offset table")]
    Unrepresentable(u64),

    /// The serialized type uses a part of the serde data model that cannot be
    /// framed as a flat struct.
    #[error("{0} cannot be encoded as a flat struct field")]
    Unsupported(&'static str),
    /// Another reason provided by the serializing object.
    #[error("{0}")]
    Custom(String),
}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}
