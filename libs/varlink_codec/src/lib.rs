//! # Framed struct encoding
//!
//! Encodes a flat sequence of values into one buffer using GVariant-style
//! struct framing, as used for varlink message bodies. The format is not
//! self-describing: no type tags are written, the reader has to know the
//! layout.
//!
//! A message is the concatenation of its fields in write order, followed by
//! the framing offset table:
//!
//! - fixed-size values are written little-endian, after zero padding to a
//!   position that is a multiple of their size.
//! - strings are written as UTF-8 followed by a nul byte, without alignment.
//!   The position after the nul byte is the string's framing offset.
//! - the framing offset table holds the offsets of all strings except a
//!   trailing one, most recent first, as unsigned little-endian integers. All
//!   entries have the same width: 1, 2, 4, or 8 bytes, the smallest one that
//!   fits the largest offset. If there are no such offsets, there is no table.
//!
//! The types map as follows:
//!
//! | Write | Rust / serde type | Size | Alignment |
//! |---|---|---|---|
//! | boolean | [`bool`] | 1 | 1 |
//! | int8, uint8 | [`i8`], [`u8`] | 1 | 1 |
//! | int16, uint16 | [`i16`], [`u16`] | 2 | 2 |
//! | int32, uint32 | [`i32`], [`u32`] | 4 | 4 |
//! | int64, uint64 | [`i64`], [`u64`] | 8 | 8 |
//! | float64 | [`f64`] | 8 | 8 |
//! | string | [`str`], [`char`] | len + 1 | 1 |
//!
//! Through [`to_bytes`], the fields of a struct, tuple, or tuple struct are
//! written in order. Only the outermost value may be such a compound type.
//! Sequences, maps, options, and enums are not supported.
//!
//! # Example
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Greeting<'a> {
//!     name: &'a str,
//!     polite: bool,
//!     count: i64,
//! }
//!
//! let bytes = varlink_codec::to_bytes(&Greeting {
//!     name: "foo",
//!     polite: true,
//!     count: 42,
//! })?;
//!
//! assert_eq!(bytes.len(), 17);
//! assert_eq!(bytes.last(), Some(&4), "offset of the end of `name`");
//! # Ok::<(), varlink_codec::Error>(())
//! ```

mod config;
mod encoder;
mod error;
pub mod offset;
pub mod ser;

pub use config::EncoderConfig;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use ser::{to_bytes, to_bytes_with_config};
