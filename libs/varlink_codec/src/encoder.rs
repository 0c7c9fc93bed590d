//! The struct encoder.

use std::mem;

use bytes::Bytes;

use crate::config::EncoderConfig;
use crate::error::{Error, Result};
use crate::offset::OffsetWidth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Building { last_was_variable: bool },
    Finalized,
}

/// Encodes a sequence of values as a single framed struct.
///
/// Fixed-size values are written inline at their natural alignment. Strings
/// are written inline and their end positions are collected into a framing
/// offset table that [`close`](Self::close) appends to the message.
///
/// This is meant to be used for exactly one message.
///
/// # Examples
///
/// ```
/// let mut encoder = varlink_codec::Encoder::new();
/// encoder.write_str("foo")?;
/// encoder.write_bool(true)?;
/// encoder.write_i64(42)?;
///
/// let bytes = encoder.close()?;
/// assert_eq!(
///     bytes.as_ref(),
///     b"foo\0\x01\0\0\0\x2a\0\0\0\0\0\0\0\x04",
/// );
/// # Ok::<(), varlink_codec::Error>(())
/// ```
#[derive(Debug)]
pub struct Encoder {
    buf: Vec<u8>,
    offsets: Vec<u64>,
    state: State,
}

/// A point an [`Encoder`] can be rolled back to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    len: usize,
    offsets: usize,
    state: State,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

// each write checks its input before touching the buffer, so a failed write
// leaves the encoder exactly as it was.
impl Encoder {
    /// Creates a new empty encoder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EncoderConfig::default())
    }

    /// Creates a new empty encoder, pre-allocating according to `config`.
    #[must_use]
    pub fn with_config(config: &EncoderConfig) -> Self {
        Self {
            buf: Vec::with_capacity(config.initial_capacity),
            offsets: Vec::with_capacity(config.offset_capacity),
            state: State::Building {
                last_was_variable: false,
            },
        }
    }

    /// The amount of bytes written so far, including padding but excluding
    /// the offset table. Zero after the encoder is closed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether [`close`](Self::close) has already succeeded.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    /// Writes a `bool` as a single `0` or `1` byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_fixed([value.into()])
    }

    /// Writes a signed 8-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `i8` range
    /// and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_i8(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: i8 = narrow("int8", value.into())?;
        self.write_fixed(v.to_le_bytes())
    }

    /// Writes an unsigned 8-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `u8` range
    /// and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_u8(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: u8 = narrow("uint8", value.into())?;
        self.write_fixed([v])
    }

    /// Writes a signed 16-bit integer, 2-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `i16`
    /// range and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_i16(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: i16 = narrow("int16", value.into())?;
        self.write_fixed(v.to_le_bytes())
    }

    /// Writes an unsigned 16-bit integer, 2-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `u16`
    /// range and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_u16(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: u16 = narrow("uint16", value.into())?;
        self.write_fixed(v.to_le_bytes())
    }

    /// Writes a signed 32-bit integer, 4-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `i32`
    /// range and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_i32(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: i32 = narrow("int32", value.into())?;
        self.write_fixed(v.to_le_bytes())
    }

    /// Writes an unsigned 32-bit integer, 4-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `u32`
    /// range and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_u32(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: u32 = narrow("uint32", value.into())?;
        self.write_fixed(v.to_le_bytes())
    }

    /// Writes a signed 64-bit integer, 8-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `i64`
    /// range and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_i64(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: i64 = narrow("int64", value.into())?;
        self.write_fixed(v.to_le_bytes())
    }

    /// Writes an unsigned 64-bit integer, 8-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is outside the `u64`
    /// range and [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_u64(&mut self, value: impl Into<i128>) -> Result<()> {
        self.ensure_building()?;
        let v: u64 = narrow("uint64", value.into())?;
        self.write_fixed(v.to_le_bytes())
    }

    /// Writes an IEEE-754 double, 8-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the encoder was already closed.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_fixed(value.to_le_bytes())
    }

    /// Writes a string as its UTF-8 bytes followed by a nul terminator.
    ///
    /// Strings are not aligned. The position after the terminator is
    /// recorded as a framing offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the encoder was already closed and
    /// [`Error::Unrepresentable`] if the end position does not fit a `u64`.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.ensure_building()?;

        let end = self.buf.len() + value.len() + 1;
        let offset = u64::try_from(end).map_err(|_| Error::Unrepresentable(u64::MAX))?;

        self.buf.reserve(value.len() + 1);
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0);

        self.offsets.push(offset);
        self.state = State::Building {
            last_was_variable: true,
        };
        Ok(())
    }

    /// Finishes the message by appending the framing offset table and
    /// returns the encoded bytes.
    ///
    /// The end of the last field is implied by the end of the field data, so
    /// if the last write was a string, its offset is not part of the table.
    /// The remaining offsets are written most recent first, all with the
    /// smallest [`OffsetWidth`] that fits the largest of them.
    ///
    /// Afterwards, every write and further `close` fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the encoder was already closed and
    /// [`Error::Unrepresentable`] if an offset is too large for any table
    /// width. In the latter case, the encoder is left unchanged.
    pub fn close(&mut self) -> Result<Bytes> {
        let State::Building { last_was_variable } = self.state else {
            return Err(Error::InvalidState);
        };

        let interior = match self.offsets.split_last() {
            Some((_, rest)) if last_was_variable => rest,
            _ => self.offsets.as_slice(),
        };

        if !interior.is_empty() {
            let width = OffsetWidth::select(interior.iter().copied())?;
            log::trace!(
                "framing {} offsets with width {} after {} data bytes",
                interior.len(),
                width.size(),
                self.buf.len(),
            );

            self.buf.reserve(interior.len() * width.size());
            for &offset in interior.iter().rev() {
                width.write(&mut self.buf, offset);
            }
        }

        self.state = State::Finalized;
        self.offsets = Vec::new();
        Ok(Bytes::from(mem::take(&mut self.buf)))
    }

    /// Remembers the current write position for [`Self::rollback`].
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.buf.len(),
            offsets: self.offsets.len(),
            state: self.state,
        }
    }

    /// Discards everything written since `checkpoint` was taken.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.buf.truncate(checkpoint.len);
        self.offsets.truncate(checkpoint.offsets);
        self.state = checkpoint.state;
    }

    fn ensure_building(&self) -> Result<()> {
        match self.state {
            State::Building { .. } => Ok(()),
            State::Finalized => Err(Error::InvalidState),
        }
    }

    /// Writes `N` bytes at an `N`-byte aligned position.
    fn write_fixed<const N: usize>(&mut self, bytes: [u8; N]) -> Result<()> {
        self.ensure_building()?;

        let padding = padding(self.buf.len(), N);
        self.buf.reserve(padding + N);
        self.buf.resize(self.buf.len() + padding, 0);
        self.buf.extend_from_slice(&bytes);

        self.state = State::Building {
            last_was_variable: false,
        };
        Ok(())
    }
}

/// The amount of zero bytes needed to move `pos` to a multiple of `align`.
const fn padding(pos: usize, align: usize) -> usize {
    match pos % align {
        0 => 0,
        rem => align - rem,
    }
}

fn narrow<T: TryFrom<i128>>(kind: &'static str, value: i128) -> Result<T> {
    T::try_from(value).map_err(|_| Error::InvalidArgument { kind, value })
}
