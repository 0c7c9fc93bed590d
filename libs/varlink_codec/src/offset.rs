//! Width selection for the framing offset table.
//!
//! Every entry of one table is written with the same width. The width is the
//! smallest one that can hold the largest offset in the table.

use crate::error::{Error, Result};

/// The byte width of the entries in a framing offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OffsetWidth {
    /// 1 byte, offsets up to `0xFF`.
    U8 = 1,
    /// 2 bytes, offsets up to `0xFFFF`.
    U16 = 2,
    /// 4 bytes, offsets up to `0xFFFF_FFFF`.
    U32 = 4,
    /// 8 bytes, offsets up to [`i64::MAX`].
    U64 = 8,
}

impl OffsetWidth {
    /// The size of a single table entry in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        self as usize
    }

    /// The largest offset an entry of this width may hold.
    ///
    /// The 8-byte width stops at [`i64::MAX`] rather than [`u64::MAX`] so
    /// that readers using signed 64-bit positions can consume the table.
    #[must_use]
    pub const fn max(self) -> u64 {
        match self {
            Self::U8 => 0xFF,
            Self::U16 => 0xFFFF,
            Self::U32 => 0xFFFF_FFFF,
            Self::U64 => u64::MAX >> 1,
        }
    }

    /// The next larger width, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::U8 => Some(Self::U16),
            Self::U16 => Some(Self::U32),
            Self::U32 => Some(Self::U64),
            Self::U64 => None,
        }
    }

    /// Returns this width, or the smallest larger one, that can hold `offset`.
    ///
    /// Never returns a smaller width than `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unrepresentable`] if `offset` exceeds
    /// [`OffsetWidth::U64`]'s range.
    pub fn escalate(self, offset: u64) -> Result<Self> {
        let mut width = self;
        while offset > width.max() {
            width = width.next().ok_or(Error::Unrepresentable(offset))?;
        }

        Ok(width)
    }

    /// Selects the smallest width able to hold every offset in `offsets`.
    ///
    /// An empty batch selects [`OffsetWidth::U8`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unrepresentable`] if any offset exceeds
    /// [`OffsetWidth::U64`]'s range.
    pub fn select<I>(offsets: I) -> Result<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        offsets
            .into_iter()
            .try_fold(Self::U8, |width, offset| width.escalate(offset))
    }

    /// Appends `offset` to `buf` as a little-endian integer of this width.
    ///
    /// `offset` must fit this width. Use [`OffsetWidth::select`] to get one
    /// that does.
    pub fn write(self, buf: &mut Vec<u8>, offset: u64) {
        debug_assert!(offset <= self.max(), "offset {offset} exceeds {self:?}");
        buf.extend_from_slice(&offset.to_le_bytes()[..self.size()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_boundaries() {
        let cases: &[(u64, OffsetWidth)] = &[
            (0, OffsetWidth::U8),
            (0xFF, OffsetWidth::U8),
            (0x100, OffsetWidth::U16),
            (0xFFFF, OffsetWidth::U16),
            (0x1_0000, OffsetWidth::U32),
            (0xFFFF_FFFF, OffsetWidth::U32),
            (0x1_0000_0000, OffsetWidth::U64),
            (i64::MAX.unsigned_abs(), OffsetWidth::U64),
        ];

        for &(offset, expected) in cases {
            let width = OffsetWidth::select([offset]).expect("offset must be representable");
            assert_eq!(width, expected, "wrong width for offset {offset:#x}");
        }
    }

    #[test]
    fn select_uses_largest() {
        let width = OffsetWidth::select([3, 0x1234, 7]).expect("must be representable");
        assert_eq!(width, OffsetWidth::U16, "the largest offset decides the width");
    }

    #[test]
    fn select_empty() {
        let width = OffsetWidth::select([0u64; 0]).expect("empty batch is fine");
        assert_eq!(width, OffsetWidth::U8, "empty batch starts at the smallest width");
    }

    #[test]
    fn escalate_never_shrinks() {
        let width = OffsetWidth::U32.escalate(1).expect("must be representable");
        assert_eq!(width, OffsetWidth::U32, "escalation must be monotonic");
    }

    #[test]
    fn unrepresentable() {
        let res = OffsetWidth::select([1, u64::MAX]);
        assert!(
            matches!(res, Err(Error::Unrepresentable(u64::MAX))),
            "expected unrepresentable error, got {res:?}"
        );
    }

    #[test]
    fn write_little_endian() {
        let mut buf = Vec::new();
        OffsetWidth::U8.write(&mut buf, 0x07);
        OffsetWidth::U16.write(&mut buf, 0x0102);
        OffsetWidth::U32.write(&mut buf, 0x0304_0506);
        OffsetWidth::U64.write(&mut buf, 0x0708);

        assert_eq!(
            buf,
            [
                0x07, //
                0x02, 0x01, //
                0x06, 0x05, 0x04, 0x03, //
                0x08, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            ],
            "entries must be little-endian of their exact width"
        );
    }
}
