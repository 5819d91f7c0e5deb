//! 16-bit bus values and contiguous sub-bus bit ranges.
//!
//! Every signal in a silica circuit is at most [`MAX_WIDTH`] bits wide and is
//! stored right-aligned in a `u16`. Sub-bus syntax (`a[3]`, `sum[0..7]`)
//! resolves to a [`BitRange`], and the [`extract`]/[`inject`] helpers apply
//! that range when a value crosses a sliced connection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The widest bus the simulator supports, in bits.
pub const MAX_WIDTH: u16 = 16;

/// A contiguous, inclusive bit range `lo..=hi` within a bus.
///
/// Invariant: `lo <= hi < MAX_WIDTH`. Ranges are validated against the
/// declared pin width during elaboration; the runtime assumes they hold.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BitRange {
    /// The lowest bit index (inclusive).
    pub lo: u16,
    /// The highest bit index (inclusive).
    pub hi: u16,
}

impl BitRange {
    /// Creates a range covering bits `lo..=hi`.
    pub fn new(lo: u16, hi: u16) -> Self {
        Self { lo, hi }
    }

    /// Creates a single-bit range at `bit`.
    pub fn bit(bit: u16) -> Self {
        Self { lo: bit, hi: bit }
    }

    /// Creates a range covering an entire bus of the given width.
    pub fn full(width: u16) -> Self {
        Self {
            lo: 0,
            hi: width.saturating_sub(1),
        }
    }

    /// Returns the number of bits this range covers.
    pub fn width(&self) -> u16 {
        self.hi - self.lo + 1
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lo == self.hi {
            write!(f, "[{}]", self.lo)
        } else {
            write!(f, "[{}..{}]", self.lo, self.hi)
        }
    }
}

/// Returns a mask covering the low `width` bits.
pub fn mask(width: u16) -> u16 {
    if width >= MAX_WIDTH {
        u16::MAX
    } else {
        (1u16 << width) - 1
    }
}

/// Extracts the bits of `value` covered by `range`, right-aligned.
pub fn extract(value: u16, range: BitRange) -> u16 {
    (value >> range.lo) & mask(range.width())
}

/// Returns `target` with the bits covered by `range` replaced by the low
/// bits of `value`. Bits of `target` outside the range are preserved.
pub fn inject(target: u16, value: u16, range: BitRange) -> u16 {
    let field = mask(range.width());
    (target & !(field << range.lo)) | ((value & field) << range.lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_widths() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(1), 0b1);
        assert_eq!(mask(8), 0xFF);
        assert_eq!(mask(15), 0x7FFF);
        assert_eq!(mask(16), 0xFFFF);
    }

    #[test]
    fn range_width() {
        assert_eq!(BitRange::bit(5).width(), 1);
        assert_eq!(BitRange::new(0, 7).width(), 8);
        assert_eq!(BitRange::full(16).width(), 16);
    }

    #[test]
    fn extract_low_byte() {
        let r = BitRange::new(0, 7);
        assert_eq!(extract(0xFF00, r), 0x00);
        assert_eq!(extract(0x00FF, r), 0xFF);
        assert_eq!(extract(0xABCD, r), 0xCD);
    }

    #[test]
    fn extract_high_byte() {
        let r = BitRange::new(8, 15);
        assert_eq!(extract(0xFF00, r), 0xFF);
        assert_eq!(extract(0xABCD, r), 0xAB);
    }

    #[test]
    fn extract_single_bit() {
        assert_eq!(extract(0b1000, BitRange::bit(3)), 1);
        assert_eq!(extract(0b1000, BitRange::bit(2)), 0);
    }

    #[test]
    fn inject_preserves_outside_bits() {
        let r = BitRange::new(4, 7);
        assert_eq!(inject(0xFFFF, 0x0, r), 0xFF0F);
        assert_eq!(inject(0x0000, 0xF, r), 0x00F0);
    }

    #[test]
    fn inject_masks_value() {
        // Only the low `width` bits of the value land in the target.
        let r = BitRange::new(0, 3);
        assert_eq!(inject(0, 0xFF, r), 0x000F);
    }

    #[test]
    fn inject_then_extract_roundtrip() {
        let r = BitRange::new(3, 9);
        let v = inject(0x5555, 0x42, r);
        assert_eq!(extract(v, r), 0x42);
    }

    #[test]
    fn display_formats() {
        assert_eq!(BitRange::bit(3).to_string(), "[3]");
        assert_eq!(BitRange::new(0, 7).to_string(), "[0..7]");
    }

    #[test]
    fn serde_roundtrip() {
        let r = BitRange::new(2, 9);
        let json = serde_json::to_string(&r).unwrap();
        let back: BitRange = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
