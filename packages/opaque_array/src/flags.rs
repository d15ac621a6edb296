use std::fmt;
use std::ops::BitOr;

use crate::{Error, Result, checked_power};

/// Behavior toggles of an [`OpaqueArray`][1].
///
/// Any bit pattern can be stored in an `ArrayFlags` value. Whether a pattern is acceptable is
/// decided by [`validate_flags()`], which is applied when the flags are handed to a container,
/// either at construction time or via [`OpaqueArray::set_flags()`][2].
///
/// # Examples
///
/// ```
/// use opaque_array::{ArrayFlags, validate_flags};
///
/// let flags = ArrayFlags::AUTO_GROW;
/// assert!(flags.contains(ArrayFlags::AUTO_GROW));
///
/// let bogus = ArrayFlags::from_bits_retain(0b100);
/// assert!(validate_flags(bogus, ArrayFlags::recognized().unwrap()).is_err());
/// ```
///
/// [1]: crate::OpaqueArray
/// [2]: crate::OpaqueArray::set_flags
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct ArrayFlags(u32);

impl ArrayFlags {
    /// No behavior toggles set.
    pub const NONE: Self = Self(0);

    /// A write to an index at or beyond the capacity invokes the growth policy instead of
    /// failing with [`Error::OutOfBounds`].
    pub const AUTO_GROW: Self = Self(0b1);

    /// Number of flag bits recognized by this version of the container.
    pub const FLAG_COUNT: usize = 1;

    /// Creates flags from raw bits without validating them.
    #[must_use]
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit set in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The mask of all recognized flag bits, `2^FLAG_COUNT - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if `FLAG_COUNT` bits do not fit in the flag type.
    pub fn recognized() -> Result<Self> {
        let limit = checked_power(2_u32, Self::FLAG_COUNT)?;

        // checked_power() with a base of 2 never returns zero.
        Ok(Self(limit.wrapping_sub(1)))
    }
}

impl BitOr for ArrayFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for ArrayFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayFlags({:#b})", self.0)
    }
}

/// Checks that `flags` sets no bits outside of `recognized`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if an unrecognized bit is set.
pub fn validate_flags(flags: ArrayFlags, recognized: ArrayFlags) -> Result<ArrayFlags> {
    if flags.0 & !recognized.0 != 0 {
        return Err(Error::InvalidInput {
            problem: "flags contain unrecognized bits",
        });
    }

    Ok(flags)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn recognized_mask_covers_auto_grow() {
        let recognized = ArrayFlags::recognized().unwrap();

        assert_eq!(recognized.bits(), 0b1);
        assert!(recognized.contains(ArrayFlags::AUTO_GROW));
    }

    #[test]
    fn known_combinations_are_valid() {
        let recognized = ArrayFlags::recognized().unwrap();

        assert_eq!(
            validate_flags(ArrayFlags::NONE, recognized),
            Ok(ArrayFlags::NONE)
        );
        assert_eq!(
            validate_flags(ArrayFlags::AUTO_GROW, recognized),
            Ok(ArrayFlags::AUTO_GROW)
        );
    }

    #[test]
    fn unknown_bits_are_rejected() {
        let recognized = ArrayFlags::recognized().unwrap();

        for bits in [0b10, 0b11, 0x8000_0000, u32::MAX] {
            assert!(matches!(
                validate_flags(ArrayFlags::from_bits_retain(bits), recognized),
                Err(Error::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn validation_depends_only_on_arguments() {
        let wide = ArrayFlags::from_bits_retain(0b111);

        assert!(validate_flags(ArrayFlags::from_bits_retain(0b100), wide).is_ok());
        assert!(validate_flags(ArrayFlags::from_bits_retain(0b100), ArrayFlags::NONE).is_err());
    }

    #[test]
    fn contains_and_bitor() {
        let flags = ArrayFlags::NONE | ArrayFlags::AUTO_GROW;

        assert!(flags.contains(ArrayFlags::AUTO_GROW));
        assert!(flags.contains(ArrayFlags::NONE));
        assert!(!ArrayFlags::NONE.contains(ArrayFlags::AUTO_GROW));
    }

    #[test]
    fn debug_shows_bits() {
        assert_eq!(format!("{:?}", ArrayFlags::AUTO_GROW), "ArrayFlags(0b1)");
    }
}
