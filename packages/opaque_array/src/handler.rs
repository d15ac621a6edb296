use std::fmt;
use std::marker::PhantomData;
use std::mem;

use crate::{Error, Result};

/// Which of the two addresses handed to a [`CopyHandler`] is the source of the copy.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CopyDirection {
    /// The value at the left address is assigned to the right address.
    LeftToRight,

    /// The value at the right address is assigned to the left address.
    RightToLeft,
}

impl CopyDirection {
    /// Returns the raw value of the direction, as accepted by `TryFrom<u32>`.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::LeftToRight => 0,
            Self::RightToLeft => 1,
        }
    }
}

impl TryFrom<u32> for CopyDirection {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::LeftToRight),
            1 => Ok(Self::RightToLeft),
            _ => Err(Error::InvalidInput {
                problem: "unrecognized copy direction",
            }),
        }
    }
}

/// Copies one element of a concrete type between two opaque addresses.
///
/// A copy handler is what allows an [`OpaqueArray`][1] to store values of a type it knows
/// nothing about: every read or write of an element goes through the handler, which alone
/// interprets the bytes as the concrete type. The container never checks alignment or type.
///
/// # Safety
///
/// Implementations must:
///
/// - return [`Error::InvalidInput`] without touching memory if either address is null or is
///   not aligned for the concrete type;
/// - access no more than `size_of` of the concrete type at either address;
/// - write only to the destination address selected by the direction.
///
/// The container relies on these guarantees for memory safety.
///
/// [1]: crate::OpaqueArray
pub unsafe trait CopyHandler {
    /// Assigns the value at one address to the other, as selected by `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if an address is null or misaligned for the concrete type.
    ///
    /// # Safety
    ///
    /// If both addresses are non-null and aligned, the source must point to a valid value of
    /// the concrete type and the destination must be valid for writes of that type. The two
    /// must not overlap.
    unsafe fn copy(&self, left: *mut u8, right: *mut u8, direction: CopyDirection) -> Result<()>;
}

/// Element types for which the all-zero bit pattern is a valid value.
///
/// Containers zero-fill slots that have not been written yet and a read of such a slot
/// produces an all-zero value, so [`TypedHandler`] only accepts types that tolerate it.
///
/// # Safety
///
/// The all-zero bit pattern must be a valid value of the implementing type.
///
/// # Examples
///
/// ```
/// use opaque_array::Zeroable;
///
/// #[derive(Clone, Copy)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// // SAFETY: Point only contains integers, for which zero is a valid value.
/// unsafe impl Zeroable for Point {}
///
/// let origin = Point::zeroed();
/// assert_eq!(origin.x, 0);
/// assert_eq!(origin.y, 0);
/// ```
pub unsafe trait Zeroable: Copy + 'static {
    /// Returns the all-zero value of the type.
    #[must_use]
    fn zeroed() -> Self {
        // SAFETY: The implementer guarantees that the all-zero bit pattern is a valid value.
        unsafe { mem::zeroed() }
    }
}

macro_rules! impl_zeroable {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: Zero is a valid value of every primitive numeric type, `false` and '\0'.
            unsafe impl Zeroable for $t {}
        )*
    };
}

impl_zeroable!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char
);

// SAFETY: An array of zeroed elements is itself all zeros, and each element is valid.
unsafe impl<T: Zeroable, const N: usize> Zeroable for [T; N] {}

/// The standard [`CopyHandler`] for elements of type `T`.
///
/// Performs the copy as a plain assignment of `T`, after checking both addresses for null and
/// for the alignment of `T`.
///
/// # Examples
///
/// ```
/// use opaque_array::{CopyDirection, CopyHandler, TypedHandler};
///
/// let handler = TypedHandler::<u64>::new();
/// let mut slot = 0_u64;
/// let mut value = 42_u64;
///
/// // SAFETY: Both pointers are valid, aligned u64 locations that do not overlap.
/// unsafe {
///     handler
///         .copy(
///             (&raw mut slot).cast(),
///             (&raw mut value).cast(),
///             CopyDirection::RightToLeft,
///         )
///         .unwrap();
/// }
///
/// assert_eq!(slot, 42);
/// ```
pub struct TypedHandler<T> {
    // fn() -> T keeps the handler Send + Sync regardless of T, as it never stores a T.
    _element: PhantomData<fn() -> T>,
}

impl<T: Zeroable> TypedHandler<T> {
    /// Creates a handler for elements of type `T`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _element: PhantomData,
        }
    }

    fn check_address(address: *mut u8) -> Result<*mut T> {
        if address.is_null() {
            return Err(Error::InvalidInput {
                problem: "copy handler received a null address",
            });
        }

        let typed = address.cast::<T>();

        if !typed.is_aligned() {
            return Err(Error::InvalidInput {
                problem: "copy handler received an address misaligned for the element type",
            });
        }

        Ok(typed)
    }
}

impl<T: Zeroable> Default for TypedHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedHandler")
            .field("element", &std::any::type_name::<T>())
            .finish()
    }
}

// SAFETY: Both addresses are checked for null and alignment before use, exactly one value of T
// is read from the source and written to the destination selected by the direction.
unsafe impl<T: Zeroable> CopyHandler for TypedHandler<T> {
    unsafe fn copy(&self, left: *mut u8, right: *mut u8, direction: CopyDirection) -> Result<()> {
        let left = Self::check_address(left)?;
        let right = Self::check_address(right)?;

        match direction {
            // SAFETY: Both pointers are non-null and aligned (checked above); the caller
            // guarantees the source holds a valid T and the destination is writable.
            CopyDirection::LeftToRight => unsafe { *right = *left },
            // SAFETY: As above, with the roles of the pointers swapped.
            CopyDirection::RightToLeft => unsafe { *left = *right },
        }

        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::ptr;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(TypedHandler<u64>: Send, Sync, fmt::Debug, Default);
    assert_impl_all!(CopyDirection: Send, Sync, Copy);

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Pair {
        x: i32,
        y: i32,
    }

    unsafe impl Zeroable for Pair {}

    #[test]
    fn direction_raw_values_round_trip() {
        for direction in [CopyDirection::LeftToRight, CopyDirection::RightToLeft] {
            assert_eq!(CopyDirection::try_from(direction.as_raw()), Ok(direction));
        }
    }

    #[test]
    fn unrecognized_direction_is_rejected() {
        assert!(matches!(
            CopyDirection::try_from(2),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            CopyDirection::try_from(u32::MAX),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn copies_left_to_right() {
        let handler = TypedHandler::<Pair>::new();
        let mut left = Pair { x: 1, y: 2 };
        let mut right = Pair::zeroed();

        unsafe {
            handler
                .copy(
                    (&raw mut left).cast(),
                    (&raw mut right).cast(),
                    CopyDirection::LeftToRight,
                )
                .unwrap();
        }

        assert_eq!(right, Pair { x: 1, y: 2 });
        assert_eq!(left, Pair { x: 1, y: 2 });
    }

    #[test]
    fn copies_right_to_left() {
        let handler = TypedHandler::<Pair>::new();
        let mut left = Pair::zeroed();
        let mut right = Pair { x: -5, y: 9 };

        unsafe {
            handler
                .copy(
                    (&raw mut left).cast(),
                    (&raw mut right).cast(),
                    CopyDirection::RightToLeft,
                )
                .unwrap();
        }

        assert_eq!(left, Pair { x: -5, y: 9 });
    }

    #[test]
    fn null_addresses_are_rejected() {
        let handler = TypedHandler::<u32>::new();
        let mut value = 7_u32;

        let result = unsafe {
            handler.copy(
                ptr::null_mut(),
                (&raw mut value).cast(),
                CopyDirection::RightToLeft,
            )
        };
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = unsafe {
            handler.copy(
                (&raw mut value).cast(),
                ptr::null_mut(),
                CopyDirection::LeftToRight,
            )
        };
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        assert_eq!(value, 7);
    }

    #[test]
    fn misaligned_addresses_are_rejected() {
        let handler = TypedHandler::<u32>::new();
        let mut storage = [0_u32; 2];
        let mut value = 0xdead_beef_u32;

        // One byte into an aligned u32 array can never be u32-aligned.
        let misaligned = unsafe { storage.as_mut_ptr().cast::<u8>().add(1) };

        let result = unsafe {
            handler.copy(
                misaligned,
                (&raw mut value).cast(),
                CopyDirection::RightToLeft,
            )
        };

        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        assert_eq!(storage, [0, 0]);
    }

    #[test]
    fn zeroed_primitives_are_zero() {
        assert_eq!(u64::zeroed(), 0);
        assert!(!bool::zeroed());
        assert_eq!(char::zeroed(), '\0');
        assert_eq!(<[i16; 4]>::zeroed(), [0; 4]);
    }

    #[test]
    fn debug_names_element_type() {
        let output = format!("{:?}", TypedHandler::<u16>::new());
        assert!(output.contains("u16"));
    }
}
