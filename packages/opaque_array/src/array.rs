use std::fmt;
use std::mem;
use std::ptr;

use crate::{
    ArrayFlags, ArrayStatus, CopyDirection, CopyHandler, Error, GrowableBuffer, GrowthPolicy,
    OpaqueArrayBuilder, Result, Zeroable, validate_flags,
};

/// A growable array of elements whose type is unknown to the container.
///
/// The array stores elements of a fixed byte size (the "typesize") in one contiguous,
/// zero-initialized buffer. Every element read and write is delegated to a [`CopyHandler`],
/// which is the only party that knows the concrete element type. When configured with
/// [`ArrayFlags::AUTO_GROW`], a write beyond the capacity consults a [`GrowthPolicy`]
/// (by default [`DoublingPolicy`][crate::DoublingPolicy]) to enlarge the buffer.
///
/// Use [`OpaqueArray::builder()`] to create an instance.
///
/// # Length and capacity
///
/// The capacity is the number of slots backed by memory. The length counts successful writes
/// and never exceeds the capacity. Reads are bounds-checked against the capacity, not the
/// length, so slots that were never written read back as zeroes.
///
/// # Thread safety
///
/// The array is single-threaded. It is neither [`Send`] nor [`Sync`].
///
/// # Examples
///
/// ```
/// use opaque_array::{ArrayFlags, OpaqueArray};
///
/// let mut array = OpaqueArray::builder()
///     .element_of::<i64>()
///     .capacity(2)
///     .flags(ArrayFlags::AUTO_GROW)
///     .build()
///     .unwrap();
///
/// // SAFETY: The array was built for i64 elements.
/// unsafe {
///     array.set_value(0, &-1_i64).unwrap();
///     array.set_value(2, &5_i64).unwrap();
///
///     assert_eq!(array.get_value::<i64>(0).unwrap(), -1);
///     assert_eq!(array.get_value::<i64>(1).unwrap(), 0);
///     assert_eq!(array.get_value::<i64>(2).unwrap(), 5);
/// }
///
/// assert_eq!(array.capacity(), 4);
/// assert_eq!(array.len(), 2);
///
/// array.destroy().unwrap();
/// ```
pub struct OpaqueArray {
    buffer: GrowableBuffer,

    /// Number of successful writes, capped at the capacity.
    length: usize,

    flags: ArrayFlags,

    growth_policy: Box<dyn GrowthPolicy>,

    copy_handler: Box<dyn CopyHandler>,
}

impl OpaqueArray {
    /// Creates a builder for configuring a new array.
    ///
    /// # Examples
    ///
    /// ```
    /// use opaque_array::OpaqueArray;
    ///
    /// let array = OpaqueArray::builder()
    ///     .element_of::<u8>()
    ///     .capacity(32)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(array.capacity(), 32);
    /// ```
    #[inline]
    pub fn builder() -> OpaqueArrayBuilder {
        OpaqueArrayBuilder::new()
    }

    /// Creates an array from validated parts. Used by the builder.
    #[must_use]
    pub(crate) fn new_inner(
        buffer: GrowableBuffer,
        flags: ArrayFlags,
        growth_policy: Box<dyn GrowthPolicy>,
        copy_handler: Box<dyn CopyHandler>,
    ) -> Self {
        Self {
            buffer,
            length: 0,
            flags,
            growth_policy,
            copy_handler,
        }
    }

    /// The number of successful writes, never more than the capacity.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether no write has succeeded yet.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The number of element slots currently backed by memory.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The size in bytes of one element.
    #[must_use]
    #[inline]
    pub fn typesize(&self) -> usize {
        self.buffer.typesize()
    }

    /// The current behavior flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> ArrayFlags {
        self.flags
    }

    /// Takes a snapshot of the array metadata for diagnostic output.
    #[must_use]
    pub fn status(&self) -> ArrayStatus {
        ArrayStatus::new(
            self.length,
            self.buffer.capacity(),
            self.buffer.typesize(),
            self.flags,
        )
    }

    /// Replaces the behavior flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the flags contain unrecognized bits, in which case the
    /// current flags are kept.
    pub fn set_flags(&mut self, flags: ArrayFlags) -> Result<()> {
        self.flags = validate_flags(flags, ArrayFlags::recognized()?)?;
        Ok(())
    }

    /// Replaces the growth policy consulted by auto-growing writes.
    pub fn set_growth_policy(&mut self, policy: impl GrowthPolicy + 'static) {
        self.growth_policy = Box::new(policy);
    }

    /// Writes the element at `value` into the slot at `index`.
    ///
    /// If `index` is beyond the capacity and the array has [`ArrayFlags::AUTO_GROW`] set, the
    /// growth policy is asked to make room first. On success the length grows by one, up to
    /// the capacity.
    ///
    /// # Errors
    ///
    /// In the order checked:
    ///
    /// - [`Error::InvalidInput`] if `value` is null;
    /// - [`Error::CorruptedContainer`] if the array metadata is inconsistent;
    /// - [`Error::SizeOverflow`] if the byte offset of `index` cannot be represented;
    /// - [`Error::OutOfBounds`] if `index` is beyond the capacity and either auto-grow is off
    ///   or the growth policy did not make the slot addressable;
    /// - any error returned by the growth policy;
    /// - any error returned by the copy handler.
    ///
    /// Nothing is written and the length is unchanged on error. The capacity may already have
    /// grown if the copy handler is the one failing.
    ///
    /// # Safety
    ///
    /// `value` must be null or point to a valid element of the type the copy handler is made
    /// for, and that type must be no larger than the typesize of the array.
    pub unsafe fn set(&mut self, index: usize, value: *const u8) -> Result<()> {
        if value.is_null() {
            return Err(Error::InvalidInput {
                problem: "value address must not be null",
            });
        }

        self.check_integrity()?;
        self.buffer.offset_of(index)?;

        if index >= self.buffer.capacity() {
            if !self.flags.contains(ArrayFlags::AUTO_GROW) {
                tracing::trace!(
                    index,
                    capacity = self.buffer.capacity(),
                    "write beyond capacity refused"
                );

                return Err(Error::OutOfBounds {
                    index,
                    capacity: self.buffer.capacity(),
                });
            }

            self.growth_policy.grow(&mut self.buffer, index)?;
        }

        // Repeats the bounds check, the policy may have declared success without growing.
        let slot = self.buffer.slot_ptr(index).inspect_err(|_| {
            tracing::trace!(index, "growth policy left the slot unaddressable");
        })?;

        // SAFETY: The slot lies within the buffer and is valid for typesize bytes, which is
        // enough for the element type of the handler. The caller guarantees that `value` holds
        // a valid element. The handler only writes to the slot, as the direction demands.
        unsafe {
            self.copy_handler
                .copy(slot.as_ptr(), value.cast_mut(), CopyDirection::RightToLeft)?;
        }

        if self.length < self.buffer.capacity() {
            // Cannot overflow, length is below capacity.
            self.length = self.length.wrapping_add(1);
        }

        Ok(())
    }

    /// Reads the element in the slot at `index` into `out`.
    ///
    /// Any slot below the capacity can be read, including never written ones, which hold
    /// zeroes.
    ///
    /// # Errors
    ///
    /// In the order checked:
    ///
    /// - [`Error::InvalidInput`] if `out` is null;
    /// - [`Error::CorruptedContainer`] if the array metadata is inconsistent;
    /// - [`Error::SizeOverflow`] if the byte offset of `index` cannot be represented;
    /// - [`Error::OutOfBounds`] if `index` is not below the capacity;
    /// - any error returned by the copy handler.
    ///
    /// # Safety
    ///
    /// `out` must be null or valid for writes of the element type the copy handler is made for,
    /// and that type must be no larger than the typesize of the array.
    pub unsafe fn get(&self, index: usize, out: *mut u8) -> Result<()> {
        if out.is_null() {
            return Err(Error::InvalidInput {
                problem: "output address must not be null",
            });
        }

        self.check_integrity()?;

        let slot = self.buffer.slot_ptr(index).inspect_err(|error| {
            tracing::trace!(index, %error, "read refused");
        })?;

        // SAFETY: The slot lies within the buffer and holds either a value written by the same
        // handler or zeroes, both valid for the element type. The caller guarantees that `out`
        // is writable. The handler only writes to `out`, as the direction demands.
        unsafe {
            self.copy_handler
                .copy(slot.as_ptr(), out, CopyDirection::LeftToRight)
        }
    }

    /// Writes `value` into the slot at `index`.
    ///
    /// This is a typed convenience wrapper around [`set()`](Self::set).
    ///
    /// # Errors
    ///
    /// Same as [`set()`](Self::set).
    ///
    /// # Safety
    ///
    /// `T` must be the element type the copy handler of the array is made for.
    pub unsafe fn set_value<T>(&mut self, index: usize, value: &T) -> Result<()> {
        debug_assert_eq!(
            mem::size_of::<T>(),
            self.buffer.typesize(),
            "value type size does not match the typesize of the array"
        );

        // SAFETY: Forwarding the guarantees of our caller.
        unsafe { self.set(index, ptr::from_ref(value).cast()) }
    }

    /// Reads the slot at `index` as a `T`.
    ///
    /// This is a typed convenience wrapper around [`get()`](Self::get).
    ///
    /// # Errors
    ///
    /// Same as [`get()`](Self::get).
    ///
    /// # Safety
    ///
    /// `T` must be the element type the copy handler of the array is made for.
    pub unsafe fn get_value<T: Zeroable>(&self, index: usize) -> Result<T> {
        debug_assert_eq!(
            mem::size_of::<T>(),
            self.buffer.typesize(),
            "value type size does not match the typesize of the array"
        );

        let mut out = T::zeroed();

        // SAFETY: `out` is a valid, writable T and our caller guarantees it is the element type.
        unsafe {
            self.get(index, ptr::from_mut(&mut out).cast())?;
        }

        Ok(out)
    }

    /// Releases the array and its buffer.
    ///
    /// Dropping the array also releases the buffer. Destroying it explicitly additionally
    /// reports whether the array was still consistent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptedContainer`] if the array metadata was inconsistent. The buffer
    /// is released regardless.
    pub fn destroy(self) -> Result<()> {
        let integrity = self.check_integrity();

        tracing::debug!(
            length = self.length,
            capacity = self.buffer.capacity(),
            consistent = integrity.is_ok(),
            "opaque array destroyed"
        );

        drop(self);

        integrity
    }

    fn check_integrity(&self) -> Result<()> {
        if self.length > self.buffer.capacity() {
            return Err(Error::CorruptedContainer {
                problem: "length exceeds capacity",
            });
        }

        Ok(())
    }
}

impl fmt::Debug for OpaqueArray {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only, no behavior depends on it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueArray")
            .field("length", &self.length)
            .field("capacity", &self.buffer.capacity())
            .field("typesize", &self.buffer.typesize())
            .field("flags", &self.flags)
            .finish_non_exhaustive()
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
    use std::cell::Cell;
    use std::rc::Rc;

    use static_assertions::assert_not_impl_any;

    use super::*;
    use crate::{DoublingPolicy, MockGrowthPolicy, TypedHandler};

    assert_not_impl_any!(OpaqueArray: Send, Sync);

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Pair {
        x: i32,
        y: i32,
    }

    unsafe impl Zeroable for Pair {}

    struct RefusingHandler;

    unsafe impl CopyHandler for RefusingHandler {
        unsafe fn copy(&self, _: *mut u8, _: *mut u8, _: CopyDirection) -> Result<()> {
            Err(Error::InvalidInput {
                problem: "refused by test handler",
            })
        }
    }

    struct CountingHandler {
        inner: TypedHandler<u32>,
        calls: Rc<Cell<usize>>,
    }

    unsafe impl CopyHandler for CountingHandler {
        unsafe fn copy(
            &self,
            left: *mut u8,
            right: *mut u8,
            direction: CopyDirection,
        ) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            unsafe { self.inner.copy(left, right, direction) }
        }
    }

    fn pair_array(capacity: usize, flags: ArrayFlags) -> OpaqueArray {
        OpaqueArray::builder()
            .element_of::<Pair>()
            .capacity(capacity)
            .flags(flags)
            .build()
            .unwrap()
    }

    #[test]
    fn new_array_is_empty() {
        let array = pair_array(5, ArrayFlags::NONE);

        assert_eq!(array.len(), 0);
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 5);
        assert_eq!(array.typesize(), 8);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut array = pair_array(5, ArrayFlags::NONE);

        for index in 0..5 {
            let value = Pair {
                x: i32::try_from(index).unwrap(),
                y: -1,
            };
            unsafe { array.set_value(index, &value) }.unwrap();
        }

        for index in 0..5 {
            let value: Pair = unsafe { array.get_value(index) }.unwrap();
            assert_eq!(value.x, i32::try_from(index).unwrap());
            assert_eq!(value.y, -1);
        }

        assert_eq!(array.len(), 5);
    }

    #[test]
    fn set_with_null_value_is_rejected() {
        let mut array = pair_array(5, ArrayFlags::NONE);

        let result = unsafe { array.set(0, ptr::null()) };

        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        assert_eq!(array.len(), 0);
    }

    #[test]
    fn get_with_null_out_is_rejected() {
        let array = pair_array(5, ArrayFlags::NONE);

        let result = unsafe { array.get(0, ptr::null_mut()) };

        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn set_beyond_capacity_without_auto_grow_fails() {
        let mut array = pair_array(5, ArrayFlags::NONE);

        let result = unsafe { array.set_value(5, &Pair { x: 1, y: 1 }) };

        assert_eq!(
            result,
            Err(Error::OutOfBounds {
                index: 5,
                capacity: 5
            })
        );
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 5);
    }

    #[test]
    fn set_with_overflowing_offset_fails() {
        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);

        let result = unsafe { array.set_value(usize::MAX, &Pair { x: 1, y: 1 }) };

        assert_eq!(result, Err(Error::SizeOverflow));
        assert_eq!(array.capacity(), 5);
    }

    #[test]
    fn auto_grow_doubles_and_zero_fills() {
        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);

        unsafe { array.set_value(7, &Pair { x: 3, y: 4 }) }.unwrap();

        assert_eq!(array.capacity(), 10);
        assert_eq!(array.len(), 1);

        for index in [5, 6, 8, 9] {
            let value: Pair = unsafe { array.get_value(index) }.unwrap();
            assert_eq!(value, Pair::zeroed());
        }

        let value: Pair = unsafe { array.get_value(7) }.unwrap();
        assert_eq!(value, Pair { x: 3, y: 4 });
    }

    #[test]
    fn auto_grow_at_window_edges() {
        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);
        let value = Pair { x: 6, y: 7 };

        // Doubling to 10 would not make slot 10 addressable, so nothing happens.
        assert_eq!(
            unsafe { array.set_value(10, &value) },
            Err(Error::RangeRejected {
                index: 10,
                capacity: 5
            })
        );
        assert_eq!(array.capacity(), 5);
        assert_eq!(array.len(), 0);
        assert!(matches!(
            unsafe { array.get_value::<Pair>(10) },
            Err(Error::OutOfBounds { .. })
        ));

        unsafe { array.set_value(9, &value) }.unwrap();
        assert_eq!(array.capacity(), 10);
        assert_eq!(array.len(), 1);
        assert_eq!(unsafe { array.get_value::<Pair>(9) }, Ok(value));

        // The new capacity opens the next window, which now contains 10.
        unsafe { array.set_value(10, &value) }.unwrap();
        assert_eq!(array.capacity(), 20);
        assert_eq!(array.len(), 2);
        assert_eq!(unsafe { array.get_value::<Pair>(10) }, Ok(value));
    }

    #[test]
    fn auto_grow_beyond_window_is_rejected() {
        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);

        let result = unsafe { array.set_value(11, &Pair { x: 3, y: 4 }) };

        assert_eq!(
            result,
            Err(Error::RangeRejected {
                index: 11,
                capacity: 5
            })
        );
        assert_eq!(array.capacity(), 5);
        assert_eq!(array.len(), 0);
    }

    #[test]
    fn policy_error_is_propagated_without_write() {
        let mut policy = MockGrowthPolicy::new();
        policy
            .expect_grow()
            .withf(|_, index| *index == 9)
            .times(1)
            .returning(|_, _| Err(Error::Memory { bytes: 4096 }));

        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);
        array.set_growth_policy(policy);

        let result = unsafe { array.set_value(9, &Pair { x: 1, y: 2 }) };

        assert_eq!(result, Err(Error::Memory { bytes: 4096 }));
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 5);
    }

    #[test]
    fn policy_that_does_not_grow_yields_out_of_bounds() {
        let mut policy = MockGrowthPolicy::new();
        policy.expect_grow().times(1).returning(|_, _| Ok(()));

        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);
        array.set_growth_policy(policy);

        let result = unsafe { array.set_value(6, &Pair { x: 1, y: 2 }) };

        assert_eq!(
            result,
            Err(Error::OutOfBounds {
                index: 6,
                capacity: 5
            })
        );
        assert_eq!(array.len(), 0);
    }

    #[test]
    fn policy_is_not_consulted_for_in_bounds_writes() {
        let mut policy = MockGrowthPolicy::new();
        policy.expect_grow().never();

        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);
        array.set_growth_policy(policy);

        unsafe { array.set_value(4, &Pair { x: 1, y: 2 }) }.unwrap();
    }

    #[test]
    fn policy_is_not_consulted_without_auto_grow() {
        let mut policy = MockGrowthPolicy::new();
        policy.expect_grow().never();

        let mut array = pair_array(5, ArrayFlags::NONE);
        array.set_growth_policy(policy);

        let result = unsafe { array.set_value(5, &Pair { x: 1, y: 2 }) };
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn handler_failure_after_growth_is_returned() {
        let mut array = OpaqueArray::builder()
            .typesize(4)
            .capacity(2)
            .flags(ArrayFlags::AUTO_GROW)
            .copy_handler(RefusingHandler)
            .build()
            .unwrap();

        let value = 1_u32;
        let result = unsafe { array.set_value(3, &value) };

        assert_eq!(
            result,
            Err(Error::InvalidInput {
                problem: "refused by test handler"
            })
        );
        // The growth itself already happened.
        assert_eq!(array.capacity(), 4);
        assert_eq!(array.len(), 0);
    }

    #[test]
    fn handler_failure_on_get_is_returned_verbatim() {
        let array = OpaqueArray::builder()
            .typesize(4)
            .capacity(2)
            .copy_handler(RefusingHandler)
            .build()
            .unwrap();

        let result = unsafe { array.get_value::<u32>(0) };

        assert_eq!(
            result,
            Err(Error::InvalidInput {
                problem: "refused by test handler"
            })
        );
    }

    #[test]
    fn handler_is_invoked_once_per_access() {
        let calls = Rc::new(Cell::new(0));

        let mut array = OpaqueArray::builder()
            .typesize(4)
            .capacity(2)
            .copy_handler(CountingHandler {
                inner: TypedHandler::new(),
                calls: Rc::clone(&calls),
            })
            .build()
            .unwrap();

        unsafe { array.set_value(1, &9_u32) }.unwrap();
        assert_eq!(calls.get(), 1);

        assert_eq!(unsafe { array.get_value::<u32>(1) }.unwrap(), 9);
        assert_eq!(calls.get(), 2);

        // Out of bounds accesses never reach the handler.
        assert!(unsafe { array.get_value::<u32>(2) }.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn get_is_idempotent() {
        let mut array = pair_array(3, ArrayFlags::NONE);
        unsafe { array.set_value(1, &Pair { x: 8, y: 9 }) }.unwrap();

        for _ in 0..3 {
            let value: Pair = unsafe { array.get_value(1) }.unwrap();
            assert_eq!(value, Pair { x: 8, y: 9 });
        }

        assert_eq!(array.len(), 1);
        assert_eq!(array.capacity(), 3);
    }

    #[test]
    fn get_beyond_capacity_fails() {
        let array = pair_array(3, ArrayFlags::AUTO_GROW);

        assert_eq!(
            unsafe { array.get_value::<Pair>(3) },
            Err(Error::OutOfBounds {
                index: 3,
                capacity: 3
            })
        );
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut array = pair_array(2, ArrayFlags::NONE);

        for _ in 0..5 {
            unsafe { array.set_value(0, &Pair { x: 1, y: 1 }) }.unwrap();
        }

        assert_eq!(array.len(), 2);
    }

    #[test]
    fn set_flags_validates() {
        let mut array = pair_array(2, ArrayFlags::NONE);

        array.set_flags(ArrayFlags::AUTO_GROW).unwrap();
        assert_eq!(array.flags(), ArrayFlags::AUTO_GROW);

        let result = array.set_flags(ArrayFlags::from_bits_retain(0b110));
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        assert_eq!(array.flags(), ArrayFlags::AUTO_GROW);

        array.set_flags(ArrayFlags::NONE).unwrap();
        assert_eq!(array.flags(), ArrayFlags::NONE);
    }

    #[test]
    fn set_growth_policy_replaces_policy() {
        let mut array = pair_array(2, ArrayFlags::AUTO_GROW);

        array.set_growth_policy(|buffer: &mut GrowableBuffer, index: usize| {
            buffer.grow_to(index + 1)
        });
        unsafe { array.set_value(50, &Pair { x: 1, y: 1 }) }.unwrap();
        assert_eq!(array.capacity(), 51);

        array.set_growth_policy(DoublingPolicy);
        unsafe { array.set_value(60, &Pair { x: 1, y: 1 }) }.unwrap();
        assert_eq!(array.capacity(), 102);
    }

    #[test]
    fn corrupted_metadata_is_detected() {
        let mut array = pair_array(2, ArrayFlags::NONE);
        array.length = 3;

        let value = Pair { x: 1, y: 1 };
        assert!(matches!(
            unsafe { array.set_value(0, &value) },
            Err(Error::CorruptedContainer { .. })
        ));
        assert!(matches!(
            unsafe { array.get_value::<Pair>(0) },
            Err(Error::CorruptedContainer { .. })
        ));
        assert!(matches!(
            array.destroy(),
            Err(Error::CorruptedContainer { .. })
        ));
    }

    #[test]
    fn destroy_consistent_array_succeeds() {
        let mut array = pair_array(2, ArrayFlags::NONE);
        unsafe { array.set_value(1, &Pair { x: 1, y: 1 }) }.unwrap();

        assert_eq!(array.destroy(), Ok(()));
    }

    #[test]
    fn status_reflects_metadata() {
        let mut array = pair_array(5, ArrayFlags::AUTO_GROW);
        unsafe { array.set_value(5, &Pair { x: 1, y: 1 }) }.unwrap();

        let status = array.status();

        assert_eq!(status.length(), 1);
        assert_eq!(status.capacity(), 10);
        assert_eq!(status.typesize(), 8);
        assert_eq!(status.flags(), ArrayFlags::AUTO_GROW);
    }

    #[test]
    fn debug_output_shows_metadata() {
        let array = pair_array(5, ArrayFlags::NONE);
        let output = format!("{array:?}");

        assert!(output.contains("OpaqueArray"));
        assert!(output.contains("capacity: 5"));
        assert!(output.contains(".."));
    }
}
