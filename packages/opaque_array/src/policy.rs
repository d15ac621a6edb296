use crate::{Error, GrowableBuffer, Result, checked_product};

/// Decides whether and how an [`OpaqueArray`][1] grows when a write targets an index at or
/// beyond its capacity.
///
/// The policy is only consulted when the container has the
/// [`AUTO_GROW`][2] flag set. If the policy returns `Ok`, the write proceeds; if the index is
/// still not backed by memory at that point, the write fails with [`Error::OutOfBounds`].
///
/// Any closure with the signature `Fn(&mut GrowableBuffer, usize) -> Result<()>` is a growth
/// policy.
///
/// # Examples
///
/// A policy that grows exactly as far as needed:
///
/// ```
/// use opaque_array::{ArrayFlags, GrowableBuffer, OpaqueArray};
///
/// let mut array = OpaqueArray::builder()
///     .element_of::<u32>()
///     .capacity(4)
///     .flags(ArrayFlags::AUTO_GROW)
///     .growth_policy(|buffer: &mut GrowableBuffer, index: usize| {
///         buffer.grow_to(index + 1)
///     })
///     .build()
///     .unwrap();
///
/// // SAFETY: The array was built for u32 elements.
/// unsafe { array.set_value(100, &7_u32) }.unwrap();
/// assert_eq!(array.capacity(), 101);
/// ```
///
/// [1]: crate::OpaqueArray
/// [2]: crate::ArrayFlags::AUTO_GROW
#[cfg_attr(test, mockall::automock)]
pub trait GrowthPolicy {
    /// Grows `buffer` so that the slot at `index` becomes addressable, or explains why not.
    ///
    /// # Errors
    ///
    /// Implementations return whatever error prevented growth. The container propagates it
    /// unchanged and performs no write.
    fn grow(&self, buffer: &mut GrowableBuffer, index: usize) -> Result<()>;
}

impl<F> GrowthPolicy for F
where
    F: Fn(&mut GrowableBuffer, usize) -> Result<()>,
{
    fn grow(&self, buffer: &mut GrowableBuffer, index: usize) -> Result<()> {
        self(buffer, index)
    }
}

/// The default growth policy: doubles the capacity, one doubling per write.
///
/// Growth happens only when the index lies within one doubling of the current capacity, that
/// is `capacity <= index < capacity * 2`, so the slot is addressable once the doubling is done.
/// Indexes further out, including `capacity * 2` itself, are refused with
/// [`Error::RangeRejected`] before any memory is touched; callers that need larger jumps must
/// retry or install a different policy.
///
/// Slots added by growth are zeroed. The length of the container is not affected.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DoublingPolicy;

impl GrowthPolicy for DoublingPolicy {
    fn grow(&self, buffer: &mut GrowableBuffer, index: usize) -> Result<()> {
        let capacity = buffer.capacity();

        // The doubled byte size must be representable before we commit to anything.
        checked_product(&[capacity, 2, buffer.typesize()])?;

        // Cannot overflow, we just verified that even capacity * 2 * typesize fits.
        let doubled = capacity.wrapping_mul(2);

        if index < capacity || index >= doubled {
            tracing::trace!(index, capacity, "doubling policy refused growth");
            return Err(Error::RangeRejected { index, capacity });
        }

        buffer.grow_to(doubled)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::num::NonZero;

    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(DoublingPolicy: Send, Sync, Copy, Default);

    fn buffer(typesize: NonZero<usize>, capacity: NonZero<usize>) -> GrowableBuffer {
        GrowableBuffer::new(typesize, capacity).unwrap()
    }

    #[test]
    fn doubles_at_lower_edge_of_window() {
        let mut buffer = buffer(nz!(8), nz!(5));

        DoublingPolicy.grow(&mut buffer, 5).unwrap();

        assert_eq!(buffer.capacity(), 10);
        assert_eq!(buffer.byte_len(), 80);
    }

    #[test]
    fn doubles_at_upper_edge_of_window() {
        let mut buffer = buffer(nz!(8), nz!(5));

        DoublingPolicy.grow(&mut buffer, 9).unwrap();

        assert_eq!(buffer.capacity(), 10);
        assert!(buffer.slot_ptr(9).is_ok());
    }

    #[test]
    fn rejects_index_at_doubled_capacity() {
        let mut buffer = buffer(nz!(8), nz!(5));

        // Slot 10 would still be out of bounds after doubling to 10.
        assert_eq!(
            DoublingPolicy.grow(&mut buffer, 10),
            Err(Error::RangeRejected {
                index: 10,
                capacity: 5
            })
        );
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn rejects_index_beyond_one_doubling() {
        let mut buffer = buffer(nz!(8), nz!(5));

        assert_eq!(
            DoublingPolicy.grow(&mut buffer, 11),
            Err(Error::RangeRejected {
                index: 11,
                capacity: 5
            })
        );
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn rejects_index_already_in_bounds() {
        let mut buffer = buffer(nz!(8), nz!(5));

        assert_eq!(
            DoublingPolicy.grow(&mut buffer, 4),
            Err(Error::RangeRejected {
                index: 4,
                capacity: 5
            })
        );
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn repeated_growth_follows_doubling_sequence() {
        let mut buffer = buffer(nz!(8), nz!(5));
        let mut observed = vec![buffer.capacity()];

        for index in [5, 10, 20, 40] {
            DoublingPolicy.grow(&mut buffer, index).unwrap();
            assert!(buffer.slot_ptr(index).is_ok());
            observed.push(buffer.capacity());
        }

        assert_eq!(observed, vec![5, 10, 20, 40, 80]);
    }

    #[test]
    fn closures_are_policies() {
        let policy = |buffer: &mut GrowableBuffer, index: usize| buffer.grow_to(index + 3);
        let mut buffer = buffer(nz!(2), nz!(1));

        policy.grow(&mut buffer, 7).unwrap();

        assert_eq!(buffer.capacity(), 10);
    }

    #[test]
    fn mock_policy_receives_target_index() {
        let mut policy = MockGrowthPolicy::new();
        policy
            .expect_grow()
            .withf(|_, index| *index == 12)
            .times(1)
            .returning(|_, _| Err(Error::SizeOverflow));

        let mut buffer = buffer(nz!(2), nz!(4));

        assert_eq!(policy.grow(&mut buffer, 12), Err(Error::SizeOverflow));
        assert_eq!(buffer.capacity(), 4);
    }
}
