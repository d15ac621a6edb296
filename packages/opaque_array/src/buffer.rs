use std::alloc::{self, Layout};
use std::num::NonZero;
use std::ptr::NonNull;

use crate::{Error, Result, checked_product};

/// Alignment of every buffer allocation.
///
/// The container does not know the element type, so it cannot ask for the element's own
/// alignment. This matches the fundamental alignment of the common system allocators, which is
/// sufficient for every primitive type. Copy handlers reject element types that need more.
pub(crate) const BUFFER_ALIGNMENT: usize = 16;

/// The owned, zero-initialized memory block behind an [`OpaqueArray`][1].
///
/// Holds `capacity * typesize` bytes. The block only ever grows, and every byte added by growth
/// is zeroed, so all bytes of the buffer are always initialized.
///
/// Growth policies receive a `&mut GrowableBuffer` and can enlarge it via
/// [`grow_to()`](Self::grow_to), which is the only way the capacity of a container can change.
///
/// [1]: crate::OpaqueArray
#[derive(Debug)]
pub struct GrowableBuffer {
    /// Start of the allocation, aligned to `BUFFER_ALIGNMENT`.
    ptr: NonNull<u8>,

    /// The layout the current allocation was made with. Needed for realloc and dealloc.
    layout: Layout,

    /// Number of element slots in the allocation.
    capacity: NonZero<usize>,

    /// Size in bytes of one element slot.
    typesize: NonZero<usize>,
}

impl GrowableBuffer {
    /// Allocates a zeroed buffer of `capacity` slots, each `typesize` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the total size cannot be represented and
    /// [`Error::Memory`] if the allocator fails. Nothing stays allocated on failure.
    pub(crate) fn new(typesize: NonZero<usize>, capacity: NonZero<usize>) -> Result<Self> {
        let layout = layout_for(typesize, capacity)?;

        // SAFETY: Both factors of the layout size are non-zero and the product did not
        // overflow, so the layout is valid and non-zero-sized.
        let ptr = NonNull::new(unsafe { alloc::alloc_zeroed(layout) }).ok_or(Error::Memory {
            bytes: layout.size(),
        })?;

        Ok(Self {
            ptr,
            layout,
            capacity,
            typesize,
        })
    }

    /// Number of element slots currently backed by memory.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Size in bytes of one element slot.
    #[must_use]
    pub fn typesize(&self) -> usize {
        self.typesize.get()
    }

    /// Size in bytes of the whole allocation.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.layout.size()
    }

    /// Grows the buffer to `new_capacity` slots, preserving existing contents and zeroing the
    /// added slots.
    ///
    /// The allocator may move the memory block. On failure the buffer is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `new_capacity` does not exceed the current capacity,
    /// [`Error::SizeOverflow`] if the new size cannot be represented and [`Error::Memory`] if
    /// the allocator fails.
    pub fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.capacity.get() {
            return Err(Error::InvalidInput {
                problem: "new capacity must exceed the current capacity",
            });
        }

        let new_capacity = NonZero::new(new_capacity).ok_or(Error::InvalidInput {
            problem: "new capacity must not be zero",
        })?;

        let new_layout = layout_for(self.typesize, new_capacity)?;
        let old_len = self.layout.size();
        let new_len = new_layout.size();

        // SAFETY: The block was allocated by the global allocator with `self.layout`, the new
        // size is non-zero and, having been validated by Layout, does not overflow isize when
        // rounded up to the alignment.
        let new_ptr = unsafe { alloc::realloc(self.ptr.as_ptr(), self.layout, new_len) };
        let new_ptr = NonNull::new(new_ptr).ok_or(Error::Memory { bytes: new_len })?;

        // Cannot underflow because the new capacity is greater than the old one.
        let added_len = new_len.wrapping_sub(old_len);

        // SAFETY: The realloc succeeded, so the block is valid for `new_len` bytes and the range
        // [old_len, new_len) lies within it.
        unsafe {
            new_ptr.add(old_len).write_bytes(0, added_len);
        }

        tracing::debug!(
            old_capacity = self.capacity.get(),
            new_capacity = new_capacity.get(),
            moved = new_ptr != self.ptr,
            "buffer grown"
        );

        self.ptr = new_ptr;
        self.layout = new_layout;
        self.capacity = new_capacity;

        Ok(())
    }

    /// Byte offset of the slot at `index`, whether or not the slot exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the offset cannot be represented.
    pub(crate) fn offset_of(&self, index: usize) -> Result<usize> {
        index
            .checked_mul(self.typesize.get())
            .ok_or(Error::SizeOverflow)
    }

    /// Address of the slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the offset of the slot cannot be represented and
    /// [`Error::OutOfBounds`] if the slot is not backed by memory.
    pub(crate) fn slot_ptr(&self, index: usize) -> Result<NonNull<u8>> {
        let offset = self.offset_of(index)?;

        if index >= self.capacity.get() {
            return Err(Error::OutOfBounds {
                index,
                capacity: self.capacity.get(),
            });
        }

        // SAFETY: index < capacity, so the offset is below capacity * typesize, which is
        // the size of the allocation.
        Ok(unsafe { self.ptr.add(offset) })
    }

    /// Views the whole buffer as bytes.
    ///
    /// # Safety
    ///
    /// Every slot must have been written only with values that have no padding bytes, or not
    /// at all.
    #[cfg(test)]
    pub(crate) unsafe fn as_bytes(&self) -> &[u8] {
        // SAFETY: The allocation is valid for `byte_len()` bytes; the caller guarantees that
        // all of them are initialized.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl Drop for GrowableBuffer {
    fn drop(&mut self) {
        // SAFETY: The block was allocated by the global allocator with `self.layout` and is
        // released exactly once, here.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}

fn layout_for(typesize: NonZero<usize>, capacity: NonZero<usize>) -> Result<Layout> {
    let size = checked_product(&[capacity.get(), typesize.get()])?;

    let Ok(layout) = Layout::from_size_align(size, BUFFER_ALIGNMENT) else {
        return Err(Error::SizeOverflow);
    };

    Ok(layout)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::indexing_slicing,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use new_zealand::nz;
    use static_assertions::assert_not_impl_any;

    use super::*;

    assert_not_impl_any!(GrowableBuffer: Send, Sync);

    #[test]
    fn new_buffer_is_zeroed() {
        let buffer = GrowableBuffer::new(nz!(8), nz!(5)).unwrap();

        assert_eq!(buffer.capacity(), 5);
        assert_eq!(buffer.typesize(), 8);
        assert_eq!(buffer.byte_len(), 40);
        assert!(unsafe { buffer.as_bytes() }.iter().all(|b| *b == 0));
    }

    #[test]
    fn new_buffer_is_aligned() {
        let buffer = GrowableBuffer::new(nz!(3), nz!(7)).unwrap();

        assert_eq!(buffer.ptr.as_ptr().addr() % BUFFER_ALIGNMENT, 0);
    }

    #[test]
    fn overflowing_size_is_rejected() {
        assert_eq!(
            GrowableBuffer::new(nz!(2), NonZero::new(usize::MAX).unwrap()).unwrap_err(),
            Error::SizeOverflow
        );
    }

    #[test]
    fn size_beyond_isize_is_rejected() {
        let capacity = NonZero::new(isize::MAX.unsigned_abs()).unwrap();

        assert_eq!(
            GrowableBuffer::new(nz!(1), capacity).unwrap_err(),
            Error::SizeOverflow
        );
    }

    #[test]
    fn grow_preserves_contents_and_zeroes_tail() {
        let mut buffer = GrowableBuffer::new(nz!(4), nz!(2)).unwrap();

        let slot = buffer.slot_ptr(1).unwrap();
        unsafe {
            slot.as_ptr().write_bytes(0xAB, 4);
        }

        buffer.grow_to(4).unwrap();

        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.byte_len(), 16);

        let bytes = unsafe { buffer.as_bytes() };
        assert_eq!(&bytes[0..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[0xAB; 4]);
        assert!(bytes[8..].iter().all(|b| *b == 0));
    }

    #[test]
    fn grow_to_same_or_smaller_capacity_is_rejected() {
        let mut buffer = GrowableBuffer::new(nz!(4), nz!(3)).unwrap();

        for new_capacity in [0, 1, 3] {
            assert!(matches!(
                buffer.grow_to(new_capacity),
                Err(Error::InvalidInput { .. })
            ));
        }

        assert_eq!(buffer.capacity(), 3);
    }

    #[test]
    fn grow_to_overflowing_capacity_leaves_buffer_intact() {
        let mut buffer = GrowableBuffer::new(nz!(16), nz!(3)).unwrap();

        assert_eq!(buffer.grow_to(usize::MAX), Err(Error::SizeOverflow));
        assert_eq!(buffer.capacity(), 3);
        assert_eq!(buffer.byte_len(), 48);
    }

    #[test]
    fn slot_ptr_is_bounds_checked() {
        let buffer = GrowableBuffer::new(nz!(8), nz!(5)).unwrap();

        let first = buffer.slot_ptr(0).unwrap();
        let last = buffer.slot_ptr(4).unwrap();
        assert_eq!(last.as_ptr().addr() - first.as_ptr().addr(), 32);

        assert_eq!(
            buffer.slot_ptr(5),
            Err(Error::OutOfBounds {
                index: 5,
                capacity: 5
            })
        );
    }

    #[test]
    fn slot_offset_overflow_is_reported_before_bounds() {
        let buffer = GrowableBuffer::new(nz!(8), nz!(5)).unwrap();

        assert_eq!(buffer.slot_ptr(usize::MAX), Err(Error::SizeOverflow));
        assert_eq!(buffer.offset_of(3), Ok(24));
    }
}
