use std::fmt;
use std::mem;
use std::num::NonZero;

use crate::{
    ArrayFlags, CopyHandler, DoublingPolicy, Error, GrowableBuffer, GrowthPolicy, OpaqueArray,
    Result, TypedHandler, Zeroable, checked_product, validate_flags,
};

/// Builder for creating an instance of [`OpaqueArray`].
///
/// The element size, the initial capacity and the copy handler are mandatory. Use either
/// [`element_of::<T>()`](Self::element_of) to configure the first and last from a type, or
/// [`typesize()`](Self::typesize) with [`copy_handler()`](Self::copy_handler) to supply them
/// separately. The growth policy defaults to [`DoublingPolicy`] and the flags default to
/// [`ArrayFlags::NONE`].
///
/// Nothing is validated until [`build()`](Self::build), which reports the first problem found.
///
/// # Examples
///
/// ```
/// use opaque_array::{ArrayFlags, OpaqueArray};
///
/// let array = OpaqueArray::builder()
///     .element_of::<u64>()
///     .capacity(16)
///     .flags(ArrayFlags::AUTO_GROW)
///     .build()
///     .unwrap();
///
/// assert_eq!(array.capacity(), 16);
/// assert_eq!(array.typesize(), 8);
/// assert!(array.is_empty());
/// ```
#[must_use]
pub struct OpaqueArrayBuilder {
    typesize: usize,
    capacity: usize,
    growth_policy: Option<Box<dyn GrowthPolicy>>,
    copy_handler: Option<Box<dyn CopyHandler>>,

    /// Size of the element type the handler was configured from, if `element_of()` was used.
    element_size: Option<usize>,

    flags: ArrayFlags,
}

impl OpaqueArrayBuilder {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            typesize: 0,
            capacity: 0,
            growth_policy: None,
            copy_handler: None,
            element_size: None,
            flags: ArrayFlags::NONE,
        }
    }

    /// Sets the size in bytes of one element.
    #[inline]
    pub fn typesize(mut self, typesize: usize) -> Self {
        self.typesize = typesize;
        self
    }

    /// Sets the number of element slots allocated up front.
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Configures the array for elements of type `T`: the element size becomes the size of
    /// `T` and the copy handler becomes a [`TypedHandler<T>`].
    ///
    /// The element size stays bound to `T`: a later [`typesize()`](Self::typesize) call with a
    /// different size makes [`build()`](Self::build) fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use opaque_array::OpaqueArray;
    ///
    /// let array = OpaqueArray::builder()
    ///     .element_of::<[u16; 3]>()
    ///     .capacity(4)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(array.typesize(), 6);
    /// ```
    #[inline]
    pub fn element_of<T: Zeroable>(mut self) -> Self {
        self.typesize = mem::size_of::<T>();
        self.copy_handler = Some(Box::new(TypedHandler::<T>::new()));
        self.element_size = Some(mem::size_of::<T>());
        self
    }

    /// Sets the copy handler that performs every element read and write.
    ///
    /// The handler must be made for an element type whose size matches the configured
    /// [`typesize()`](Self::typesize).
    #[inline]
    pub fn copy_handler(mut self, handler: impl CopyHandler + 'static) -> Self {
        self.copy_handler = Some(Box::new(handler));
        self.element_size = None;
        self
    }

    /// Sets the growth policy consulted when an auto-growing array is written out of bounds.
    ///
    /// If not called, [`DoublingPolicy`] is used.
    #[inline]
    pub fn growth_policy(mut self, policy: impl GrowthPolicy + 'static) -> Self {
        self.growth_policy = Some(Box::new(policy));
        self
    }

    /// Sets the behavior flags. They are validated by [`build()`](Self::build).
    #[inline]
    pub fn flags(mut self, flags: ArrayFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Validates the configuration and allocates the array.
    ///
    /// The checks are performed in this order and the first failure is returned:
    ///
    /// 1. capacity is not zero,
    /// 2. typesize is not zero,
    /// 3. `capacity * typesize` does not overflow,
    /// 4. the flags are a valid combination,
    /// 5. a copy handler is present,
    /// 6. the typesize matches the element type given to [`element_of()`](Self::element_of).
    ///
    /// No memory is allocated unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero capacity or typesize, invalid flags, a
    /// missing copy handler or a typesize that does not fit the element type, [`Error::SizeOverflow`] if the buffer size cannot be represented
    /// and [`Error::Memory`] if the allocation fails.
    pub fn build(self) -> Result<OpaqueArray> {
        let capacity = NonZero::new(self.capacity).ok_or(Error::InvalidInput {
            problem: "capacity must not be zero",
        })?;

        let typesize = NonZero::new(self.typesize).ok_or(Error::InvalidInput {
            problem: "typesize must not be zero",
        })?;

        checked_product(&[capacity.get(), typesize.get()])?;

        let flags = validate_flags(self.flags, ArrayFlags::recognized()?)?;

        let copy_handler = self.copy_handler.ok_or(Error::InvalidInput {
            problem: "a copy handler is required",
        })?;

        if self
            .element_size
            .is_some_and(|element_size| element_size != typesize.get())
        {
            return Err(Error::InvalidInput {
                problem: "typesize does not match the element type",
            });
        }

        let growth_policy = self
            .growth_policy
            .unwrap_or_else(|| Box::new(DoublingPolicy));

        let buffer = GrowableBuffer::new(typesize, capacity)?;

        tracing::debug!(
            typesize = typesize.get(),
            capacity = capacity.get(),
            flags = flags.bits(),
            "opaque array constructed"
        );

        Ok(OpaqueArray::new_inner(
            buffer,
            flags,
            growth_policy,
            copy_handler,
        ))
    }
}

impl fmt::Debug for OpaqueArrayBuilder {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only, no behavior depends on it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueArrayBuilder")
            .field("typesize", &self.typesize)
            .field("capacity", &self.capacity)
            .field("has_growth_policy", &self.growth_policy.is_some())
            .field("has_copy_handler", &self.copy_handler.is_some())
            .field("element_size", &self.element_size)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_not_impl_any;

    use super::*;

    assert_not_impl_any!(OpaqueArrayBuilder: Send, Sync);

    #[test]
    fn builder_new_creates_default_state() {
        let builder = OpaqueArrayBuilder::new();

        assert_eq!(builder.typesize, 0);
        assert_eq!(builder.capacity, 0);
        assert!(builder.growth_policy.is_none());
        assert!(builder.copy_handler.is_none());
        assert!(builder.element_size.is_none());
        assert_eq!(builder.flags, ArrayFlags::NONE);
    }

    #[test]
    fn element_of_sets_typesize_and_handler() {
        let builder = OpaqueArrayBuilder::new().element_of::<[u32; 3]>();

        assert_eq!(builder.typesize, 12);
        assert!(builder.copy_handler.is_some());
        assert_eq!(builder.element_size, Some(12));
    }

    #[test]
    fn typesize_must_match_element_type() {
        let result = OpaqueArrayBuilder::new()
            .element_of::<u64>()
            .typesize(4)
            .capacity(3)
            .build();

        assert!(matches!(
            result,
            Err(Error::InvalidInput {
                problem: "typesize does not match the element type"
            })
        ));

        // Restating the same size is harmless.
        let array = OpaqueArrayBuilder::new()
            .element_of::<u64>()
            .typesize(8)
            .capacity(3)
            .build()
            .unwrap();
        assert_eq!(array.typesize(), 8);
    }

    #[test]
    fn explicit_handler_releases_element_size() {
        let builder = OpaqueArrayBuilder::new()
            .element_of::<u64>()
            .copy_handler(TypedHandler::<u32>::new())
            .typesize(4);

        assert!(builder.element_size.is_none());

        let array = builder.capacity(3).build().unwrap();
        assert_eq!(array.typesize(), 4);
    }

    #[test]
    fn build_succeeds_with_minimal_configuration() {
        let array = OpaqueArrayBuilder::new()
            .element_of::<u8>()
            .capacity(1)
            .build()
            .unwrap();

        assert_eq!(array.capacity(), 1);
        assert_eq!(array.typesize(), 1);
        assert_eq!(array.len(), 0);
        assert_eq!(array.flags(), ArrayFlags::NONE);
    }

    #[test]
    fn zero_capacity_is_checked_first() {
        // Every other setting is invalid too, capacity must still win.
        let result = OpaqueArrayBuilder::new()
            .flags(ArrayFlags::from_bits_retain(0xF0))
            .build();

        assert!(matches!(
            result,
            Err(Error::InvalidInput {
                problem: "capacity must not be zero"
            })
        ));
    }

    #[test]
    fn zero_typesize_is_checked_second() {
        let result = OpaqueArrayBuilder::new()
            .capacity(5)
            .flags(ArrayFlags::from_bits_retain(0xF0))
            .build();

        assert!(matches!(
            result,
            Err(Error::InvalidInput {
                problem: "typesize must not be zero"
            })
        ));
    }

    #[test]
    fn size_overflow_is_checked_third() {
        let result = OpaqueArrayBuilder::new()
            .capacity(usize::MAX)
            .typesize(2)
            .flags(ArrayFlags::from_bits_retain(0xF0))
            .build();

        assert!(matches!(result, Err(Error::SizeOverflow)));
    }

    #[test]
    fn invalid_flags_are_checked_fourth() {
        let result = OpaqueArrayBuilder::new()
            .capacity(5)
            .typesize(8)
            .flags(ArrayFlags::from_bits_retain(0b10))
            .build();

        assert!(matches!(
            result,
            Err(Error::InvalidInput {
                problem: "flags contain unrecognized bits"
            })
        ));
    }

    #[test]
    fn missing_handler_is_checked_fifth() {
        let result = OpaqueArrayBuilder::new()
            .capacity(5)
            .typesize(8)
            .flags(ArrayFlags::AUTO_GROW)
            .build();

        assert!(matches!(
            result,
            Err(Error::InvalidInput {
                problem: "a copy handler is required"
            })
        ));
    }

    #[test]
    fn explicit_handler_and_typesize_build() {
        let array = OpaqueArrayBuilder::new()
            .typesize(4)
            .capacity(3)
            .copy_handler(TypedHandler::<f32>::new())
            .build()
            .unwrap();

        assert_eq!(array.typesize(), 4);
    }

    #[test]
    fn builder_is_debug() {
        let builder = OpaqueArrayBuilder::new().element_of::<u32>().capacity(2);
        let output = format!("{builder:?}");

        assert!(output.contains("OpaqueArrayBuilder"));
        assert!(output.contains("has_copy_handler: true"));
    }
}
