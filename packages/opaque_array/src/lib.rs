#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A type-erased, growable array with explicit capacity management.
//!
//! This crate provides [`OpaqueArray`], a container that stores elements of a fixed byte size
//! in one contiguous, zero-initialized buffer without knowing their type. The container only
//! manages memory: every element read and write is delegated to a [`CopyHandler`] that knows
//! the concrete type, and every growth decision is delegated to a [`GrowthPolicy`].
//!
//! # Key Features
//!
//! - **Type-erased storage**: Elements are opaque byte slots of a size chosen at construction
//! - **Pluggable copy semantics**: A [`CopyHandler`] performs typed, alignment-checked copies;
//!   [`TypedHandler<T>`] covers every [`Zeroable`] type
//! - **Pluggable growth**: With [`ArrayFlags::AUTO_GROW`] set, out-of-bounds writes consult a
//!   [`GrowthPolicy`]; the default [`DoublingPolicy`] doubles the capacity one step at a time
//! - **Overflow-checked sizes**: Every size computation goes through [`checked_product()`] and
//!   reports [`Error::SizeOverflow`] instead of wrapping around
//! - **Always initialized**: Construction and growth zero-fill the new slots, so any slot below
//!   the capacity can be read
//! - **Diagnostics**: [`OpaqueArray::status()`] renders the container metadata to any sink
//!
//! # Length and capacity
//!
//! The capacity is the number of slots backed by memory. The length counts successful writes
//! and never exceeds the capacity. Reads are bounds-checked against the capacity, so slots that
//! were never written read back as zeroes.
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use opaque_array::{Error, OpaqueArray};
//!
//! let mut array = OpaqueArray::builder()
//!     .element_of::<u32>()
//!     .capacity(4)
//!     .build()
//!     .unwrap();
//!
//! // SAFETY: The array was built for u32 elements.
//! unsafe {
//!     array.set_value(0, &10_u32).unwrap();
//!     array.set_value(3, &13_u32).unwrap();
//!
//!     assert_eq!(array.get_value::<u32>(3).unwrap(), 13);
//!
//!     // Without auto-grow, the capacity is a hard limit.
//!     assert!(matches!(
//!         array.set_value(4, &14_u32),
//!         Err(Error::OutOfBounds { .. })
//!     ));
//! }
//!
//! assert_eq!(array.len(), 2);
//! ```
//!
//! ## Automatic growth
//!
//! ```rust
//! use opaque_array::{ArrayFlags, Error, OpaqueArray};
//!
//! let mut array = OpaqueArray::builder()
//!     .element_of::<f64>()
//!     .capacity(5)
//!     .flags(ArrayFlags::AUTO_GROW)
//!     .build()
//!     .unwrap();
//!
//! // SAFETY: The array was built for f64 elements.
//! unsafe {
//!     // Within one doubling of the capacity: grows 5 -> 10.
//!     array.set_value(9, &1.5_f64).unwrap();
//!     assert_eq!(array.capacity(), 10);
//!
//!     // Further out than one doubling: refused, nothing changes.
//!     assert!(matches!(
//!         array.set_value(21, &1.5_f64),
//!         Err(Error::RangeRejected { .. })
//!     ));
//!     assert_eq!(array.capacity(), 10);
//! }
//! ```
//!
//! ## Custom element types
//!
//! ```rust
//! use opaque_array::{OpaqueArray, Zeroable};
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! struct Sample {
//!     channel: u16,
//!     value: f32,
//! }
//!
//! // SAFETY: All fields accept the all-zero bit pattern.
//! unsafe impl Zeroable for Sample {}
//!
//! let mut array = OpaqueArray::builder()
//!     .element_of::<Sample>()
//!     .capacity(8)
//!     .build()
//!     .unwrap();
//!
//! let sample = Sample {
//!     channel: 2,
//!     value: 0.25,
//! };
//!
//! // SAFETY: The array was built for Sample elements.
//! unsafe {
//!     array.set_value(1, &sample).unwrap();
//!     assert_eq!(array.get_value::<Sample>(1).unwrap(), sample);
//! }
//!
//! println!("{}", array.status());
//! ```

mod arithmetic;
mod array;
mod buffer;
mod builder;
mod error;
mod flags;
mod handler;
mod policy;
mod status;

pub use arithmetic::*;
pub use array::OpaqueArray;
pub use buffer::GrowableBuffer;
pub use builder::*;
pub use error::*;
pub use flags::*;
pub use handler::*;
pub use policy::*;
pub use status::ArrayStatus;
