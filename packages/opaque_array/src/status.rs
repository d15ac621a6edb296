use std::fmt;
use std::io;

use crate::ArrayFlags;

/// A snapshot of the metadata of an [`OpaqueArray`][1], for diagnostic output.
///
/// Obtained from [`OpaqueArray::status()`][2]. The snapshot does not follow later changes to the
/// array.
///
/// # Examples
///
/// ```
/// use opaque_array::OpaqueArray;
///
/// let array = OpaqueArray::builder()
///     .element_of::<u16>()
///     .capacity(3)
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     array.status().to_string(),
///     "length: 0, capacity: 3, typesize: 2, flags: 0b0"
/// );
/// ```
///
/// [1]: crate::OpaqueArray
/// [2]: crate::OpaqueArray::status
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ArrayStatus {
    length: usize,
    capacity: usize,
    typesize: usize,
    flags: ArrayFlags,
}

impl ArrayStatus {
    pub(crate) fn new(length: usize, capacity: usize, typesize: usize, flags: ArrayFlags) -> Self {
        Self {
            length,
            capacity,
            typesize,
            flags,
        }
    }

    /// Number of successful writes at the time of the snapshot.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of element slots backed by memory.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size in bytes of one element.
    #[must_use]
    pub fn typesize(&self) -> usize {
        self.typesize
    }

    /// Behavior flags of the array.
    #[must_use]
    pub fn flags(&self) -> ArrayFlags {
        self.flags
    }

    /// Writes the human-readable rendering of the status as one line to `sink`.
    ///
    /// # Errors
    ///
    /// Returns any error reported by the sink.
    pub fn write_to(&self, sink: &mut impl io::Write) -> io::Result<()> {
        writeln!(sink, "{self}")
    }
}

impl fmt::Display for ArrayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "length: {}, capacity: {}, typesize: {}, flags: {:#b}",
            self.length,
            self.capacity,
            self.typesize,
            self.flags.bits()
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn display_lists_all_fields() {
        let status = ArrayStatus::new(50, 80, 8, ArrayFlags::AUTO_GROW);

        assert_eq!(
            status.to_string(),
            "length: 50, capacity: 80, typesize: 8, flags: 0b1"
        );
    }

    #[test]
    fn write_to_emits_one_line() {
        let status = ArrayStatus::new(0, 5, 4, ArrayFlags::NONE);
        let mut sink = Vec::new();

        status.write_to(&mut sink).unwrap();

        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "length: 0, capacity: 5, typesize: 4, flags: 0b0\n"
        );
    }

    #[test]
    fn write_to_reports_sink_errors() {
        struct BrokenSink;

        impl io::Write for BrokenSink {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("sink is broken"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let status = ArrayStatus::new(0, 5, 4, ArrayFlags::NONE);

        assert!(status.write_to(&mut BrokenSink).is_err());
    }
}
