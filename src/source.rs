//! Traits for the inputs a [`Lexer`](crate::Lexer) can read from.
//!
//! Lexel lexes sequences of Unicode scalar values rather than raw bytes,
//! so a source is any element-indexed slice whose elements widen to
//! `u32`: `[char]`, `[u32]` and `[u8]` out of the box, plus anything
//! that derefs to one of those (`Vec<char>`, for example — collect a
//! string's `chars()` first).

use core::fmt::Debug;
use core::ops::{Deref, Range};

/// Trait for types the `Lexer` can read scalar values from.
///
/// All offsets are element indices; a `char` source is indexed by
/// character count, not by UTF-8 byte position.
#[allow(clippy::len_without_is_empty)]
pub trait Source {
    /// Element type stored in the source. Comparisons in generated code
    /// are performed on the widened `u32` value.
    type Unit: Copy + PartialEq + Eq + Debug + Into<u32>;

    /// Number of elements in the source.
    fn len(&self) -> usize;

    /// Read a single scalar value at `offset`, widened to `u32`.
    /// Returns `None` when `offset` is past the end.
    fn get(&self, offset: usize) -> Option<u32>;

    /// Read a window of exactly `len` elements starting at `offset`.
    /// Returns `None` whenever the window would cross the end.
    ///
    /// ```rust
    /// use lexel::Source;
    ///
    /// let foo: Vec<char> = "foo".chars().collect();
    ///
    /// assert_eq!(foo.read_slice(0, 2), Some(&['f', 'o'][..]));
    /// assert_eq!(foo.read_slice(2, 2), None);
    /// ```
    fn read_slice(&self, offset: usize, len: usize) -> Option<&[Self::Unit]>;

    /// Get a slice of the source at the given range, analogous to
    /// `slice::get(range)`.
    fn slice(&self, range: Range<usize>) -> Option<&[Self::Unit]>;
}

impl Source for [char] {
    type Unit = char;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline]
    fn get(&self, offset: usize) -> Option<u32> {
        self.get(offset).map(|c| *c as u32)
    }

    #[inline]
    fn read_slice(&self, offset: usize, len: usize) -> Option<&[char]> {
        self.get(offset..offset + len)
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> Option<&[char]> {
        self.get(range)
    }
}

impl Source for [u32] {
    type Unit = u32;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline]
    fn get(&self, offset: usize) -> Option<u32> {
        self.get(offset).copied()
    }

    #[inline]
    fn read_slice(&self, offset: usize, len: usize) -> Option<&[u32]> {
        self.get(offset..offset + len)
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> Option<&[u32]> {
        self.get(range)
    }
}

impl Source for [u8] {
    type Unit = u8;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline]
    fn get(&self, offset: usize) -> Option<u32> {
        self.get(offset).map(|b| u32::from(*b))
    }

    #[inline]
    fn read_slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.get(offset..offset + len)
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> Option<&[u8]> {
        self.get(range)
    }
}

impl<T> Source for T
where
    T: Deref,
    <T as Deref>::Target: Source,
{
    type Unit = <T::Target as Source>::Unit;

    #[inline]
    fn len(&self) -> usize {
        self.deref().len()
    }

    #[inline]
    fn get(&self, offset: usize) -> Option<u32> {
        self.deref().get(offset)
    }

    #[inline]
    fn read_slice(&self, offset: usize, len: usize) -> Option<&[Self::Unit]> {
        self.deref().read_slice(offset, len)
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> Option<&[Self::Unit]> {
        self.deref().slice(range)
    }
}

#[cfg(test)]
mod tests {
    use super::Source;

    #[test]
    fn char_source_widens() {
        let source: Vec<char> = "ab€".chars().collect();

        assert_eq!(Source::len(&source), 3);
        assert_eq!(Source::get(&source, 0), Some(97));
        assert_eq!(Source::get(&source, 2), Some(0x20AC));
        assert_eq!(Source::get(&source, 3), None);
    }

    #[test]
    fn read_slice_bounds() {
        let source = [1u32, 2, 3];

        assert_eq!(source.read_slice(1, 2), Some(&[2u32, 3][..]));
        assert_eq!(source.read_slice(1, 3), None);
        assert_eq!(source.read_slice(3, 0), Some(&[][..]));
    }

    #[test]
    fn byte_source() {
        let source = b"ab".as_slice();

        assert_eq!(Source::get(source, 1), Some(98));
        assert_eq!(Source::slice(source, 0..2), Some(&b"ab"[..]));
    }
}
