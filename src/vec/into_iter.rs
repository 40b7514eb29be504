use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;
use core::ptr;
use core::slice;

use crate::alloc::Allocator;

use super::buffer::RawBuf;
use super::lifecycle::destroy_range;

/// An iterator which moves the elements out of a `Vec`.
///
/// The buffer is released when the iterator is dropped, after any elements
/// which were not yielded are destroyed.
pub struct IntoIter<T, A: Allocator> {
    remain: Range<usize>,
    buf: RawBuf<T, A>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(super) fn new(buf: RawBuf<T, A>, len: usize) -> Self {
        Self {
            remain: Range { start: 0, end: len },
            buf,
        }
    }

    /// Access the remaining elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.remain.start), self.len()) }
    }

    /// Access the remaining elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr().add(self.remain.start), self.len()) }
    }

    /// Get a reference to the allocator of the underlying buffer.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// The number of elements remaining.
    pub const fn len(&self) -> usize {
        self.remain.end - self.remain.start
    }

    /// Whether the iterator is exhausted.
    pub const fn is_empty(&self) -> bool {
        self.remain.start == self.remain.end
    }

    fn clear(&mut self) {
        let remain = self.remain.clone();
        if !remain.is_empty() {
            self.remain.start = self.remain.end;
            unsafe { destroy_range(self.buf.allocator(), self.buf.as_ptr(), remain) };
        }
    }
}

impl<T, A: Allocator> AsRef<[T]> for IntoIter<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for IntoIter<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.remain.start;
        if index != self.remain.end {
            self.remain.start = index + 1;
            Some(unsafe { ptr::read(self.buf.as_ptr().add(index)) })
        } else {
            None
        }
    }

    #[inline]
    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.len()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remain.start != self.remain.end {
            self.remain.end -= 1;
            Some(unsafe { ptr::read(self.buf.as_ptr().add(self.remain.end)) })
        } else {
            None
        }
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}
