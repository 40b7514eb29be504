//! Opening and closing runs of slots within an existing buffer.

use core::ptr;

use crate::alloc::Allocator;

use super::lifecycle::{construct, destroy, destroy_range};

/// A run of empty slots opened in the middle of the live elements by moving
/// the tail up. Dropping an unfinished gap destroys whatever was placed in it
/// and moves the tail back, restoring the original contents.
pub(crate) struct Gap<'a, T, A: Allocator> {
    alloc: &'a A,
    base: *mut T,
    at: usize,
    count: usize,
    placed: usize,
    tail: usize,
}

impl<'a, T, A: Allocator> Gap<'a, T, A> {
    /// Open `count` slots at `at` among `len` live elements.
    ///
    /// # Safety
    /// The block at `base` must have room for `len + count` elements, and the
    /// owner must not access the elements until the gap is finished or dropped.
    pub unsafe fn open(alloc: &'a A, base: *mut T, len: usize, at: usize, count: usize) -> Self {
        debug_assert!(at <= len);
        let tail = len - at;
        if tail > 0 && count > 0 {
            ptr::copy(base.add(at), base.add(at + count), tail);
        }
        Self {
            alloc,
            base,
            at,
            count,
            placed: 0,
            tail,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.placed == self.count
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        assert!(!self.is_full(), "gap overflow");
        unsafe { construct(self.alloc, self.base, self.at + self.placed, value) };
        self.placed += 1;
    }

    /// Fill the remaining slots from `produce`, which receives the ordinal of
    /// the element within the gap. Stops at the first failure.
    pub fn try_fill<E>(&mut self, mut produce: impl FnMut(usize) -> Result<T, E>) -> Result<(), E> {
        while !self.is_full() {
            let value = produce(self.placed)?;
            self.push(value);
        }
        Ok(())
    }

    /// Commit the filled gap, returning the new number of live elements.
    pub fn finish(mut self) -> usize {
        assert!(self.is_full(), "gap was not filled");
        let len = self.at + self.count + self.tail;
        self.placed = 0;
        self.tail = 0;
        self.count = 0;
        len
    }
}

impl<T, A: Allocator> Drop for Gap<'_, T, A> {
    fn drop(&mut self) {
        if self.placed > 0 {
            log::debug!("rolling back {} elements placed in a gap", self.placed);
        }
        unsafe {
            destroy_range(self.alloc, self.base, self.at..self.at + self.placed);
            if self.tail > 0 && self.count > 0 {
                ptr::copy(
                    self.base.add(self.at + self.count),
                    self.base.add(self.at),
                    self.tail,
                );
            }
        }
    }
}

/// Moves the surviving tail down over an erased run and records the final
/// length, whether or not the destructors of the erased run completed.
struct CloseTail<'a, T> {
    base: *mut T,
    len: &'a mut usize,
    first: usize,
    last: usize,
    tail: usize,
}

impl<T> Drop for CloseTail<'_, T> {
    fn drop(&mut self) {
        if self.tail > 0 && self.first != self.last {
            unsafe {
                ptr::copy(self.base.add(self.last), self.base.add(self.first), self.tail);
            }
        }
        *self.len = self.first + self.tail;
    }
}

/// Erase the live elements in `[first, last)` and close the gap they leave.
///
/// If a destructor panics, the rest of the erased run is leaked and the tail
/// is still moved into place.
///
/// # Safety
/// `*len` must be the number of live elements at `base`, and
/// `first <= last <= *len`.
pub(crate) unsafe fn close_range<T, A: Allocator>(
    alloc: &A,
    base: *mut T,
    len: &mut usize,
    first: usize,
    last: usize,
) {
    debug_assert!(first <= last && last <= *len);
    let tail = *len - last;
    *len = first;
    let _guard = CloseTail {
        base,
        len,
        first,
        last,
        tail,
    };
    destroy_range(alloc, base, first..last);
}

/// Compacts the live elements as a predicate is applied, keeping the vector
/// consistent if the predicate or a destructor panics.
struct Compact<'a, T> {
    base: *mut T,
    len: &'a mut usize,
    original: usize,
    processed: usize,
    removed: usize,
}

impl<T> Drop for Compact<'_, T> {
    fn drop(&mut self) {
        let rest = self.original - self.processed;
        if rest > 0 && self.removed > 0 {
            unsafe {
                ptr::copy(
                    self.base.add(self.processed),
                    self.base.add(self.processed - self.removed),
                    rest,
                );
            }
        }
        *self.len = self.original - self.removed;
    }
}

/// Remove every live element for which `keep` returns `false`, preserving the
/// order of the survivors. Returns the number of elements removed.
///
/// # Safety
/// `*len` must be the number of live elements at `base`.
pub(crate) unsafe fn retain<T, A: Allocator>(
    alloc: &A,
    base: *mut T,
    len: &mut usize,
    mut keep: impl FnMut(&mut T) -> bool,
) -> usize {
    let original = *len;
    *len = 0;
    let mut guard = Compact {
        base,
        len,
        original,
        processed: 0,
        removed: 0,
    };
    while guard.processed < original {
        let index = guard.processed;
        let item = &mut *base.add(index);
        if keep(item) {
            if guard.removed > 0 {
                ptr::copy_nonoverlapping(base.add(index), base.add(index - guard.removed), 1);
            }
            guard.processed += 1;
        } else {
            // Advance first so that a panicking destructor does not cause
            // the element to be dropped twice.
            guard.processed += 1;
            guard.removed += 1;
            destroy(alloc, base, index);
        }
    }
    let removed = guard.removed;
    drop(guard);
    removed
}
