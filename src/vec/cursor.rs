//! Validated positions within a `Vec`.
//!
//! A [`Cursor`] records a stamp which identifies both the vector it was
//! derived from and the state of that vector's buffer. Stamps are drawn from
//! a process-wide counter and never reused, so a cursor is never accepted by
//! another vector, even one which reuses the same block. Any operation which
//! moves existing elements, destroys elements or replaces the buffer retires
//! the stamp, after which older cursors are rejected. Appending within the
//! current capacity keeps cursors to existing elements valid but invalidates
//! a cursor taken at the old end.

use core::cmp::Ordering;
use core::sync::atomic;

use crate::alloc::Allocator;
use crate::capacity::Grow;
use crate::error::{UpdateError, VecError};

use super::Vec;

/// A position within a `Vec`, checked against the vector on every use.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    index: usize,
    stamp: u64,
    span: usize,
}

impl Cursor {
    /// The element index this cursor refers to.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn same_source(&self, other: &Self) -> bool {
        self.stamp == other.stamp
    }

    /// The signed number of positions from this cursor to `other`, if both
    /// were derived from the same vector in the same buffer state.
    pub fn distance(&self, other: &Self) -> Option<isize> {
        if !self.same_source(other) {
            return None;
        }
        let (a, b) = (self.index as isize, other.index as isize);
        Some(b - a)
    }
}

impl PartialEq for Cursor {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.same_source(other) && self.index == other.index
    }
}

impl PartialOrd for Cursor {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_source(other) {
            Some(self.index.cmp(&other.index))
        } else {
            None
        }
    }
}

impl<T, A: Allocator, G: Grow> Vec<T, A, G> {
    #[inline]
    fn cursor_unchecked(&self, index: usize) -> Cursor {
        Cursor {
            index,
            stamp: self.stamp(),
            span: self.len,
        }
    }

    /// A cursor to the first element, equal to `end()` when empty.
    #[inline]
    pub fn begin(&self) -> Cursor {
        self.cursor_unchecked(0)
    }

    /// A cursor one past the last element.
    #[inline]
    pub fn end(&self) -> Cursor {
        self.cursor_unchecked(self.len)
    }

    /// A cursor to `index`, which may equal `len()`.
    #[inline]
    pub fn cursor(&self, index: usize) -> Option<Cursor> {
        (index <= self.len).then(|| self.cursor_unchecked(index))
    }

    /// Whether `cursor` still refers to a position in this vector.
    pub fn is_valid_cursor(&self, cursor: &Cursor) -> bool {
        cursor.stamp == self.stamp.load(atomic::Ordering::Relaxed)
            && cursor.index <= self.len
            && (cursor.index < cursor.span || cursor.span == self.len)
    }

    #[inline]
    fn resolve(&self, cursor: &Cursor) -> Result<usize, VecError> {
        if self.is_valid_cursor(cursor) {
            Ok(cursor.index)
        } else {
            Err(VecError::InvalidCursor)
        }
    }

    /// The element at `cursor`, or `None` if the cursor is stale or at the end.
    pub fn get_at(&self, cursor: &Cursor) -> Option<&T> {
        let index = self.resolve(cursor).ok()?;
        self.as_slice().get(index)
    }

    /// The mutable element at `cursor`, or `None` if the cursor is stale or
    /// at the end.
    pub fn get_at_mut(&mut self, cursor: &Cursor) -> Option<&mut T> {
        let index = self.resolve(cursor).ok()?;
        self.as_mut_slice().get_mut(index)
    }

    /// Insert `value` before `cursor`, returning a cursor to the new element.
    ///
    /// # Panics
    /// Panics if the cursor is invalid or the allocation fails.
    pub fn insert_at(&mut self, cursor: &Cursor, value: T) -> Cursor {
        match self.try_insert_at(cursor, value) {
            Ok(cursor) => cursor,
            Err(error) => error.panic(),
        }
    }

    /// Try to insert `value` before `cursor`, returning it on failure.
    pub fn try_insert_at(&mut self, cursor: &Cursor, value: T) -> Result<Cursor, UpdateError<T>> {
        let index = match self.resolve(cursor) {
            Ok(index) => index,
            Err(error) => return Err(UpdateError::new(error, value)),
        };
        self.try_insert(index, value)?;
        Ok(self.cursor_unchecked(index))
    }

    /// Insert `count` clones of `value` before `cursor`, returning a cursor to
    /// the first inserted element.
    ///
    /// # Panics
    /// Panics if the cursor is invalid or the allocation fails.
    pub fn insert_n_at(&mut self, cursor: &Cursor, count: usize, value: &T) -> Cursor
    where
        T: Clone,
    {
        let index = match self.resolve(cursor) {
            Ok(index) => index,
            Err(error) => error.panic(),
        };
        self.insert_n(index, count, value);
        self.cursor_unchecked(index)
    }

    /// Construct an element before `cursor`, returning a cursor to it.
    ///
    /// # Panics
    /// Panics if the cursor is invalid or the allocation fails.
    pub fn emplace_at(&mut self, cursor: &Cursor, f: impl FnOnce() -> T) -> Cursor {
        let index = match self.resolve(cursor) {
            Ok(index) => index,
            Err(error) => error.panic(),
        };
        self.emplace_with(index, f);
        self.cursor_unchecked(index)
    }

    /// Destroy the element at `cursor`, returning a cursor to the element
    /// which followed it.
    ///
    /// # Panics
    /// Panics if the cursor is invalid or at the end.
    pub fn erase_at(&mut self, cursor: &Cursor) -> Cursor {
        match self.try_erase_at(cursor) {
            Ok(cursor) => cursor,
            Err(error) => error.panic(),
        }
    }

    /// Try to destroy the element at `cursor`.
    pub fn try_erase_at(&mut self, cursor: &Cursor) -> Result<Cursor, VecError> {
        let index = self.resolve(cursor)?;
        if index == self.len {
            return Err(VecError::Range {
                index,
                len: self.len,
            });
        }
        self.try_erase(index..index + 1)?;
        Ok(self.cursor_unchecked(index))
    }

    /// Destroy the elements from `first` up to `last`, returning a cursor to
    /// the element which followed them.
    ///
    /// # Panics
    /// Panics if either cursor is invalid or `first` follows `last`.
    pub fn erase_between(&mut self, first: &Cursor, last: &Cursor) -> Cursor {
        match self.try_erase_between(first, last) {
            Ok(cursor) => cursor,
            Err(error) => error.panic(),
        }
    }

    /// Try to destroy the elements from `first` up to `last`.
    pub fn try_erase_between(&mut self, first: &Cursor, last: &Cursor) -> Result<Cursor, VecError> {
        let start = self.resolve(first)?;
        let end = self.resolve(last)?;
        self.try_erase(start..end)?;
        Ok(self.cursor_unchecked(start))
    }
}
