//! Staged buffers for reallocation with the strong guarantee.
//!
//! A `Staged` buffer is allocated alongside the buffer it will replace. New
//! elements are placed into it first, then the existing elements are
//! relocated around them. Only once everything is in place is the staged
//! block handed back for adoption, so any failure before that point leaves
//! the original buffer untouched.

use core::mem::{self, size_of};
use core::ops::Range;
use core::ptr::{self, NonNull};

use crate::alloc::Allocator;
use crate::error::VecError;

use super::buffer::{allocate_block, empty_capacity, release_block};
use super::lifecycle::{destroy_range, Placement};

pub(crate) struct Staged<'a, T, A: Allocator> {
    alloc: &'a A,
    ptr: NonNull<T>,
    capacity: usize,
    live: Range<usize>,
}

impl<'a, T, A: Allocator> Staged<'a, T, A> {
    /// Allocate a block of `capacity` slots through `alloc`.
    pub fn allocate(alloc: &'a A, capacity: usize) -> Result<Self, VecError> {
        let ptr = allocate_block::<T, A>(alloc, capacity)?;
        let capacity = if size_of::<T>() == 0 {
            empty_capacity::<T>()
        } else {
            capacity
        };
        Ok(Self {
            alloc,
            ptr,
            capacity,
            live: 0..0,
        })
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    fn placement(&mut self, at: usize, count: usize) -> Placement<'a, T, A> {
        assert!(self.live.is_empty() && at + count <= self.capacity);
        unsafe { Placement::new(self.alloc, self.ptr.as_ptr(), at, at + count) }
    }

    /// Construct `count` new elements at `at` from `produce`. On failure the
    /// elements already placed are destroyed.
    pub fn try_fill<E>(
        &mut self,
        at: usize,
        count: usize,
        produce: impl FnMut(usize) -> Result<T, E>,
    ) -> Result<(), E> {
        let mut place = self.placement(at, count);
        place.try_fill(produce)?;
        place.finish();
        self.live = at..at + count;
        Ok(())
    }

    /// Clone every element of `src` into the start of the block.
    pub fn fill_cloned(&mut self, src: &[T])
    where
        T: Clone,
    {
        let mut place = self.placement(0, src.len());
        place.fill_cloned(src);
        place.finish();
        self.live = 0..src.len();
    }

    /// Relocate the `len` elements at `src` into the block, leaving the
    /// elements already placed in a gap starting at `at`. Afterward the
    /// source slots are logically uninitialized.
    ///
    /// # Safety
    /// `src` must point to `len` live elements in a separate block, and the
    /// placed run (if any) must begin at `at`.
    pub unsafe fn relocate_around(&mut self, src: *const T, len: usize, at: usize) {
        let gap = self.live.len();
        debug_assert!(gap == 0 || self.live.start == at);
        debug_assert!(at <= len && len + gap <= self.capacity);
        let dst = self.ptr.as_ptr();
        ptr::copy_nonoverlapping(src, dst, at);
        ptr::copy_nonoverlapping(src.add(at), dst.add(at + gap), len - at);
        self.live = 0..len + gap;
    }

    /// Relocate `len` elements from `src` into the start of an empty block.
    ///
    /// # Safety
    /// As for `relocate_around`.
    #[inline]
    pub unsafe fn relocate_from(&mut self, src: *const T, len: usize) {
        debug_assert!(self.live.is_empty());
        self.relocate_around(src, len, len);
    }

    /// Hand over the block and the number of live elements it holds, which
    /// always form a prefix of the block.
    pub fn into_parts(self) -> (NonNull<T>, usize, usize) {
        debug_assert_eq!(self.live.start, 0);
        let parts = (self.ptr, self.capacity, self.live.end);
        mem::forget(self);
        parts
    }
}

impl<T, A: Allocator> Drop for Staged<'_, T, A> {
    fn drop(&mut self) {
        log::debug!("discarding staged buffer of {} slots", self.capacity);
        unsafe {
            destroy_range(self.alloc, self.ptr.as_ptr(), self.live.clone());
            release_block(self.alloc, self.ptr, self.capacity);
        }
    }
}
