//! The owned storage block backing a `Vec`.

use core::mem::{self, size_of};
use core::ptr::NonNull;

use crate::alloc::Allocator;
use crate::capacity::{array_layout, max_size};
use crate::error::VecError;

/// Acquire an uninitialized block for `capacity` elements of `T`.
///
/// Zero-sized element types and zero capacities never reach the allocator.
#[inline]
pub(crate) fn allocate_block<T, A: Allocator>(
    alloc: &A,
    capacity: usize,
) -> Result<NonNull<T>, VecError> {
    let layout = array_layout::<T>(capacity)?;
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }
    match alloc.allocate(layout) {
        Ok(block) => Ok(block.cast()),
        Err(_) => Err(VecError::OutOfMemory(layout)),
    }
}

/// Release a block obtained from `allocate_block`.
///
/// # Safety
/// `ptr` and `capacity` must describe a block produced by `allocate_block`
/// through `alloc` (or an allocator it is the same as) which has not been
/// released.
#[inline]
pub(crate) unsafe fn release_block<T, A: Allocator>(alloc: &A, ptr: NonNull<T>, capacity: usize) {
    if size_of::<T>() == 0 || capacity == 0 {
        return;
    }
    // SAFETY: the layout was validated when the block was allocated.
    let layout = array_layout::<T>(capacity).unwrap_unchecked();
    alloc.deallocate(ptr.cast(), layout);
}

/// The empty capacity for element type `T`: zero for sized types and the
/// full addressable range for zero-sized types, which never allocate.
#[inline]
pub(crate) const fn empty_capacity<T>() -> usize {
    if size_of::<T>() == 0 {
        max_size::<T>()
    } else {
        0
    }
}

/// A single-owner block of `capacity` slots of `T` and the allocator which
/// produced it. The block is released exactly once, when the buffer is
/// dropped or when a replacement block is adopted.
pub(crate) struct RawBuf<T, A: Allocator> {
    ptr: NonNull<T>,
    capacity: usize,
    alloc: A,
}

impl<T, A: Allocator> RawBuf<T, A> {
    #[inline]
    pub const fn dangling(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: empty_capacity::<T>(),
            alloc,
        }
    }

    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, VecError> {
        if capacity == 0 || size_of::<T>() == 0 {
            return Ok(Self::dangling(alloc));
        }
        let ptr = allocate_block::<T, A>(&alloc, capacity)?;
        Ok(Self {
            ptr,
            capacity,
            alloc,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Whether a block is currently held.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        size_of::<T>() != 0 && self.capacity != 0
    }

    /// Adopt a new block, releasing the current one.
    ///
    /// # Safety
    /// The new block must have been allocated through this buffer's allocator
    /// (or one it is the same as) with the given capacity, and no live
    /// elements may remain in the current block.
    pub unsafe fn replace_block(&mut self, ptr: NonNull<T>, capacity: usize) {
        log::trace!(
            "adopting storage for {} slots (previously {})",
            capacity,
            self.capacity
        );
        let prev = mem::replace(&mut self.ptr, ptr);
        let prev_capacity = mem::replace(&mut self.capacity, capacity);
        release_block(&self.alloc, prev, prev_capacity);
    }

    /// Release the current block, leaving the buffer unallocated.
    ///
    /// # Safety
    /// No live elements may remain in the current block.
    pub unsafe fn release(&mut self) {
        let prev = mem::replace(&mut self.ptr, NonNull::dangling());
        let prev_capacity = mem::replace(&mut self.capacity, empty_capacity::<T>());
        if size_of::<T>() != 0 && prev_capacity != 0 {
            log::trace!("releasing storage for {} slots", prev_capacity);
            release_block(&self.alloc, prev, prev_capacity);
        }
    }

    /// Exchange blocks with another buffer, keeping the allocators in place.
    ///
    /// # Safety
    /// The allocators of both buffers must be the same.
    #[inline]
    pub unsafe fn swap_blocks(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Replace the allocator instance.
    ///
    /// # Safety
    /// Either no block is held, or the new allocator must be the same as the
    /// current one.
    #[inline]
    pub unsafe fn replace_allocator(&mut self, alloc: A) -> A {
        mem::replace(&mut self.alloc, alloc)
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        unsafe { release_block(&self.alloc, self.ptr, self.capacity) };
    }
}

// The buffer owns its block exclusively; thread-safety follows the element
// and allocator types.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuf<T, A> {}

unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuf<T, A> {}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::alloc::Global;

    #[test]
    fn dangling_is_unallocated() {
        let buf = RawBuf::<u32, Global>::dangling(Global);
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
    }

    #[test]
    fn zero_sized_never_allocates() {
        let buf = RawBuf::<(), Global>::try_with_capacity_in(10, Global).unwrap();
        assert_eq!(buf.capacity(), max_size::<()>());
        assert!(!buf.is_allocated());
    }

    #[test]
    fn allocate_and_release() {
        let mut buf = RawBuf::<u64, Global>::try_with_capacity_in(8, Global).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert!(buf.is_allocated());
        assert_ne!(buf.as_ptr(), NonNull::<u64>::dangling().as_ptr());
        unsafe { buf.release() };
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
    }

    #[test]
    fn capacity_limit() {
        let res = RawBuf::<u64, Global>::try_with_capacity_in(usize::MAX, Global);
        assert!(matches!(res, Err(VecError::Length { .. })));
    }
}
