//! Support for memory allocation.
//!
//! The [`Allocator`] trait is the capability set consumed by
//! [`Vec`](crate::vec::Vec): raw block allocation, in-place element
//! construction and destruction, an identity comparison, and the three
//! propagation flags which decide whether the allocator instance follows
//! the data on copy, move and swap.

use core::alloc::Layout;
use core::fmt;
use core::ptr::{self, NonNull};
#[cfg(feature = "zeroize")]
use core::slice;

#[cfg(feature = "alloc")]
use core::mem::transmute;

#[cfg(feature = "alloc")]
use alloc_crate::alloc::{alloc as raw_alloc, dealloc as raw_dealloc};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

#[cfg(all(not(test), feature = "alloc"))]
pub use alloc_crate::alloc::handle_alloc_error;

#[cfg(any(test, not(feature = "alloc")))]
/// Custom allocation error handler.
pub fn handle_alloc_error(layout: Layout) -> ! {
    panic!("memory allocation of {} bytes failed", layout.size());
}

#[cfg(feature = "alloc")]
#[inline]
pub(crate) fn layout_dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: layout alignments are guaranteed to be non-zero.
    #[allow(clippy::useless_transmute)]
    unsafe {
        NonNull::new_unchecked(transmute(layout.align()))
    }
}

/// The AllocError error indicates an allocation failure that may be due to
/// resource exhaustion or to something wrong when combining the given input
/// arguments with this allocator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

impl core::error::Error for AllocError {}

/// An implementation of `Allocator` provides blocks of memory described by a
/// `Layout`, constructs and destroys elements within those blocks, and
/// declares how it propagates between containers.
///
/// # Identity
/// Two instances are the *same* allocator when memory obtained from one may
/// be released through the other. Containers holding the same allocator may
/// exchange buffers directly; otherwise elements are migrated one by one.
///
/// # Propagation
/// - `PROPAGATE_ON_COPY`: a copy-assigned container adopts the source's
///   allocator.
/// - `PROPAGATE_ON_MOVE`: a move-assigned container adopts the source's
///   allocator (and therefore its buffer).
/// - `PROPAGATE_ON_SWAP`: swapped containers exchange allocators.
///
/// # Safety
/// - Memory blocks returned from an allocator must point to valid memory and
///   retain their validity until released or until the instance and all
///   instances it is the same as are dropped.
/// - Moving the allocator must not invalidate memory blocks returned from it.
/// - `same_as` must only return `true` when blocks may be released through
///   either instance.
pub unsafe trait Allocator {
    /// Whether copy assignment transfers the source allocator.
    const PROPAGATE_ON_COPY: bool = false;
    /// Whether move assignment transfers the source allocator.
    const PROPAGATE_ON_MOVE: bool = false;
    /// Whether swapping exchanges allocators.
    const PROPAGATE_ON_SWAP: bool = false;

    /// Try to allocate a slice of memory within this allocator instance,
    /// returning the new allocation.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Release an allocation produced by this allocator.
    ///
    /// # Safety
    /// The value `ptr` must represent an allocation produced by this allocator
    /// (or one it is the same as), and `layout` must correspond to the layout
    /// used to produce the allocation.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Compare the identity of two allocator instances.
    fn same_as(&self, other: &Self) -> bool;

    /// Select the allocator for a container copy-constructed from one using
    /// this allocator.
    #[inline]
    fn select_on_copy(&self) -> Self
    where
        Self: Clone,
    {
        self.clone()
    }

    /// Construct a value in place.
    ///
    /// # Safety
    /// `slot` must be valid for writes, properly aligned, and must not hold a
    /// live value.
    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        slot.as_ptr().write(value)
    }

    /// Destroy a value in place.
    ///
    /// # Safety
    /// `slot` must hold a live value which is not used again.
    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        ptr::drop_in_place(slot.as_ptr())
    }
}

/// A trait implemented by allocators supporting a constant initializer.
pub trait AllocatorDefault: Allocator + Clone + Default {
    /// The constant initializer for this allocator.
    const DEFAULT: Self;
}

/// The global memory allocator.
///
/// When the `alloc` feature is enabled, this type implements the `Allocator`
/// trait by forwarding calls to the allocator registered with the
/// `#[global_allocator]` attribute if there is one, or the `std` crate's default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "alloc", derive(Default, Copy))]
pub struct Global;

#[cfg(feature = "alloc")]
unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ptr = if layout.size() == 0 {
            layout_dangling(layout)
        } else {
            let Some(ptr) = NonNull::new(unsafe { raw_alloc(layout) }) else {
                return Err(AllocError);
            };
            ptr
        };
        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            raw_dealloc(ptr.as_ptr(), layout);
        }
    }

    #[inline]
    fn same_as(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(not(feature = "alloc"))]
// Stub implementation to allow Global as the default allocator type
// even when the `alloc` feature is not enabled. Any usage as an allocator
// will result in a panic.
unsafe impl Allocator for Global {
    fn allocate(&self, _layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        unimplemented!();
    }

    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {
        unimplemented!();
    }

    fn same_as(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(feature = "alloc")]
impl AllocatorDefault for Global {
    const DEFAULT: Self = Global;
}

#[cfg(feature = "zeroize")]
/// An allocator which allocates via `A` and zeroizes all buffers when they are released.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroizingAlloc<A>(pub A);

#[cfg(feature = "zeroize")]
unsafe impl<A: Allocator> Allocator for ZeroizingAlloc<A> {
    const PROPAGATE_ON_COPY: bool = A::PROPAGATE_ON_COPY;
    const PROPAGATE_ON_MOVE: bool = A::PROPAGATE_ON_MOVE;
    const PROPAGATE_ON_SWAP: bool = A::PROPAGATE_ON_SWAP;

    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.0.allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            let mem = slice::from_raw_parts_mut(ptr.as_ptr(), layout.size());
            mem.zeroize();
        }
        self.0.deallocate(ptr, layout)
    }

    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        self.0.same_as(&other.0)
    }
}

#[cfg(feature = "zeroize")]
impl<A: AllocatorDefault> AllocatorDefault for ZeroizingAlloc<A> {
    const DEFAULT: Self = ZeroizingAlloc(A::DEFAULT);
}

/// An allocator borrowed from an `allocator_api2` implementation, such as an
/// arena or pool. Two instances are the same allocator when they borrow the
/// same underlying instance.
#[cfg(feature = "allocator-api2")]
#[derive(Debug)]
pub struct Borrowed<'a, A>(&'a A);

#[cfg(feature = "allocator-api2")]
impl<'a, A> Borrowed<'a, A> {
    /// Borrow an allocator instance.
    #[inline]
    pub const fn new(alloc: &'a A) -> Self {
        Self(alloc)
    }
}

#[cfg(feature = "allocator-api2")]
impl<A> Clone for Borrowed<'_, A> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

#[cfg(feature = "allocator-api2")]
impl<A> Copy for Borrowed<'_, A> {}

#[cfg(feature = "allocator-api2")]
unsafe impl<'a, A> Allocator for Borrowed<'a, A>
where
    &'a A: allocator_api2::alloc::Allocator,
{
    const PROPAGATE_ON_MOVE: bool = true;
    const PROPAGATE_ON_SWAP: bool = true;

    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        allocator_api2::alloc::Allocator::allocate(&self.0, layout).map_err(|_| AllocError)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        allocator_api2::alloc::Allocator::deallocate(&self.0, ptr, layout)
    }

    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "alloc")]
    #[test]
    fn global_round_trip() {
        let layout = Layout::array::<u64>(4).unwrap();
        let block = Global.allocate(layout).expect("allocation failed");
        assert_eq!(block.len(), layout.size());
        unsafe { Global.deallocate(block.cast(), layout) };
        assert!(Global.same_as(&Global));
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn global_zero_sized() {
        let layout = Layout::new::<()>();
        let block = Global.allocate(layout).expect("allocation failed");
        assert_eq!(block.len(), 0);
        unsafe { Global.deallocate(block.cast(), layout) };
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn construct_destroy_in_place() {
        use core::cell::Cell;

        struct Tally<'a>(&'a Cell<usize>);
        impl Drop for Tally<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Cell::new(0);
        let layout = Layout::new::<Tally<'_>>();
        let block = Global.allocate(layout).expect("allocation failed");
        let slot = block.cast::<Tally<'_>>();
        unsafe {
            Global.construct(slot, Tally(&drops));
            Global.destroy(slot);
            Global.deallocate(block.cast(), layout);
        }
        assert_eq!(drops.get(), 1);
    }
}
