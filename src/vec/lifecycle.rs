//! Single-element construction and destruction within a buffer.

use core::ops::Range;
use core::ptr::NonNull;

use crate::alloc::Allocator;

#[inline]
unsafe fn slot<T>(base: *mut T, index: usize) -> NonNull<T> {
    NonNull::new_unchecked(base.add(index))
}

/// Place one element into an allocated but empty slot.
///
/// # Safety
/// `base.add(index)` must be within the block and must not hold a live value.
#[inline]
pub(crate) unsafe fn construct<T, A: Allocator>(alloc: &A, base: *mut T, index: usize, value: T) {
    alloc.construct(slot(base, index), value)
}

/// Destroy one live element.
///
/// # Safety
/// `base.add(index)` must hold a live value which is not used again.
#[inline]
pub(crate) unsafe fn destroy<T, A: Allocator>(alloc: &A, base: *mut T, index: usize) {
    alloc.destroy(slot(base, index))
}

/// Destroy each live element in `range`, in index order.
///
/// If a destructor panics, the remaining elements of the range are leaked.
///
/// # Safety
/// Every slot in `range` must hold a live value which is not used again.
pub(crate) unsafe fn destroy_range<T, A: Allocator>(alloc: &A, base: *mut T, range: Range<usize>) {
    for index in range {
        destroy(alloc, base, index);
    }
}

/// Fills a run of empty slots one element at a time. Until the guard is
/// finished, dropping it destroys exactly the elements it placed.
pub(crate) struct Placement<'a, T, A: Allocator> {
    alloc: &'a A,
    base: *mut T,
    start: usize,
    end: usize,
    limit: usize,
}

impl<'a, T, A: Allocator> Placement<'a, T, A> {
    /// # Safety
    /// The slots `[start, limit)` relative to `base` must be allocated, empty
    /// and not otherwise accessed while the guard is alive.
    #[inline]
    pub unsafe fn new(alloc: &'a A, base: *mut T, start: usize, limit: usize) -> Self {
        debug_assert!(start <= limit);
        Self {
            alloc,
            base,
            start,
            end: start,
            limit,
        }
    }

    /// The number of elements placed so far.
    #[inline]
    pub fn placed(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.end == self.limit
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        assert!(!self.is_full(), "placement overflow");
        unsafe { construct(self.alloc, self.base, self.end, value) };
        self.end += 1;
    }

    /// Fill every remaining slot from `produce`, which receives the ordinal
    /// of the element within the run. Stops at the first failure.
    pub fn try_fill<E>(
        &mut self,
        mut produce: impl FnMut(usize) -> Result<T, E>,
    ) -> Result<(), E> {
        while !self.is_full() {
            let value = produce(self.placed())?;
            self.push(value);
        }
        Ok(())
    }

    /// Fill the run with clones of `src`, which must exactly cover it.
    pub fn fill_cloned(&mut self, src: &[T])
    where
        T: Clone,
    {
        debug_assert_eq!(src.len(), self.limit - self.end);
        for item in src {
            self.push(item.clone());
        }
    }

    /// Keep the placed elements and return the end of the filled run.
    #[inline]
    pub fn finish(mut self) -> usize {
        let end = self.end;
        self.start = end;
        end
    }
}

impl<T, A: Allocator> Drop for Placement<'_, T, A> {
    fn drop(&mut self) {
        if self.start != self.end {
            log::debug!("rolling back {} placed elements", self.end - self.start);
            unsafe { destroy_range(self.alloc, self.base, self.start..self.end) };
        }
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use core::cell::Cell;
    use core::mem::MaybeUninit;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::alloc::Global;

    struct Tally<'a>(&'a Cell<usize>);

    impl Drop for Tally<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn placement_finish_keeps_elements() {
        let mut slots = [MaybeUninit::<u32>::uninit(); 4];
        let base = slots.as_mut_ptr().cast::<u32>();
        let mut place = unsafe { Placement::new(&Global, base, 1, 3) };
        place.try_fill(|i| Ok::<_, ()>(i as u32 + 10)).unwrap();
        assert_eq!(place.finish(), 3);
        unsafe {
            assert_eq!(slots[1].assume_init(), 10);
            assert_eq!(slots[2].assume_init(), 11);
        }
    }

    #[test]
    fn placement_failure_destroys_placed() {
        let drops = Cell::new(0);
        let mut slots: [MaybeUninit<Tally<'_>>; 5] = [const { MaybeUninit::uninit() }; 5];
        let base = slots.as_mut_ptr().cast::<Tally<'_>>();
        let mut place = unsafe { Placement::new(&Global, base, 0, 5) };
        let res = place.try_fill(|i| if i == 3 { Err("fail") } else { Ok(Tally(&drops)) });
        assert_eq!(res, Err("fail"));
        assert_eq!(place.placed(), 3);
        drop(place);
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn placement_panic_destroys_placed() {
        let drops = Cell::new(0);
        let mut slots: [MaybeUninit<Tally<'_>>; 4] = [const { MaybeUninit::uninit() }; 4];
        let base = slots.as_mut_ptr().cast::<Tally<'_>>();
        let res = catch_unwind(AssertUnwindSafe(|| {
            let mut place = unsafe { Placement::new(&Global, base, 0, 4) };
            place
                .try_fill(|i| {
                    if i == 2 {
                        panic!("producer panic");
                    }
                    Ok::<_, ()>(Tally(&drops))
                })
                .ok();
        }));
        assert!(res.is_err());
        assert_eq!(drops.get(), 2);
    }
}
