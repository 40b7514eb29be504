//! Growth policies and capacity limits for collections.

use core::alloc::Layout;
use core::fmt::Debug;
use core::mem::size_of;

use crate::error::VecError;

/// The largest number of elements of type `T` which may be addressed by a
/// single buffer: the largest representable offset divided by the element
/// size. Zero-sized types are bounded by the offset alone.
#[inline]
pub const fn max_size<T>() -> usize {
    let size = size_of::<T>();
    if size == 0 {
        isize::MAX as usize
    } else {
        isize::MAX as usize / size
    }
}

#[inline]
pub(crate) fn array_layout<T>(count: usize) -> Result<Layout, VecError> {
    let max = max_size::<T>();
    if count > max {
        return Err(VecError::Length {
            requested: count,
            max,
        });
    }
    Layout::array::<T>(count).map_err(|_| VecError::Length {
        requested: count,
        max,
    })
}

/// Growth behavior for collections which have exceeded their available storage.
pub trait Grow: Debug {
    /// Calculate the next capacity to request from the allocator. The result
    /// must be at least `required`.
    fn next_capacity<T>(current: usize, required: usize) -> usize;
}

/// Growth behavior which never requests extra capacity.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowExact;

impl Grow for GrowExact {
    #[inline]
    fn next_capacity<T>(_current: usize, required: usize) -> usize {
        required
    }
}

/// Growth behavior which starts from a single slot and doubles the current
/// capacity until the requirement is met.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowDoubling;

impl Grow for GrowDoubling {
    #[inline]
    fn next_capacity<T>(current: usize, required: usize) -> usize {
        let mut capacity = if current == 0 { 1 } else { current };
        while capacity < required {
            let next = capacity.saturating_mul(2);
            if next == capacity {
                break;
            }
            capacity = next;
        }
        capacity.max(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_from_empty() {
        assert_eq!(GrowDoubling::next_capacity::<u32>(0, 0), 1);
        assert_eq!(GrowDoubling::next_capacity::<u32>(0, 1), 1);
        assert_eq!(GrowDoubling::next_capacity::<u32>(0, 5), 8);
    }

    #[test]
    fn doubling_from_current() {
        assert_eq!(GrowDoubling::next_capacity::<u32>(4, 5), 8);
        assert_eq!(GrowDoubling::next_capacity::<u32>(3, 13), 24);
        assert_eq!(GrowDoubling::next_capacity::<u32>(8, 8), 8);
    }

    #[test]
    fn doubling_saturates() {
        let cap = GrowDoubling::next_capacity::<u8>(usize::MAX / 2 + 1, usize::MAX);
        assert_eq!(cap, usize::MAX);
    }

    #[test]
    fn exact_growth() {
        assert_eq!(GrowExact::next_capacity::<u32>(4, 5), 5);
        assert_eq!(GrowExact::next_capacity::<u32>(0, 0), 0);
    }

    #[test]
    fn max_size_bounds() {
        assert_eq!(max_size::<u8>(), isize::MAX as usize);
        assert_eq!(max_size::<u64>(), isize::MAX as usize / 8);
        assert_eq!(max_size::<()>(), isize::MAX as usize);
        assert!(array_layout::<u64>(max_size::<u64>() + 1).is_err());
        assert_eq!(array_layout::<u32>(3).unwrap().size(), 12);
    }
}
