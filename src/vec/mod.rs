//! A contiguous growable array type with allocator propagation and failure
//! guarantees.
//!
//! Every operation which may need more storage first stages a replacement
//! buffer and only adopts it once all new elements are in place, so a failed
//! allocation or element constructor leaves the vector as it was.

use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem::{self, size_of, ManuallyDrop};
use core::ops::{Bound, Deref, DerefMut, Index, IndexMut, Range, RangeBounds};
use core::ptr::{self, NonNull};
use core::slice::{self, SliceIndex};
use core::sync::atomic::{self, AtomicU64};

use const_default::ConstDefault;

use crate::alloc::{Allocator, AllocatorDefault, Global};
use crate::capacity::{max_size, Grow, GrowDoubling};
use crate::error::{UpdateError, VecError};

use self::buffer::RawBuf;
use self::realloc::Staged;
use self::shift::Gap;

pub use self::cursor::Cursor;
pub use self::into_iter::IntoIter;

#[macro_use]
mod macros;

mod buffer;
mod cursor;
mod into_iter;
mod lifecycle;
mod realloc;
mod shift;

#[cfg(feature = "zeroize")]
/// A `Vec` which zeroizes every buffer it releases.
pub type ZeroizingVec<T> = Vec<T, crate::alloc::ZeroizingAlloc<Global>>;

/// Source of cursor stamps. Zero is reserved for a vector which has not
/// handed out a cursor since its last invalidation.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

#[inline]
fn range_error(index: usize, len: usize) -> VecError {
    VecError::Range { index, len }
}

#[inline]
fn bounds_to_range(range: impl RangeBounds<usize>, len: usize) -> Result<Range<usize>, VecError> {
    let start = match range.start_bound() {
        Bound::Unbounded => 0,
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i.checked_add(1).ok_or(range_error(i, len))?,
    };
    let end = match range.end_bound() {
        Bound::Unbounded => len,
        Bound::Included(&i) => i.checked_add(1).ok_or(range_error(i, len))?,
        Bound::Excluded(&i) => i,
    };
    if end > len {
        Err(range_error(end, len))
    } else if start > end {
        Err(range_error(start, len))
    } else {
        Ok(Range { start, end })
    }
}

/// Adapt a single-use producer to the ordinal producers used by the
/// placement guards.
#[inline]
fn once<T, E>(f: impl FnOnce() -> Result<T, E>) -> impl FnMut(usize) -> Result<T, E> {
    let mut f = Some(f);
    move |_| match f.take() {
        Some(f) => f(),
        None => unreachable!("single producer invoked twice"),
    }
}

#[cfg(feature = "alloc")]
#[inline]
/// Create a `Vec<T>` from an array `[T; N]`.
pub fn from_array<T, const N: usize>(data: [T; N]) -> Vec<T> {
    from_array_in(data, Global)
}

#[inline]
/// Create a `Vec<T, A>` from an array `[T; N]` and an allocator instance.
pub fn from_array_in<T, A: Allocator, const N: usize>(data: [T; N], alloc: A) -> Vec<T, A> {
    let mut v = Vec::with_capacity_in(N, alloc);
    v.extend(data);
    v
}

#[cfg(feature = "alloc")]
#[inline]
/// Create a `Vec<T>` holding `count` clones of `elem`.
pub fn from_elem<T: Clone>(elem: T, count: usize) -> Vec<T> {
    from_elem_in(elem, count, Global)
}

#[inline]
/// Create a `Vec<T, A>` holding `count` clones of `elem`, allocated from an
/// allocator instance.
pub fn from_elem_in<T: Clone, A: Allocator>(elem: T, count: usize, alloc: A) -> Vec<T, A> {
    match Vec::try_from_elem_in(elem, count, alloc) {
        Ok(vec) => vec,
        Err(error) => error.panic(),
    }
}

/// Remove every element equal to `value`, returning the number removed.
pub fn erase<T, U, A, G>(vec: &mut Vec<T, A, G>, value: &U) -> usize
where
    T: PartialEq<U>,
    A: Allocator,
    G: Grow,
{
    erase_if(vec, |item| item == value)
}

/// Remove every element matching `pred`, returning the number removed.
pub fn erase_if<T, A, G>(vec: &mut Vec<T, A, G>, mut pred: impl FnMut(&T) -> bool) -> usize
where
    A: Allocator,
    G: Grow,
{
    vec.retain_counted(|item| !pred(item))
}

/// A contiguous growable array type.
///
/// The allocator `A` supplies the buffer and decides how the allocator
/// instance follows the contents when vectors are copied, moved or swapped.
/// The growth policy `G` computes the new capacity when the buffer is full.
pub struct Vec<T, A: Allocator = Global, G: Grow = GrowDoubling> {
    buf: RawBuf<T, A>,
    len: usize,
    stamp: AtomicU64,
    _grow: PhantomData<fn() -> G>,
}

#[cfg(feature = "alloc")]
impl<T> Vec<T> {
    /// Constructs a new, empty `Vec<T>`.
    ///
    /// The vector will not allocate until elements are pushed onto it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sturdy_vec::Vec;
    /// let mut vec: Vec<i32> = Vec::new();
    /// vec.push(1);
    /// assert_eq!(vec, [1]);
    /// ```
    pub const fn new() -> Self {
        Self::empty(Global)
    }

    /// Constructs a new, empty `Vec<T>` with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Try to construct a new, empty `Vec<T>` with exactly `capacity` slots.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, VecError> {
        Self::try_with_capacity_in(capacity, Global)
    }

    /// Constructs a `Vec<T>` holding `count` default values.
    pub fn from_default(count: usize) -> Self
    where
        T: Default,
    {
        Self::from_default_in(count, Global)
    }

    /// Constructs a `Vec<T>` holding clones of the elements of `data`.
    pub fn from_slice(data: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_slice_in(data, Global)
    }
}

impl<T, A: Allocator> Vec<T, A> {
    /// Constructs a new, empty `Vec<T, A>` using an allocator instance.
    pub const fn new_in(alloc: A) -> Self {
        Self::empty(alloc)
    }

    /// Constructs a new, empty `Vec<T, A>` with exactly `capacity` slots.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a new, empty `Vec<T, A>` with exactly `capacity` slots.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, VecError> {
        Ok(Self::from_buf(RawBuf::try_with_capacity_in(capacity, alloc)?))
    }

    /// Constructs a `Vec<T, A>` holding `count` default values.
    pub fn from_default_in(count: usize, alloc: A) -> Self
    where
        T: Default,
    {
        let mut vec = Self::with_capacity_in(count, alloc);
        vec.resize_with(count, T::default);
        vec
    }

    /// Try to construct a `Vec<T, A>` holding `count` clones of `elem`.
    pub fn try_from_elem_in(elem: T, count: usize, alloc: A) -> Result<Self, VecError>
    where
        T: Clone,
    {
        let mut vec = Self::try_with_capacity_in(count, alloc)?;
        vec.try_insert_with(0, count, |_| Ok::<_, Infallible>(elem.clone()))?;
        Ok(vec)
    }

    /// Constructs a `Vec<T, A>` from the items of an iterator.
    pub fn from_iter_in<I: IntoIterator<Item = T>>(iter: I, alloc: A) -> Self {
        let mut vec = Self::new_in(alloc);
        vec.extend(iter);
        vec
    }

    /// Constructs a `Vec<T, A>` holding clones of the elements of `data`.
    pub fn from_slice_in(data: &[T], alloc: A) -> Self
    where
        T: Clone,
    {
        match Self::try_from_slice_in(data, alloc) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a `Vec<T, A>` holding clones of the elements of `data`.
    pub fn try_from_slice_in(data: &[T], alloc: A) -> Result<Self, VecError>
    where
        T: Clone,
    {
        let mut vec = Self::try_with_capacity_in(data.len(), alloc)?;
        vec.try_insert_with(0, data.len(), |i| Ok::<_, Infallible>(data[i].clone()))?;
        Ok(vec)
    }
}

impl<T, A: Allocator, G: Grow> Vec<T, A, G> {
    #[inline]
    const fn empty(alloc: A) -> Self {
        Self::from_buf(RawBuf::dangling(alloc))
    }

    #[inline]
    const fn from_buf(buf: RawBuf<T, A>) -> Self {
        Self {
            buf,
            len: 0,
            stamp: AtomicU64::new(0),
            _grow: PhantomData,
        }
    }

    /// Convert this vector to one using a different growth policy. The
    /// buffer and contents are kept as they are.
    pub fn with_growth<H: Grow>(self) -> Vec<T, A, H> {
        let this = ManuallyDrop::new(self);
        Vec {
            buf: unsafe { ptr::read(&this.buf) },
            len: this.len,
            stamp: AtomicU64::new(this.stamp.load(atomic::Ordering::Relaxed)),
            _grow: PhantomData,
        }
    }

    /// Mark every outstanding cursor as stale.
    #[inline]
    fn invalidate(&mut self) {
        *self.stamp.get_mut() = 0;
    }

    /// The stamp carried by cursors into the current buffer state. A fresh
    /// value is drawn on first use after an invalidation, so no two vectors
    /// or states ever share one.
    fn stamp(&self) -> u64 {
        let stamp = self.stamp.load(atomic::Ordering::Relaxed);
        if stamp != 0 {
            return stamp;
        }
        let fresh = NEXT_STAMP.fetch_add(1, atomic::Ordering::Relaxed);
        match self
            .stamp
            .compare_exchange(0, fresh, atomic::Ordering::Relaxed, atomic::Ordering::Relaxed)
        {
            Ok(_) => fresh,
            Err(current) => current,
        }
    }

    /// Adopt a staged block whose live elements form a prefix.
    ///
    /// # Safety
    /// The current block must not contain live elements.
    #[inline]
    unsafe fn adopt(&mut self, (ptr, capacity, len): (NonNull<T>, usize, usize)) {
        self.buf.replace_block(ptr, capacity);
        self.len = len;
        self.invalidate();
    }

    /// Destroy every live element without touching the allocation.
    #[inline]
    fn destroy_all(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        unsafe { lifecycle::destroy_range(self.buf.allocator(), self.buf.as_ptr(), 0..len) };
    }

    #[inline]
    fn required(&self, additional: usize) -> Result<usize, VecError> {
        self.len.checked_add(additional).ok_or(VecError::Length {
            requested: usize::MAX,
            max: max_size::<T>(),
        })
    }

    /// The capacity to request when at least `required` slots are needed.
    fn grow_target(&self, required: usize) -> Result<usize, VecError> {
        let max = max_size::<T>();
        if required > max {
            return Err(VecError::Length {
                requested: required,
                max,
            });
        }
        Ok(G::next_capacity::<T>(self.buf.capacity(), required).clamp(required, max))
    }

    /// Move the live elements into a new block of exactly `capacity` slots.
    fn try_realloc(&mut self, capacity: usize) -> Result<(), VecError> {
        debug_assert!(capacity >= self.len);
        let mut staged = Staged::allocate(self.buf.allocator(), capacity)?;
        unsafe { staged.relocate_from(self.buf.as_ptr(), self.len) };
        let parts = staged.into_parts();
        unsafe { self.adopt(parts) };
        Ok(())
    }

    /// Construct `count` elements from `produce` and insert them at `index`.
    ///
    /// When the buffer must grow, the new elements are constructed in the
    /// replacement buffer before any existing element is moved, and a failure
    /// leaves the vector untouched. Otherwise the tail is shifted up, and a
    /// failure destroys the new elements and shifts it back.
    fn try_insert_with<E>(
        &mut self,
        index: usize,
        count: usize,
        produce: impl FnMut(usize) -> Result<T, E>,
    ) -> Result<(), VecError<E>> {
        let len = self.len;
        if index > len {
            return Err(VecError::Range { index, len });
        }
        if count == 0 {
            return Ok(());
        }
        let required = self.required(count).map_err(|e| e.cast())?;
        if required > self.buf.capacity() {
            let capacity = self.grow_target(required).map_err(|e| e.cast())?;
            let mut staged =
                Staged::allocate(self.buf.allocator(), capacity).map_err(|e| e.cast())?;
            staged
                .try_fill(index, count, produce)
                .map_err(VecError::ElementOperationFailed)?;
            unsafe { staged.relocate_around(self.buf.as_ptr(), len, index) };
            let parts = staged.into_parts();
            unsafe { self.adopt(parts) };
        } else {
            let mut gap =
                unsafe { Gap::open(self.buf.allocator(), self.buf.as_ptr(), len, index, count) };
            gap.try_fill(produce)
                .map_err(VecError::ElementOperationFailed)?;
            self.len = gap.finish();
            if index < len {
                self.invalidate();
            }
        }
        Ok(())
    }

    #[inline]
    unsafe fn slot_mut(&mut self, index: usize) -> &mut T {
        &mut *self.buf.as_ptr().add(index)
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice of the entire vector.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Returns a raw pointer to the vector's buffer. The pointer is dangling
    /// when no buffer is allocated.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns a raw mutable pointer to the vector's buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_ptr()
    }

    /// Get a reference to the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Whether a buffer is currently allocated.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.buf.is_allocated()
    }

    /// The number of elements in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of elements the vector can hold without reallocating.
    /// Vectors of zero-sized elements report `max_size()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The largest number of elements a vector of `T` may hold.
    #[inline]
    pub const fn max_size(&self) -> usize {
        max_size::<T>()
    }

    /// Checked access to the element at `index`.
    pub fn at(&self, index: usize) -> Result<&T, VecError> {
        self.as_slice()
            .get(index)
            .ok_or(range_error(index, self.len))
    }

    /// Checked mutable access to the element at `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, VecError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(range_error(index, len))
    }

    /// A reference to the first element, if any.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// A mutable reference to the first element, if any.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// A reference to the last element, if any.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// A mutable reference to the last element, if any.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Ensure the capacity is at least `capacity` slots, reallocating to
    /// exactly that size when it is not.
    ///
    /// # Panics
    /// Panics if `capacity` exceeds `max_size()` or the allocation fails.
    pub fn reserve(&mut self, capacity: usize) {
        match self.try_reserve(capacity) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to ensure the capacity is at least `capacity` slots. On failure
    /// the vector is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), VecError> {
        if capacity <= self.buf.capacity() {
            return Ok(());
        }
        let max = max_size::<T>();
        if capacity > max {
            return Err(VecError::Length {
                requested: capacity,
                max,
            });
        }
        self.try_realloc(capacity)
    }

    /// Ensure there is room for at least `additional` more elements, growing
    /// according to the growth policy.
    pub fn reserve_additional(&mut self, additional: usize) {
        match self.try_reserve_additional(additional) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to ensure there is room for at least `additional` more elements.
    pub fn try_reserve_additional(&mut self, additional: usize) -> Result<(), VecError> {
        let required = self.required(additional)?;
        if required <= self.buf.capacity() {
            return Ok(());
        }
        let capacity = self.grow_target(required)?;
        self.try_realloc(capacity)
    }

    /// Reduce the capacity to the current length, releasing the buffer if
    /// the vector is empty.
    pub fn shrink_to_fit(&mut self) {
        match self.try_shrink_to_fit() {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to reduce the capacity to the current length. On failure the
    /// vector is unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), VecError> {
        if size_of::<T>() == 0 || self.buf.capacity() == self.len {
            return Ok(());
        }
        log::trace!(
            "shrinking storage from {} to {} slots",
            self.buf.capacity(),
            self.len
        );
        if self.len == 0 {
            self.invalidate();
            unsafe { self.buf.release() };
            Ok(())
        } else {
            self.try_realloc(self.len)
        }
    }

    /// Destroy the elements past `new_len` and reduce the capacity to match.
    /// The replacement block is allocated first, so a failed allocation
    /// leaves the vector unchanged. Does nothing when `new_len` is the
    /// current length.
    fn try_shrink_to(&mut self, new_len: usize) -> Result<(), VecError> {
        if new_len >= self.len {
            return Ok(());
        }
        if new_len == 0 || size_of::<T>() == 0 {
            self.truncate(new_len);
            return self.try_shrink_to_fit();
        }
        log::trace!(
            "shrinking storage from {} to {} slots",
            self.buf.capacity(),
            new_len
        );
        let mut staged = Staged::allocate(self.buf.allocator(), new_len)?;
        let end = mem::replace(&mut self.len, new_len);
        unsafe {
            lifecycle::destroy_range(self.buf.allocator(), self.buf.as_ptr(), new_len..end);
            staged.relocate_from(self.buf.as_ptr(), new_len);
        }
        let parts = staged.into_parts();
        unsafe { self.adopt(parts) };
        Ok(())
    }

    /// Destroy every element. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shorten the vector to `len` elements, destroying the rest. Has no
    /// effect if `len` is not less than the current length.
    pub fn truncate(&mut self, len: usize) {
        let end = self.len;
        if len < end {
            self.invalidate();
            self.len = len;
            unsafe { lifecycle::destroy_range(self.buf.allocator(), self.buf.as_ptr(), len..end) };
        }
    }

    /// Append an element to the back of the vector.
    ///
    /// # Panics
    /// Panics if the new capacity exceeds `max_size()` or the allocation fails.
    pub fn push(&mut self, value: T) {
        match self.try_push(value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to append an element, returning it on failure.
    pub fn try_push(&mut self, value: T) -> Result<(), UpdateError<T>> {
        if self.len == self.buf.capacity() {
            if let Err(error) = self.try_reserve_additional(1) {
                return Err(UpdateError::new(error, value));
            }
        }
        unsafe { lifecycle::construct(self.buf.allocator(), self.buf.as_ptr(), self.len, value) };
        self.len += 1;
        Ok(())
    }

    /// Construct an element at the back of the vector, returning a reference
    /// to it.
    pub fn push_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        match self.try_push_with(|| Ok::<_, Infallible>(f())) {
            Ok(item) => item,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct an element at the back of the vector. If the
    /// producer fails the vector is unchanged.
    pub fn try_push_with<E>(
        &mut self,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, VecError<E>> {
        let index = self.len;
        self.try_insert_with(index, 1, once(f))?;
        Ok(unsafe { self.slot_mut(index) })
    }

    /// Remove the last element and return it.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.invalidate();
        self.len -= 1;
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.len)) })
    }

    /// Insert an element at `index`, shifting the following elements up.
    ///
    /// # Panics
    /// Panics if `index > len()` or the allocation fails.
    pub fn insert(&mut self, index: usize, value: T) {
        match self.try_insert(index, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to insert an element at `index`, returning it on failure.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), UpdateError<T>> {
        let len = self.len;
        if index > len {
            return Err(UpdateError::new(range_error(index, len), value));
        }
        if len == self.buf.capacity() {
            if let Err(error) = self.try_reserve_additional(1) {
                return Err(UpdateError::new(error, value));
            }
        }
        let mut gap = unsafe { Gap::open(self.buf.allocator(), self.buf.as_ptr(), len, index, 1) };
        gap.push(value);
        self.len = gap.finish();
        if index < len {
            self.invalidate();
        }
        Ok(())
    }

    /// Insert `count` clones of `value` at `index`.
    pub fn insert_n(&mut self, index: usize, count: usize, value: &T)
    where
        T: Clone,
    {
        match self.try_insert_n(index, count, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to insert `count` clones of `value` at `index`.
    pub fn try_insert_n(&mut self, index: usize, count: usize, value: &T) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.try_insert_with(index, count, |_| Ok(value.clone()))
    }

    /// Insert clones of the elements of `values` at `index`.
    pub fn insert_slice(&mut self, index: usize, values: &[T])
    where
        T: Clone,
    {
        match self.try_insert_slice(index, values) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to insert clones of the elements of `values` at `index`.
    pub fn try_insert_slice(&mut self, index: usize, values: &[T]) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.try_insert_with(index, values.len(), |i| Ok(values[i].clone()))
    }

    /// Insert the items of an iterator at `index`, preserving their order.
    ///
    /// The items are appended and then rotated into place. If the iterator
    /// panics, the appended items are removed again.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) {
        let len = self.len;
        if index > len {
            range_error(index, len).panic();
        }
        let mut guard = TruncateOnDrop { vec: self, len };
        guard.vec.extend(iter);
        let vec = guard.defuse();
        let added = vec.len - len;
        if added > 0 && index < len {
            vec.as_mut_slice()[index..].rotate_right(added);
            vec.invalidate();
        }
    }

    /// Construct an element at `index` from `f`, returning a reference to it.
    pub fn emplace_with(&mut self, index: usize, f: impl FnOnce() -> T) -> &mut T {
        match self.try_emplace_with(index, || Ok::<_, Infallible>(f())) {
            Ok(item) => item,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct an element at `index`. If the producer fails the
    /// vector is unchanged.
    pub fn try_emplace_with<E>(
        &mut self,
        index: usize,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, VecError<E>> {
        self.try_insert_with(index, 1, once(f))?;
        Ok(unsafe { self.slot_mut(index) })
    }

    /// Remove and return the element at `index`, shifting the following
    /// elements down.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Ok(item) => item,
            Err(error) => error.panic(),
        }
    }

    /// Try to remove and return the element at `index`.
    pub fn try_remove(&mut self, index: usize) -> Result<T, VecError> {
        let len = self.len;
        if index >= len {
            return Err(range_error(index, len));
        }
        self.invalidate();
        unsafe {
            let base = self.buf.as_ptr();
            let item = ptr::read(base.add(index));
            ptr::copy(base.add(index + 1), base.add(index), len - index - 1);
            self.len = len - 1;
            Ok(item)
        }
    }

    /// Destroy the elements in `range`, shifting the following elements down.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    pub fn erase(&mut self, range: impl RangeBounds<usize>) {
        match self.try_erase(range) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to destroy the elements in `range`.
    pub fn try_erase(&mut self, range: impl RangeBounds<usize>) -> Result<(), VecError> {
        let Range { start, end } = bounds_to_range(range, self.len)?;
        if start != end {
            self.invalidate();
            unsafe {
                shift::close_range(
                    self.buf.allocator(),
                    self.buf.as_ptr(),
                    &mut self.len,
                    start,
                    end,
                )
            };
        }
        Ok(())
    }

    /// Resize the vector to `new_len`, appending clones of `value` or
    /// destroying trailing elements. When shrinking, the capacity is reduced
    /// to `new_len` and an empty result releases the buffer.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        match self.try_resize(new_len, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to resize the vector to `new_len`. If the buffer must grow and a
    /// clone panics, the vector is unchanged.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), VecError>
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.try_shrink_to(new_len)
        } else {
            let index = self.len;
            self.try_insert_with(index, new_len - index, |_| Ok(value.clone()))
        }
    }

    /// Resize the vector to `new_len`, appending values produced by `f` or
    /// destroying trailing elements. Shrinking reduces the capacity as with
    /// [`resize`](Self::resize).
    pub fn resize_with(&mut self, new_len: usize, mut f: impl FnMut() -> T) {
        match self.try_resize_with(new_len, || Ok::<_, Infallible>(f())) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to resize the vector to `new_len` with values from a fallible
    /// producer. If the buffer must grow and the producer fails, the vector
    /// is unchanged.
    pub fn try_resize_with<E>(
        &mut self,
        new_len: usize,
        mut f: impl FnMut() -> Result<T, E>,
    ) -> Result<(), VecError<E>> {
        if new_len <= self.len {
            self.try_shrink_to(new_len).map_err(|e| e.cast())
        } else {
            let index = self.len;
            self.try_insert_with(index, new_len - index, |_| f())
        }
    }

    /// Retain only the elements for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.retain_counted(|item| f(item));
    }

    /// Retain only the elements for which `f` returns `true`, passing a
    /// mutable reference to each element.
    pub fn retain_mut(&mut self, f: impl FnMut(&mut T) -> bool) {
        self.retain_counted(f);
    }

    fn retain_counted(&mut self, f: impl FnMut(&mut T) -> bool) -> usize {
        if self.len == 0 {
            return 0;
        }
        self.invalidate();
        unsafe { shift::retain(self.buf.allocator(), self.buf.as_ptr(), &mut self.len, f) }
    }

    /// Append clones of the elements of `values`.
    pub fn extend_from_slice(&mut self, values: &[T])
    where
        T: Clone,
    {
        match self.try_extend_from_slice(values) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to append clones of the elements of `values`. If the buffer must
    /// grow and a clone panics, the vector is unchanged.
    pub fn try_extend_from_slice(&mut self, values: &[T]) -> Result<(), VecError>
    where
        T: Clone,
    {
        let index = self.len;
        self.try_insert_slice(index, values)
    }

    /// Try to append the items of an iterator.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), VecError> {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.try_reserve_additional(lower)?;
        for item in iter {
            self.try_push(item).map_err(|e| e.error)?;
        }
        Ok(())
    }

    /// Replace the contents with `count` clones of `value`.
    pub fn assign(&mut self, count: usize, value: &T)
    where
        T: Clone,
    {
        match self.try_assign(count, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to replace the contents with `count` clones of `value`. When the
    /// buffer must grow the new contents are staged first, so a failure
    /// leaves the vector unchanged.
    pub fn try_assign(&mut self, count: usize, value: &T) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.try_assign_with(count, |_| value)
    }

    /// Replace the contents with clones of the elements of `values`.
    pub fn assign_slice(&mut self, values: &[T])
    where
        T: Clone,
    {
        match self.try_assign_slice(values) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to replace the contents with clones of the elements of `values`.
    pub fn try_assign_slice(&mut self, values: &[T]) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.try_assign_with(values.len(), |i| &values[i])
    }

    /// Replace the contents with the items of an iterator.
    pub fn assign_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        match self.try_assign_iter(iter) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to replace the contents with the items of an iterator. The
    /// previous contents are destroyed before the iterator is consumed.
    pub fn try_assign_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), VecError> {
        self.clear();
        self.invalidate();
        self.try_extend(iter)
    }

    fn try_assign_with<'s>(
        &mut self,
        count: usize,
        source: impl Fn(usize) -> &'s T,
    ) -> Result<(), VecError>
    where
        T: Clone + 's,
    {
        self.invalidate();
        if count > self.buf.capacity() {
            let max = max_size::<T>();
            if count > max {
                return Err(VecError::Length {
                    requested: count,
                    max,
                });
            }
            let mut staged = Staged::allocate(self.buf.allocator(), count)?;
            if let Err(never) = staged.try_fill(0, count, |i| Ok::<_, Infallible>(source(i).clone())) {
                match never {}
            }
            let len = mem::replace(&mut self.len, 0);
            unsafe { lifecycle::destroy_range(self.buf.allocator(), self.buf.as_ptr(), 0..len) };
            let parts = staged.into_parts();
            unsafe { self.adopt(parts) };
        } else {
            let shared = self.len.min(count);
            for (index, item) in self.as_mut_slice()[..shared].iter_mut().enumerate() {
                item.clone_from(source(index));
            }
            self.truncate(count);
            self.try_insert_with(shared, count - shared, |i| {
                Ok::<_, Infallible>(source(shared + i).clone())
            })?;
        }
        Ok(())
    }

    /// Clone the contents into a new vector using a different allocator.
    pub fn clone_in<B: Allocator>(&self, alloc: B) -> Vec<T, B, G>
    where
        T: Clone,
    {
        match self.try_clone_in(alloc) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    /// Try to clone the contents into a new vector using a different
    /// allocator. The new vector's capacity equals the current length.
    pub fn try_clone_in<B: Allocator>(&self, alloc: B) -> Result<Vec<T, B, G>, VecError>
    where
        T: Clone,
    {
        let mut vec = Vec::<T, B, G>::empty(alloc);
        if self.len > 0 {
            let mut staged = Staged::allocate(vec.buf.allocator(), self.len)?;
            staged.fill_cloned(self.as_slice());
            let parts = staged.into_parts();
            unsafe { vec.adopt(parts) };
        }
        Ok(vec)
    }

    /// Copy the contents with a fallible element transformation. The new
    /// vector's allocator is selected by `Allocator::select_on_copy`.
    pub fn try_clone_with<E>(
        &self,
        mut f: impl FnMut(&T) -> Result<T, E>,
    ) -> Result<Self, VecError<E>>
    where
        A: Clone,
    {
        let mut vec = Self::empty(self.allocator().select_on_copy());
        vec.try_reserve(self.len).map_err(|e| e.cast())?;
        let src = self.as_slice();
        vec.try_insert_with(0, src.len(), |i| f(&src[i]))?;
        Ok(vec)
    }

    /// Replace the contents with clones of the elements of `source`. The
    /// allocator is copied as well when the allocator type propagates on copy.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), VecError>
    where
        T: Clone,
        A: Clone,
    {
        if A::PROPAGATE_ON_COPY {
            if !self.allocator().same_as(source.allocator()) {
                *self = source.try_clone_in(source.allocator().clone())?;
                return Ok(());
            }
            // SAFETY: the allocators are interchangeable.
            unsafe { self.buf.replace_allocator(source.allocator().clone()) };
        }
        self.try_assign_with(source.len, |i| &source.as_slice()[i])
    }

    /// Take the contents, leaving this vector empty and unallocated.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let alloc = self.allocator().clone();
        mem::replace(self, Self::empty(alloc))
    }

    /// Move the contents of `source` into a new vector using `alloc`. The
    /// buffer is transferred when the allocators are the same, otherwise the
    /// elements are moved into a new buffer. `source` is left empty.
    pub fn move_in(source: &mut Self, alloc: A) -> Self {
        match Self::try_move_in(source, alloc) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    /// Try to move the contents of `source` into a new vector using `alloc`.
    /// On failure `source` is unchanged.
    pub fn try_move_in(source: &mut Self, alloc: A) -> Result<Self, VecError> {
        let mut vec = Self::empty(alloc);
        if vec.allocator().same_as(source.allocator()) {
            unsafe { vec.buf.swap_blocks(&mut source.buf) };
            vec.len = mem::take(&mut source.len);
            source.invalidate();
        } else {
            vec.try_relocate_from(source)?;
        }
        Ok(vec)
    }

    /// Move the contents of `source` into this vector, destroying the
    /// previous contents. `source` is left empty.
    pub fn move_assign(&mut self, source: &mut Self) {
        match self.try_move_assign(source) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to move the contents of `source` into this vector.
    ///
    /// When the allocator propagates on move, or both vectors use the same
    /// allocator, the buffer itself is transferred. Otherwise the elements
    /// are relocated into this vector's allocator, and a failed allocation
    /// leaves both vectors unchanged.
    pub fn try_move_assign(&mut self, source: &mut Self) -> Result<(), VecError> {
        if A::PROPAGATE_ON_MOVE {
            self.destroy_all();
            mem::swap(&mut self.buf, &mut source.buf);
        } else if self.allocator().same_as(source.allocator()) {
            self.destroy_all();
            unsafe { self.buf.swap_blocks(&mut source.buf) };
        } else {
            return self.try_relocate_from(source);
        }
        self.len = mem::take(&mut source.len);
        unsafe { source.buf.release() };
        self.invalidate();
        source.invalidate();
        Ok(())
    }

    /// Replace the contents with the elements of `source`, moved into a
    /// buffer from this vector's allocator. A failed allocation leaves both
    /// vectors unchanged; otherwise `source` is left empty and unallocated.
    fn try_relocate_from(&mut self, source: &mut Self) -> Result<(), VecError> {
        let count = source.len;
        if count > self.buf.capacity() {
            let mut staged = Staged::allocate(self.buf.allocator(), count)?;
            let len = mem::replace(&mut self.len, 0);
            unsafe {
                lifecycle::destroy_range(self.buf.allocator(), self.buf.as_ptr(), 0..len);
                staged.relocate_from(source.buf.as_ptr(), count);
            }
            source.len = 0;
            let parts = staged.into_parts();
            unsafe { self.adopt(parts) };
        } else {
            self.destroy_all();
            unsafe { ptr::copy_nonoverlapping(source.buf.as_ptr(), self.buf.as_ptr(), count) };
            source.len = 0;
            self.len = count;
            self.invalidate();
        }
        unsafe { source.buf.release() };
        source.invalidate();
        Ok(())
    }

    /// Exchange the contents of two vectors.
    ///
    /// # Panics
    /// Panics if the allocators differ, do not propagate on swap, and the
    /// element exchange cannot allocate.
    pub fn swap_with(&mut self, other: &mut Self) {
        match self.try_swap_with(other) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to exchange the contents of two vectors.
    ///
    /// With a propagating allocator the allocators are exchanged along with
    /// the buffers; with the same allocator only the buffers are exchanged.
    /// Otherwise each vector's elements are moved into a new buffer from the
    /// other's allocator, and a failed allocation leaves both unchanged.
    pub fn try_swap_with(&mut self, other: &mut Self) -> Result<(), VecError> {
        if A::PROPAGATE_ON_SWAP {
            mem::swap(&mut self.buf, &mut other.buf);
            mem::swap(&mut self.len, &mut other.len);
        } else if self.allocator().same_as(other.allocator()) {
            unsafe { self.buf.swap_blocks(&mut other.buf) };
            mem::swap(&mut self.len, &mut other.len);
        } else {
            let mut into_self = Staged::allocate(self.buf.allocator(), other.len)?;
            let mut into_other = Staged::allocate(other.buf.allocator(), self.len)?;
            unsafe {
                into_self.relocate_from(other.buf.as_ptr(), other.len);
                into_other.relocate_from(self.buf.as_ptr(), self.len);
            }
            let self_parts = into_self.into_parts();
            let other_parts = into_other.into_parts();
            unsafe {
                self.adopt(self_parts);
                other.adopt(other_parts);
            }
        }
        self.invalidate();
        other.invalidate();
        Ok(())
    }
}

/// Restores the length of a vector on drop unless defused.
struct TruncateOnDrop<'a, T, A: Allocator, G: Grow> {
    vec: &'a mut Vec<T, A, G>,
    len: usize,
}

impl<'a, T, A: Allocator, G: Grow> TruncateOnDrop<'a, T, A, G> {
    fn defuse(self) -> &'a mut Vec<T, A, G> {
        let this = ManuallyDrop::new(self);
        unsafe { ptr::read(&this.vec) }
    }
}

impl<T, A: Allocator, G: Grow> Drop for TruncateOnDrop<'_, T, A, G> {
    fn drop(&mut self) {
        self.vec.truncate(self.len);
    }
}

impl<T, A: Allocator, G: Grow> AsRef<[T]> for Vec<T, A, G> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator, G: Grow> AsMut<[T]> for Vec<T, A, G> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator, G: Grow> Borrow<[T]> for Vec<T, A, G> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator, G: Grow> BorrowMut<[T]> for Vec<T, A, G> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator + Clone, G: Grow> Clone for Vec<T, A, G> {
    fn clone(&self) -> Self {
        match self.try_clone_in(self.allocator().select_on_copy()) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match self.try_clone_from(source) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }
}

impl<T, A: AllocatorDefault, G: Grow> ConstDefault for Vec<T, A, G> {
    const DEFAULT: Self = Self::empty(A::DEFAULT);
}

impl<T: fmt::Debug, A: Allocator, G: Grow> fmt::Debug for Vec<T, A, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, A: Allocator + Default, G: Grow> Default for Vec<T, A, G> {
    #[inline]
    fn default() -> Self {
        Self::empty(A::default())
    }
}

impl<T, A: Allocator, G: Grow> Deref for Vec<T, A, G> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator, G: Grow> DerefMut for Vec<T, A, G> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator, G: Grow> Drop for Vec<T, A, G> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

impl<T, A: Allocator, G: Grow> Extend<T> for Vec<T, A, G> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        match self.try_extend(iter) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }
}

impl<'a, T: Clone + 'a, A: Allocator, G: Grow> Extend<&'a T> for Vec<T, A, G> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        match self.try_extend(iter.into_iter().cloned()) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }
}

impl<T, A: AllocatorDefault, G: Grow> FromIterator<T> for Vec<T, A, G> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::empty(A::DEFAULT);
        vec.extend(iter);
        vec
    }
}

impl<T, A: AllocatorDefault, G: Grow, const N: usize> From<[T; N]> for Vec<T, A, G> {
    #[inline]
    fn from(data: [T; N]) -> Self {
        from_array_in(data, A::DEFAULT).with_growth()
    }
}

impl<T: Clone, A: AllocatorDefault, G: Grow> From<&[T]> for Vec<T, A, G> {
    #[inline]
    fn from(data: &[T]) -> Self {
        Vec::from_slice_in(data, A::DEFAULT).with_growth()
    }
}

#[cfg(feature = "alloc")]
impl<T> From<Vec<T>> for alloc_crate::vec::Vec<T> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

#[cfg(feature = "alloc")]
impl<T> From<alloc_crate::vec::Vec<T>> for Vec<T> {
    fn from(vec: alloc_crate::vec::Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T: Hash, A: Allocator, G: Grow> Hash for Vec<T, A, G> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, G: Grow> Index<I> for Vec<T, A, G> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, G: Grow> IndexMut<I> for Vec<T, A, G> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T, A: Allocator, G: Grow> IntoIterator for Vec<T, A, G> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        IntoIter::new(unsafe { ptr::read(&this.buf) }, this.len)
    }
}

impl<'a, T, A: Allocator, G: Grow> IntoIterator for &'a Vec<T, A, G> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator, G: Grow> IntoIterator for &'a mut Vec<T, A, G> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: Eq, A: Allocator, G: Grow> Eq for Vec<T, A, G> {}

impl<T: Ord, A: Allocator, G: Grow> Ord for Vec<T, A, G> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T, A, G, U, B, H> PartialOrd<Vec<U, B, H>> for Vec<T, A, G>
where
    T: PartialOrd<U>,
    A: Allocator,
    B: Allocator,
    G: Grow,
    H: Grow,
{
    fn partial_cmp(&self, other: &Vec<U, B, H>) -> Option<Ordering> {
        let (lhs, rhs) = (self.as_slice(), other.as_slice());
        for (a, b) in lhs.iter().zip(rhs) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) => (),
                order => return order,
            }
        }
        lhs.len().partial_cmp(&rhs.len())
    }
}

impl<T, A, G, U, B, H> PartialEq<Vec<U, B, H>> for Vec<T, A, G>
where
    T: PartialEq<U>,
    A: Allocator,
    B: Allocator,
    G: Grow,
    H: Grow,
{
    #[inline]
    fn eq(&self, other: &Vec<U, B, H>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, A: Allocator, G: Grow> PartialEq<[U]> for Vec<T, A, G>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator, G: Grow> PartialEq<&[U]> for Vec<T, A, G>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: Allocator, G: Grow, const N: usize> PartialEq<[U; N]> for Vec<T, A, G>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, A: Allocator, G: Grow, const N: usize> PartialEq<&[U; N]> for Vec<T, A, G>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, A: Allocator, G: Grow> PartialEq<Vec<U, A, G>> for [T]
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vec<U, A, G>) -> bool {
        self == other.as_slice()
    }
}

impl<T, U, A: Allocator, G: Grow> PartialEq<Vec<U, A, G>> for &[T]
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vec<U, A, G>) -> bool {
        *self == other.as_slice()
    }
}

impl<T, U, A: Allocator, G: Grow, const N: usize> PartialEq<Vec<U, A, G>> for [T; N]
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vec<U, A, G>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(feature = "alloc")]
impl<T, U, A: Allocator, G: Grow> PartialEq<alloc_crate::vec::Vec<U>> for Vec<T, A, G>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &alloc_crate::vec::Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: Allocator, G: Grow> zeroize::Zeroize for Vec<T, crate::alloc::ZeroizingAlloc<A>, G> {
    #[inline]
    fn zeroize(&mut self) {
        self.clear();
        self.shrink_to_fit();
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: Allocator, G: Grow> zeroize::ZeroizeOnDrop
    for Vec<T, crate::alloc::ZeroizingAlloc<A>, G>
{
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    #[test]
    fn bounds_conversion() {
        assert_eq!(bounds_to_range(.., 4), Ok(0..4));
        assert_eq!(bounds_to_range(1..=2, 4), Ok(1..3));
        assert_eq!(bounds_to_range(2.., 4), Ok(2..4));
        assert_eq!(bounds_to_range(..5, 4), Err(range_error(5, 4)));
        assert_eq!(bounds_to_range(3..2, 4), Err(range_error(3, 4)));
    }

    #[test]
    fn doubling_sequence() {
        let mut v = Vec::<u8>::new();
        let mut seen = std::vec::Vec::new();
        for i in 0..9 {
            v.push(i);
            seen.push(v.capacity());
        }
        assert_eq!(seen, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn exact_growth_policy() {
        let mut v = Vec::<u8>::new().with_growth::<crate::capacity::GrowExact>();
        for i in 0..5 {
            v.push(i);
            assert_eq!(v.capacity(), v.len());
        }
    }

    #[test]
    fn stamp_tracks_shifts() {
        let mut v = Vec::from_slice(&[1, 2, 3]);
        let start = v.stamp();
        assert_eq!(v.stamp(), start);
        v.reserve(10);
        let grown = v.stamp();
        assert_ne!(start, grown);
        v.push(4);
        assert_eq!(v.stamp(), grown);
        v.insert(0, 0);
        assert_ne!(v.stamp(), grown);
        assert_ne!(v.stamp(), start);
    }

    #[test]
    fn stamps_are_distinct() {
        let a = Vec::<u8>::new();
        let b = Vec::<u8>::new();
        assert_ne!(a.stamp(), 0);
        assert_ne!(a.stamp(), b.stamp());
        let c = a.with_growth::<crate::capacity::GrowExact>();
        assert_ne!(c.stamp(), b.stamp());
    }
}
