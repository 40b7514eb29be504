#![allow(dead_code)]

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;
use std::rc::Rc;

use sturdy_vec::alloc::{AllocError, Allocator, Global};

#[derive(Debug, Default)]
pub struct AllocState {
    pub live: Cell<usize>,
    pub allocations: Cell<usize>,
    pub fail_after: Cell<Option<usize>>,
}

/// A heap allocator which counts live blocks and can be told to fail.
/// Clones share their state and are the same allocator; `id` only labels
/// the instance. The propagation flags are chosen per type.
#[derive(Debug, Clone)]
pub struct Tracked<const COPY: bool, const MOVE: bool, const SWAP: bool> {
    pub id: u32,
    pub state: Rc<AllocState>,
}

pub type Sticky = Tracked<false, false, false>;
pub type Propagating = Tracked<true, true, true>;

impl<const COPY: bool, const MOVE: bool, const SWAP: bool> Tracked<COPY, MOVE, SWAP> {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            state: Rc::default(),
        }
    }

    /// Allow `count` more allocations, then fail every request.
    pub fn fail_after(&self, count: usize) {
        self.state.fail_after.set(Some(count));
    }

    pub fn live_blocks(&self) -> usize {
        self.state.live.get()
    }

    pub fn allocations(&self) -> usize {
        self.state.allocations.get()
    }
}

unsafe impl<const COPY: bool, const MOVE: bool, const SWAP: bool> Allocator
    for Tracked<COPY, MOVE, SWAP>
{
    const PROPAGATE_ON_COPY: bool = COPY;
    const PROPAGATE_ON_MOVE: bool = MOVE;
    const PROPAGATE_ON_SWAP: bool = SWAP;

    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if let Some(remain) = self.state.fail_after.get() {
            if remain == 0 {
                return Err(AllocError);
            }
            self.state.fail_after.set(Some(remain - 1));
        }
        let block = Global.allocate(layout)?;
        self.state.live.set(self.state.live.get() + 1);
        self.state.allocations.set(self.state.allocations.get() + 1);
        Ok(block)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.state.live.set(self.state.live.get() - 1);
        Global.deallocate(ptr, layout)
    }

    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

thread_local! {
    static CLONE_BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Panic on the clone after the next `count` clones on this thread.
pub fn panic_after_clones(count: usize) {
    CLONE_BUDGET.with(|b| b.set(Some(count)));
}

pub fn reset_clones() {
    CLONE_BUDGET.with(|b| b.set(None));
}

/// An element which counts live instances and can be made to panic when
/// cloned.
#[derive(Debug)]
pub struct Probe {
    pub value: u32,
    live: Rc<Cell<isize>>,
}

impl Probe {
    pub fn new(value: u32, live: &Rc<Cell<isize>>) -> Self {
        live.set(live.get() + 1);
        Self {
            value,
            live: live.clone(),
        }
    }
}

impl Clone for Probe {
    fn clone(&self) -> Self {
        CLONE_BUDGET.with(|b| match b.get() {
            Some(0) => panic!("clone budget exhausted"),
            Some(n) => b.set(Some(n - 1)),
            None => (),
        });
        Self::new(self.value, &self.live)
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

pub fn values<'a>(items: impl IntoIterator<Item = &'a Probe>) -> std::vec::Vec<u32> {
    items.into_iter().map(|p| p.value).collect()
}
