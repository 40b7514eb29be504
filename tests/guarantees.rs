#![cfg(feature = "alloc")]

mod common;

use core::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use proptest::prelude::*;
use rstest::rstest;

use sturdy_vec::{Vec as SturdyVec, VecError};

use common::{panic_after_clones, reset_clones, values, Probe};

fn probes(live: &Rc<Cell<isize>>, items: &[u32], capacity: usize) -> SturdyVec<Probe> {
    let mut v = SturdyVec::with_capacity(capacity);
    for item in items {
        v.push(Probe::new(*item, live));
    }
    v
}

/// Run `f` with clones panicking after `budget` successful clones, and
/// report whether it panicked.
fn with_clone_budget(budget: usize, f: impl FnOnce()) -> bool {
    panic_after_clones(budget);
    let result = catch_unwind(AssertUnwindSafe(f));
    reset_clones();
    result.is_err()
}

#[rstest]
#[case::first(0)]
#[case::middle(2)]
#[case::last(3)]
fn insert_n_growth_is_atomic(#[case] budget: usize) {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2, 3], 3);
    let fill = Probe::new(9, &live);
    let ptr = v.as_ptr();
    assert!(with_clone_budget(budget, || v.insert_n(1, 4, &fill)));
    assert_eq!(values(&v), [1, 2, 3]);
    assert_eq!(v.capacity(), 3);
    assert_eq!(v.as_ptr(), ptr);
    assert_eq!(live.get(), 4);
    drop(v);
    drop(fill);
    assert_eq!(live.get(), 0);
}

#[rstest]
#[case::front(0)]
#[case::middle(1)]
#[case::back(3)]
fn insert_n_in_place_restores(#[case] index: usize) {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2, 3], 8);
    let fill = Probe::new(9, &live);
    assert!(with_clone_budget(2, || v.insert_n(index, 3, &fill)));
    assert_eq!(values(&v), [1, 2, 3]);
    assert_eq!(v.capacity(), 8);
    assert_eq!(live.get(), 4);
}

#[test]
fn extend_from_slice_growth_is_atomic() {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2], 2);
    let extra = probes(&live, &[5, 6, 7], 3);
    assert!(with_clone_budget(1, || v.extend_from_slice(&extra)));
    assert_eq!(values(&v), [1, 2]);
    assert_eq!(v.capacity(), 2);
    assert_eq!(live.get(), 5);
    v.extend_from_slice(&extra);
    assert_eq!(values(&v), [1, 2, 5, 6, 7]);
}

#[test]
fn insert_slice_in_place_restores() {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2, 3], 10);
    let extra = probes(&live, &[5, 6, 7], 3);
    assert!(with_clone_budget(2, || v.insert_slice(1, &extra)));
    assert_eq!(values(&v), [1, 2, 3]);
    assert_eq!(live.get(), 6);
}

#[test]
fn clone_failure_releases() {
    let live = Rc::new(Cell::new(0));
    let v = probes(&live, &[1, 2, 3, 4], 4);
    assert!(with_clone_budget(2, || drop(v.clone())));
    assert_eq!(values(&v), [1, 2, 3, 4]);
    assert_eq!(live.get(), 4);
}

#[test]
fn assign_growth_is_atomic() {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2, 3], 3);
    let fill = Probe::new(9, &live);
    assert!(with_clone_budget(4, || v.assign(6, &fill)));
    assert_eq!(values(&v), [1, 2, 3]);
    assert_eq!(v.capacity(), 3);
    assert_eq!(live.get(), 4);
}

#[test]
fn resize_growth_is_atomic() {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2], 2);
    assert!(with_clone_budget(3, || v.resize(7, Probe::new(9, &live))));
    assert_eq!(values(&v), [1, 2]);
    assert_eq!(v.capacity(), 2);
    assert_eq!(live.get(), 2);
}

#[rstest]
#[case::growth(2, 10)]
#[case::in_place(16, 10)]
fn resize_with_failure_is_atomic(#[case] capacity: usize, #[case] target: usize) {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2], capacity);
    let mut produced = 0;
    let res = v.try_resize_with(target, || {
        produced += 1;
        if produced == 5 {
            Err("stop")
        } else {
            Ok(Probe::new(produced, &live))
        }
    });
    assert_eq!(res, Err(VecError::ElementOperationFailed("stop")));
    assert_eq!(values(&v), [1, 2]);
    assert_eq!(v.capacity(), capacity);
    assert_eq!(live.get(), 2);
}

#[test]
fn emplace_failure_leaves_vector() {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2, 3], 3);
    let res = v.try_emplace_with(1, || Err::<Probe, _>(()));
    assert_eq!(res.err(), Some(VecError::ElementOperationFailed(())));
    let res = v.try_push_with(|| Err::<Probe, _>(()));
    assert_eq!(res.err(), Some(VecError::ElementOperationFailed(())));
    assert_eq!(values(&v), [1, 2, 3]);
    assert_eq!(v.capacity(), 3);
}

#[test]
fn retain_predicate_panic() {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2, 3, 4, 5, 6], 6);
    let panicked = catch_unwind(AssertUnwindSafe(|| {
        v.retain(|p| {
            if p.value == 4 {
                panic!("predicate failed");
            }
            p.value % 2 == 0
        })
    }))
    .is_err();
    assert!(panicked);
    assert_eq!(values(&v), [2, 4, 5, 6]);
    assert_eq!(live.get(), 4);
}

#[test]
fn insert_iter_panic_removes_partial() {
    let live = Rc::new(Cell::new(0));
    let mut v = probes(&live, &[1, 2, 3], 3);
    let panicked = catch_unwind(AssertUnwindSafe(|| {
        v.insert_iter(
            1,
            (10..20).map(|i| {
                if i == 13 {
                    panic!("iterator failed");
                }
                Probe::new(i, &live)
            }),
        )
    }))
    .is_err();
    assert!(panicked);
    assert_eq!(values(&v), [1, 2, 3]);
    assert_eq!(live.get(), 3);
}

#[test]
fn clone_from_in_place_panic_keeps_valid() {
    let live = Rc::new(Cell::new(0));
    let mut dst = probes(&live, &[1, 2], 8);
    let src = probes(&live, &[5, 6, 7, 8], 4);
    assert!(with_clone_budget(3, || dst.clone_from(&src)));
    // Elements assigned before the failure remain; nothing leaks.
    assert!(dst.len() <= 4);
    assert_eq!(live.get(), dst.len() as isize + 4);
}

#[derive(Debug, Clone)]
enum Op {
    Push(u8),
    Pop,
    Insert(usize, u8),
    InsertN(usize, usize, u8),
    Remove(usize),
    Erase(usize, usize),
    Truncate(usize),
    Reserve(usize),
    ShrinkToFit,
    RetainEven,
    Resize(usize, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Push),
        Just(Op::Pop),
        (any::<usize>(), any::<u8>()).prop_map(|(i, v)| Op::Insert(i, v)),
        (any::<usize>(), 0usize..8, any::<u8>()).prop_map(|(i, n, v)| Op::InsertN(i, n, v)),
        any::<usize>().prop_map(Op::Remove),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Erase(a, b)),
        (0usize..40).prop_map(Op::Truncate),
        (0usize..64).prop_map(Op::Reserve),
        Just(Op::ShrinkToFit),
        Just(Op::RetainEven),
        (0usize..40, any::<u8>()).prop_map(|(n, v)| Op::Resize(n, v)),
    ]
}

proptest! {
    #[test]
    fn push_keeps_capacity_bound(count in 0usize..300) {
        let mut v = SturdyVec::<u32>::new();
        for i in 0..count as u32 {
            v.push(i);
            prop_assert!(v.len() <= v.capacity());
            prop_assert!(v.capacity() <= v.max_size());
        }
        prop_assert_eq!(v.len(), count);
    }

    #[test]
    fn matches_std_model(ops in prop::collection::vec(op(), 0..64)) {
        let mut v = SturdyVec::<u8>::new();
        let mut model = std::vec::Vec::<u8>::new();
        for op in ops {
            let len = model.len();
            match op {
                Op::Push(x) => {
                    v.push(x);
                    model.push(x);
                }
                Op::Pop => {
                    prop_assert_eq!(v.pop(), model.pop());
                }
                Op::Insert(i, x) => {
                    let i = i % (len + 1);
                    v.insert(i, x);
                    model.insert(i, x);
                }
                Op::InsertN(i, n, x) => {
                    let i = i % (len + 1);
                    v.insert_n(i, n, &x);
                    model.splice(i..i, core::iter::repeat(x).take(n));
                }
                Op::Remove(i) => {
                    if len > 0 {
                        let i = i % len;
                        prop_assert_eq!(v.remove(i), model.remove(i));
                    } else {
                        prop_assert!(v.try_remove(i).is_err());
                    }
                }
                Op::Erase(a, b) => {
                    let (a, b) = (a % (len + 1), b % (len + 1));
                    let (a, b) = (a.min(b), a.max(b));
                    v.erase(a..b);
                    model.drain(a..b);
                }
                Op::Truncate(n) => {
                    v.truncate(n);
                    model.truncate(n);
                }
                Op::Reserve(n) => {
                    let before = v.capacity();
                    v.reserve(n);
                    prop_assert_eq!(v.capacity(), before.max(n));
                }
                Op::ShrinkToFit => {
                    v.shrink_to_fit();
                    prop_assert_eq!(v.capacity(), v.len());
                }
                Op::RetainEven => {
                    v.retain(|x| x % 2 == 0);
                    model.retain(|x| x % 2 == 0);
                }
                Op::Resize(n, x) => {
                    v.resize(n, x);
                    model.resize(n, x);
                    if n < len {
                        prop_assert_eq!(v.capacity(), n);
                    }
                }
            }
            prop_assert_eq!(v.as_slice(), model.as_slice());
            prop_assert!(v.len() <= v.capacity());
        }
    }
}
