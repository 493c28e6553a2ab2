use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rb_collections::{DynArray, Error};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum ArrayOp {
    PushBack(i32),
    PopBack,
    Insert(usize, i32),
    Erase(usize),
    At(usize),
    Reserve(usize),
    ShrinkToFit,
    Clear,
}

fn array_op_strategy() -> impl Strategy<Value = ArrayOp> {
    prop_oneof![
        8 => any::<i32>().prop_map(ArrayOp::PushBack),
        3 => Just(ArrayOp::PopBack),
        3 => (0usize..300, any::<i32>()).prop_map(|(i, v)| ArrayOp::Insert(i, v)),
        3 => (0usize..300).prop_map(ArrayOp::Erase),
        2 => (0usize..300).prop_map(ArrayOp::At),
        1 => (0usize..600).prop_map(ArrayOp::Reserve),
        1 => Just(ArrayOp::ShrinkToFit),
        1 => Just(ArrayOp::Clear),
    ]
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::IndexOutOfRange { index, len }
}

// ─── Randomized comparison with Vec ──────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both DynArray and Vec and asserts identical
    /// contents, plus the capacity contract, at every step.
    #[test]
    fn array_ops_match_vec(ops in proptest::collection::vec(array_op_strategy(), TEST_SIZE)) {
        let mut array: DynArray<i32> = DynArray::new();
        let mut vec: Vec<i32> = Vec::new();

        for op in &ops {
            let capacity_before = array.capacity();
            match op {
                ArrayOp::PushBack(v) => {
                    array.push_back(*v);
                    vec.push(*v);
                    if capacity_before == vec.len() - 1 {
                        prop_assert_eq!(array.capacity(), (capacity_before * 2).max(1));
                    }
                }
                ArrayOp::PopBack => {
                    prop_assert_eq!(array.pop_back(), vec.pop());
                    prop_assert_eq!(array.capacity(), capacity_before);
                }
                ArrayOp::Insert(i, v) => {
                    if *i <= vec.len() {
                        prop_assert_eq!(array.insert(*i, *v).copied(), Ok(*v));
                        vec.insert(*i, *v);
                    } else {
                        prop_assert_eq!(array.insert(*i, *v).copied(), Err(out_of_range(*i, vec.len())));
                    }
                }
                ArrayOp::Erase(i) => {
                    if *i < vec.len() {
                        prop_assert_eq!(array.erase(*i), Ok(vec.remove(*i)));
                    } else {
                        prop_assert_eq!(array.erase(*i), Err(out_of_range(*i, vec.len())));
                    }
                    prop_assert_eq!(array.capacity(), capacity_before);
                }
                ArrayOp::At(i) => {
                    prop_assert_eq!(array.at(*i), vec.get(*i).ok_or(out_of_range(*i, vec.len())));
                }
                ArrayOp::Reserve(n) => {
                    array.reserve(*n);
                    prop_assert_eq!(array.capacity(), capacity_before.max(*n));
                }
                ArrayOp::ShrinkToFit => {
                    array.shrink_to_fit();
                    prop_assert_eq!(array.capacity(), vec.len());
                }
                ArrayOp::Clear => {
                    array.clear();
                    vec.clear();
                    prop_assert_eq!(array.capacity(), capacity_before);
                }
            }
            prop_assert_eq!(array.as_slice(), vec.as_slice(), "contents mismatch after {:?}", op);
            prop_assert!(array.len() <= array.capacity());
        }
    }

    /// Owning iteration from both ends yields the elements in order.
    #[test]
    fn into_iter_matches_vec(values in proptest::collection::vec(any::<i64>(), 0..TEST_SIZE)) {
        let array: DynArray<i64> = values.iter().copied().collect();
        prop_assert_eq!(array.iter().len(), values.len());
        prop_assert!(array.clone().into_iter().rev().eq(values.iter().rev().copied()));
        prop_assert_eq!(array.into_iter().collect::<Vec<_>>(), values);
    }
}

// ─── Construction ────────────────────────────────────────────────────────────

#[test]
fn new_array_owns_no_buffer() {
    let array: DynArray<i32> = DynArray::new();
    assert!(array.buffer().is_none());
    assert_eq!(array.len(), 0);
    assert_eq!(array.capacity(), 0);
}

#[test]
fn with_len_fills_defaults() {
    let array: DynArray<f64> = DynArray::with_len(5);
    assert!(array.buffer().is_some());
    assert_eq!(array.len(), 5);
    assert!(array.iter().all(|&value| value == 0.0));

    let pointers: DynArray<Option<Box<u8>>> = DynArray::with_len(5);
    assert_eq!(pointers.front(), Some(&None));
    assert_eq!(pointers.back(), Some(&None));
}

#[test]
fn initializer_keeps_order() {
    let array = DynArray::from(['a', 'b', 'c']);
    assert!(array.buffer().is_some());
    assert_eq!(array.len(), 3);
    assert_eq!(array[0], 'a');
    assert_eq!(array[1], 'b');
    assert_eq!(array[2], 'c');
}

#[test]
fn clone_owns_a_separate_buffer() {
    let origin = DynArray::from([1u32, 2, 3, 4]);
    let copy = origin.clone();
    assert_ne!(copy.buffer(), origin.buffer());
    assert_eq!(copy, origin);
}

#[test]
fn move_out_leaves_empty_array() {
    let mut origin = DynArray::from([1u32, 2, 3, 4]);
    let moved = std::mem::take(&mut origin);
    assert!(moved.buffer().is_some());
    assert!(origin.buffer().is_none());
    assert_eq!(moved, [1, 2, 3, 4][..]);
}

#[test]
fn assignment_replaces_contents() {
    let origin = DynArray::from([1u32, 2, 3, 4]);
    let mut target: DynArray<u32> = DynArray::with_len(15);
    target.clone_from(&origin);
    assert_eq!(target.len(), 4);
    assert_eq!(origin.len(), 4);
    assert_eq!(target, origin);

    target = DynArray::with_len(10);
    assert_eq!(target.len(), 10);
    target = DynArray::from([1, 2, 3, 4]);
    assert_eq!(target, origin);
}

// ─── Element access ──────────────────────────────────────────────────────────

#[test]
fn at_matches_indexing() {
    let array = DynArray::from([1, 2, 3]);
    for index in 0..array.len() {
        assert_eq!(array.at(index), Ok(&array[index]));
    }
}

#[test]
fn at_reports_out_of_range() {
    let empty: DynArray<f64> = DynArray::new();
    assert_eq!(empty.at(0), Err(out_of_range(0, 0)));

    let mut array = DynArray::from([1, 2, 3]);
    assert_eq!(array.at(3), Err(out_of_range(3, 3)));
    assert_eq!(array.at_mut(3), Err(out_of_range(3, 3)));
    *array.at_mut(0).unwrap() = 7;
    assert_eq!(array.front(), Some(&7));
}

#[test]
fn front_and_back() {
    let array = DynArray::from(['a', 'b', 'c', 'd']);
    assert_eq!(array.front(), Some(&'a'));
    assert_eq!(array.back(), Some(&'d'));

    let single = DynArray::from([2e22]);
    assert_eq!(single.front(), single.back());

    let empty: DynArray<u8> = DynArray::new();
    assert_eq!(empty.front(), None);
    assert_eq!(empty.back(), None);
}

#[test]
fn iteration_walks_the_buffer() {
    let mut array = DynArray::from([0u32, 2, 4, 6, 8, 10]);
    assert!(array.iter().copied().eq((0..=10).step_by(2)));
    for value in &mut array {
        *value += 1;
    }
    assert_eq!(array, [1, 3, 5, 7, 9, 11][..]);
}

// ─── Capacity ────────────────────────────────────────────────────────────────

#[test]
fn reserve_is_exact_and_never_shrinks() {
    let mut array: DynArray<u32> = DynArray::new();
    array.reserve(15);
    assert_eq!(array.capacity(), 15);
    array.reserve(200);
    assert_eq!(array.capacity(), 200);
    array.reserve(100);
    assert_eq!(array.capacity(), 200);
    assert_eq!(array.len(), 0);
}

#[test]
fn shrink_to_fit_matches_len() {
    let mut array: DynArray<i32> = DynArray::with_len(25);
    for extra in [1_000, 100_000, 22] {
        array.reserve(extra);
        array.shrink_to_fit();
        assert_eq!(array.capacity(), array.len());
    }

    array.clear();
    array.shrink_to_fit();
    assert_eq!(array.capacity(), 0);
    assert!(array.buffer().is_none());
}

#[test]
fn try_reserve_reports_failure() {
    let mut array = DynArray::from([1u32]);
    assert_eq!(array.try_reserve(8), Ok(()));
    assert_eq!(array.capacity(), 8);
    assert_eq!(
        array.try_reserve(usize::MAX / 2),
        Err(Error::AllocationFailure { requested: usize::MAX / 2 })
    );
    assert_eq!(array.capacity(), 8);
}

#[test]
fn max_size_bounds_len() {
    let array = DynArray::from([1u64, 2]);
    assert!(array.max_size() >= array.len());
}

// ─── Modifiers ───────────────────────────────────────────────────────────────

#[test]
fn clear_empties_the_array() {
    let mut empty: DynArray<i32> = DynArray::new();
    empty.clear();
    assert_eq!(empty.len(), 0);

    let mut array = DynArray::from(['a', 'b', 'c']);
    array.clear();
    assert_eq!(array.len(), 0);
    assert_eq!(array.capacity(), 3);
}

#[test]
fn insert_in_the_middle() {
    let mut array = DynArray::from(['a']);
    assert_eq!(array.insert(0, 'b'), Ok(&mut 'b'));
    assert_eq!(array.insert(1, 'c'), Ok(&mut 'c'));
    assert_eq!(array, ['b', 'c', 'a'][..]);

    array.insert(0, 'd').unwrap();
    array.insert(2, 'e').unwrap();
    assert_eq!(array, ['d', 'b', 'e', 'c', 'a'][..]);
}

#[test]
fn insert_at_the_end() {
    let mut array = DynArray::from(['a']);
    let len = array.len();
    assert_eq!(array.insert(len, 'b'), Ok(&mut 'b'));
    let len = array.len();
    assert_eq!(array.insert(len, 'c'), Ok(&mut 'c'));
    assert_eq!(array, ['a', 'b', 'c'][..]);
}

#[test]
fn insert_into_empty() {
    let mut array = DynArray::new();
    assert_eq!(array.insert(0, 11), Ok(&mut 11));
    assert_eq!(array, [11][..]);

    let mut array = DynArray::new();
    assert_eq!(array.insert(1, 2.33), Err(out_of_range(1, 0)));
    assert!(array.is_empty());
}

#[test]
fn erase_middle_back_and_front() {
    let mut array = DynArray::from([1, 2, 3, 4, 5]);
    assert_eq!(array.erase(2), Ok(3));
    assert_eq!(array, [1, 2, 4, 5][..]);

    let last = array.len() - 1;
    assert_eq!(array.erase(last), Ok(5));
    assert_eq!(array, [1, 2, 4][..]);

    assert_eq!(array.erase(0), Ok(1));
    assert_eq!(array, [2, 4][..]);
    assert_eq!(array.erase(2), Err(out_of_range(2, 2)));
}

#[test]
fn push_back_after_shrink() {
    let mut array = DynArray::new();
    for value in 0..100 {
        array.push_back(value);
    }
    assert_eq!(array.len(), 100);
    array.shrink_to_fit();
    for value in 100..1_000 {
        array.push_back(value);
    }
    assert_eq!(array.len(), 1_000);
    assert!(array.iter().copied().eq(0..1_000));
}

#[test]
fn pop_back_to_empty() {
    let mut array: DynArray<i32> = (0..2_000).collect();
    for _ in 0..500 {
        array.pop_back();
    }
    assert_eq!(array.len(), 1_500);
    for index in 0..1_500 {
        assert_eq!(array.at(index), Ok(&i32::try_from(index).unwrap()));
    }
    while array.pop_back().is_some() {}
    assert!(array.is_empty());
    assert_eq!(array.pop_back(), None);
}

#[test]
fn swap_exchanges_buffers() {
    let mut first = DynArray::from([1, 2, 3, 4]);
    let mut second = DynArray::from([5, 6, 7, 8, 9, 10]);
    let (first_buffer, first_capacity) = (first.buffer(), first.capacity());
    let (second_buffer, second_capacity) = (second.buffer(), second.capacity());

    first.swap(&mut second);

    assert_eq!(first.buffer(), second_buffer);
    assert_eq!(second.buffer(), first_buffer);
    assert_eq!(first.capacity(), second_capacity);
    assert_eq!(second.capacity(), first_capacity);
    assert_eq!(first, [5, 6, 7, 8, 9, 10][..]);
    assert_eq!(second, [1, 2, 3, 4][..]);
}

// ─── Trait implementations ───────────────────────────────────────────────────

#[test]
fn comparisons_follow_slices() {
    let small = DynArray::from([1, 2]);
    let large = DynArray::from([1, 3]);
    assert!(small < large);
    assert_eq!(small.clone().cmp(&small), std::cmp::Ordering::Equal);
    assert_eq!(format!("{small:?}"), "[1, 2]");
}

#[test]
fn extend_from_values_and_references() {
    let mut array = DynArray::from(vec![1, 2]);
    array.extend([3, 4]);
    array.extend(&[5, 6]);
    assert_eq!(array, [1, 2, 3, 4, 5, 6][..]);
}
