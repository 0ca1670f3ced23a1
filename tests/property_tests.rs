//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify that the
//! heap property and the key -> position index hold after every step.

use proptest::prelude::*;
use rust_dary_heap::compare::MinBy;
use rust_dary_heap::{DaryHeap, HeapError};

use std::collections::HashMap;

/// Item keyed by `id`, ordered by `cost`
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    id: u16,
    cost: i32,
}

type EntryHeap = DaryHeap<Entry, u16, MinBy<fn(&Entry) -> i32>, fn(&Entry) -> u16>;

fn entry_heap(arity: usize) -> EntryHeap {
    DaryHeap::new(
        arity,
        MinBy((|e: &Entry| e.cost) as fn(&Entry) -> i32),
        (|e: &Entry| e.id) as fn(&Entry) -> u16,
    )
    .unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, i32),
    Pop,
    Increase(u16, i32),
    Decrease(u16, i32),
    Update(u16, i32),
    UpdateByIndex(usize, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..64, -1000i32..1000).prop_map(|(id, cost)| Op::Insert(id, cost)),
        2 => Just(Op::Pop),
        1 => (0u16..64, 0i32..500).prop_map(|(id, delta)| Op::Increase(id, delta)),
        1 => (0u16..64, 0i32..500).prop_map(|(id, delta)| Op::Decrease(id, delta)),
        1 => (0u16..64, -1000i32..1000).prop_map(|(id, cost)| Op::Update(id, cost)),
        1 => (0usize..80, -1000i32..1000).prop_map(|(index, cost)| Op::UpdateByIndex(index, cost)),
    ]
}

/// Heap property, index correctness and size consistency, against a model map
fn check_state(heap: &EntryHeap, model: &HashMap<u16, i32>) -> Result<(), TestCaseError> {
    prop_assert_eq!(heap.len(), model.len());
    prop_assert_eq!(heap.is_empty(), model.is_empty());

    let items = heap.as_slice();
    for (i, item) in items.iter().enumerate() {
        prop_assert_eq!(heap.get_position_by_key(&item.id), Some(i));
        prop_assert_eq!(model.get(&item.id), Some(&item.cost));
        if i > 0 {
            let parent = &items[(i - 1) / heap.arity()];
            prop_assert!(
                parent.cost <= item.cost,
                "parent {:?} ranks below child {:?}",
                parent,
                item
            );
        }
    }
    for id in model.keys() {
        prop_assert!(heap.contains_key(id));
    }

    match model.values().min() {
        Some(min) => prop_assert_eq!(heap.peek().map(|e| e.cost), Some(*min)),
        None => prop_assert_eq!(heap.front(), Err(HeapError::EmptyHeap)),
    }
    Ok(())
}

fn run_ops(arity: usize, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut heap = entry_heap(arity);
    let mut model: HashMap<u16, i32> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(id, cost) => {
                let result = heap.insert(Entry { id, cost });
                if model.contains_key(&id) {
                    prop_assert_eq!(result, Err(HeapError::DuplicateKey));
                } else {
                    prop_assert_eq!(result, Ok(()));
                    model.insert(id, cost);
                }
            }
            Op::Pop => {
                let expected_min = model.values().min().copied();
                let popped = heap.pop();
                prop_assert_eq!(popped.as_ref().map(|e| e.cost), expected_min);
                if let Some(entry) = popped {
                    model.remove(&entry.id);
                }
            }
            Op::Increase(id, delta) => {
                let result = match model.get(&id) {
                    Some(&cost) => heap.increase_priority(Entry { id, cost: cost - delta }),
                    None => heap.increase_priority(Entry { id, cost: 0 }),
                };
                match model.get_mut(&id) {
                    Some(cost) => {
                        prop_assert_eq!(result, Ok(()));
                        *cost -= delta;
                    }
                    None => prop_assert_eq!(result, Err(HeapError::KeyNotFound)),
                }
            }
            Op::Decrease(id, delta) => {
                let result = match model.get(&id) {
                    Some(&cost) => heap.decrease_priority(Entry { id, cost: cost + delta }),
                    None => heap.decrease_priority(Entry { id, cost: 0 }),
                };
                match model.get_mut(&id) {
                    Some(cost) => {
                        prop_assert_eq!(result, Ok(()));
                        *cost += delta;
                    }
                    None => prop_assert_eq!(result, Err(HeapError::KeyNotFound)),
                }
            }
            Op::Update(id, cost) => {
                let result = heap.update_priority(Entry { id, cost });
                if let Some(stored) = model.get_mut(&id) {
                    prop_assert_eq!(result, Ok(()));
                    *stored = cost;
                } else {
                    prop_assert_eq!(result, Err(HeapError::KeyNotFound));
                }
            }
            Op::UpdateByIndex(index, cost) => {
                let target = heap.as_slice().get(index).map(|e| e.id);
                let id = target.unwrap_or(0);
                let result = heap.update_priority_by_index(index, Entry { id, cost });
                match target {
                    Some(id) => {
                        prop_assert_eq!(result, Ok(()));
                        model.insert(id, cost);
                    }
                    None => prop_assert_eq!(result, Err(HeapError::IndexOutOfBounds)),
                }
            }
        }
        check_state(&heap, &model)?;
    }
    Ok(())
}

/// Pops everything and checks the costs come out non-decreasing
fn sorted_round_trip(arity: usize, costs: Vec<i32>, bulk: bool) -> Result<(), TestCaseError> {
    let mut heap = entry_heap(arity);
    let entries: Vec<Entry> = costs
        .iter()
        .enumerate()
        .map(|(i, &cost)| Entry { id: i as u16, cost })
        .collect();

    if bulk {
        ok(heap.insert_many(entries))?;
    } else {
        for entry in entries {
            ok(heap.insert(entry))?;
        }
    }

    let popped: Vec<i32> = heap.pop_many(costs.len()).into_iter().map(|e| e.cost).collect();
    let mut expected = costs;
    expected.sort();
    prop_assert_eq!(popped, expected);
    prop_assert!(heap.is_empty());
    Ok(())
}

fn ok<T>(result: Result<T, HeapError>) -> Result<T, TestCaseError> {
    result.map_err(|err| TestCaseError::fail(err.to_string()))
}

fn arity_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), Just(2), Just(3), Just(4), Just(8), Just(16), 1usize..32]
}

proptest! {
    #[test]
    fn test_random_operations_keep_invariants(
        arity in arity_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        run_ops(arity, ops)?;
    }

    #[test]
    fn test_insert_then_pop_is_sorted(
        arity in arity_strategy(),
        costs in prop::collection::vec(-100i32..100, 0..150)
    ) {
        sorted_round_trip(arity, costs, false)?;
    }

    #[test]
    fn test_bulk_insert_then_pop_is_sorted(
        arity in arity_strategy(),
        costs in prop::collection::vec(-100i32..100, 0..150)
    ) {
        sorted_round_trip(arity, costs, true)?;
    }

    #[test]
    fn test_pop_order_independent_of_arity(
        values in prop::collection::hash_set(-10_000i32..10_000, 0..120)
    ) {
        // distinct values make the pop order unique, so every arity must agree
        let values: Vec<i32> = values.into_iter().collect();
        let mut orders = Vec::new();
        for arity in [1usize, 2, 3, 4, 8, 16] {
            let mut heap = entry_heap(arity);
            for (i, &cost) in values.iter().enumerate() {
                ok(heap.insert(Entry { id: i as u16, cost }))?;
            }
            let order: Vec<u16> = heap.pop_many(values.len()).into_iter().map(|e| e.id).collect();
            orders.push(order);
        }
        for order in &orders[1..] {
            prop_assert_eq!(order, &orders[0]);
        }
    }

    #[test]
    fn test_failed_operations_change_nothing(
        arity in arity_strategy(),
        costs in prop::collection::vec(-100i32..100, 1..60),
        missing in 1000u16..2000
    ) {
        let mut heap = entry_heap(arity);
        let entries: Vec<Entry> = costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| Entry { id: i as u16, cost })
            .collect();
        ok(heap.insert_many(entries))?;
        let before = heap.to_vec();

        prop_assert_eq!(heap.insert(Entry { id: 0, cost: -1 }), Err(HeapError::DuplicateKey));
        prop_assert_eq!(
            heap.insert_many(vec![Entry { id: missing, cost: 0 }, Entry { id: missing, cost: 1 }]),
            Err(HeapError::DuplicateKey)
        );
        prop_assert_eq!(heap.increase_priority(Entry { id: missing, cost: 0 }), Err(HeapError::KeyNotFound));
        prop_assert_eq!(heap.decrease_priority(Entry { id: missing, cost: 0 }), Err(HeapError::KeyNotFound));
        prop_assert_eq!(
            heap.update_priority_by_index(costs.len(), Entry { id: 0, cost: 0 }),
            Err(HeapError::IndexOutOfBounds)
        );
        prop_assert_eq!(heap.clear(Some(0)), Err(HeapError::InvalidArity));

        prop_assert_eq!(heap.to_vec(), before);
        prop_assert_eq!(heap.arity(), arity);
    }
}
