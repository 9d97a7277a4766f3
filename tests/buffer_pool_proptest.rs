//! Property tests: random pin/unpin/dirty/flush sequences against a model
//! of outstanding pins.

use std::collections::{HashMap, HashSet};

use pagepool::{BufferPool, Error, MemoryStore, PageId, ReplacementStrategy};
use proptest::prelude::*;

const NUM_PAGES: u32 = 8;

#[derive(Debug, Clone)]
enum Op {
    Pin(u32),
    Unpin(u32),
    MarkDirty(u32),
    Flush,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..NUM_PAGES).prop_map(Op::Pin),
        3 => (0..NUM_PAGES).prop_map(Op::Unpin),
        1 => (0..NUM_PAGES).prop_map(Op::MarkDirty),
        1 => Just(Op::Flush),
    ]
}

fn replacement_strategy() -> impl Strategy<Value = ReplacementStrategy> {
    prop_oneof![Just(ReplacementStrategy::Fifo), Just(ReplacementStrategy::Lru)]
}

fn check_invariants(pool: &BufferPool<MemoryStore>, pins: &HashMap<u32, u32>) {
    let contents = pool.frame_contents();
    let fix_counts = pool.fix_counts();
    let dirty = pool.dirty_flags();

    assert_eq!(contents.len(), pool.capacity());
    assert_eq!(fix_counts.len(), pool.capacity());
    assert_eq!(dirty.len(), pool.capacity());

    // A page is resident in at most one frame
    let resident: Vec<PageId> = contents.iter().flatten().copied().collect();
    let unique: HashSet<PageId> = resident.iter().copied().collect();
    assert_eq!(resident.len(), unique.len(), "duplicate residency: {:?}", contents);
    assert_eq!(resident.len(), pool.resident_count());

    for (i, page) in contents.iter().enumerate() {
        match page {
            Some(page) => {
                let expected = pins.get(&page.0).copied().unwrap_or(0);
                assert_eq!(fix_counts[i], expected, "pin count of {}", page);
            }
            None => {
                assert_eq!(fix_counts[i], 0);
                assert!(!dirty[i]);
            }
        }
    }

    // Pinned pages are never evicted
    for (&page, &count) in pins {
        if count > 0 {
            assert_eq!(pool.pin_count(PageId::new(page)), Some(count));
        }
    }
}

proptest! {
    #[test]
    fn prop_pool_invariants(
        strategy in replacement_strategy(),
        capacity in 1usize..5,
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let store = MemoryStore::with_pages("prop.db", NUM_PAGES);
        let mut pool = BufferPool::new(store, capacity, strategy).unwrap();
        let mut pins: HashMap<u32, u32> = HashMap::new();
        let mut loads = 0u64;

        for op in ops {
            match op {
                Op::Pin(page) => {
                    let was_resident = pool.is_resident(PageId::new(page));
                    let all_pinned = pool.resident_count() == capacity
                        && pool.fix_counts().iter().all(|&c| c > 0);

                    match pool.pin(PageId::new(page)) {
                        Ok(handle) => {
                            prop_assert_eq!(handle.page_id(), PageId::new(page));
                            *pins.entry(page).or_insert(0) += 1;
                            if !was_resident {
                                loads += 1;
                            }
                        }
                        Err(Error::FullBuffer) => {
                            prop_assert!(!was_resident && all_pinned);
                        }
                        Err(e) => prop_assert!(false, "unexpected error {}", e),
                    }
                }
                Op::Unpin(page) => {
                    let outstanding = pins.get(&page).copied().unwrap_or(0);
                    let resident = pool.is_resident(PageId::new(page));
                    let result = pool.unpin(PageId::new(page));

                    if outstanding > 0 {
                        prop_assert!(result.is_ok());
                        pins.insert(page, outstanding - 1);
                    } else if resident {
                        prop_assert!(matches!(result, Err(Error::PageNotPinned(_))));
                    } else {
                        prop_assert!(matches!(result, Err(Error::PageNotFound(_))));
                    }
                }
                Op::MarkDirty(page) => {
                    let resident = pool.is_resident(PageId::new(page));
                    prop_assert_eq!(pool.mark_dirty(PageId::new(page)).is_ok(), resident);
                }
                Op::Flush => {
                    pool.force_flush_pool().unwrap();
                    let contents = pool.frame_contents();
                    for (i, dirty) in pool.dirty_flags().into_iter().enumerate() {
                        if dirty {
                            prop_assert!(pool.fix_counts()[i] > 0, "unpinned frame {:?} left dirty", contents[i]);
                        }
                    }
                }
            }

            check_invariants(&pool, &pins);
            prop_assert_eq!(pool.num_read_io(), loads);
        }

        pool.shutdown().unwrap();
    }

    #[test]
    fn prop_capacity_distinct_pages_never_evict(
        strategy in replacement_strategy(),
        capacity in 1usize..6,
        rounds in 1usize..5,
    ) {
        let store = MemoryStore::with_pages("prop.db", capacity as u32);
        let mut pool = BufferPool::new(store, capacity, strategy).unwrap();

        for _ in 0..rounds {
            for page in 0..capacity as u32 {
                pool.pin(PageId::new(page)).unwrap();
                pool.unpin(PageId::new(page)).unwrap();
            }
        }

        prop_assert_eq!(pool.num_read_io(), capacity as u64);
        prop_assert_eq!(pool.stats().evictions, 0);
        prop_assert_eq!(pool.resident_count(), capacity);
    }
}
