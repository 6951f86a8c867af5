//! A small per-engine object pool, reducing allocator churn on the hot
//! path (spec §5: "allocations for orders, levels, and expected-trade
//! entries should be pooled behind per-type free lists bounded above by a
//! fixed cap"). This is purely a performance optimization — correctness
//! never depends on whether a given allocation came from the pool or from
//! the global allocator, matching the teacher's `MatchingPool`
//! (`orderbook/pool.rs`), which pools scratch `Vec`s the same way.
//!
//! Unlike the C++ source's singleton `PoolAllocator<T>`, this pool lives on
//! the engine instance, so two engines never share (or contend over) the
//! same free list.

use super::order::OrderNode;
use std::collections::VecDeque;

/// Bound on the number of freed items kept around per type, matching the
/// source's `PoolAllocator::max_size` of 1000.
const POOL_CAP: usize = 1_000;

#[derive(Debug, Default)]
pub struct EnginePool {
    level_storage: Vec<VecDeque<OrderNode>>,
}

impl EnginePool {
    #[must_use]
    pub fn new() -> Self {
        EnginePool::default()
    }

    #[must_use]
    pub fn take_level_storage(&mut self) -> VecDeque<OrderNode> {
        self.level_storage.pop().unwrap_or_default()
    }

    pub fn return_level_storage(&mut self, storage: VecDeque<OrderNode>) {
        if self.level_storage.len() < POOL_CAP {
            self.level_storage.push(storage);
        }
    }
}
