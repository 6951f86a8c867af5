//! Side index (C4): an ordered mapping from price to level, paired with an
//! auxiliary unordered presence table so membership tests are O(1) instead
//! of the O(log K) an ordered map alone would cost.
//!
//! The buy side orders its keys descending (best bid first); the sell side
//! orders ascending (best ask first). Rather than carrying a runtime
//! comparator, each side gets its own key newtype whose `Ord` impl encodes
//! that direction, so `BTreeMap`'s natural ordering does the work — no
//! trait-object dispatch needed on the hot path.

use super::errors::EngineFault;
use super::level::PriceLevel;
use super::order::Side;
use super::pool::EnginePool;
use std::collections::{BTreeMap, HashSet};

/// A price key whose ascending `Ord` order matches the side's natural
/// best-first order. Implemented by [`BuyKey`] (descending by price) and
/// [`SellKey`] (ascending by price).
pub trait SideKey: Ord + Copy {
    fn from_price(price: u32) -> Self;
    fn price(self) -> u32;
    /// Which book this key's `SideIndex` belongs to, used only to tag an
    /// [`EngineFault::SideIndexDesync`] with the side it was observed on.
    fn side() -> Side;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyKey(u32);

impl PartialOrd for BuyKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BuyKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: a higher price sorts first on the buy side.
        other.0.cmp(&self.0)
    }
}

impl SideKey for BuyKey {
    fn from_price(price: u32) -> Self {
        BuyKey(price)
    }

    fn price(self) -> u32 {
        self.0
    }

    fn side() -> Side {
        Side::Buy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SellKey(u32);

impl SideKey for SellKey {
    fn from_price(price: u32) -> Self {
        SellKey(price)
    }

    fn price(self) -> u32 {
        self.0
    }

    fn side() -> Side {
        Side::Sell
    }
}

#[derive(Debug)]
pub struct SideIndex<K: SideKey> {
    tree: BTreeMap<K, PriceLevel>,
    presence: HashSet<u32>,
}

impl<K: SideKey> Default for SideIndex<K> {
    fn default() -> Self {
        SideIndex {
            tree: BTreeMap::new(),
            presence: HashSet::new(),
        }
    }
}

impl<K: SideKey> SideIndex<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the (possibly newly created) level at `price`. The bool is
    /// `true` iff this call created a brand-new level (i.e. `price` was not
    /// previously present) — callers use this to detect "the book's top
    /// just changed" the same way the source's `add<T>()` checks
    /// `list->size() == 1`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineFault::SideIndexDesync`] if the presence table claims
    /// `price` is live but the ordered tree disagrees — the invariant from
    /// spec §8 that the two must carry identical key sets.
    pub fn add(&mut self, price: u32, pool: &mut EnginePool) -> Result<(&mut PriceLevel, bool), EngineFault> {
        if self.presence.contains(&price) {
            let key = K::from_price(price);
            let level = self
                .tree
                .get_mut(&key)
                .ok_or(EngineFault::SideIndexDesync { side: K::side() })?;
            Ok((level, false))
        } else {
            self.presence.insert(price);
            let mut level = PriceLevel::new();
            level.restore_storage(pool.take_level_storage());
            let key = K::from_price(price);
            self.tree.insert(key, level);
            let level = self
                .tree
                .get_mut(&key)
                .ok_or(EngineFault::SideIndexDesync { side: K::side() })?;
            Ok((level, true))
        }
    }

    /// Removes the (empty) level at `price`, returning its backing storage
    /// to the pool for reuse. Debug-asserts the precondition: the level
    /// must exist and be empty.
    pub fn remove(&mut self, price: u32, pool: &mut EnginePool) {
        let key = K::from_price(price);
        debug_assert!(self.presence.contains(&price), "removing absent level");
        if let Some(mut level) = self.tree.remove(&key) {
            debug_assert!(level.is_empty(), "removing non-empty level");
            pool.return_level_storage(level.take_storage());
        }
        self.presence.remove(&price);
    }

    #[must_use]
    pub fn contains(&self, price: u32) -> bool {
        self.presence.contains(&price)
    }

    #[must_use]
    pub fn top_price(&self) -> Option<u32> {
        self.tree.keys().next().map(|k| k.price())
    }

    #[must_use]
    pub fn top(&self) -> Option<(u32, &PriceLevel)> {
        self.tree.iter().next().map(|(k, l)| (k.price(), l))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn iter_in_price_order(&self) -> impl Iterator<Item = (u32, &PriceLevel)> {
        self.tree.iter().map(|(k, l)| (k.price(), l))
    }

    #[must_use]
    pub fn get_mut(&mut self, price: u32) -> Option<&mut PriceLevel> {
        let key = K::from_price(price);
        self.tree.get_mut(&key)
    }

    #[must_use]
    pub fn get(&self, price: u32) -> Option<&PriceLevel> {
        let key = K::from_price(price);
        self.tree.get(&key)
    }

    /// Checks the invariant from spec §8: the ordered tree and the presence
    /// table carry identical key sets, and every stored level is
    /// non-empty.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        if self.tree.len() != self.presence.len() {
            return false;
        }
        self.tree
            .iter()
            .all(|(k, l)| self.presence.contains(&k.price()) && !l.is_empty())
    }
}

pub type BuySide = SideIndex<BuyKey>;
pub type SellSide = SideIndex<SellKey>;
