//! ItemStore: the versioned in-memory item collection.
//!
//! Owns the items, the id allocator and the tick clock. Every mutation
//! advances the tick exactly once; rejected operations leave all state
//! untouched. Concurrency is handled one level up by `SharedStore`.

use crate::clock::{Clock, next_tick};
use crate::error::{Result, StoreError};
use crate::store::records::{Item, ItemMap, Snapshot};
use std::fmt;
use std::sync::Arc;

pub struct ItemStore {
    items: ItemMap,

    /// Highest id ever allocated
    max_id: u64,

    /// Highest tick ever assigned
    last_tick: u64,

    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStore")
            .field("items", &self.items.len())
            .field("max_id", &self.max_id)
            .field("last_tick", &self.last_tick)
            .finish_non_exhaustive()
    }
}

impl ItemStore {
    /// Create an empty store seeded from the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::from_snapshot(Snapshot::default(), clock)
    }

    /// Rebuild a store from persisted state.
    pub fn from_snapshot(snapshot: Snapshot, clock: Arc<dyn Clock>) -> Self {
        Self {
            items: snapshot.items,
            max_id: snapshot.max_id,
            last_tick: snapshot.last_tick,
            clock,
        }
    }

    /// Capture the full state for persistence.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            items: self.items.clone(),
            max_id: self.max_id,
            last_tick: self.last_tick,
        }
    }

    pub fn max_id(&self) -> u64 {
        self.max_id
    }

    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    // Counter helpers only compute; callers commit once every value is known,
    // so a failure leaves the store untouched.
    fn next_id(&self) -> Result<u64> {
        self.max_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Storage("id space exhausted".to_string()))
    }

    fn next_tick(&self) -> Result<u64> {
        next_tick(self.last_tick, self.clock.now_ms())
            .ok_or_else(|| StoreError::Storage("tick space exhausted".to_string()))
    }

    fn require_text(text: &str) -> Result<()> {
        if text.is_empty() {
            return Err(StoreError::Validation("Empty text".to_string()));
        }
        Ok(())
    }

    /// Number of items, soft-deleted ones included.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Create a new item.
    pub fn create(&mut self, text: &str) -> Result<Item> {
        Self::require_text(text)?;

        let id = self.next_id()?;
        let tick = self.next_tick()?;
        self.max_id = id;
        self.last_tick = tick;

        let item = Item {
            id,
            tick,
            text: text.to_string(),
        };
        self.items.insert(id, item.clone());
        Ok(item)
    }

    /// Get an item by id.
    pub fn get(&self, id: u64) -> Result<&Item> {
        self.items.get(&id).ok_or(StoreError::NotFound(id))
    }

    /// Replace an item's text. Empty text is rejected; use `delete` instead.
    pub fn update(&mut self, id: u64, text: &str) -> Result<Item> {
        Self::require_text(text)?;
        self.set_text(id, text)
    }

    /// Soft-delete an item: clear its text and bump its tick.
    pub fn delete(&mut self, id: u64) -> Result<Item> {
        self.set_text(id, "")
    }

    fn set_text(&mut self, id: u64, text: &str) -> Result<Item> {
        if !self.items.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }

        let tick = self.next_tick()?;
        self.last_tick = tick;
        let item = self.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.tick = tick;
        item.text = text.to_string();
        Ok(item.clone())
    }

    /// Items mutated strictly after `tick`, soft-deleted ones included.
    pub fn after(&self, tick: u64) -> ItemMap {
        self.select(|item| item.tick > tick)
    }

    /// Items whose text contains `needle` (literal, case-sensitive).
    pub fn search(&self, needle: &str) -> Result<ItemMap> {
        if needle.is_empty() {
            return Err(StoreError::Validation("Empty search text".to_string()));
        }
        Ok(self.select(|item| item.text.contains(needle)))
    }

    /// Every item in the store.
    pub fn all(&self) -> ItemMap {
        self.items.clone()
    }

    fn select(&self, pred: impl Fn(&Item) -> bool) -> ItemMap {
        self.items
            .iter()
            .filter(|(_, item)| pred(item))
            .map(|(id, item)| (*id, item.clone()))
            .collect()
    }
}
