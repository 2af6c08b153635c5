//! Record types for the item store.
//!
//! `Item` is the only record kind. `Snapshot` is the persisted form of the
//! whole store; its field names (`items`, `maxid`, `lasttick`) and the item
//! shape (`id`, `tick`, `text`) are a compatibility surface shared with
//! existing snapshot files and must not be renamed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A text item tagged with the tick of its latest mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Assigned at creation, never reused or changed
    pub id: u64,

    /// Logical time of the most recent create/update/delete
    pub tick: u64,

    /// Item content; empty marks a soft-deleted item
    pub text: String,
}

impl Item {
    /// True if the item has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.text.is_empty()
    }
}

/// Mapping returned by queries. Iteration order carries no meaning.
pub type ItemMap = HashMap<u64, Item>;

/// Full persisted state of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub items: ItemMap,

    #[serde(rename = "maxid")]
    pub max_id: u64,

    #[serde(rename = "lasttick")]
    pub last_tick: u64,
}

impl Snapshot {
    /// Bring a loaded snapshot back in line with the store invariants.
    ///
    /// Items are re-keyed by their own `id`, and `max_id` / `last_tick` are
    /// raised to cover every id and tick present. Returns true if anything
    /// had to change.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;

        if self.items.iter().any(|(key, item)| *key != item.id) {
            let items = std::mem::take(&mut self.items);
            self.items = items.into_values().map(|item| (item.id, item)).collect();
            changed = true;
        }

        let highest_id = self.items.keys().copied().max().unwrap_or(0);
        if highest_id > self.max_id {
            self.max_id = highest_id;
            changed = true;
        }

        let highest_tick = self.items.values().map(|item| item.tick).max().unwrap_or(0);
        if highest_tick > self.last_tick {
            self.last_tick = highest_tick;
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, tick: u64, text: &str) -> Item {
        Item {
            id,
            tick,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_item_wire_shape() {
        let json = serde_json::to_value(item(3, 1700000000000, "buy milk")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "tick": 1700000000000u64, "text": "buy milk"})
        );
    }

    #[test]
    fn test_is_deleted() {
        assert!(item(1, 1, "").is_deleted());
        assert!(!item(1, 1, "x").is_deleted());
    }

    #[test]
    fn test_snapshot_field_names() {
        let mut snapshot = Snapshot {
            max_id: 2,
            last_tick: 20,
            ..Default::default()
        };
        snapshot.items.insert(2, item(2, 20, "walk dog"));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["maxid"], 2);
        assert_eq!(json["lasttick"], 20);
        assert_eq!(json["items"]["2"]["text"], "walk dog");
    }

    #[test]
    fn test_snapshot_parses_legacy_file() {
        let raw = r#"{"items":{"1":{"id":1,"tick":1450000000000,"text":"hello"},"2":{"id":2,"tick":1450000000001,"text":""}},"maxid":2,"lasttick":1450000000001}"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[&1].text, "hello");
        assert!(snapshot.items[&2].is_deleted());
        assert_eq!(snapshot.max_id, 2);
        assert_eq!(snapshot.last_tick, 1450000000001);
    }

    #[test]
    fn test_repair_noop_on_consistent_snapshot() {
        let mut snapshot = Snapshot {
            max_id: 5,
            last_tick: 50,
            ..Default::default()
        };
        snapshot.items.insert(1, item(1, 10, "a"));
        assert!(!snapshot.repair());
    }

    #[test]
    fn test_repair_raises_counters() {
        let mut snapshot = Snapshot::default();
        snapshot.items.insert(7, item(7, 99, "a"));

        assert!(snapshot.repair());
        assert_eq!(snapshot.max_id, 7);
        assert_eq!(snapshot.last_tick, 99);
    }

    #[test]
    fn test_repair_rekeys_items() {
        let mut snapshot = Snapshot {
            max_id: 4,
            last_tick: 10,
            ..Default::default()
        };
        snapshot.items.insert(1, item(4, 10, "misfiled"));

        assert!(snapshot.repair());
        assert!(!snapshot.items.contains_key(&1));
        assert_eq!(snapshot.items[&4].text, "misfiled");
    }
}
