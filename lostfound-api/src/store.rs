//! In-memory item and claim stores
//!
//! Records are kept in insertion order with an id→position index. Ids are
//! decimal strings from a per-store counter starting at 1; nothing is
//! ever removed, so positions stay valid.

use lostfound_common::models::{Claim, Item};
use std::collections::HashMap;

/// Ordered, append-only collection with sequential ids
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Vec<T>,
    index: HashMap<String, usize>,
    next_id: u64,
}

impl<T: Clone> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Append a record built around the next id and return a copy of it
    pub fn create(&mut self, build: impl FnOnce(String) -> T) -> T {
        let id = self.next_id.to_string();
        self.next_id += 1;

        let record = build(id.clone());
        self.index.insert(id, self.records.len());
        self.records.push(record.clone());
        record
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Mutate a record in place, returning a copy of the result
    pub fn update(&mut self, id: &str, apply: impl FnOnce(&mut T)) -> Option<T> {
        let pos = *self.index.get(id)?;
        let record = &mut self.records[pos];
        apply(record);
        Some(record.clone())
    }

    /// All records in insertion order
    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub type ItemStore = RecordStore<Item>;
pub type ClaimStore = RecordStore<Claim>;

/// Both stores, owned together so a single lock covers cross-entity updates
#[derive(Debug, Default)]
pub struct LostFoundStore {
    pub items: ItemStore,
    pub claims: ClaimStore,
}

impl LostFoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_common::models::{ClaimStatus, ItemCategory, ItemStatus};

    fn item(id: String, title: &str) -> Item {
        Item {
            id,
            title: title.to_string(),
            category: ItemCategory::Other,
            image: String::new(),
            location: "Library".to_string(),
            date_found: "2025-11-21".to_string(),
            description: String::new(),
            status: ItemStatus::Available,
            detected_objects: vec![],
        }
    }

    fn claim(id: String, item_id: &str) -> Claim {
        Claim {
            id,
            item_id: item_id.to_string(),
            item_title: String::new(),
            item_image: String::new(),
            student_name: "Alice".to_string(),
            student_id: "S1".to_string(),
            description: String::new(),
            submitted_date: "2025-11-21".to_string(),
            status: ClaimStatus::Pending,
        }
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let mut store = ItemStore::new();
        let a = store.create(|id| item(id, "a"));
        let b = store.create(|id| item(id, "b"));
        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_item_and_claim_counters_are_independent() {
        let mut store = LostFoundStore::new();
        store.items.create(|id| item(id, "a"));
        store.items.create(|id| item(id, "b"));
        let c = store.claims.create(|id| claim(id, "2"));
        assert_eq!(c.id, "1");
    }

    #[test]
    fn test_get_by_id() {
        let mut store = ItemStore::new();
        store.create(|id| item(id, "first"));
        store.create(|id| item(id, "second"));

        assert_eq!(store.get("2").map(|i| i.title.as_str()), Some("second"));
        assert!(store.get("3").is_none());
        assert!(store.get("").is_none());
    }

    #[test]
    fn test_update_mutates_in_place() {
        let mut store = ClaimStore::new();
        store.create(|id| claim(id, "1"));

        let updated = store
            .update("1", |c| c.status = ClaimStatus::Approved)
            .unwrap();
        assert_eq!(updated.status, ClaimStatus::Approved);
        assert_eq!(store.get("1").unwrap().status, ClaimStatus::Approved);
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let mut store = ClaimStore::new();
        assert!(store.update("9", |c| c.status = ClaimStatus::Approved).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let mut store = ItemStore::new();
        for title in ["x", "y", "z"] {
            store.create(|id| item(id, title));
        }
        let titles: Vec<_> = store.all().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["x", "y", "z"]);
    }
}
