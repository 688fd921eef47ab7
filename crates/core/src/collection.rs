//! In-memory snapshot of one entity collection.
//!
//! A [`ResourceCollection`] is the single source of truth for its entity type within a screen.
//! It reflects the backend only as of the last successful load; nothing assumes it is current
//! between loads. Records keep the order the backend returned them in and are indexed by id so
//! patch-mode controllers can upsert and remove without a scan.

use crate::api::Identified;
use deskhub_types::RecordId;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ResourceCollection<T> {
    records: Vec<T>,
    index: HashMap<RecordId, usize>,
    loaded: bool,
}

impl<T> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            loaded: false,
        }
    }
}

impl<T: Identified> ResourceCollection<T> {
    /// An empty, not-yet-loaded collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot with a freshly loaded one.
    pub fn replace(&mut self, records: Vec<T>) {
        self.records = records;
        self.reindex();
        self.loaded = true;
    }

    /// Insert a record, or replace the one with the same id in place.
    ///
    /// Returns `true` when the record was new.
    pub fn upsert(&mut self, record: T) -> bool {
        match self.index.get(record.id()) {
            Some(&pos) => {
                self.records[pos] = record;
                false
            }
            None => {
                self.index.insert(record.id().clone(), self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<T> {
        let pos = self.index.remove(id)?;
        let removed = self.records.remove(pos);
        self.reindex();
        Some(removed)
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether at least one load has succeeded since mount.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id().clone(), pos))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: RecordId,
        name: &'static str,
    }

    impl Identified for Item {
        fn id(&self) -> &RecordId {
            &self.id
        }
    }

    fn item(id: u64, name: &'static str) -> Item {
        Item {
            id: RecordId::from(id),
            name,
        }
    }

    #[test]
    fn starts_empty_and_unloaded() {
        let c: ResourceCollection<Item> = ResourceCollection::new();
        assert!(c.is_empty());
        assert!(!c.is_loaded());
    }

    #[test]
    fn replace_discards_previous_snapshot() {
        let mut c = ResourceCollection::new();
        c.replace(vec![item(1, "a"), item(2, "b")]);
        c.replace(vec![item(3, "c")]);
        assert_eq!(c.len(), 1);
        assert!(!c.contains(&RecordId::from(1)));
        assert_eq!(c.get(&RecordId::from(3)).map(|i| i.name), Some("c"));
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new() {
        let mut c = ResourceCollection::new();
        c.replace(vec![item(1, "a"), item(2, "b")]);
        assert!(!c.upsert(item(1, "a2")));
        assert!(c.upsert(item(9, "z")));
        let names: Vec<_> = c.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a2", "b", "z"]);
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut c = ResourceCollection::new();
        c.replace(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
        assert_eq!(c.remove(&RecordId::from(1)).map(|i| i.name), Some("a"));
        assert_eq!(c.get(&RecordId::from(3)).map(|i| i.name), Some("c"));
        assert!(c.remove(&RecordId::from(1)).is_none());
    }
}
