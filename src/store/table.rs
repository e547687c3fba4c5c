//! RecordTable: the ordered, in-memory record collection for one entity kind.

use crate::record::{Fields, Record};

/// Records in insertion order plus the id allocator.
///
/// Ids come from a counter owned by the table, so they stay unique after deletes
/// and are never handed out twice.
#[derive(Clone, Debug)]
pub struct RecordTable {
    records: Vec<Record>,
    next_id: i64,
}

impl RecordTable {
    pub fn new() -> Self {
        RecordTable {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record with the next id and return it.
    pub fn insert(&mut self, fields: Fields) -> Record {
        let id = self.next_id;
        self.next_id += 1;
        let record = Record::new(id, fields);
        self.records.push(record.clone());
        record
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Overlay `fields` onto the record with `id` in place.
    pub fn update(&mut self, id: i64, fields: Fields) -> Option<&Record> {
        let idx = self.position(id)?;
        self.records[idx].overlay(fields);
        Some(&self.records[idx])
    }

    /// Remove the record with `id`, keeping the order of the others.
    pub fn remove(&mut self, id: i64) -> Option<Record> {
        let idx = self.position(id)?;
        Some(self.records.remove(idx))
    }
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new()
    }
}
