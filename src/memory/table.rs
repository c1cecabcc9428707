use std::sync::Arc;

use bytes::Bytes;
use crossbeam_skiplist::SkipMap;

use self::iterator::TableSource;

pub mod iterator;

/// In-memory table kept sorted by key.
#[derive(Default)]
pub struct SortedTable {
    entries: Arc<SkipMap<Bytes, Bytes>>,
}

impl SortedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: &[u8], value: &[u8]) {
        self.entries
            .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> TableSource {
        TableSource::new(self.entries.clone())
    }
}
