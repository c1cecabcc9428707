use std::{iter::Peekable, sync::Arc};

use anyhow::{anyhow, Result};
use bytes::Bytes;
use crossbeam_skiplist::{map::Iter, SkipMap};
use ouroboros::self_referencing;

use crate::{iterator::Source, kv::kv_pair::KeyValuePair};

/// Source walking a `SortedTable` in key order. Entries inserted ahead of
/// the cursor while walking are picked up; once exhausted it stays that way.
pub struct TableSource {
    // none once closed
    cursor: Option<TableCursor>,
}

impl TableSource {
    pub(super) fn new(entries: Arc<SkipMap<Bytes, Bytes>>) -> Self {
        Self {
            cursor: Some(TableCursor::new(entries, |map| map.iter().peekable())),
        }
    }

    fn cursor_mut(&mut self) -> Result<&mut TableCursor> {
        self.cursor
            .as_mut()
            .ok_or_else(|| anyhow!("table source is closed"))
    }
}

impl Source for TableSource {
    type Item = KeyValuePair;

    fn has_more(&mut self) -> Result<bool> {
        let cursor = self.cursor_mut()?;
        Ok(cursor.with_entries_mut(|entries| entries.peek().is_some()))
    }

    fn pull_next(&mut self) -> Result<KeyValuePair> {
        let cursor = self.cursor_mut()?;
        cursor
            .with_entries_mut(|entries| {
                entries.next().map(|entry| KeyValuePair {
                    key: entry.key().clone(),
                    value: entry.value().clone(),
                })
            })
            .ok_or_else(|| anyhow!("table source is exhausted"))
    }

    fn close(&mut self) -> Result<()> {
        self.cursor = None;
        Ok(())
    }
}

#[self_referencing]
struct TableCursor {
    map: Arc<SkipMap<Bytes, Bytes>>,
    #[borrows(map)]
    #[not_covariant]
    entries: Peekable<Iter<'this, Bytes, Bytes>>,
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::{
        iterator::{merge_iterator::KWayMerger, Source},
        kv::kv_pair::KeyValuePair,
        memory::table::SortedTable,
        options::MergeOptions,
    };

    #[test]
    fn test_iterate() {
        let table = SortedTable::new();
        table.put("k2".as_bytes(), "v2".as_bytes());
        table.put("k1".as_bytes(), "v1".as_bytes());

        let mut source = table.source();
        assert!(source.has_more().unwrap());
        assert_eq!(source.pull_next().unwrap(), KeyValuePair::new(b"k1", b"v1"));
        assert_eq!(source.pull_next().unwrap(), KeyValuePair::new(b"k2", b"v2"));
        assert!(!source.has_more().unwrap());
        assert!(source.pull_next().is_err());
    }

    #[test]
    fn test_closed_source_fails() {
        let table = SortedTable::new();
        table.put("k1".as_bytes(), "v1".as_bytes());

        let mut source = table.source();
        source.close().unwrap();
        assert!(source.has_more().is_err());
        assert!(source.pull_next().is_err());
    }

    #[test]
    fn test_merge_tables() {
        let table_1 = SortedTable::new();
        table_1.put("k2".as_bytes(), "v2".as_bytes());
        let table_2 = SortedTable::new();
        table_2.put("k3".as_bytes(), "v3".as_bytes());
        let table_3 = SortedTable::new();
        table_3.put("k1".as_bytes(), "v1".as_bytes());
        table_3.put("k4".as_bytes(), "v4".as_bytes());

        let sources = vec![table_1.source(), table_2.source(), table_3.source()];
        let merger = KWayMerger::new(sources, MergeOptions::new_with_defaults().key_order());

        let merged: Vec<KeyValuePair> = merger.collect::<Result<_>>().unwrap();
        let keys: Vec<_> = merged.iter().map(|kv| kv.key.clone()).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3", "k4"]);
    }
}
