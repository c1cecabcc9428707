use std::collections::VecDeque;

use anyhow::{anyhow, Result};

use super::Source;

/// Source over elements already held in memory.
pub struct VecSource<T> {
    items: VecDeque<T>,
}

impl<T> VecSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl<T> Source for VecSource<T> {
    type Item = T;

    fn has_more(&mut self) -> Result<bool> {
        Ok(!self.items.is_empty())
    }

    fn pull_next(&mut self) -> Result<T> {
        self.items
            .pop_front()
            .ok_or_else(|| anyhow!("vec source is exhausted"))
    }

    fn close(&mut self) -> Result<()> {
        self.items.clear();
        Ok(())
    }
}
