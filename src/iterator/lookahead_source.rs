use anyhow::Result;

use super::Source;

/// Wraps a source so its head element can be looked at before it is taken.
///
/// The slot is either empty or holds exactly one element that was pulled
/// from the underlying source and not handed out yet.
pub struct LookaheadSource<S: Source> {
    source: S,
    head: Option<S::Item>,
}

impl<S: Source> LookaheadSource<S> {
    pub fn new(source: S) -> Self {
        Self { source, head: None }
    }

    /// Returns the buffered head, pulling it from the underlying source if
    /// the slot is empty. A failed pull leaves the slot empty, so the next
    /// call tries again.
    pub fn current_or_fetch(&mut self) -> Result<&S::Item> {
        let head = match self.head.take() {
            Some(head) => head,
            None => self.source.pull_next()?,
        };
        Ok(&*self.head.insert(head))
    }

    /// Clears the slot, handing back whatever was buffered.
    pub fn forget(&mut self) -> Option<S::Item> {
        self.head.take()
    }

    /// The head if it has already been fetched. Never pulls.
    pub fn peek(&self) -> Option<&S::Item> {
        self.head.as_ref()
    }

    /// Takes ownership of the head, fetching it first if needed.
    pub fn take_current(&mut self) -> Result<S::Item> {
        match self.forget() {
            Some(head) => Ok(head),
            None => self.source.pull_next(),
        }
    }

    /// Whether the underlying source has elements beyond the buffered head.
    pub fn has_more(&mut self) -> Result<bool> {
        self.source.has_more()
    }

    pub fn close(&mut self) -> Result<()> {
        self.head = None;
        self.source.close()
    }
}
