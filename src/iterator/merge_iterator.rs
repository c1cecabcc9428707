use std::cmp::Ordering;

use anyhow::Result;
use tracing::{debug, warn};

use crate::error::MergeError;

use super::{lookahead_source::LookaheadSource, Source};

/// Lazy k-way merge of sources that are each already sorted by `order`.
///
/// The next output is always computed one step ahead, so `has_next` never
/// touches a source. A source failure hit while computing it is held back
/// and returned by the following `take_next`.
pub struct KWayMerger<S: Source, F> {
    // every source ever handed in, so close can reach all of them
    sources: Vec<LookaheadSource<S>>,
    // indices into `sources` that are not exhausted, minimum head first
    active: Vec<usize>,
    order: F,
    pending: Option<S::Item>,
    deferred: Option<anyhow::Error>,
    closed: bool,
}

impl<S, F> KWayMerger<S, F>
where
    S: Source,
    F: Fn(&S::Item, &S::Item) -> Ordering,
{
    pub fn new(sources: Vec<S>, order: F) -> Self {
        let mut sources: Vec<LookaheadSource<S>> =
            sources.into_iter().map(LookaheadSource::new).collect();
        let mut active = Vec::with_capacity(sources.len());
        let mut deferred = None;
        for (index, source) in sources.iter_mut().enumerate() {
            match source.has_more() {
                Ok(true) => active.push(index),
                Ok(false) => debug!(source = index, "dropping exhausted source"),
                Err(e) => {
                    debug!(source = index, "deferring failure: {:#}", e);
                    deferred.get_or_insert(e);
                }
            }
        }

        let mut merger = Self {
            sources,
            active,
            order,
            pending: None,
            deferred,
            closed: false,
        };
        if merger.deferred.is_none() {
            merger.select_next();
        }
        merger
    }

    /// True while there is an element to hand out or a failure to report.
    pub fn has_next(&self) -> bool {
        self.pending.is_some() || self.deferred.is_some()
    }

    pub fn take_next(&mut self) -> Result<S::Item> {
        if let Some(e) = self.deferred.take() {
            return Err(e);
        }
        let current = self.pending.take().ok_or(MergeError::Exhausted)?;
        self.select_next();
        Ok(current)
    }

    fn select_next(&mut self) {
        if let Err(e) = self.try_select_next() {
            debug!("deferring failure: {:#}", e);
            self.pending = None;
            self.deferred = Some(e);
        }
    }

    fn try_select_next(&mut self) -> Result<()> {
        if self.active.len() > 1 {
            self.order_active()?;
        }
        let Some(&first) = self.active.first() else {
            return Ok(());
        };

        let source = &mut self.sources[first];
        source.current_or_fetch()?;
        let more = source.has_more()?;
        let head = source.take_current()?;
        if !more {
            debug!(source = first, "source exhausted");
            self.active.remove(0);
        }
        self.pending = Some(head);
        Ok(())
    }

    /// Moves the source with the smallest head to the front. Heads are
    /// fetched before sorting so the comparison itself cannot fail; the sort
    /// is stable, so equal heads keep the order of the previous round.
    fn order_active(&mut self) -> Result<()> {
        for &index in &self.active {
            self.sources[index].current_or_fetch()?;
        }
        let sources = &self.sources;
        let order = &self.order;
        self.active
            .sort_by(|&a, &b| match (sources[a].peek(), sources[b].peek()) {
                (Some(x), Some(y)) => order(x, y),
                _ => Ordering::Equal,
            });
        Ok(())
    }
}

impl<S: Source, F> KWayMerger<S, F> {
    /// Closes every source the merger was built from, exhausted or not.
    /// All sources are attempted even if some fail; the failures are
    /// returned together as `MergeError::Close`. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.active.clear();
        self.pending = None;
        self.deferred = None;

        let mut failures = vec![];
        for (index, source) in self.sources.iter_mut().enumerate() {
            if let Err(e) = source.close() {
                warn!(source = index, "failed to close source: {:#}", e);
                failures.push(e);
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(MergeError::Close(failures).into())
        }
    }
}

impl<S: Source, F> Drop for KWayMerger<S, F> {
    fn drop(&mut self) {
        // failures are already logged by close
        self.close().ok();
    }
}

impl<S, F> Source for KWayMerger<S, F>
where
    S: Source,
    F: Fn(&S::Item, &S::Item) -> Ordering,
{
    type Item = S::Item;

    fn has_more(&mut self) -> Result<bool> {
        Ok(self.has_next())
    }

    fn pull_next(&mut self) -> Result<S::Item> {
        self.take_next()
    }

    fn close(&mut self) -> Result<()> {
        KWayMerger::close(self)
    }
}

impl<S, F> Iterator for KWayMerger<S, F>
where
    S: Source,
    F: Fn(&S::Item, &S::Item) -> Ordering,
{
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        Some(self.take_next())
    }
}
