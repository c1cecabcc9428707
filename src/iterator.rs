use anyhow::Result;

pub mod lookahead_source;
pub mod merge_iterator;
pub mod vec_source;

#[cfg(test)]
pub mod test_source;

/// A pull-based sequence of elements.
///
/// Exhaustion is permanent: once `has_more` returns false it never returns
/// true again. Whoever consumes a source is responsible for calling `close`.
pub trait Source {
    type Item;

    fn has_more(&mut self) -> Result<bool>;

    /// Fails if the source is exhausted or the element cannot be read.
    fn pull_next(&mut self) -> Result<Self::Item>;

    fn close(&mut self) -> Result<()>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    type Item = S::Item;

    fn has_more(&mut self) -> Result<bool> {
        (**self).has_more()
    }

    fn pull_next(&mut self) -> Result<Self::Item> {
        (**self).pull_next()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
