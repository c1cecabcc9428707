use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use anyhow::{anyhow, Result};

use super::Source;

#[derive(Debug, Default)]
pub struct SourceLog {
    pub pulls: usize,
    pub closes: usize,
}

/// Scripted source that records how it is driven and can be told to fail.
pub struct TestSource<T> {
    items: VecDeque<T>,
    // 1-based number of the pull that fails
    fail_on_pull: Option<usize>,
    fail_has_more_after: Option<usize>,
    fail_close: bool,
    log: Rc<RefCell<SourceLog>>,
}

impl<T> TestSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
            fail_on_pull: None,
            fail_has_more_after: None,
            fail_close: false,
            log: Rc::new(RefCell::new(SourceLog::default())),
        }
    }

    pub fn failing_on_pull(mut self, pull: usize) -> Self {
        self.fail_on_pull = Some(pull);
        self
    }

    pub fn failing_has_more_after(mut self, pulls: usize) -> Self {
        self.fail_has_more_after = Some(pulls);
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn log(&self) -> Rc<RefCell<SourceLog>> {
        self.log.clone()
    }
}

impl<T> Source for TestSource<T> {
    type Item = T;

    fn has_more(&mut self) -> Result<bool> {
        let pulls = self.log.borrow().pulls;
        if self.fail_has_more_after.is_some_and(|after| pulls >= after) {
            return Err(anyhow!("has_more failed after {} pulls", pulls));
        }
        Ok(!self.items.is_empty())
    }

    fn pull_next(&mut self) -> Result<T> {
        let pull = {
            let mut log = self.log.borrow_mut();
            log.pulls += 1;
            log.pulls
        };
        if self.fail_on_pull == Some(pull) {
            return Err(anyhow!("pull {} failed", pull));
        }
        self.items
            .pop_front()
            .ok_or_else(|| anyhow!("test source is exhausted"))
    }

    fn close(&mut self) -> Result<()> {
        self.log.borrow_mut().closes += 1;
        if self.fail_close {
            return Err(anyhow!("close failed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::iterator::Source;

    use super::TestSource;

    #[test]
    fn test_test_source() {
        let mut source = TestSource::new(vec![1, 2]).failing_on_pull(2);
        let log = source.log();
        assert_eq!(source.pull_next().unwrap(), 1);
        assert!(source.pull_next().is_err());
        // the failed pull did not consume anything
        assert!(source.has_more().unwrap());
        assert_eq!(source.pull_next().unwrap(), 2);
        assert!(!source.has_more().unwrap());
        assert_eq!(log.borrow().pulls, 3);

        source.close().unwrap();
        assert_eq!(log.borrow().closes, 1);
    }
}
