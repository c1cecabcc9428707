use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;

use crate::iterator::Source;

/// Source over the lines of a text file that is already sorted.
///
/// Lines are handed out without their line terminator.
pub struct LineSource {
    path: PathBuf,
    // none once closed
    reader: Option<BufReader<File>>,
}

impl LineSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let file =
            File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
        Ok(Self {
            path,
            reader: Some(BufReader::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader_mut(&mut self) -> Result<&mut BufReader<File>> {
        let path = &self.path;
        self.reader
            .as_mut()
            .ok_or_else(|| anyhow!("{} is closed", path.display()))
    }
}

impl Source for LineSource {
    type Item = Bytes;

    fn has_more(&mut self) -> Result<bool> {
        // peeks at the buffer, nothing is consumed
        let reader = self.reader_mut()?;
        Ok(!reader.fill_buf()?.is_empty())
    }

    fn pull_next(&mut self) -> Result<Bytes> {
        let mut line = Vec::new();
        let read = self.reader_mut()?.read_until(b'\n', &mut line);
        let read = read.with_context(|| format!("failed to read {}", self.path.display()))?;
        if read == 0 {
            return Err(anyhow!("{} has no more lines", self.path.display()));
        }
        if line.ends_with(b"\n") {
            line.pop();
            if line.ends_with(b"\r") {
                line.pop();
            }
        }
        Ok(Bytes::from(line))
    }

    fn close(&mut self) -> Result<()> {
        self.reader = None;
        Ok(())
    }
}
