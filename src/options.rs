use std::cmp::Ordering;

use bytes::Bytes;

use crate::kv::kv_pair::KeyValuePair;

/// Picks the order a merge runs in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MergeOptions {
    /// Compare by the number a line starts with. Lines that don't start
    /// with a number go after all lines that do.
    pub numeric: bool,
    pub reverse: bool,
    /// ASCII case folding only.
    pub ignore_case: bool,
}

impl MergeOptions {
    pub fn new_with_defaults() -> Self {
        Self::default()
    }

    pub fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        let ordering = if self.numeric {
            match (leading_number(a), leading_number(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => self.compare_text(a, b),
            }
        } else {
            self.compare_text(a, b)
        };
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    fn compare_text(&self, a: &[u8], b: &[u8]) -> Ordering {
        if self.ignore_case {
            a.iter()
                .map(u8::to_ascii_lowercase)
                .cmp(b.iter().map(u8::to_ascii_lowercase))
        } else {
            a.cmp(b)
        }
    }

    pub fn line_order(self) -> impl Fn(&Bytes, &Bytes) -> Ordering {
        move |a: &Bytes, b: &Bytes| self.compare(a, b)
    }

    pub fn key_order(self) -> impl Fn(&KeyValuePair, &KeyValuePair) -> Ordering {
        move |a: &KeyValuePair, b: &KeyValuePair| self.compare(&a.key, &b.key)
    }
}

fn leading_number(line: &[u8]) -> Option<f64> {
    let start = line.iter().position(|c| !c.is_ascii_whitespace())?;
    let line = &line[start..];
    let mut end = 0;
    let mut seen_dot = false;
    for (index, &c) in line.iter().enumerate() {
        match c {
            b'-' | b'+' if index == 0 => {}
            b'0'..=b'9' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = index + 1;
    }
    std::str::from_utf8(&line[..end]).ok()?.parse().ok()
}
