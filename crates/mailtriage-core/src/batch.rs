//! Batch windows over the mailbox and the records collected for them.

use std::fmt;

use crate::record::HeaderRecord;
use crate::triage::is_order;

/// A descending index window `from ..= to + 1`.
///
/// `to` is exclusive so that consecutive windows share a boundary value
/// without sharing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Highest index, inclusive.
    pub from: u32,
    /// Lower bound, exclusive.
    pub to: u32,
}

impl Window {
    /// Builds a window from an explicit range, swapping the bounds if `to`
    /// is above `from`.
    #[must_use]
    pub const fn range(from: u32, to: u32) -> Self {
        if to > from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    /// Caps the upper bound at `size`. Returns true if it was lowered.
    pub fn clamp_to(&mut self, size: u32) -> bool {
        if self.from <= size {
            return false;
        }
        self.from = size;
        self.to = self.to.min(size);
        true
    }

    /// Message indices in the window, highest first.
    pub fn indices(&self) -> impl DoubleEndedIterator<Item = u32> + use<> {
        (self.to + 1..=self.from).rev()
    }

    /// Number of messages in the window.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.from - self.to
    }

    /// Returns true if the window holds no index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

/// Splits a mailbox of `size` messages into windows of `batch` messages,
/// newest first.
///
/// Yields `ceil(size / batch)` windows. A zero batch size yields nothing;
/// callers reject it before getting here.
#[must_use]
pub fn cyclic(size: u32, batch: u32) -> Vec<Window> {
    if batch == 0 {
        return Vec::new();
    }
    let mut windows = Vec::with_capacity(size.div_ceil(batch) as usize);
    let mut from = size;
    while from > 0 {
        let to = from.saturating_sub(batch);
        windows.push(Window { from, to });
        from = to;
    }
    windows
}

/// Records gathered during one batch pass.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Records selected for display and deletion, highest index first.
    pub selected: Vec<HeaderRecord>,
    /// Records whose subject looks like an order, selected or not.
    pub orders: Vec<HeaderRecord>,
    /// Messages the store refused to return.
    pub skipped: Vec<u32>,
}

impl Batch {
    /// Files a classified record. Returns true if it was selected.
    pub fn push(&mut self, record: HeaderRecord, spam_only: bool) -> bool {
        if is_order(&record) {
            self.orders.push(record.clone());
        }
        if record.probable_spam() || !spam_only {
            self.selected.push(record);
            return true;
        }
        false
    }

    /// Indices that a confirmed delete removes.
    pub fn delete_targets(&self) -> impl Iterator<Item = u32> + '_ {
        self.selected.iter().filter_map(HeaderRecord::index)
    }
}
