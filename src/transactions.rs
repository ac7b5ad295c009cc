//! Append-only transaction history shared by the ledger and the property engine.

use serde::{Deserialize, Serialize};

/// Ordered, append-only list of transactions. Entries are never edited or
/// removed; append order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TransactionLog<T> {
    entries: Vec<T>,
}

impl<T> Default for TransactionLog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> TransactionLog<T> {
    /// Copy of this log with `tx` at the end. The original is left as is.
    pub fn appended(&self, tx: T) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend_from_slice(&self.entries);
        entries.push(tx);
        Self { entries }
    }
}

impl<T> TransactionLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-place append for owners that hold the log exclusively.
    pub fn push(&mut self, tx: T) {
        self.entries.push(tx);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }
}

impl<'a, T> IntoIterator for &'a TransactionLog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fresh unique transaction id.
pub fn new_tx_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_leaves_original_untouched() {
        let base: TransactionLog<u32> = TransactionLog::new();
        let one = base.appended(1);
        let two = one.appended(2);
        assert!(base.is_empty());
        assert_eq!(one.as_slice(), &[1]);
        assert_eq!(two.as_slice(), &[1, 2]);
        assert_eq!(two.last(), Some(&2));
    }

    #[test]
    fn push_keeps_order() {
        let mut log = TransactionLog::new();
        for i in 0..5 {
            log.push(i);
        }
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_tx_id(), new_tx_id());
    }

    #[test]
    fn serializes_as_plain_array() {
        let log = TransactionLog::new().appended("a".to_string());
        assert_eq!(serde_json::to_string(&log).unwrap(), "[\"a\"]");
    }
}
