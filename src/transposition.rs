//! Dominance map over already-seen (board, tray) configurations.
//!
//! One index lives for exactly one solve call. Entries are never evicted.
use crate::engine::Signature;
use rustc_hash::FxHashMap;

/// Best visit recorded for a signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub best_score: i64,
    pub tray_len: usize,
}

impl Entry {
    /// `true` when this entry is at least as good as the candidate on both axes.
    pub fn dominates(&self, score: i64, tray_len: usize) -> bool {
        self.best_score >= score && self.tray_len <= tray_len
    }
}

#[derive(Debug, Default)]
pub struct TranspositionIndex {
    entries: FxHashMap<Signature, Entry>,
}

impl TranspositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, signature: &Signature) -> Option<Entry> {
        self.entries.get(signature).copied()
    }

    /// Overwrites the entry for `signature`.
    pub fn record(&mut self, signature: Signature, score: i64, tray_len: usize) {
        self.entries.insert(
            signature,
            Entry {
                best_score: score,
                tray_len,
            },
        );
    }

    /// Checks the candidate against the stored entry and records it if it survives.
    ///
    /// Returns `false` when an existing entry weakly dominates the candidate.
    pub fn admit(&mut self, signature: &Signature, score: i64, tray_len: usize) -> bool {
        if let Some(entry) = self.entries.get(signature) {
            if entry.dominates(score, tray_len) {
                return false;
            }
        }
        self.record(signature.clone(), score, tray_len);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
