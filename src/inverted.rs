// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! The shared, thread-safe term -> document -> posting table built during
//! indexing and drained into shards once the dump is fully streamed.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::Posting;

/// Guarded by a single [`RwLock`]: many worker threads call [`Self::add`]
/// concurrently (a short exclusive section per call), while
/// [`Self::terms_starting_with`] takes a shared read lock to drain one
/// shard's worth of terms during the write phase.
#[derive(Default)]
pub struct InvertedIndex {
    table: RwLock<HashMap<String, HashMap<String, Posting>>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Merge one `(term, doc_id)` occurrence into the index. Commutative
    /// and associative in `doc_id` and in repeated calls for the same key,
    /// so callers may merge per-document term tables in any order.
    pub fn add(&self, term: &str, doc_id: &str, posting: Posting) {
        let mut table = self.table.write();
        let docs = table.entry(term.to_string()).or_default();
        docs.entry(doc_id.to_string())
            .and_modify(|existing| existing.merge(posting))
            .or_insert(posting);
    }

    /// All terms that start with `prefix_char`, for shard construction.
    /// The returned list is unsorted; callers sort before writing.
    pub fn terms_starting_with(&self, prefix_char: char) -> Vec<String> {
        self.table
            .read()
            .keys()
            .filter(|term| term.chars().next() == Some(prefix_char))
            .cloned()
            .collect()
    }

    /// A copy of one term's posting list, document id -> posting.
    pub fn postings(&self, term: &str) -> Option<HashMap<String, Posting>> {
        self.table.read().get(term).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.table.read().len()
    }
}
