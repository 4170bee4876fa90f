// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! Cooperative cancellation, shared between the indexer and the search REPL.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply-cloned flag, checked between units of work (XML tokens, pages,
/// query rounds) rather than enforced preemptively.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
