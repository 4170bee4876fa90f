// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! The closed set of ways this crate can fail.
//!
//! Every fallible entry point returns `Result<T, WikidexError>`. Two failure
//! kinds are deliberately *not* propagated to callers: a per-page XML decode
//! failure (the streamer just skips the page) and a per-term posting lookup
//! failure during search (the evaluator just skips the term). Both are still
//! represented here because they're constructed and then discarded by their
//! respective callers rather than bubbling up - see `xml::WikiXmlStreamer`
//! and `search::QueryEvaluator`.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong building or querying a wikidex index.
#[derive(Debug, Error)]
pub enum WikidexError {
    /// An input or output path could not be created or opened.
    #[error("invalid path: {path}")]
    InvalidPath {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// The XML decoder hit an unrecoverable token error outside of a page.
    #[error("invalid XML format")]
    InvalidXml(#[source] quick_xml::Error),

    /// A shard file required at search startup is missing.
    #[error("index not found: {0}")]
    IndexNotFound(PathBuf),

    /// A query term is empty or its first byte is outside `a..z`.
    #[error("invalid term: {0}")]
    InvalidTerm(String),

    /// A generic read/write failure outside the other, more specific kinds.
    #[error("IO error during {operation}")]
    Io {
        operation: &'static str,
        #[source]
        cause: std::io::Error,
    },

    /// The query parsed to zero admissible stems.
    #[error("no valid terms in query")]
    NoValidTerms,

    /// Cancellation was requested and honored before finishing.
    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, WikidexError>;
