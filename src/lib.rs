// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! A full-text inverted index builder and TF*IDF search engine for
//! Wikipedia XML dumps.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌──────────────┐   ┌───────────────┐
//! │   xml.rs   │──▶│ markup.rs   │──▶│ inverted.rs  │──▶│   shard.rs    │
//! │ (streamer) │   │ (classify,  │   │ (shared      │   │ (26-bucket    │
//! │            │   │  stem)      │   │  term table) │   │  on-disk fmt) │
//! └────────────┘   └─────────────┘   └──────────────┘   └───────────────┘
//!        │                │                                     │
//!        ▼                ▼                                     ▼
//!   stemmer.rs        token.rs                              search.rs
//!  (Porter stem,    (tokenize,                           (QueryEvaluator:
//!   pooled)         stop words)                         score, rank, limit)
//! ```
//!
//! `build.rs` wires the streaming, classification and sharding stages
//! together for the `index` subcommand; `cancel.rs` and `error.rs` are
//! used throughout.

pub mod build;
pub mod cancel;
pub mod cli;
pub mod error;
pub mod inverted;
pub mod markup;
pub mod search;
pub mod shard;
pub mod stemmer;
pub mod token;
pub mod types;
pub mod xml;

pub use cancel::CancellationToken;
pub use error::{Result, WikidexError};
pub use inverted::InvertedIndex;
pub use search::{QueryEvaluator, SearchResult};
pub use shard::ShardReader;
pub use types::{Document, Field, FieldMask, Posting};
