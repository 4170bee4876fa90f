// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! Query evaluation: tokenize, stem, look up postings, score, rank.

use std::collections::HashMap;

use crate::cancel::CancellationToken;
use crate::error::{Result, WikidexError};
use crate::shard::ShardReader;
use crate::stemmer::Stemmer;
use crate::token::{is_admissible, tokenize};
use crate::types::Field;

/// Fixed corpus size the original scoring formula was calibrated against.
/// Not derived from the built index - a genuinely different corpus size
/// will skew every `idf` score uniformly, which matters only in relative
/// comparisons across differently-sized indexes and is otherwise harmless.
const CORPUS_SIZE: f64 = 14_128_976.0;

/// Multiplier applied to a document's contribution when a query term
/// appears in its title field.
const TITLE_BOOST: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub doc_id: String,
    pub score: f64,
}

/// Evaluates queries against a built index's shard files.
pub struct QueryEvaluator<'a> {
    shards: &'a ShardReader,
    cancel: CancellationToken,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(shards: &'a ShardReader) -> Self {
        QueryEvaluator {
            shards,
            cancel: CancellationToken::new(),
        }
    }

    /// As [`Self::new`], but checking `cancel` once per query term so a
    /// long multi-term query can be aborted mid-evaluation.
    pub fn with_cancellation(shards: &'a ShardReader, cancel: CancellationToken) -> Self {
        QueryEvaluator { shards, cancel }
    }

    /// Tokenize and stem `query`, score every matching document by summed
    /// TF*IDF (title matches boosted `TITLE_BOOST`x), and return the top
    /// `limit` results sorted by descending score.
    ///
    /// A term whose shard lookup fails (malformed shard line, I/O error) is
    /// skipped rather than failing the whole query - this mirrors the
    /// original's `if err != nil { continue }` inside the term loop.
    /// Cancellation is checked once per query term and surfaces as
    /// [`WikidexError::Cancelled`] without returning partial results.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let terms = self.parse_query(query);
        if terms.is_empty() {
            return Err(WikidexError::NoValidTerms);
        }

        let mut scores: HashMap<String, f64> = HashMap::new();

        for term in &terms {
            if self.cancel.is_cancelled() {
                return Err(WikidexError::Cancelled);
            }
            let Ok(postings) = self.shards.postings(term) else {
                continue;
            };
            if postings.is_empty() {
                continue;
            }

            let idf = (CORPUS_SIZE / postings.len() as f64).log10();

            for (doc_id, posting) in postings {
                let tf = 1.0 + (posting.frequency as f64).log10();
                let mut score = tf * idf;
                if posting.fields.contains(Field::Title) {
                    score *= TITLE_BOOST;
                }
                *scores.entry(doc_id).or_insert(0.0) += score;
            }
        }

        let mut results: Vec<SearchResult> = scores
            .into_iter()
            .map(|(doc_id, score)| SearchResult { doc_id, score })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        Ok(results)
    }

    fn parse_query(&self, query: &str) -> Vec<String> {
        let mut stemmer = Stemmer::new();
        tokenize(query)
            .filter(|t| is_admissible(t))
            .map(|t| stemmer.stem(&t))
            .collect()
    }
}
