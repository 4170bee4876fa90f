// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! Tokenization and the stop-word filter applied before stemming.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Words common enough that indexing them would bloat every shard without
/// improving recall. Matches the original indexer's list exactly.
const STOP_WORDS: [&str; 28] = [
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "would", "you", "your",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.into_iter().collect());

/// Extract runs of lowercase ASCII letters, matching the source indexer's
/// `[a-z]+` word regex over already-lowercased text. Anything outside
/// `a..z` - digits, punctuation, non-ASCII - is treated as a separator.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    let lower = text.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_lowercase() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push(chars[s..i].iter().collect());
        }
    }
    if let Some(s) = start {
        tokens.push(chars[s..].iter().collect());
    }
    tokens.into_iter()
}

/// Whether a lowercase token should be indexed or queried: longer than one
/// character and not a stop word.
pub fn is_admissible(token: &str) -> bool {
    token.len() > 1 && !STOP_WORD_SET.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_non_letters_and_lowercases() {
        let got: Vec<String> = tokenize("Hello, World! It's 2026.").collect();
        assert_eq!(got, vec!["hello", "world", "it", "s"]);
    }

    #[test]
    fn stop_words_are_rejected() {
        assert!(!is_admissible("the"));
        assert!(!is_admissible("and"));
        assert!(is_admissible("wikipedia"));
    }

    #[test]
    fn single_letter_tokens_are_rejected() {
        assert!(!is_admissible("a"));
        assert!(!is_admissible(""));
    }
}
