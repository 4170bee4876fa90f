// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! Wiki-markup field classification.
//!
//! [`MarkupParser`] walks a [`Document`]'s title and body and buckets every
//! admissible stem into one or more [`Field`]s, producing the per-document
//! term table that [`crate::inverted::InvertedIndex::add`] merges in.
//!
//! The extraction order matters and is not arbitrary: category, infobox and
//! geobox templates are pulled out (and their key/value text classified)
//! *before* the generic link regex runs, and everything matched so far is
//! stripped from the text before what remains is classified as plain body.
//! A token can therefore end up tagged with more than one field - e.g. a
//! category name that also happens to appear as a wikilink target.
//!
//! The regexes are deliberately non-nesting (`[^\]]+`, `[^}]*`) - they do
//! not balance nested `{{...}}` or `[[...]]` and will mis-segment deeply
//! nested templates. This mirrors the original source exactly.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::stemmer::Stemmer;
use crate::token::{is_admissible, tokenize};
use crate::types::{Document, Field, FieldMask, Posting};

static CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[category:([^\]]+)\]\]").unwrap());
static INFOBOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{infobox([^}]*)\}\}").unwrap());
static GEOBOX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{geobox[^}]*\}\}").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)").unwrap());
// No `(?s)` flag: the original regexes don't set DOTALL either, so a
// comment or <ref> spanning a newline is left unstripped, same as upstream.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!--.*?-->").unwrap());
static REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<ref[^>]*>.*?</ref>").unwrap());
static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{[^}]*\}\}").unwrap());
static HTML_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Classifies a document's title and body text into field-tagged term
/// postings, stemming every admissible token along the way.
pub struct MarkupParser<'a> {
    stemmer: &'a mut Stemmer,
    terms: HashMap<String, Posting>,
}

impl<'a> MarkupParser<'a> {
    pub fn new(stemmer: &'a mut Stemmer) -> Self {
        MarkupParser {
            stemmer,
            terms: HashMap::new(),
        }
    }

    /// Parse `doc`'s title and content, populating `doc.metadata` from any
    /// infobox key/value pairs found along the way, and return the
    /// per-term postings accumulated for this document.
    pub fn parse(mut self, doc: &mut Document) -> HashMap<String, Posting> {
        self.classify(&doc.title, Field::Title);
        let content = doc.content.clone();
        self.parse_wiki_text(&content, doc);
        self.terms
    }

    fn parse_wiki_text(&mut self, content: &str, doc: &mut Document) {
        let text = content.to_lowercase();

        for caps in CATEGORY_RE.captures_iter(&text) {
            if let Some(m) = caps.get(1) {
                self.classify(m.as_str(), Field::Category);
            }
        }

        for caps in INFOBOX_RE.captures_iter(&text) {
            if let Some(m) = caps.get(1) {
                self.parse_infobox(m.as_str(), doc);
            }
        }

        for m in GEOBOX_RE.find_iter(&text) {
            self.classify(m.as_str(), Field::Geobox);
        }

        for caps in LINK_RE.captures_iter(&text) {
            if let Some(m) = caps.get(1) {
                self.classify(m.as_str(), Field::Links);
            }
        }

        let mut remainder = Self::remove_wiki_markup(&text);
        remainder = CATEGORY_RE.replace_all(&remainder, "").into_owned();
        remainder = INFOBOX_RE.replace_all(&remainder, "").into_owned();
        remainder = GEOBOX_RE.replace_all(&remainder, "").into_owned();
        remainder = LINK_RE.replace_all(&remainder, "").into_owned();

        self.classify(&remainder, Field::Body);
    }

    fn remove_wiki_markup(text: &str) -> String {
        let text = COMMENT_RE.replace_all(text, "");
        let text = REF_RE.replace_all(&text, "");
        let text = TEMPLATE_RE.replace_all(&text, "");
        HTML_RE.replace_all(&text, "").into_owned()
    }

    fn parse_infobox(&mut self, infobox_text: &str, doc: &mut Document) {
        for part in infobox_text.split('|') {
            let part = part.trim();
            let Some(eq) = part.find('=') else {
                continue;
            };
            let key = part[..eq].trim();
            let value = part[eq + 1..].trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            doc.metadata
                .insert(key.to_lowercase(), value.to_lowercase());
            self.classify(key, Field::Infobox);
            self.classify(value, Field::Infobox);
        }
    }

    fn classify(&mut self, text: &str, field: Field) {
        for token in tokenize(text) {
            if !is_admissible(&token) {
                continue;
            }
            let stem = self.stemmer.stem(&token);
            let posting = self.terms.entry(stem).or_default();
            posting.fields = posting.fields.union(FieldMask::from(field));
            posting.frequency += 1;
        }
    }
}
