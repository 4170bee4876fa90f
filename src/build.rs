// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! Top-level orchestration for the `index` subcommand: stream pages off an
//! XML dump, classify and stem each one, merge the results into a shared
//! [`InvertedIndex`], and write the final 26 shards.
//!
//! Pages are read off the dump strictly sequentially (the XML decoder owns
//! one cursor into one file) but batched and handed to a [`rayon`] pool for
//! the CPU-bound classify-and-stem work, matching the teacher's fan-out
//! shape of draining a streamed source into bounded batches rather than
//! collecting the whole dump into memory first.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::cancel::CancellationToken;
use crate::error::{Result, WikidexError};
use crate::inverted::InvertedIndex;
use crate::markup::MarkupParser;
use crate::shard::write_shards;
use crate::stemmer::StemmerPool;
use crate::types::Document;
use crate::xml::WikiXmlStreamer;

/// Pages are gathered into batches of this size before being handed to the
/// worker pool, bounding peak memory use on dumps far larger than RAM.
const BATCH_SIZE: usize = 512;

/// Parse `xml_path`, build the inverted index, and write it to
/// `index_path`. Returns [`WikidexError::Cancelled`] as soon as
/// cancellation is observed, leaving any shards already written in place.
pub fn run_build(xml_path: &Path, index_path: &Path, cancel: &CancellationToken) -> Result<()> {
    let file = File::open(xml_path).map_err(|cause| WikidexError::InvalidPath {
        path: xml_path.to_path_buf(),
        cause,
    })?;
    let mut streamer = WikiXmlStreamer::new(BufReader::new(file), cancel.clone());

    let index = InvertedIndex::new();
    let pool = StemmerPool::new();
    let progress = Progress::new();

    let mut batch = Vec::with_capacity(BATCH_SIZE);
    loop {
        match streamer.next_document()? {
            Some(doc) => {
                batch.push(doc);
                if batch.len() >= BATCH_SIZE {
                    process_batch(std::mem::take(&mut batch), &index, &pool, cancel)?;
                    progress.add(BATCH_SIZE as u64);
                }
            }
            None => break,
        }
    }
    if !batch.is_empty() {
        let n = batch.len() as u64;
        process_batch(batch, &index, &pool, cancel)?;
        progress.add(n);
    }
    progress.finish();

    write_shards(index_path, &index)
}

#[cfg(feature = "parallel")]
fn process_batch(
    batch: Vec<Document>,
    index: &InvertedIndex,
    pool: &StemmerPool,
    cancel: &CancellationToken,
) -> Result<()> {
    use rayon::prelude::*;

    if cancel.is_cancelled() {
        return Err(WikidexError::Cancelled);
    }
    batch.into_par_iter().try_for_each(|mut doc| -> Result<()> {
        if cancel.is_cancelled() {
            return Err(WikidexError::Cancelled);
        }
        let mut stemmer = pool.acquire();
        let terms = MarkupParser::new(&mut stemmer).parse(&mut doc);
        for (term, posting) in terms {
            index.add(&term, &doc.id, posting);
        }
        Ok(())
    })
}

#[cfg(not(feature = "parallel"))]
fn process_batch(
    batch: Vec<Document>,
    index: &InvertedIndex,
    pool: &StemmerPool,
    cancel: &CancellationToken,
) -> Result<()> {
    for mut doc in batch {
        if cancel.is_cancelled() {
            return Err(WikidexError::Cancelled);
        }
        let mut stemmer = pool.acquire();
        let terms = MarkupParser::new(&mut stemmer).parse(&mut doc);
        for (term, posting) in terms {
            index.add(&term, &doc.id, posting);
        }
    }
    Ok(())
}

#[cfg(feature = "parallel")]
struct Progress(indicatif::ProgressBar);

#[cfg(feature = "parallel")]
impl Progress {
    fn new() -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        bar.set_message("pages indexed");
        Progress(bar)
    }

    fn add(&self, n: u64) {
        self.0.inc(n);
    }

    fn finish(&self) {
        self.0.finish_with_message("indexing complete");
    }
}

#[cfg(not(feature = "parallel"))]
struct Progress;

#[cfg(not(feature = "parallel"))]
impl Progress {
    fn new() -> Self {
        Progress
    }

    fn add(&self, _n: u64) {}

    fn finish(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn builds_a_small_index_end_to_end() {
        let src = TempDir::new().unwrap();
        let xml_path = src.path().join("dump.xml");
        let mut f = File::create(&xml_path).unwrap();
        write!(
            f,
            r#"<mediawiki>
                <page><title>Rust Programming</title><id>1</id>
                    <revision><text>Rust is a systems programming language.</text></revision>
                </page>
                <page><title>Go Programming</title><id>2</id>
                    <revision><text>Go is also a programming language.</text></revision>
                </page>
            </mediawiki>"#
        )
        .unwrap();

        let index_path = src.path().join("idx");
        run_build(&xml_path, &index_path, &CancellationToken::new()).unwrap();

        assert!(index_path.join("indexa.idx").is_file());
        assert!(index_path.join("indexz.idx").is_file());
        let content = std::fs::read_to_string(index_path.join("indexp.idx")).unwrap();
        assert!(content.lines().any(|l| l.starts_with("programm:")));
    }

    #[test]
    fn cancellation_stops_the_build_early() {
        let src = TempDir::new().unwrap();
        let xml_path = src.path().join("dump.xml");
        let mut f = File::create(&xml_path).unwrap();
        write!(f, r#"<mediawiki><page><title>A</title><id>1</id><revision><text>x</text></revision></page></mediawiki>"#).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let index_path = src.path().join("idx");
        let err = run_build(&xml_path, &index_path, &cancel).unwrap_err();
        assert!(matches!(err, WikidexError::Cancelled));
    }
}
