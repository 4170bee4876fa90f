// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! The 26-bucket on-disk shard format: one file per first letter of the
//! alphabet, each line `term:docID$fields$freq:docID$fields$freq...`.
//!
//! Bucketing by first letter keeps any single shard small enough to scan
//! linearly at query time without an auxiliary term offset index, the same
//! tradeoff the original indexer makes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::error::{Result, WikidexError};
use crate::inverted::InvertedIndex;
use crate::types::{FieldMask, Posting};

const ALPHABET: std::ops::RangeInclusive<u8> = b'a'..=b'z';

fn shard_path(index_path: &Path, letter: u8) -> PathBuf {
    index_path.join(format!("index{}.idx", letter as char))
}

/// Create `index_path` (mode 0o755, matching the original's `os.MkdirAll`)
/// and write all 26 shard files from `index`.
pub fn write_shards(index_path: &Path, index: &InvertedIndex) -> Result<()> {
    fs::create_dir_all(index_path).map_err(|cause| WikidexError::InvalidPath {
        path: index_path.to_path_buf(),
        cause,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o755);
        let _ = fs::set_permissions(index_path, perms);
    }

    for letter in ALPHABET {
        write_shard(index_path, letter, index)?;
    }
    Ok(())
}

fn write_shard(index_path: &Path, letter: u8, index: &InvertedIndex) -> Result<()> {
    let path = shard_path(index_path, letter);
    let file = File::create(&path).map_err(|cause| WikidexError::Io {
        operation: "create shard file",
        cause,
    })?;
    let mut writer = BufWriter::new(file);

    let mut terms = index.terms_starting_with(letter as char);
    terms.sort_unstable();

    for term in terms {
        let Some(postings) = index.postings(&term) else {
            continue;
        };
        let mut doc_ids: Vec<&String> = postings.keys().collect();
        doc_ids.sort_unstable();

        write!(writer, "{term}").map_err(|cause| WikidexError::Io {
            operation: "write shard line",
            cause,
        })?;
        for doc_id in doc_ids {
            let posting = postings[doc_id];
            write!(writer, ":{doc_id}${posting}").map_err(|cause| WikidexError::Io {
                operation: "write shard posting",
                cause,
            })?;
        }
        writeln!(writer).map_err(|cause| WikidexError::Io {
            operation: "write shard newline",
            cause,
        })?;
    }

    writer.flush().map_err(|cause| WikidexError::Io {
        operation: "flush shard file",
        cause,
    })
}

/// Read access to a built index's 26 shard files.
///
/// Mirrors the original `SearchEngine`: every handle is opened once in
/// [`Self::open`] and kept for the engine's lifetime in a table keyed by
/// first letter, rather than reopened per lookup. [`Self::postings`] locks
/// just the one handle it needs, rewinds it to the start, and scans. An
/// explicit [`Self::close`] drops every handle early (the `Drop` impl would
/// do the same, but callers that want to free the descriptors before the
/// engine itself goes out of scope - e.g. before a long-lived process moves
/// on to other work - can call it directly, the same shape as the
/// original's `defer engine.Close()`).
pub struct ShardReader {
    index_path: PathBuf,
    handles: RwLock<HashMap<u8, Mutex<File>>>,
}

impl ShardReader {
    /// Open all 26 shard handles read-only, returning
    /// [`WikidexError::IndexNotFound`] naming the first one missing.
    pub fn open(index_path: &Path) -> Result<Self> {
        let mut handles = HashMap::with_capacity(26);
        for letter in ALPHABET {
            let path = shard_path(index_path, letter);
            let file = File::open(&path).map_err(|_| WikidexError::IndexNotFound(path.clone()))?;
            handles.insert(letter, Mutex::new(file));
        }
        Ok(ShardReader {
            index_path: index_path.to_path_buf(),
            handles: RwLock::new(handles),
        })
    }

    /// Close every shard handle early. Safe to call more than once; later
    /// lookups against a closed reader get an empty-handle-table error via
    /// the same path a still-missing shard would.
    pub fn close(&self) {
        self.handles.write().clear();
    }

    /// Scan the shard for `term`'s first letter and return its posting
    /// list, or an empty map if the term isn't present in that shard.
    pub fn postings(&self, term: &str) -> Result<HashMap<String, Posting>> {
        let first = term
            .bytes()
            .next()
            .ok_or_else(|| WikidexError::InvalidTerm(term.to_string()))?;
        if !first.is_ascii_lowercase() {
            return Err(WikidexError::InvalidTerm(term.to_string()));
        }

        let handles = self.handles.read();
        let lock = handles
            .get(&first)
            .ok_or_else(|| WikidexError::IndexNotFound(shard_path(&self.index_path, first)))?;
        let mut file = lock.lock();
        file.seek(SeekFrom::Start(0))
            .map_err(|cause| WikidexError::Io {
                operation: "rewind shard file",
                cause,
            })?;
        let reader = BufReader::new(&mut *file);

        for line in reader.lines() {
            let line = line.map_err(|cause| WikidexError::Io {
                operation: "read shard line",
                cause,
            })?;
            let mut parts = line.split(':');
            let Some(line_term) = parts.next() else {
                continue;
            };
            if line_term != term {
                continue;
            }
            let mut postings = HashMap::new();
            for entry in parts {
                let Some(dollar) = entry.find('$') else {
                    continue;
                };
                let doc_id = &entry[..dollar];
                let rest = &entry[dollar + 1..];
                let Some((fields_str, freq_str)) = rest.split_once('$') else {
                    continue;
                };
                let (Ok(fields), Ok(frequency)) =
                    (fields_str.parse::<u8>(), freq_str.parse::<u32>())
                else {
                    continue;
                };
                postings.insert(doc_id.to_string(), Posting::new(FieldMask(fields), frequency));
            }
            return Ok(postings);
        }

        Ok(HashMap::new())
    }
}
