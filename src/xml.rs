// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! Streaming pull-parser over Wikipedia XML dumps.
//!
//! [`WikiXmlStreamer`] walks the dump token by token with [`quick_xml`],
//! the same shape as the original's `encoding/xml.Decoder` token loop: a
//! `<page>` element is decoded as a unit, a page that fails to decode is
//! silently skipped (the surrounding stream may still be well-formed), and
//! any other decode error is fatal. Cancellation is checked once per token,
//! so a `Ctrl+C` during a multi-gigabyte dump is honored promptly without
//! needing to wait for the current page to finish.

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::cancel::CancellationToken;
use crate::error::{Result, WikidexError};
use crate::types::Document;

/// Which child element of `<page>` is currently being accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Title,
    Id,
    Text,
}

/// Pulls successive [`Document`]s out of a `<mediawiki>` dump.
pub struct WikiXmlStreamer<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    cancel: CancellationToken,
}

impl<R: BufRead> WikiXmlStreamer<R> {
    pub fn new(source: R, cancel: CancellationToken) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);
        WikiXmlStreamer {
            reader,
            buf: Vec::new(),
            cancel,
        }
    }

    /// Return the next document, or `Ok(None)` at end of stream.
    ///
    /// A page whose children don't parse into a usable `id` is skipped -
    /// this mirrors `DecodeElement` failing and the caller `continue`-ing
    /// past it - while a malformed token stream outside of any page is
    /// reported as [`WikidexError::InvalidXml`]. A missing or empty title
    /// does not skip the page; titles may be empty (spec.md §3).
    pub fn next_document(&mut self) -> Result<Option<Document>> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(WikidexError::Cancelled);
            }
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(WikidexError::InvalidXml)?;

            match event {
                Event::Eof => return Ok(None),
                Event::Start(ref e) if e.local_name().as_ref() == b"page" => {
                    match self.read_page() {
                        Ok(Some(doc)) => return Ok(Some(doc)),
                        Ok(None) => continue,
                        Err(WikidexError::Cancelled) => return Err(WikidexError::Cancelled),
                        Err(_) => continue,
                    }
                }
                _ => continue,
            }
        }
    }

    /// Consume everything up to and including the matching `</page>`,
    /// returning `Ok(None)` if the page lacks an id. A missing or empty
    /// `<title>` is not a reason to skip the page - titles may be empty.
    fn read_page(&mut self) -> Result<Option<Document>> {
        let mut id = None;
        let mut title = None;
        let mut text = String::new();
        let mut depth = 1u32;
        let mut field = Field::None;
        let mut field_depth = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(WikidexError::Cancelled);
            }
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(WikidexError::InvalidXml)?;

            match event {
                Event::Eof => return Ok(None),
                Event::Start(e) => {
                    depth += 1;
                    if field == Field::None {
                        match e.local_name().as_ref() {
                            b"title" => {
                                field = Field::Title;
                                field_depth = depth;
                            }
                            b"id" => {
                                field = Field::Id;
                                field_depth = depth;
                            }
                            b"text" => {
                                field = Field::Text;
                                field_depth = depth;
                            }
                            _ => {}
                        }
                    }
                }
                Event::End(_) => {
                    if field != Field::None && depth == field_depth {
                        field = Field::None;
                    }
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Event::Text(e) => {
                    let decoded = e.unescape().unwrap_or_default();
                    Self::record_field_text(field, &decoded, &mut title, &mut id, &mut text);
                }
                Event::CData(e) => {
                    let decoded = String::from_utf8_lossy(&e);
                    Self::record_field_text(field, &decoded, &mut title, &mut id, &mut text);
                }
                _ => {}
            }
        }

        let Some(id) = id else {
            return Ok(None);
        };
        Ok(Some(Document {
            id,
            title: title.unwrap_or_default(),
            content: text,
            metadata: std::collections::HashMap::new(),
        }))
    }

    /// Route decoded text from a `Text` or `CData` event into whichever
    /// field is currently open, same handling either way.
    fn record_field_text(
        field: Field,
        decoded: &str,
        title: &mut Option<String>,
        id: &mut Option<String>,
        text: &mut String,
    ) {
        match field {
            Field::Title => {
                title.get_or_insert_with(String::new).push_str(decoded);
            }
            Field::Id if id.is_none() => {
                *id = Some(decoded.trim().to_string());
            }
            Field::Text => text.push_str(decoded),
            _ => {}
        }
    }
}
