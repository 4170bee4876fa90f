// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the wikidex command-line interface.
//!
//! Two subcommands: `index` to build a search index from a Wikipedia XML
//! dump, and `search` to open an interactive query REPL against one.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wikidex", about = "Full-text Wikipedia indexer and search engine", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an inverted index from a Wikipedia XML dump
    Index {
        /// Path to the Wikipedia XML dump to index
        xml_file: PathBuf,

        /// Directory to write the 26 shard files into
        index_path: PathBuf,
    },

    /// Open an interactive search REPL against a built index
    Search {
        /// Directory containing a previously built index
        index_path: PathBuf,
    },
}
