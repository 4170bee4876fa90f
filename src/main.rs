// Copyright 2025-present the wikidex contributors
// SPDX-License-Identifier: Apache-2.0

//! wikidex CLI: build and query a full-text Wikipedia index.
//!
//! ```bash
//! wikidex index dump.xml ./search-index
//! wikidex search ./search-index
//! ```

use std::io::{self, BufRead, Write};

use clap::Parser;

use wikidex::build::run_build;
use wikidex::search::QueryEvaluator;
use wikidex::shard::ShardReader;
use wikidex::CancellationToken;

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            eprintln!("\nReceived interrupt signal, cancelling...");
            cancel.cancel();
        }) {
            eprintln!("warning: failed to install signal handler: {e}");
        }
    }

    match cli.command {
        Commands::Index {
            xml_file,
            index_path,
        } => run_index(&xml_file, &index_path, &cancel),
        Commands::Search { index_path } => run_search(&index_path, &cancel),
    }
}

fn run_index(xml_file: &std::path::Path, index_path: &std::path::Path, cancel: &CancellationToken) {
    println!("Parsing Wikipedia XML dump: {}", xml_file.display());
    if let Err(e) = run_build(xml_file, index_path, cancel) {
        eprintln!("Error parsing XML: {e}");
        std::process::exit(1);
    }
    println!("Indexing completed successfully!");
}

fn run_search(index_path: &std::path::Path, cancel: &CancellationToken) {
    println!("Initializing search engine...");
    let shards = match ShardReader::open(index_path) {
        Ok(shards) => shards,
        Err(e) => {
            eprintln!("Error initializing search engine: {e}");
            std::process::exit(1);
        }
    };
    let evaluator = QueryEvaluator::with_cancellation(&shards, cancel.clone());

    println!("Search engine ready. Enter queries (Ctrl+C to exit):");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if cancel.is_cancelled() {
            break;
        }
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        match evaluator.search(query, 10) {
            Ok(results) if results.is_empty() => println!("No results found."),
            Ok(results) => {
                println!("Found {} results:", results.len());
                for (i, result) in results.iter().enumerate() {
                    println!(
                        "{}. DocID: {} (Score: {:.4})",
                        i + 1,
                        result.doc_id,
                        result.score
                    );
                }
            }
            Err(e) => println!("Search error: {e}"),
        }
    }

    drop(evaluator);
    shards.close();
}
