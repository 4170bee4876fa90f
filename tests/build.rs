//! Integration tests for the `index` subcommand's pipeline: streaming an
//! XML dump through to 26 written shard files.

use std::fs;
use std::io::Write;

use tempfile::TempDir;
use wikidex::build::run_build;
use wikidex::CancellationToken;

fn write_dump(dir: &TempDir, xml: &str) -> std::path::PathBuf {
    let path = dir.path().join("dump.xml");
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(xml.as_bytes()).unwrap();
    path
}

#[test]
fn indexing_a_small_dump_produces_all_26_shards() {
    let src = TempDir::new().unwrap();
    let xml_path = write_dump(
        &src,
        r#"<mediawiki>
            <page><title>Apple</title><id>1</id>
                <revision><text>An apple is a fruit. [[Category:Fruits]]</text></revision>
            </page>
            <page><title>Banana</title><id>2</id>
                <revision><text>A banana is also a fruit.</text></revision>
            </page>
        </mediawiki>"#,
    );
    let index_path = src.path().join("idx");

    run_build(&xml_path, &index_path, &CancellationToken::new()).unwrap();

    for letter in b'a'..=b'z' {
        let shard = index_path.join(format!("index{}.idx", letter as char));
        assert!(shard.is_file(), "missing shard {}", shard.display());
    }
}

#[test]
fn malformed_pages_are_skipped_but_well_formed_ones_survive() {
    let src = TempDir::new().unwrap();
    let xml_path = write_dump(
        &src,
        r#"<mediawiki>
            <page><title>No id here</title><revision><text>orphaned text</text></revision></page>
            <page><title>Valid Page</title><id>42</id>
                <revision><text>This page has an id and keeps running.</text></revision>
            </page>
        </mediawiki>"#,
    );
    let index_path = src.path().join("idx");

    run_build(&xml_path, &index_path, &CancellationToken::new()).unwrap();

    let content = fs::read_to_string(index_path.join("indexr.idx")).unwrap();
    assert!(content.lines().any(|l| l.starts_with("run:")));
    assert!(!content.contains("orphan"));
}

#[test]
fn an_unreadable_xml_path_surfaces_invalid_path() {
    let src = TempDir::new().unwrap();
    let missing = src.path().join("does-not-exist.xml");
    let index_path = src.path().join("idx");

    let err = run_build(&missing, &index_path, &CancellationToken::new()).unwrap_err();
    assert!(matches!(err, wikidex::WikidexError::InvalidPath { .. }));
}

#[test]
fn cancellation_before_any_page_is_read_skips_shard_writing() {
    let src = TempDir::new().unwrap();
    let xml_path = write_dump(
        &src,
        r#"<mediawiki><page><title>A</title><id>1</id>
            <revision><text>content</text></revision></page></mediawiki>"#,
    );
    let index_path = src.path().join("idx");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = run_build(&xml_path, &index_path, &cancel).unwrap_err();
    assert!(matches!(err, wikidex::WikidexError::Cancelled));
    assert!(!index_path.exists());
}
