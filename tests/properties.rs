//! Property-based tests for the invariants spec.md §8 calls out: index
//! order-independence, shard sortedness, and stemmer case-insensitivity.

use std::collections::HashMap;

use proptest::prelude::*;
use tempfile::TempDir;
use wikidex::inverted::InvertedIndex;
use wikidex::shard::{write_shards, ShardReader};
use wikidex::stemmer::Stemmer;
use wikidex::types::{Field, FieldMask, Posting};

fn ascii_letters() -> impl Strategy<Value = String> {
    "[a-z]{2,12}"
}

fn doc_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}"
}

fn field_bit() -> impl Strategy<Value = Field> {
    prop_oneof![
        Just(Field::Geobox),
        Just(Field::Infobox),
        Just(Field::Links),
        Just(Field::Body),
        Just(Field::Category),
        Just(Field::Title),
    ]
}

fn addition() -> impl Strategy<Value = (String, String, Field, u32)> {
    (ascii_letters(), doc_id(), field_bit(), 1u32..20)
}

fn snapshot(index: &InvertedIndex, terms: &[String]) -> HashMap<String, HashMap<String, Posting>> {
    let mut out = HashMap::new();
    for term in terms {
        if let Some(p) = index.postings(term) {
            out.insert(term.clone(), p);
        }
    }
    out
}

proptest! {
    #[test]
    fn add_is_order_independent(additions in prop::collection::vec(addition(), 1..40)) {
        let terms: Vec<String> = additions.iter().map(|(t, _, _, _)| t.clone()).collect();

        let forward = InvertedIndex::new();
        for (term, id, field, freq) in &additions {
            forward.add(term, id, Posting::new(FieldMask::from(*field), *freq));
        }

        let reversed = InvertedIndex::new();
        for (term, id, field, freq) in additions.iter().rev() {
            reversed.add(term, id, Posting::new(FieldMask::from(*field), *freq));
        }

        prop_assert_eq!(snapshot(&forward, &terms), snapshot(&reversed, &terms));
    }

    #[test]
    fn round_trip_through_shards_preserves_every_tuple(
        additions in prop::collection::vec(addition(), 1..30)
    ) {
        let index = InvertedIndex::new();
        for (term, id, field, freq) in &additions {
            index.add(term, id, Posting::new(FieldMask::from(*field), *freq));
        }

        let dir = TempDir::new().unwrap();
        write_shards(dir.path(), &index).unwrap();
        let reader = ShardReader::open(dir.path()).unwrap();

        let terms: Vec<String> = additions.iter().map(|(t, _, _, _)| t.clone()).collect();
        for term in &terms {
            let expected = index.postings(term).unwrap();
            let actual = reader.postings(term).unwrap();
            prop_assert_eq!(expected, actual);
        }
    }

    #[test]
    fn shard_letter_matches_every_term_s_first_byte(
        additions in prop::collection::vec(addition(), 1..30)
    ) {
        let index = InvertedIndex::new();
        for (term, id, field, freq) in &additions {
            index.add(term, id, Posting::new(FieldMask::from(*field), *freq));
        }
        let dir = TempDir::new().unwrap();
        write_shards(dir.path(), &index).unwrap();

        for letter in b'a'..=b'z' {
            let path = dir.path().join(format!("index{}.idx", letter as char));
            let content = std::fs::read_to_string(&path).unwrap();
            for line in content.lines() {
                let term = line.split(':').next().unwrap();
                prop_assert_eq!(term.as_bytes()[0], letter);
            }
        }
    }

    #[test]
    fn shard_terms_are_strictly_ascending(
        additions in prop::collection::vec(addition(), 1..30)
    ) {
        let index = InvertedIndex::new();
        for (term, id, field, freq) in &additions {
            index.add(term, id, Posting::new(FieldMask::from(*field), *freq));
        }
        let dir = TempDir::new().unwrap();
        write_shards(dir.path(), &index).unwrap();

        for letter in b'a'..=b'z' {
            let path = dir.path().join(format!("index{}.idx", letter as char));
            let content = std::fs::read_to_string(&path).unwrap();
            let terms: Vec<&str> = content
                .lines()
                .map(|l| l.split(':').next().unwrap())
                .collect();
            for w in terms.windows(2) {
                prop_assert!(w[0] < w[1]);
            }
        }
    }

    #[test]
    fn stem_is_case_insensitive(word in "[a-zA-Z]{2,15}") {
        let mut a = Stemmer::new();
        let mut b = Stemmer::new();
        let stem_of_original = a.stem(&word);
        let stem_of_lower = b.stem(&word.to_lowercase());
        prop_assert_eq!(stem_of_original, stem_of_lower);
    }
}
