mod common;

use std::fs;

use bionlp_ingest::{
    read_ner_from_tsv, sentence_to_example, BioReader, DatasetError, EntitySpan, LocalResolver,
    SpanExample,
};
use proptest::prelude::*;

fn read_all(tsv: &str) -> Result<Vec<SpanExample>, DatasetError> {
    BioReader::new(tsv.as_bytes()).collect()
}

#[test]
fn person_span_ends_after_last_tagged_word() {
    let example = sentence_to_example(&[("John", "B-PER"), ("Smith", "I-PER"), ("died", "O")]);
    assert_eq!(example.text, "John Smith died");
    assert_eq!(example.entities, vec![EntitySpan::new(0, 10, "PER")]);
    assert_eq!(&example.text[0..10], "John Smith");
}

#[test]
fn exchange_format_snapshot() {
    let example = sentence_to_example(&[("John", "B-PER"), ("Smith", "I-PER"), ("died", "O")]);
    insta::assert_json_snapshot!(example, @r###"
    [
      "John Smith died",
      {
        "entities": [
          [
            0,
            10,
            "PER"
          ]
        ]
      }
    ]
    "###);
}

#[test]
fn exchange_format_round_trips_through_json() {
    let json = r#"["a b",{"entities":[[2,3,"X"]]}]"#;
    let example: SpanExample = serde_json::from_str(json).unwrap();
    assert_eq!(example, SpanExample::new("a b", vec![EntitySpan::new(2, 3, "X")]));
    assert_eq!(serde_json::to_string(&example).unwrap(), json);
}

#[test]
fn adjacent_runs_of_different_types_merge() {
    let example = sentence_to_example(&[
        ("Acme", "B-ORG"),
        ("Corp", "I-ORG"),
        ("Bob", "B-PER"),
        ("left", "O"),
        ("Paris", "B-LOC"),
    ]);
    assert_eq!(
        example.entities,
        vec![EntitySpan::new(0, 13, "ORG"), EntitySpan::new(19, 24, "LOC")]
    );
}

#[test]
fn labels_drop_prefix_and_uppercase() {
    let example = sentence_to_example(&[("aspirin", "B-Chemical")]);
    assert_eq!(example.entities, vec![EntitySpan::new(0, 7, "CHEMICAL")]);
}

#[test]
fn offsets_count_characters_not_bytes() {
    let example = sentence_to_example(&[("Noël", "O"), ("Müller", "B-PER")]);
    assert_eq!(example.entities, vec![EntitySpan::new(5, 11, "PER")]);
    assert_eq!(example.text.chars().count(), 11);
}

#[test]
fn reader_splits_sentences_and_skips_docstart() {
    let examples = read_all(common::BIO_TSV).unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].text, "John Smith died");
    assert_eq!(examples[1].text, "Aspirin helps");
    assert_eq!(examples[1].entities, vec![EntitySpan::new(0, 7, "CHEMICAL")]);
}

#[test]
fn docstart_then_blank_line_yields_nothing() {
    assert!(read_all("-DOCSTART-\n\n").unwrap().is_empty());
    assert_eq!(read_all("-DOCSTART-\n\n\n\na\tO\n\n\n").unwrap().len(), 1);
}

#[test]
fn line_without_exactly_two_fields_fails() {
    for tsv in ["a\tO\nb\n", "a\tO\nb\tO\textra\n"] {
        match read_all(tsv).unwrap_err() {
            DatasetError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn read_ner_from_tsv_resolves_local_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.tsv");
    fs::write(&path, common::BIO_TSV).unwrap();

    let examples = read_ner_from_tsv(path.to_str().unwrap(), &LocalResolver).unwrap();
    assert_eq!(examples.len(), 2);

    let missing = dir.path().join("dev.tsv");
    let err = read_ner_from_tsv(missing.to_str().unwrap(), &LocalResolver).unwrap_err();
    assert!(matches!(err, DatasetError::MissingFile(_)));
}

fn tag() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("O"), Just("B-PER"), Just("I-PER"), Just("B-ORG"), Just("I-GENE")]
}

proptest! {
    #[test]
    fn sentence_round_trips_words(
        tokens in proptest::collection::vec(("[A-Za-z0-9éß.,-]{1,8}", tag()), 1..20),
    ) {
        let example = sentence_to_example(&tokens);
        let words: Vec<&str> = tokens.iter().map(|(w, _)| w.as_str()).collect();

        prop_assert_eq!(example.text.split(' ').collect::<Vec<_>>(), words.clone());
        prop_assert_eq!(&example.text, &words.join(" "));

        let chars: Vec<char> = example.text.chars().collect();
        let mut previous_end = 0;
        for span in &example.entities {
            prop_assert!(span.start < span.end);
            prop_assert!(span.end <= chars.len());
            prop_assert!(span.start >= previous_end);
            prop_assert!(chars[span.start] != ' ');
            prop_assert!(chars[span.end - 1] != ' ');
            prop_assert!(span.end == chars.len() || chars[span.end] == ' ');
            previous_end = span.end;
        }
    }
}
