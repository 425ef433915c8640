//! Integration tests for the full split → parse → emit pipeline.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use hinario::output::RecordWriter;
use hinario::parser::{parse_block, parse_document, HeaderPattern, HymnFormat, Label};
use hinario::record::{FieldNames, HymnRecord};

#[test]
fn worked_example_block_produces_expected_record() {
    let block = "5 Título Bonito\n\n1. Primeira linha\nSegunda linha\n\nCoro\nLinha do coro\n\n2. Outra estrofe";

    // Prefixed header layout without the indentation heuristic
    let format = HymnFormat {
        indent_chorus_threshold: None,
        header: HeaderPattern::Prefixed,
        ..HymnFormat::casteliano()
    };

    let hymn = parse_block(block, &format).expect("block should parse");
    let record = HymnRecord::from_parsed(&hymn);

    assert_eq!(record.no, 5);
    assert_eq!(record.title, "Título Bonito");
    assert_eq!(
        record.lyrics,
        "[Verse 1]\nPrimeira linha\nSegunda linha\n\n[Chorus]\nLinha do coro\n\n[Verse 2]\nOutra estrofe"
    );
}

#[test]
fn cantado_export_end_to_end() {
    let document = "\
Coletânea de Hinos
Prefácio sem cabeçalho de hino

Hino 1 – Vencendo Vem Jesus
1. Já refulge a glória eterna
Vem Jesus

Coro: Glória a Deus
nas alturas

2. Glória e honra

\u{c}Hino 2 – Saudosa Lembrança (anotação)
1. Oh! que saudosa lembrança
";

    let hymns = parse_document(document, &HymnFormat::cantado());
    assert_eq!(hymns.len(), 2);

    let first = HymnRecord::from_parsed(&hymns[0]);
    assert_eq!(first.no, 1);
    assert_eq!(first.title, "Vencendo Vem Jesus");
    assert_eq!(
        first.lyrics,
        "[Verse 1]\nJá refulge a glória eterna\nVem Jesus\n\n[Chorus]\nGlória a Deus\nnas alturas\n\n[Verse 2]\nGlória e honra"
    );

    // Parenthetical annotation is stripped at record emission
    let second = HymnRecord::from_parsed(&hymns[1]);
    assert_eq!(second.title, "Saudosa Lembrança");
}

#[test]
fn casteliano_export_end_to_end() {
    let document = "\
1 Cristo, Maestro
Divino

1. Primeiro verso aqui
segunda linha do verso

      Refrão indentado
      segue o refrão

2. Segundo verso

2 Outro Hino

1. Verso único

Índice
1 Cristo, Maestro ........ 3
";

    let hymns = parse_document(document, &HymnFormat::casteliano());
    assert_eq!(hymns.len(), 2);

    // Two-line title merged via the continuation rule
    assert_eq!(hymns[0].title, "Cristo, Maestro Divino");
    let labels: Vec<Label> = hymns[0].segments.iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        vec![Label::Verse(1), Label::Chorus, Label::Verse(2)]
    );

    // The index section is truncated away, never parsed as a hymn
    assert_eq!(hymns[1].number, 2);
    assert_eq!(hymns[1].segments.len(), 1);
}

#[test]
fn reparsing_a_block_is_idempotent() {
    let block = "Hino 44 – Título\n\n1. linha\n\nCoro\nrefrão\n";
    let format = HymnFormat::cantado();
    let first = parse_block(block, &format).unwrap();
    let second = parse_block(block, &format).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        HymnRecord::from_parsed(&first),
        HymnRecord::from_parsed(&second)
    );
}

#[test]
fn duplicate_numbers_across_documents_get_suffixed_files() {
    let doc_a = "Hino 7 – Primeiro Sete\n1. um\n";
    let doc_b = "Hino 7 – Segundo Sete\n1. dois\n";
    let format = HymnFormat::cantado();

    let dir = tempfile::tempdir().unwrap();
    let mut writer = RecordWriter::new(
        dir.path().join("json"),
        dir.path().join("markdown"),
        FieldNames::Standard,
    )
    .unwrap();

    for doc in [doc_a, doc_b] {
        for hymn in parse_document(doc, &format) {
            writer.write(&HymnRecord::from_parsed(&hymn)).unwrap();
        }
    }

    let first = fs_err::read_to_string(dir.path().join("json/7.json")).unwrap();
    let second = fs_err::read_to_string(dir.path().join("json/7-2.json")).unwrap();
    assert!(first.contains("Primeiro Sete"));
    assert!(second.contains("Segundo Sete"));
}

#[test]
fn legacy_field_names_flow_through_to_disk() {
    let doc = "Hino 3 – Título\n1. linha\n";
    let hymns = parse_document(doc, &HymnFormat::cantado());
    let hymn = &hymns[0];

    let dir = tempfile::tempdir().unwrap();
    let mut writer = RecordWriter::new(
        dir.path().join("json"),
        dir.path().join("markdown"),
        FieldNames::Legacy,
    )
    .unwrap();
    writer.write(&HymnRecord::from_parsed(hymn)).unwrap();

    let json = fs_err::read_to_string(dir.path().join("json/3.json")).unwrap();
    assert!(json.contains("\"id\": 3"));
    assert!(json.contains("\"titulo\""));

    let md = fs_err::read_to_string(dir.path().join("markdown/3.md")).unwrap();
    assert!(md.starts_with("---\nid: 3\ntitulo: Título\n---\n"));
}
