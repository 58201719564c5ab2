use serde_json::json;
use strata_codegen::{
    emit, loader, reassemble, unescape_literal, ChunkedEmitter, Document, DocumentCodec,
    DocumentError, EmitError, EmitterConfig, JsonCodec, Target,
};

fn numbered_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("line {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn sample_document() -> Document {
    let mut project = Document::named("inventory").with_property("version", 3);
    for s in 0..4 {
        let mut schema = Document::named(format!("schema_{}", s));
        for t in 0..12 {
            schema = schema.with_child(
                "tables",
                Document::named(format!("table_{}_{}", s, t))
                    .with_property("comment", "quoted \"name\" with C:\\path")
                    .with_property("columns", json!(["id", "name", "created_at"])),
            );
        }
        project = project.with_child("schemas", schema);
    }
    project
}

#[test]
fn test_250_lines_split_into_three_parts() {
    let text = numbered_lines(250);
    let unit = emit(&text, 100).unwrap();

    let sizes: Vec<usize> = unit.segments.iter().map(|s| s.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let names: Vec<&str> = unit.procedures.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["init_part0", "init_part1", "init_part2"]);

    let calls = [
        unit.source.find("    init_part0(&mut sb);").unwrap(),
        unit.source.find("    init_part1(&mut sb);").unwrap(),
        unit.source.find("    init_part2(&mut sb);").unwrap(),
    ];
    assert!(calls[0] < calls[1] && calls[1] < calls[2]);

    assert_eq!(reassemble(&unit.segments), text);
    assert_eq!(unit.run_driver().unwrap(), text);
}

#[test]
fn test_segment_count_and_bound() {
    for lines in [1, 2, 7, 99, 100, 101, 300] {
        let text = numbered_lines(lines);
        for bound in [1, 3, 50, 100, 1000] {
            let unit = emit(&text, bound).unwrap();
            assert_eq!(unit.segments.len(), lines.div_ceil(bound), "{} / {}", lines, bound);
            assert!(unit.segments.iter().all(|s| s.len() <= bound));
            assert_eq!(unit.line_count(), lines);
        }
    }
}

#[test]
fn test_emission_is_deterministic() {
    let text = JsonCodec::<Document>::new().encode(&sample_document()).unwrap();
    for target in [Target::Rust, Target::TypeScript] {
        let emitter = ChunkedEmitter::new(EmitterConfig::for_target(target).with_max_lines(17)).unwrap();
        let first = emitter.emit(&text).unwrap();
        let second = emitter.emit(&text).unwrap();
        assert_eq!(first.source, second.source);
        assert_eq!(first, second);
    }
}

#[test]
fn test_document_round_trip_through_driver() {
    let document = sample_document();
    let codec = JsonCodec::new();

    for bound in [1, 7, 100] {
        let emitter = ChunkedEmitter::new(EmitterConfig::default().with_max_lines(bound)).unwrap();
        let unit = emitter.emit_document(&codec, &document).unwrap();
        assert!(unit.segments.len() > 1 || bound == 100);
        assert_eq!(loader::load(&codec, &unit).unwrap(), document);
    }
}

/// Concatenate the string literals of every part body in `source`, in file
/// order. Parts are rendered in index order, matching the driver's calls.
fn literals_in_source(source: &str) -> String {
    source
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix('"'))
        .filter_map(|line| line.strip_suffix("\","))
        .map(|literal| unescape_literal(literal).unwrap())
        .collect()
}

#[test]
fn test_rendered_source_carries_the_text() {
    let texts = [
        JsonCodec::<Document>::new().encode(&sample_document()).unwrap(),
        "  indented\n\n\"quoted\" \\ back\\slash\r\n\ttab\n".to_string(),
        "no trailing newline".to_string(),
        String::new(),
    ];

    for target in [Target::Rust, Target::TypeScript] {
        for text in &texts {
            for bound in [1, 4, 100] {
                let config = EmitterConfig::for_target(target).with_max_lines(bound);
                let unit = ChunkedEmitter::new(config).unwrap().emit(text).unwrap();
                assert_eq!(
                    literals_in_source(&unit.source),
                    *text,
                    "{} / {}",
                    target,
                    bound
                );
            }
        }
    }
}

#[test]
fn test_whitespace_and_blank_lines_survive() {
    for text in [
        "",
        "\n",
        "\n\n\n",
        "  leading\n\ntrailing  ",
        "ends with newline\n",
        "crlf\r\nlines\r\n",
        "\ttabbed\n\t\n",
    ] {
        for bound in [1, 2, 100] {
            let unit = emit(text, bound).unwrap();
            assert_eq!(reassemble(&unit.segments), text, "{:?} / {}", text, bound);
            assert_eq!(unit.run_driver().unwrap(), text, "{:?} / {}", text, bound);
        }
    }
}

#[test]
fn test_backslash_quote_line_is_escaped_in_source() {
    let unit = emit("before\n\\\"\nafter", 100).unwrap();
    assert_eq!(unit.procedures[0].literals[1], "\\\\\\\"\\n");
    assert!(unit.source.contains("        \"\\\\\\\"\\n\",\n"));
    assert_eq!(unit.run_driver().unwrap(), "before\n\\\"\nafter");
}

#[test]
fn test_typescript_unit() {
    let config = EmitterConfig::for_target(Target::TypeScript)
        .with_max_lines(2)
        .with_unit_name("inventory");
    let unit = ChunkedEmitter::new(config).unwrap().emit("a\nb\nc").unwrap();

    assert_eq!(unit.target, Target::TypeScript);
    assert!(unit.source.starts_with("// @generated"));
    assert!(unit.source.contains("`inventory`, split into 2 part(s)"));
    assert!(unit.source.contains("function initPart0(sb: string[]): void {"));
    assert!(unit.source.contains("    \"a\\n\",\n    \"b\\n\","));
    assert!(unit.source.contains("    \"c\","));
    assert!(unit.source.contains("  initPart0(sb);\n  initPart1(sb);"));
    assert_eq!(unit.run_driver().unwrap(), "a\nb\nc");
}

#[test]
fn test_custom_names() {
    let config = EmitterConfig {
        part_prefix: Some("chunk_".to_string()),
        driver_name: Some("build_metadata".to_string()),
        accumulator: Some("out".to_string()),
        ..EmitterConfig::default()
    }
    .with_max_lines(1);
    let unit = ChunkedEmitter::new(config).unwrap().emit("x\ny").unwrap();

    assert_eq!(unit.driver_name, "build_metadata");
    assert!(unit.source.contains("fn build_metadata() -> String {"));
    assert!(unit.source.contains("    chunk_1(&mut out);"));
    assert!(unit.source.contains("fn chunk_0(out: &mut String) {"));
    assert!(unit.source.contains("METADATA.get_or_init(build_metadata)"));
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("codec refused: {0}")]
struct Refused(String);

struct FailingCodec;

impl DocumentCodec for FailingCodec {
    type Document = Document;
    type Error = Refused;

    fn encode(&self, _document: &Document) -> Result<String, Refused> {
        Err(Refused("unsupported node".to_string()))
    }

    fn decode(&self, _text: &str) -> Result<Document, Refused> {
        Err(Refused("unsupported text".to_string()))
    }
}

#[test]
fn test_codec_failure_is_returned_unchanged() {
    let emitter = ChunkedEmitter::new(EmitterConfig::default()).unwrap();
    let err = emitter
        .emit_document(&FailingCodec, &Document::new())
        .unwrap_err();

    assert_eq!(err.to_string(), "codec refused: unsupported node");
    match err {
        DocumentError::Serialization(inner) => {
            assert_eq!(inner, Refused("unsupported node".to_string()))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_control_character_aborts_emission() {
    let err = emit("fine\nbell\u{0007}", 100).unwrap_err();
    assert_eq!(
        err,
        EmitError::EncodingFailure {
            line: 2,
            column: 5,
            character: '\u{0007}',
        }
    );
}
