use inidoc::{
    parse, parse_reader, parse_slice, parse_with_options, serialize, validate, BoolLiterals,
    Comment, Delimiter, Document, DuplicateKeyPolicy, DuplicateSectionPolicy, Error, LineEnding,
    ParseOptions, SerializeOptions, Value,
};
use std::io::Cursor;

const SAMPLE: &str = "\
; Global settings
name = inventory
debug = off

[server]
host = 0.0.0.0   ; listen everywhere
port = 8080

# storage
[database]
url = \"postgres://db:5432/app\"
pool = 8
";

#[test]
fn test_round_trip_sample() {
    let doc = parse(SAMPLE).unwrap();
    assert_eq!(doc.to_string(), SAMPLE);
    assert_eq!(serialize(&doc, &SerializeOptions::round_trip()), SAMPLE);
}

#[test]
fn test_round_trip_awkward_spacing() {
    let text = "  top=1\n\n\n   [  spaced name  ]   # note\n\tkey\t=\tvalue\t\nempty =\n  ; indented comment\n\n";
    let doc = parse(text).unwrap();
    assert_eq!(doc.to_string(), text);
    assert!(doc.has_section("spaced name"));
    assert_eq!(doc.get("spaced name", "key").unwrap(), "value");
    assert_eq!(doc.get("spaced name", "empty").unwrap(), "");
}

#[test]
fn test_round_trip_colon_delimiter_and_custom_markers() {
    let options = ParseOptions::new()
        .with_delimiter(Delimiter::Colon)
        .with_comment_markers(['!']);
    let text = "! remark\n[paths]\nroot: /srv ! inline\nurl: http://x\n";
    let parsed = parse_with_options(text, &options).unwrap();
    let doc = parsed.document;
    assert_eq!(doc.get("paths", "url").unwrap(), "http://x");
    assert_eq!(
        doc.get_section("paths")
            .unwrap()
            .get("root")
            .unwrap()
            .comment()
            .map(Comment::text),
        Some(" inline")
    );
    assert_eq!(doc.to_string(), text);
}

#[test]
fn test_canonical_is_fixed_point() {
    let doc = parse(SAMPLE).unwrap();
    let once = serialize(&doc, &SerializeOptions::canonical());
    let twice = serialize(&parse(&once).unwrap(), &SerializeOptions::canonical());
    assert_eq!(once, twice);
    assert_eq!(
        once,
        "; Global settings\nname = inventory\ndebug = off\n\n[server]\nhost = 0.0.0.0 ; listen everywhere\nport = 8080\n\n# storage\n[database]\nurl = postgres://db:5432/app\npool = 8\n"
    );
}

#[test]
fn test_duplicate_key_overwrite_and_reject() {
    let text = "[a]\nk=1\nk=2\n";

    let doc = parse(text).unwrap();
    assert_eq!(doc.get("a", "k").unwrap(), "2");
    assert_eq!(doc.get_section("a").unwrap().len(), 1);

    let reject = ParseOptions::new().with_duplicate_keys(DuplicateKeyPolicy::Reject);
    let err = parse_with_options(text, &reject).unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { ref key, line: Some(3), .. } if key == "k"));
}

#[test]
fn test_duplicate_key_append() {
    let options = ParseOptions::new().with_duplicate_keys(DuplicateKeyPolicy::Append);
    let text = "[a]\nk=1\nk=2 ; second\nk=3\n";
    let doc = parse_with_options(text, &options).unwrap().document;
    let entry = doc.get_section("a").unwrap().get("k").unwrap();
    assert_eq!(entry.values(), ["1", "2", "3"]);
    assert_eq!(entry.value(), "3");
    assert_eq!(entry.values_as::<i32>().unwrap(), vec![1, 2, 3]);
    assert_eq!(doc.to_string(), text);
}

#[test]
fn test_quoted_values() {
    let doc = parse("k = \"  x  \"\n").unwrap();
    assert_eq!(doc.get("", "k").unwrap(), "  x  ");

    let err = parse("k = \"unterminated").unwrap_err();
    assert_eq!(err.line(), Some(1));
    assert!(matches!(err, Error::Syntax { col: 5, .. }));
}

#[test]
fn test_type_coercion() {
    let doc = parse("n = 42\nt = true\ny = Yes\ns = abc\nhex = 0xff\nf = -1.5e3\n").unwrap();
    assert_eq!(doc.get_as::<i64>("", "n").unwrap(), 42);
    assert!(doc.get_as::<bool>("", "t").unwrap());
    assert!(doc.get_as::<bool>("", "y").unwrap());
    assert_eq!(doc.get_as::<u8>("", "hex").unwrap(), 255);
    assert_eq!(doc.get_as::<f64>("", "f").unwrap(), -1500.0);

    let err = doc.get_as::<i64>("", "s").unwrap_err();
    assert!(matches!(err, Error::TypeCoercion { ref value, .. } if value == "abc"));
    assert!(matches!(
        doc.get_as::<u8>("", "n").map(|n| n + 1),
        Ok(43)
    ));
    assert!(doc.get_as::<i8>("", "hex").is_err());
}

#[test]
fn test_custom_bool_literals() {
    let options = ParseOptions::new().with_bool_literals(BoolLiterals::new(["enabled"], ["disabled"]));
    let doc = parse_with_options("a = ENABLED\nb = yes\n", &options).unwrap().document;
    assert!(doc.get_as::<bool>("", "a").unwrap());
    assert!(doc.get_as::<bool>("", "b").is_err());
    assert!(doc
        .get_section("")
        .unwrap()
        .get("b")
        .unwrap()
        .as_bool()
        .unwrap());
}

#[test]
fn test_section_merge_and_reject() {
    let text = "[a]\nx=1\n[a]\ny=2\n";

    let doc = parse(text).unwrap();
    assert_eq!(doc.len(), 1);
    let section = doc.get_section("a").unwrap();
    assert!(section.contains_key("x"));
    assert!(section.contains_key("y"));

    let reject = ParseOptions::new().with_duplicate_sections(DuplicateSectionPolicy::Reject);
    let err = parse_with_options(text, &reject).unwrap_err();
    assert!(matches!(err, Error::DuplicateSection { ref name, line: Some(3) } if name == "a"));
}

#[test]
fn test_lenient_mode_keeps_valid_entries() {
    let text = "[a]\nx = 1\nbroken\ny = 2\n[b]\nz = 3\n";
    let parsed = parse_with_options(text, &ParseOptions::lenient()).unwrap();

    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].line, 3);
    assert_eq!(parsed.diagnostics[0].column, 1);
    assert!(matches!(parsed.diagnostics[0].error, Error::Syntax { .. }));

    let doc = parsed.document;
    assert_eq!(doc.get("a", "x").unwrap(), "1");
    assert_eq!(doc.get("a", "y").unwrap(), "2");
    assert_eq!(doc.get("b", "z").unwrap(), "3");
}

#[test]
fn test_validate_reports_each_bad_line() {
    let diagnostics = validate("[ok]\n[bad\nk\n= v\nk = \"x\\q\"\n", &ParseOptions::default());
    let positions: Vec<_> = diagnostics.iter().map(|d| (d.line, d.column)).collect();
    assert_eq!(positions, vec![(2, 1), (3, 1), (4, 1), (5, 7)]);
    assert!(validate(SAMPLE, &ParseOptions::default()).is_empty());
}

#[test]
fn test_bom_is_transparent() {
    let plain = parse("[a]\nk = v\n").unwrap();
    let bom = parse("\u{feff}[a]\nk = v\n").unwrap();
    assert_eq!(plain.get("a", "k").unwrap(), bom.get("a", "k").unwrap());
    assert_eq!(bom.to_string(), "\u{feff}[a]\nk = v\n");
    assert_eq!(
        serialize(&bom, &SerializeOptions::canonical()),
        "[a]\nk = v\n"
    );
}

#[test]
fn test_crlf_input_and_output() {
    let doc = parse("[a]\r\nk = v\r\n").unwrap();
    assert_eq!(doc.get("a", "k").unwrap(), "v");

    let crlf = SerializeOptions::round_trip().with_line_ending(LineEnding::CrLf);
    assert_eq!(serialize(&doc, &crlf), "[a]\r\nk = v\r\n");
    assert_eq!(doc.to_string(), "[a]\nk = v\n");
}

#[test]
fn test_parse_slice_and_reader() {
    let options = ParseOptions::default();
    let parsed = parse_slice(SAMPLE.as_bytes(), &options).unwrap();
    assert_eq!(parsed.document.get("server", "port").unwrap(), "8080");

    let parsed = parse_reader(Cursor::new(SAMPLE.as_bytes().to_vec()), &options).unwrap();
    assert_eq!(parsed.document.to_string(), SAMPLE);

    assert!(matches!(
        parse_slice(b"\xc3\x28", &options),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_document_api() {
    let mut doc = Document::new();
    assert!(doc.is_empty());

    doc.set("", "version", "1");
    doc.set_value("server", "port", 8080);
    doc.set_value("server", "ratio", 0.5);
    doc.insert_section("client").unwrap();
    assert!(doc.insert_section("client").is_err());

    assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["server", "client"]);
    assert!(doc.has_key("server", "port"));
    assert!(!doc.has_key("client", "port"));
    assert!(!doc.has_key("nowhere", "port"));
    assert!(doc.has_section(""));

    assert!(matches!(
        doc.get_section("nowhere"),
        Err(Error::SectionNotFound { .. })
    ));
    assert!(matches!(
        doc.get("server", "nowhere"),
        Err(Error::KeyNotFound { .. })
    ));
    assert_eq!(doc.get_or("server", "port", 0u16), 8080);
    assert_eq!(doc.get_or("server", "missing", 7u16), 7);

    let entry = doc.remove("server", "ratio").unwrap();
    assert_eq!(entry.to_value(), Value::Float(0.5));
    assert!(doc.remove("server", "ratio").is_err());

    let section = doc.section_mut("server").unwrap();
    section
        .get_mut("port")
        .unwrap()
        .set_comment(Some(Comment::new(';', " public")));
    assert_eq!(
        serialize(&doc, &SerializeOptions::canonical()),
        "version = 1\n\n[server]\nport = 8080 ; public\n\n[client]\n"
    );

    doc.clear();
    assert!(doc.is_empty());
    assert_eq!(doc.to_string(), "");
}

#[test]
fn test_case_insensitive_lookups() {
    let options = ParseOptions::new()
        .with_case_sensitive_sections(false)
        .with_case_sensitive_keys(false);
    let doc = parse_with_options("[Server]\nHost = a\n", &options)
        .unwrap()
        .document;
    assert_eq!(doc.get("SERVER", "host").unwrap(), "a");
    assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["Server"]);

    let strict = parse("[Server]\nHost = a\n").unwrap();
    assert!(strict.get("server", "Host").is_err());
}

#[test]
fn test_dump_listing() {
    let doc = parse(SAMPLE).unwrap();
    let dump = doc.dump();
    assert!(dump.starts_with("[Global]\n  name = inventory\n  debug = off\n\n[server]\n"));
    assert!(dump.ends_with("[database]\n  url = postgres://db:5432/app\n  pool = 8\n\n"));
}

#[test]
fn test_edits_preserve_untouched_lines() {
    let mut doc = parse(SAMPLE).unwrap();
    doc.set("server", "port", "9090");
    doc.remove_section("database").unwrap();
    doc.set("logging", "level", "info");

    assert_eq!(
        doc.to_string(),
        "; Global settings\nname = inventory\ndebug = off\n\n[server]\nhost = 0.0.0.0   ; listen everywhere\nport = 9090\n\n[logging]\nlevel = info\n"
    );
}

#[test]
fn test_document_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Document>();

    let doc = std::sync::Arc::new(parse(SAMPLE).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let doc = std::sync::Arc::clone(&doc);
            std::thread::spawn(move || doc.get("server", "port").map(str::to_string))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "8080");
    }
}
