//! Parser and printer tests

use pretty_assertions::assert_eq;
use stylepass::*;

// ═══════════════════════════════════════════════════════════════════════
// Printing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_pretty_output_is_stable() {
    let source = "a {\n  color: red;\n  margin: 0 auto;\n}\n\n@media screen and (min-width: 40rem) {\n  .nav > li:hover {\n    display: block;\n  }\n}\n";
    let sheet = parse_stylesheet(source).unwrap();
    assert_eq!(sheet.to_string(), source);
}

#[test]
fn test_minified_output() {
    let sheet = parse_stylesheet(
        "/* header */\nh1 ,  h2 {\n  font: bold 2rem/1.2 \"Inter\", sans-serif;\n}\n@media (hover) { a { color: blue } }",
    )
    .unwrap();
    assert_eq!(
        Printer::minified().print(&sheet),
        "h1 , h2{font:bold 2rem/1.2 \"Inter\", sans-serif}@media (hover){a{color:blue}}"
    );
}

#[test]
fn test_nested_rules_printed_indented() {
    let sheet = parse_stylesheet(".card { padding: 1rem; &:hover { color: red } }").unwrap();
    assert_eq!(
        sheet.to_string(),
        ".card {\n  padding: 1rem;\n  &:hover {\n    color: red;\n  }\n}\n"
    );
}

#[test]
fn test_strings_keep_their_quotes() {
    let source = "a {\n  content: \"it's \\\"x\\\"\";\n  quotes: '\"' '\"';\n}\n";
    let printed = parse_stylesheet(source).unwrap().to_string();
    assert_eq!(printed, source);
    assert_eq!(parse_stylesheet(&printed).unwrap(), parse_stylesheet(source).unwrap());
}

#[test]
fn test_unicode_range_round_trips() {
    let source = "@font-face {\n  unicode-range: U+0025-00FF, u+4??;\n}\n";
    assert_eq!(parse_stylesheet(source).unwrap().to_string(), source);
}

// ═══════════════════════════════════════════════════════════════════════
// Structure
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_media_queries_split_on_commas() {
    let sheet = parse_stylesheet("@media print, (max-width: 600px) { a { b: c } }").unwrap();
    let media = match &sheet.rules[0] {
        Rule::Media(media) => media,
        other => panic!("expected media rule, got {:?}", other),
    };
    assert_eq!(media.queries.len(), 2);
    assert_eq!(
        media.queries[1].components,
        vec![MediaComponent::Feature(MediaFeature {
            name: "max-width".into(),
            comparison: Some(Comparison::Colon),
            value: vec![ComponentValue::Dimension(Dimension::px(600.0))],
        })]
    );
}

#[test]
fn test_env_reference_with_fallback() {
    let values = parse_value("env(--space-md, 4px)").unwrap();
    assert_eq!(
        values,
        vec![ComponentValue::Env(EnvReference {
            name: "--space-md".into(),
            fallback: Some(vec![ComponentValue::Dimension(Dimension::px(4.0))]),
        })]
    );
}

#[test]
fn test_custom_property_declaration() {
    let sheet = parse_stylesheet(":root { --brand: #0af }").unwrap();
    let decl = match &sheet.rules[0] {
        Rule::Style(rule) => rule.block.declarations().next().cloned().unwrap(),
        other => panic!("expected style rule, got {:?}", other),
    };
    assert!(decl.is_custom_property());
    assert_eq!(decl.value, vec![ComponentValue::Hash("0af".into())]);
}

#[test]
fn test_grouped_media_condition_recognizes_feature() {
    let sheet = parse_stylesheet("@media screen and ((min-width: 40rem)) { a { b: c } }").unwrap();
    let media = match &sheet.rules[0] {
        Rule::Media(media) => media,
        other => panic!("expected media rule, got {:?}", other),
    };
    assert!(matches!(
        &media.queries[0].components[2],
        MediaComponent::Group(inner) if matches!(&inner[0], MediaComponent::Feature(f) if f.name == "min-width")
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unterminated_block_reports_position() {
    let err = parse_stylesheet("a {\n  color: red;\nb {").unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedBlock { .. }));
}

#[test]
fn test_missing_colon() {
    let err = parse_stylesheet("a { color red }").unwrap_err();
    match err {
        ParseError::ExpectedColon { property, at } => {
            assert_eq!(property, "color");
            assert_eq!((at.line, at.column), (1, 11));
        }
        other => panic!("expected missing colon, got {:?}", other),
    }
}

#[test]
fn test_unclosed_function() {
    let err = parse_value("calc(1px + 2px").unwrap_err();
    assert_eq!(err.to_string(), "unclosed `calc(` opened at 1:1");
}
