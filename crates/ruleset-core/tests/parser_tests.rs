use ruleset_core::parser::{parse_line, ParserState};
use ruleset_core::{parse, RulesetError, Table, Value};
use serde_json::json;

/// Helper: parse and render as JSON for easy structural comparison.
fn parse_json(text: &str) -> serde_json::Value {
    let doc = parse(text).unwrap();
    serde_json::to_value(&doc).unwrap()
}

fn parse_err_line(text: &str) -> usize {
    match parse(text) {
        Err(RulesetError::Parse { line, .. }) => line,
        other => panic!("expected parse error, got {other:?}"),
    }
}

// ============================================================================
// Sections
// ============================================================================

#[test]
fn parse_empty_input() {
    let doc = parse("").unwrap();
    assert!(doc.is_empty());
}

#[test]
fn parse_section_with_integer() {
    assert_eq!(
        parse_json("[rulesets.ruff]\nline-length = 100\n"),
        json!({"rulesets": {"ruff": {"line-length": 100}}})
    );
}

#[test]
fn parse_section_value_is_a_number() {
    let doc = parse("[rulesets.ruff]\nline-length = 100\n").unwrap();
    let ruff = doc
        .get("rulesets")
        .and_then(Value::as_table)
        .and_then(|t| t.get("ruff"))
        .and_then(Value::as_table)
        .unwrap();
    assert_eq!(ruff.get("line-length"), Some(&Value::Number(100.0)));
}

#[test]
fn parse_empty_section_still_creates_tables() {
    assert_eq!(
        parse_json("[rulesets.eslint.rules]\n"),
        json!({"rulesets": {"eslint": {"rules": {}}}})
    );
}

#[test]
fn parse_keys_before_any_header_go_to_root() {
    assert_eq!(
        parse_json("version = 2\n[a]\nx = 1\n"),
        json!({"version": 2, "a": {"x": 1}})
    );
}

#[test]
fn parse_section_path_persists_across_blank_and_comment_lines() {
    let text = "[rulesets.ruff]\n\n# comment\n  # indented comment\nline-length = 88\n";
    assert_eq!(
        parse_json(text),
        json!({"rulesets": {"ruff": {"line-length": 88}}})
    );
}

#[test]
fn parse_sibling_sections_share_parent() {
    let text = "[rulesets.ruff]\nline-length = 88\n[rulesets.eslint.rules]\nno-console = \"warn\"\n";
    assert_eq!(
        parse_json(text),
        json!({"rulesets": {
            "ruff": {"line-length": 88},
            "eslint": {"rules": {"no-console": "warn"}}
        }})
    );
}

#[test]
fn parse_reopening_section_merges_keys() {
    let text = "[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n";
    assert_eq!(parse_json(text), json!({"a": {"x": 1, "z": 3}, "b": {"y": 2}}));
}

#[test]
fn parse_header_segments_are_trimmed() {
    assert_eq!(parse_json("[ a . b ]\nk = 1\n"), json!({"a": {"b": {"k": 1}}}));
}

#[test]
fn parse_header_with_empty_segment_fails() {
    assert_eq!(parse_err_line("x = 1\n[a..b]\n"), 2);
}

#[test]
fn parse_header_through_scalar_fails() {
    let err = parse("[a]\nb = 1\n[a.b.c]\n").unwrap_err();
    match err {
        RulesetError::Parse { line, reason } => {
            assert_eq!(line, 3);
            assert!(reason.contains("a.b"), "reason should name the key: {reason}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn parse_quoted_key() {
    assert_eq!(
        parse_json("[rules]\n\"@typescript-eslint/no-unused-vars\" = \"error\"\n"),
        json!({"rules": {"@typescript-eslint/no-unused-vars": "error"}})
    );
}

#[test]
fn parse_key_without_spaces_around_equals() {
    assert_eq!(parse_json("a=1\n"), json!({"a": 1}));
}

#[test]
fn parse_later_assignment_wins_and_keeps_position() {
    let doc = parse("a = 1\nb = 2\na = 3\n").unwrap();
    let keys: Vec<&str> = doc.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(doc.get("a"), Some(&Value::Number(3.0)));
}

#[test]
fn parse_preserves_insertion_order() {
    let doc = parse("[t]\nzeta = 1\nalpha = 2\nmid = 3\n").unwrap();
    let t = doc.get("t").and_then(Value::as_table).unwrap();
    let keys: Vec<&str> = t.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn parse_ignores_unrecognized_lines() {
    assert_eq!(
        parse_json("just some words\nkey =\n= value\n[]\na = 1\n"),
        json!({"a": 1})
    );
}

#[test]
fn parse_key_with_inner_quote_is_ignored() {
    assert_eq!(parse_json("a\"b = 1\nc = 2\n"), json!({"c": 2}));
}

#[test]
fn parse_value_may_contain_equals() {
    assert_eq!(parse_json("expr = a = b\n"), json!({"expr": "a = b"}));
}

#[test]
fn parse_handles_crlf_line_endings() {
    assert_eq!(
        parse_json("[rulesets.ruff]\r\nline-length = 100\r\n"),
        json!({"rulesets": {"ruff": {"line-length": 100}}})
    );
}

// ============================================================================
// Value coercion
// ============================================================================

#[test]
fn coerce_quoted_string_verbatim() {
    assert_eq!(parse_json(r#"s = "a\nb""#), json!({"s": "a\\nb"}));
}

#[test]
fn coerce_quoted_number_stays_string() {
    assert_eq!(parse_json("v = \"100\"\n"), json!({"v": "100"}));
}

#[test]
fn coerce_bare_booleans_are_strings() {
    let doc = parse("a = true\nb = false\n").unwrap();
    assert_eq!(doc.get("a"), Some(&Value::String("true".into())));
    assert_eq!(doc.get("b"), Some(&Value::String("false".into())));
}

#[test]
fn coerce_bare_word_is_string() {
    assert_eq!(parse_json("target = py311\n"), json!({"target": "py311"}));
}

#[test]
fn coerce_numbers() {
    let doc = parse("a = -7\nb = +3\nc = 3.5\nd = .5\ne = 5.\nf = 0\n").unwrap();
    assert_eq!(doc.get("a"), Some(&Value::Number(-7.0)));
    assert_eq!(doc.get("b"), Some(&Value::Number(3.0)));
    assert_eq!(doc.get("c"), Some(&Value::Number(3.5)));
    assert_eq!(doc.get("d"), Some(&Value::Number(0.5)));
    assert_eq!(doc.get("e"), Some(&Value::Number(5.0)));
    assert_eq!(doc.get("f"), Some(&Value::Number(0.0)));
}

#[test]
fn coerce_non_numbers_stay_strings() {
    let doc = parse("a = 1.2.3\nb = 1e5\nc = -\nd = inf\ne = 1_000\n").unwrap();
    for key in ["a", "b", "c", "d", "e"] {
        assert!(
            matches!(doc.get(key), Some(Value::String(_))),
            "{key} should be a string"
        );
    }
}

#[test]
fn coerce_trailing_comment_is_part_of_value() {
    assert_eq!(parse_json("a = 1 # note\n"), json!({"a": "1 # note"}));
}

#[test]
fn coerce_array_of_strings() {
    assert_eq!(
        parse_json("select = [\"E\", \"F\", \"W\"]\n"),
        json!({"select": ["E", "F", "W"]})
    );
}

#[test]
fn coerce_array_with_single_quotes() {
    assert_eq!(
        parse_json("select = ['E', 'F']\n"),
        json!({"select": ["E", "F"]})
    );
}

#[test]
fn coerce_empty_array() {
    assert_eq!(parse_json("a = []\n"), json!({"a": []}));
}

#[test]
fn coerce_lint_rule_array_with_options() {
    assert_eq!(
        parse_json("[rules]\nno-unused-vars = [\"error\", {\"args\": \"none\", \"ignoreRestSiblings\": true}]\n"),
        json!({"rules": {"no-unused-vars": ["error", {"args": "none", "ignoreRestSiblings": "true"}]}})
    );
}

#[test]
fn coerce_array_literal_keeps_object_key_order() {
    let doc = parse("a = [{\"z\": 1, \"a\": 2}]\n").unwrap();
    let Some(Value::Array(items)) = doc.get("a") else {
        panic!("expected array");
    };
    let table = items[0].as_table().unwrap();
    let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["z", "a"]);
}

#[test]
fn coerce_unterminated_array_fails() {
    assert_eq!(parse_err_line("tags = [oops"), 1);
}

#[test]
fn coerce_malformed_array_fails() {
    assert_eq!(parse_err_line("[a]\nb = 1\ntags = [1, 2,]\n"), 3);
}

#[test]
fn coerce_bare_words_in_array_fail() {
    assert_eq!(parse_err_line("tags = [E, F]\n"), 1);
}

#[test]
fn parse_error_message_includes_line() {
    let err = parse("\n\ntags = [oops").unwrap_err();
    assert!(err.to_string().starts_with("parse error at line 3:"));
}

// ============================================================================
// Line steps
// ============================================================================

#[test]
fn parse_line_threads_state() {
    let mut doc = Table::new();
    let state = ParserState::default();

    let state = parse_line(&mut doc, state, "[a.b]", 1).unwrap();
    assert_eq!(state.section, vec!["a".to_string(), "b".to_string()]);

    let state = parse_line(&mut doc, state, "# comment", 2).unwrap();
    assert_eq!(state.section, vec!["a".to_string(), "b".to_string()]);

    let state = parse_line(&mut doc, state, "k = 1", 3).unwrap();
    assert_eq!(state.section, vec!["a".to_string(), "b".to_string()]);

    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({"a": {"b": {"k": 1}}})
    );
}

#[test]
fn parse_calls_are_independent() {
    let first = parse("[a]\nx = 1\n").unwrap();
    let second = parse("y = 2\n").unwrap();
    assert_eq!(serde_json::to_value(&first).unwrap(), json!({"a": {"x": 1}}));
    assert_eq!(serde_json::to_value(&second).unwrap(), json!({"y": 2}));
}
