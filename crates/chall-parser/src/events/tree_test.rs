use super::build_tree;
use crate::events::{rewrite_variable_blocks, scan_events};
use chall_core::ComposeError;
use serde_yaml::Value;
use yaml_rust2::parser::Event;

fn tree(input: &str) -> Value {
    build_tree(&scan_events(input).unwrap()).unwrap()
}

#[test]
fn builds_scalars_sequences_and_mappings() {
    let value = tree("name: demo\ncount: 3\nratio: 0.5\nflags: [true, off-label]\nempty:\n");
    assert_eq!(value.get("name"), Some(&Value::String("demo".into())));
    assert_eq!(value.get("count").and_then(Value::as_i64), Some(3));
    assert_eq!(value.get("ratio").and_then(Value::as_f64), Some(0.5));
    let flags = value.get("flags").and_then(Value::as_sequence).unwrap();
    assert_eq!(flags[0], Value::Bool(true));
    assert_eq!(flags[1], Value::String("off-label".into()));
    assert_eq!(value.get("empty"), Some(&Value::Null));
}

#[test]
fn quoted_scalars_stay_strings() {
    let value = tree("a: \"42\"\nb: '  spaced  '\n");
    assert_eq!(value.get("a"), Some(&Value::String("42".into())));
    assert_eq!(value.get("b"), Some(&Value::String("  spaced  ".into())));
}

#[test]
fn alias_resolves_to_the_anchored_value() {
    let value = tree("x: &n hello\ny: *n\n");
    assert_eq!(value.get("y"), Some(&Value::String("hello".into())));
}

#[test]
fn custom_tag_survives_as_tagged_value() {
    let value = tree("v: !template flag.flag()\n");
    let Some(Value::Tagged(tagged)) = value.get("v") else {
        panic!("expected tagged value");
    };
    assert_eq!(tagged.tag.to_string(), "!template");
    assert_eq!(tagged.value, Value::String("flag.flag()".into()));
}

#[test]
fn rewritten_anchor_drags_every_alias() {
    let input = "\
variables:
  FLAG:
    template: flag.flag()
    default: &flag placeholder
env:
  FLAG: *flag
";
    let events = rewrite_variable_blocks(scan_events(input).unwrap());
    let value = build_tree(&events).unwrap();
    let alias = value.get("env").and_then(|env| env.get("FLAG")).unwrap();
    let Value::Tagged(tagged) = alias else {
        panic!("alias should resolve to the tagged template");
    };
    assert_eq!(tagged.tag.to_string(), "!template");
    assert_eq!(tagged.value, Value::String("flag.flag()".into()));
}

#[test]
fn empty_stream_is_null() {
    let events = vec![Event::StreamStart, Event::StreamEnd];
    assert_eq!(build_tree(&events).unwrap(), Value::Null);
}

#[test]
fn unknown_alias_is_a_parse_error() {
    let events = vec![Event::StreamStart, Event::Alias(7)];
    let error = build_tree(&events).unwrap_err();
    assert!(matches!(error, ComposeError::Parse { .. }));
}

#[test]
fn truncated_stream_is_a_parse_error() {
    let events = vec![Event::StreamStart, Event::MappingStart(0, None)];
    let error = build_tree(&events).unwrap_err();
    assert!(matches!(error, ComposeError::Parse { .. }));
}
