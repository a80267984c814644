use std::collections::HashMap;

use chall_core::ComposeError;
use serde_yaml::value::{Tag as ValueTag, TaggedValue};
use serde_yaml::{Mapping, Number, Value};
use yaml_rust2::parser::{Event, Tag};
use yaml_rust2::scanner::TScalarStyle;

const CORE_SCHEMA_HANDLE: &str = "tag:yaml.org,2002:";

/// Linearizes a (possibly rewritten) event stream into an untyped tree.
/// Aliases resolve against the anchors declared earlier in the stream, so
/// an anchor moved by the rewriter drags every alias with it. Custom tags
/// survive as `Value::Tagged`.
pub fn build_tree(events: &[Event]) -> Result<Value, ComposeError> {
    let mut anchors: HashMap<usize, Value> = HashMap::new();
    // skip the stream/document framing down to the root node
    let mut cursor = 0;
    loop {
        match events.get(cursor) {
            Some(
                Event::Scalar(..)
                | Event::SequenceStart(..)
                | Event::MappingStart(..)
                | Event::Alias(_),
            ) => break,
            Some(Event::StreamEnd | Event::DocumentEnd) | None => return Ok(Value::Null),
            Some(_) => cursor += 1,
        }
    }
    let (value, _) = build_node(events, cursor, &mut anchors)?;
    Ok(value)
}

fn build_node(
    events: &[Event],
    index: usize,
    anchors: &mut HashMap<usize, Value>,
) -> Result<(Value, usize), ComposeError> {
    match events.get(index) {
        Some(Event::Scalar(raw, style, anchor_id, tag)) => {
            let value = resolve_scalar(raw, *style, tag.as_ref());
            record_anchor(anchors, *anchor_id, &value);
            Ok((value, index + 1))
        }
        Some(Event::SequenceStart(anchor_id, _)) => {
            let mut items = Vec::new();
            let mut cursor = index + 1;
            while !matches!(events.get(cursor), Some(Event::SequenceEnd)) {
                if events.get(cursor).is_none() {
                    return Err(truncated());
                }
                let (item, next) = build_node(events, cursor, anchors)?;
                items.push(item);
                cursor = next;
            }
            let value = Value::Sequence(items);
            record_anchor(anchors, *anchor_id, &value);
            Ok((value, cursor + 1))
        }
        Some(Event::MappingStart(anchor_id, _)) => {
            let mut mapping = Mapping::new();
            let mut cursor = index + 1;
            while !matches!(events.get(cursor), Some(Event::MappingEnd)) {
                if events.get(cursor).is_none() {
                    return Err(truncated());
                }
                let (key, next) = build_node(events, cursor, anchors)?;
                let (entry, next) = build_node(events, next, anchors)?;
                mapping.insert(key, entry);
                cursor = next;
            }
            let value = Value::Mapping(mapping);
            record_anchor(anchors, *anchor_id, &value);
            Ok((value, cursor + 1))
        }
        Some(Event::Alias(anchor_id)) => {
            let value = anchors.get(anchor_id).cloned().ok_or_else(|| {
                ComposeError::parse(format!("alias references unknown anchor {anchor_id}"))
            })?;
            Ok((value, index + 1))
        }
        Some(other) => Err(ComposeError::parse(format!(
            "unexpected event inside document: {other:?}"
        ))),
        None => Err(truncated()),
    }
}

fn record_anchor(anchors: &mut HashMap<usize, Value>, anchor_id: usize, value: &Value) {
    if anchor_id != 0 {
        anchors.insert(anchor_id, value.clone());
    }
}

fn truncated() -> ComposeError {
    ComposeError::parse("unexpected end of event stream")
}

fn resolve_scalar(raw: &str, style: TScalarStyle, tag: Option<&Tag>) -> Value {
    if let Some(tag) = tag {
        return resolve_tagged_scalar(raw, style, tag);
    }
    if style != TScalarStyle::Plain {
        return Value::String(raw.to_string());
    }
    plain_scalar(raw)
}

fn resolve_tagged_scalar(raw: &str, style: TScalarStyle, tag: &Tag) -> Value {
    if tag.handle == CORE_SCHEMA_HANDLE || tag.handle == "!!" {
        return match tag.suffix.as_str() {
            "str" => Value::String(raw.to_string()),
            _ => plain_scalar(raw),
        };
    }
    let body = if style == TScalarStyle::Plain {
        plain_scalar(raw)
    } else {
        Value::String(raw.to_string())
    };
    let name = if tag.handle == "!" {
        tag.suffix.clone()
    } else {
        format!("{}{}", tag.handle, tag.suffix)
    };
    Value::Tagged(Box::new(TaggedValue {
        tag: ValueTag::new(name),
        value: body,
    }))
}

// YAML core-schema resolution for plain scalars.
fn plain_scalar(raw: &str) -> Value {
    match raw {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::Number(Number::from(integer));
    }
    if looks_like_float(raw) {
        if let Ok(float) = raw.parse::<f64>() {
            return Value::Number(Number::from(float));
        }
    }
    Value::String(raw.to_string())
}

fn looks_like_float(raw: &str) -> bool {
    raw.chars().any(|c| c.is_ascii_digit())
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        && raw.contains(['.', 'e', 'E'])
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;
