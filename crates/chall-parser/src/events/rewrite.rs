use tracing::debug;
use yaml_rust2::parser::{Event, Tag};

use crate::documents::TEMPLATE_TAG;

/// Rewrites every `variables` mapping in the event stream so that aliases
/// which pointed at a variable's `default` resolve to its `template`
/// instead: the `default` value's anchor moves onto the `template` value,
/// which is additionally tagged `!template`. Everything else passes through
/// untouched, and nothing here ever fails; malformed blocks are left for
/// the structuring engine to reject.
pub fn rewrite_variable_blocks(events: Vec<Event>) -> Vec<Event> {
    let mut out = Vec::with_capacity(events.len());
    let mut index = 0;
    while index < events.len() {
        let triggers = is_variables_key(&events[index])
            && matches!(events.get(index + 1), Some(Event::MappingStart(..)));
        out.push(events[index].clone());
        index += 1;
        if triggers {
            debug!("entering variables block");
            index = copy_variables_mapping(&events, index, &mut out);
        }
    }
    out
}

fn is_variables_key(event: &Event) -> bool {
    matches!(event, Event::Scalar(value, _, _, _) if value == "variables")
}

// `start` points at the MappingStart of the variables block. Returns the
// index of the first event the caller should continue from. A variable
// this scan cannot rewrite is copied verbatim and the pair loop moves on
// to the next one; only a non-scalar key stops the scan early and leaves
// the rest of the stream to the verbatim outer loop.
fn copy_variables_mapping(events: &[Event], start: usize, out: &mut Vec<Event>) -> usize {
    out.push(events[start].clone());
    let mut index = start + 1;
    loop {
        match events.get(index) {
            Some(Event::Scalar(..)) => {
                out.push(events[index].clone());
                index += 1;
                if matches!(events.get(index), Some(Event::MappingStart(..))) {
                    match rewrite_variable(events, index, out) {
                        Some(end) => index = end,
                        None => {
                            debug!("variable not rewritable, copying verbatim");
                            index = copy_node(events, index, out);
                        }
                    }
                } else {
                    debug!("variable value is not a mapping, copying verbatim");
                    index = copy_node(events, index, out);
                }
            }
            Some(Event::MappingEnd) => {
                out.push(Event::MappingEnd);
                return index + 1;
            }
            _ => return index,
        }
    }
}

// Copies one complete node (scalar, alias, sequence or mapping) verbatim
// and returns the index just past it.
fn copy_node(events: &[Event], start: usize, out: &mut Vec<Event>) -> usize {
    let mut depth = 0usize;
    let mut index = start;
    while let Some(event) = events.get(index) {
        out.push(event.clone());
        index += 1;
        match event {
            Event::SequenceStart(..) | Event::MappingStart(..) => depth += 1,
            Event::SequenceEnd | Event::MappingEnd => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 {
            break;
        }
    }
    index
}

// `start` points at the MappingStart of a single variable's inner mapping.
// The rewrite only applies when every entry is a scalar/scalar pair and
// both `template` and `default` are present; otherwise the caller re-emits
// the mapping verbatim.
fn rewrite_variable(events: &[Event], start: usize, out: &mut Vec<Event>) -> Option<usize> {
    let mut entries: Vec<(usize, usize)> = Vec::new();
    let mut index = start + 1;
    loop {
        match events.get(index) {
            Some(Event::Scalar(..)) => {
                let value_index = index + 1;
                if !matches!(events.get(value_index), Some(Event::Scalar(..))) {
                    return None;
                }
                entries.push((index, value_index));
                index = value_index + 1;
            }
            Some(Event::MappingEnd) => break,
            _ => return None,
        }
    }

    let mut has_template = false;
    let mut default_anchor_id = None;
    for (key_index, value_index) in &entries {
        match entry_key(events, *key_index) {
            "template" => has_template = true,
            "default" => {
                if let Some(Event::Scalar(_, _, anchor_id, _)) = events.get(*value_index) {
                    default_anchor_id = Some(*anchor_id);
                }
            }
            _ => {}
        }
    }
    let default_anchor_id = default_anchor_id?;
    if !has_template {
        return None;
    }

    debug!("moving default anchor onto template value");
    out.push(events[start].clone());
    for (key_index, value_index) in &entries {
        out.push(events[*key_index].clone());
        let mut value_event = events[*value_index].clone();
        if let Event::Scalar(_, _, anchor_id, tag) = &mut value_event {
            match entry_key(events, *key_index) {
                "template" => {
                    *anchor_id = default_anchor_id;
                    *tag = Some(Tag {
                        handle: "!".to_string(),
                        suffix: TEMPLATE_TAG.to_string(),
                    });
                }
                "default" => *anchor_id = 0,
                _ => {}
            }
        }
        out.push(value_event);
    }
    out.push(Event::MappingEnd);
    Some(index + 1)
}

fn entry_key(events: &[Event], key_index: usize) -> &str {
    match &events[key_index] {
        Event::Scalar(key, _, _, _) => key.as_str(),
        _ => "",
    }
}

#[cfg(test)]
#[path = "rewrite_test.rs"]
mod tests;
