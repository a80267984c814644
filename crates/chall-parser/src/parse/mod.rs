use std::fs;
use std::io::Read;
use std::path::Path;

use chall_core::ComposeError;
use tracing::debug;

use crate::documents::ComposeFile;
use crate::events::{build_tree, rewrite_variable_blocks, scan_events};
use crate::structure::{structure_compose, unstructure_compose};

/// Parses a compose document from text. The variable rewrite runs on the
/// raw event stream, before aliases are resolved, so that every alias of a
/// variable's `default` comes out of the tree as a template marker.
pub fn parse_string(input: &str) -> Result<ComposeFile, ComposeError> {
    let events = scan_events(input)?;
    debug!(events = events.len(), "scanned document");
    let events = rewrite_variable_blocks(events);
    let tree = build_tree(&events)?;
    structure_compose(&tree)
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<ComposeFile, ComposeError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ComposeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "parsing compose file");
    let text = fs::read_to_string(path).map_err(|error| {
        ComposeError::parse(format!("failed to read {}: {error}", path.display()))
    })?;
    parse_string(&text)
}

pub fn parse_reader(mut reader: impl Read) -> Result<ComposeFile, ComposeError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|error| ComposeError::parse(format!("failed to read input: {error}")))?;
    parse_string(&text)
}

/// Renders the typed document back to YAML text. Template markers keep
/// their `!template` tag, so the output parses back to an equal document.
pub fn to_yaml(file: &ComposeFile) -> Result<String, ComposeError> {
    let tree = unstructure_compose(file);
    serde_yaml::to_string(&tree).map_err(|error| ComposeError::serialization(error.to_string()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
