use std::collections::BTreeMap;

use chall_core::{ComposeError, FieldPath};
use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::documents::{ComposeFile, Network, Service, CHALLENGE_EXTENSION_KEY, RESOURCE_NAME_PATTERN};
use crate::structure::challenge::{structure_challenge, unstructure_challenge};
use crate::structure::service::{structure_service, unstructure_service};
use crate::structure::{as_bool, as_mapping, entry_key, missing_field, string_value};

/// Structures the untyped tree into a typed compose document. The
/// `x-challenge` extension key is renamed to the `challenge` field here;
/// this is the only key rename in the schema.
pub fn structure_compose(value: &Value) -> Result<ComposeFile, ComposeError> {
    let root_path = FieldPath::root();
    let root = as_mapping(value, &root_path)?;

    let mut challenge = None;
    let mut services = None;
    let mut networks = None;
    for (key, entry) in root {
        let name = entry_key(key, &root_path)?;
        match name {
            CHALLENGE_EXTENSION_KEY => {
                challenge = Some(structure_challenge(entry, &root_path.key("challenge"))?);
            }
            "services" => {
                services = Some(structure_services(entry, &root_path.key("services"))?);
            }
            "networks" => {
                if entry.is_null() {
                    continue;
                }
                networks = Some(structure_networks(entry, &root_path.key("networks"))?);
            }
            other => {
                return Err(ComposeError::mismatch(
                    root_path.key(other),
                    format!(
                        "unexpected document root key (expected services, networks or {CHALLENGE_EXTENSION_KEY})"
                    ),
                ));
            }
        }
    }

    let services = services.ok_or_else(|| missing_field(&root_path, "services"))?;
    Ok(ComposeFile {
        challenge,
        services,
        networks,
    })
}

fn structure_services(
    value: &Value,
    path: &FieldPath,
) -> Result<BTreeMap<String, Service>, ComposeError> {
    let name_pattern = Regex::new(RESOURCE_NAME_PATTERN).expect("valid regex");
    let mapping = as_mapping(value, path)?;
    let mut services = BTreeMap::new();
    for (key, entry) in mapping {
        let name = entry_key(key, path)?;
        let service_path = path.key(name);
        if !name_pattern.is_match(name) {
            return Err(ComposeError::mismatch(
                service_path,
                format!("invalid resource name, must match {RESOURCE_NAME_PATTERN}"),
            ));
        }
        services.insert(name.to_string(), structure_service(entry, &service_path)?);
    }
    Ok(services)
}

fn structure_networks(
    value: &Value,
    path: &FieldPath,
) -> Result<BTreeMap<String, Network>, ComposeError> {
    let name_pattern = Regex::new(RESOURCE_NAME_PATTERN).expect("valid regex");
    let mapping = as_mapping(value, path)?;
    let mut networks = BTreeMap::new();
    for (key, entry) in mapping {
        let name = entry_key(key, path)?;
        let network_path = path.key(name);
        if !name_pattern.is_match(name) {
            return Err(ComposeError::mismatch(
                network_path,
                format!("invalid resource name, must match {RESOURCE_NAME_PATTERN}"),
            ));
        }
        networks.insert(name.to_string(), structure_network(entry, &network_path)?);
    }
    Ok(networks)
}

fn structure_network(value: &Value, path: &FieldPath) -> Result<Network, ComposeError> {
    let mapping = as_mapping(value, path)?;
    let mut internal = None;
    for (key, entry) in mapping {
        let name = entry_key(key, path)?;
        match name {
            "internal" => internal = Some(as_bool(entry, &path.key("internal"))?),
            other => {
                return Err(ComposeError::mismatch(
                    path.key(other),
                    "unexpected key in network definition (only internal is supported)",
                ));
            }
        }
    }
    match internal {
        Some(true) => Ok(Network { internal: true }),
        Some(false) => Err(ComposeError::mismatch(
            path.key("internal"),
            "challenge networks must set internal: true",
        )),
        None => Err(missing_field(path, "internal")),
    }
}

/// Exact inverse of `structure_compose`; the `challenge` field goes back
/// out under the `x-challenge` key.
pub fn unstructure_compose(file: &ComposeFile) -> Value {
    let mut root = Mapping::new();
    if let Some(challenge) = &file.challenge {
        root.insert(
            string_value(CHALLENGE_EXTENSION_KEY),
            unstructure_challenge(challenge),
        );
    }

    let mut services = Mapping::new();
    for (name, service) in &file.services {
        services.insert(string_value(name), unstructure_service(service));
    }
    root.insert(string_value("services"), Value::Mapping(services));

    if let Some(networks) = &file.networks {
        let mut out = Mapping::new();
        for (name, network) in networks {
            let mut body = Mapping::new();
            body.insert(string_value("internal"), Value::Bool(network.internal));
            out.insert(string_value(name), Value::Mapping(body));
        }
        root.insert(string_value("networks"), Value::Mapping(out));
    }

    Value::Mapping(root)
}

#[cfg(test)]
#[path = "compose_test.rs"]
mod tests;
