use std::collections::{BTreeMap, BTreeSet};

use chall_core::{ComposeError, FieldPath};
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Number, Value};

use crate::documents::{
    ByteLimit, Capability, Command, CpuLimit, EnvValue, Environment, Service, ServiceNetworks,
    TemplateMarker,
};
use crate::structure::{
    as_mapping, as_sequence, as_str, entry_key, is_template_tag, missing_field, shape_name,
    string_value, template_tag,
};

const EXTENSION_PREFIX: &str = "x-";

pub(crate) fn structure_service(value: &Value, path: &FieldPath) -> Result<Service, ComposeError> {
    let mapping = as_mapping(value, path)?;

    let mut image = None;
    let mut hostname = None;
    let mut command = None;
    let mut entrypoint = None;
    let mut environment = None;
    let mut networks = None;
    let mut cap_add = None;
    let mut mem_limit = None;
    let mut memswap_limit = None;
    let mut cpus = None;
    let mut extensions = BTreeMap::new();

    for (key, entry) in mapping {
        let name = entry_key(key, path)?;
        let field_path = path.key(name);
        if name.starts_with(EXTENSION_PREFIX) {
            extensions.insert(name.to_string(), entry.clone());
            continue;
        }
        if entry.is_null() && !matches!(name, "image" | "hostname") {
            continue;
        }
        match name {
            "image" => image = Some(as_str(entry, &field_path)?.to_string()),
            "hostname" => hostname = Some(as_str(entry, &field_path)?.to_string()),
            "command" => command = Some(structure_command(entry, &field_path)?),
            "entrypoint" => entrypoint = Some(structure_command(entry, &field_path)?),
            "environment" => environment = Some(structure_environment(entry, &field_path)?),
            "networks" => networks = Some(structure_service_networks(entry, &field_path)?),
            "cap_add" => cap_add = Some(structure_capabilities(entry, &field_path)?),
            "mem_limit" => mem_limit = Some(structure_byte_limit(entry, &field_path)?),
            "memswap_limit" => memswap_limit = Some(structure_byte_limit(entry, &field_path)?),
            "cpus" => cpus = Some(structure_cpu_limit(entry, &field_path)?),
            _ => {
                return Err(ComposeError::mismatch(
                    field_path,
                    "unrecognized service key (only x-* extensions are allowed beyond the modeled fields)",
                ));
            }
        }
    }

    Ok(Service {
        image: image.ok_or_else(|| missing_field(path, "image"))?,
        hostname: hostname.ok_or_else(|| missing_field(path, "hostname"))?,
        command,
        entrypoint,
        environment,
        networks,
        cap_add,
        mem_limit,
        memswap_limit,
        cpus,
        extensions,
    })
}

fn structure_command(value: &Value, path: &FieldPath) -> Result<Command, ComposeError> {
    match value {
        Value::String(line) => Ok(Command::Line(line.clone())),
        Value::Sequence(items) => {
            let mut argv = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                argv.push(as_str(item, &path.index(index))?.to_string());
            }
            Ok(Command::Argv(argv))
        }
        other => Err(ComposeError::mismatch(
            path.clone(),
            format!(
                "expected string or sequence of strings, found {}",
                shape_name(other)
            ),
        )),
    }
}

fn structure_environment(value: &Value, path: &FieldPath) -> Result<Environment, ComposeError> {
    match value {
        Value::Mapping(mapping) => {
            let mut variables = BTreeMap::new();
            for (key, entry) in mapping {
                let name = entry_key(key, path)?;
                variables.insert(
                    name.to_string(),
                    structure_env_value(entry, &path.key(name))?,
                );
            }
            Ok(Environment::Map(variables))
        }
        Value::Sequence(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                entries.push(as_str(item, &path.index(index))?.to_string());
            }
            Ok(Environment::List(entries))
        }
        other => Err(ComposeError::mismatch(
            path.clone(),
            format!(
                "expected mapping of variables or sequence of NAME=value strings, found {}",
                shape_name(other)
            ),
        )),
    }
}

fn structure_env_value(value: &Value, path: &FieldPath) -> Result<EnvValue, ComposeError> {
    if let Value::Tagged(tagged) = value {
        if is_template_tag(&tagged.tag) {
            let expression = as_str(&tagged.value, path)?;
            return Ok(EnvValue::Template(TemplateMarker(expression.to_string())));
        }
        return Err(ComposeError::mismatch(
            path.clone(),
            format!("unsupported tag {} on environment value", tagged.tag),
        ));
    }
    Ok(EnvValue::Literal(as_str(value, path)?.to_string()))
}

fn structure_service_networks(
    value: &Value,
    path: &FieldPath,
) -> Result<ServiceNetworks, ComposeError> {
    match value {
        Value::Sequence(items) => {
            let mut names = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                names.push(as_str(item, &path.index(index))?.to_string());
            }
            Ok(ServiceNetworks::List(names))
        }
        Value::Mapping(mapping) => {
            let mut names = BTreeSet::new();
            for (key, entry) in mapping {
                let name = entry_key(key, path)?;
                if !entry.is_null() {
                    return Err(ComposeError::mismatch(
                        path.key(name),
                        "network attachment options are not supported, value must be null",
                    ));
                }
                names.insert(name.to_string());
            }
            Ok(ServiceNetworks::Map(names))
        }
        other => Err(ComposeError::mismatch(
            path.clone(),
            format!(
                "expected sequence of network names or mapping of attachments, found {}",
                shape_name(other)
            ),
        )),
    }
}

fn structure_capabilities(value: &Value, path: &FieldPath) -> Result<Vec<Capability>, ComposeError> {
    let items = as_sequence(value, path)?;
    let mut capabilities = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_path = path.index(index);
        let name = as_str(item, &item_path)?;
        let capability = Capability::from_name(name).ok_or_else(|| {
            ComposeError::mismatch(
                item_path,
                format!("unsupported capability `{name}` (allowed: NET_ADMIN, SYS_PTRACE)"),
            )
        })?;
        capabilities.push(capability);
    }
    Ok(capabilities)
}

fn structure_byte_limit(value: &Value, path: &FieldPath) -> Result<ByteLimit, ComposeError> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(bytes) => Ok(ByteLimit::Bytes(bytes)),
            None => Err(ComposeError::mismatch(
                path.clone(),
                "byte limits must be whole numbers",
            )),
        },
        Value::String(text) => Ok(ByteLimit::Text(text.clone())),
        other => Err(ComposeError::mismatch(
            path.clone(),
            format!(
                "expected integer byte count or string with unit suffix, found {}",
                shape_name(other)
            ),
        )),
    }
}

fn structure_cpu_limit(value: &Value, path: &FieldPath) -> Result<CpuLimit, ComposeError> {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(count) => Ok(CpuLimit::Count(count)),
            None => Err(ComposeError::mismatch(path.clone(), "invalid cpu count")),
        },
        Value::String(text) => Ok(CpuLimit::Text(text.clone())),
        other => Err(ComposeError::mismatch(
            path.clone(),
            format!("expected number or string, found {}", shape_name(other)),
        )),
    }
}

pub(crate) fn unstructure_service(service: &Service) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(string_value("image"), string_value(&service.image));
    mapping.insert(string_value("hostname"), string_value(&service.hostname));
    if let Some(command) = &service.command {
        mapping.insert(string_value("command"), unstructure_command(command));
    }
    if let Some(entrypoint) = &service.entrypoint {
        mapping.insert(string_value("entrypoint"), unstructure_command(entrypoint));
    }
    if let Some(environment) = &service.environment {
        mapping.insert(
            string_value("environment"),
            unstructure_environment(environment),
        );
    }
    if let Some(networks) = &service.networks {
        mapping.insert(string_value("networks"), unstructure_networks(networks));
    }
    if let Some(capabilities) = &service.cap_add {
        mapping.insert(
            string_value("cap_add"),
            Value::Sequence(
                capabilities
                    .iter()
                    .map(|capability| string_value(capability.as_str()))
                    .collect(),
            ),
        );
    }
    if let Some(limit) = &service.mem_limit {
        mapping.insert(string_value("mem_limit"), unstructure_byte_limit(limit));
    }
    if let Some(limit) = &service.memswap_limit {
        mapping.insert(string_value("memswap_limit"), unstructure_byte_limit(limit));
    }
    if let Some(cpus) = &service.cpus {
        let value = match cpus {
            CpuLimit::Count(count) => Value::Number(Number::from(*count)),
            CpuLimit::Text(text) => string_value(text),
        };
        mapping.insert(string_value("cpus"), value);
    }
    for (name, extension) in &service.extensions {
        mapping.insert(string_value(name), extension.clone());
    }
    Value::Mapping(mapping)
}

fn unstructure_command(command: &Command) -> Value {
    match command {
        Command::Line(line) => string_value(line),
        Command::Argv(argv) => {
            Value::Sequence(argv.iter().map(|argument| string_value(argument)).collect())
        }
    }
}

fn unstructure_environment(environment: &Environment) -> Value {
    match environment {
        Environment::Map(variables) => {
            let mut mapping = Mapping::new();
            for (name, value) in variables {
                mapping.insert(string_value(name), unstructure_env_value(value));
            }
            Value::Mapping(mapping)
        }
        Environment::List(entries) => {
            Value::Sequence(entries.iter().map(|entry| string_value(entry)).collect())
        }
    }
}

// Template markers keep their `!template` tag so a round-trip parse
// recognizes them without the variables block.
fn unstructure_env_value(value: &EnvValue) -> Value {
    match value {
        EnvValue::Literal(text) => string_value(text),
        EnvValue::Template(marker) => Value::Tagged(Box::new(TaggedValue {
            tag: template_tag(),
            value: string_value(marker.expression()),
        })),
    }
}

fn unstructure_networks(networks: &ServiceNetworks) -> Value {
    match networks {
        ServiceNetworks::List(names) => {
            Value::Sequence(names.iter().map(|name| string_value(name)).collect())
        }
        ServiceNetworks::Map(names) => {
            let mut mapping = Mapping::new();
            for name in names {
                mapping.insert(string_value(name), Value::Null);
            }
            Value::Mapping(mapping)
        }
    }
}

fn unstructure_byte_limit(limit: &ByteLimit) -> Value {
    match limit {
        ByteLimit::Bytes(bytes) => Value::Number(Number::from(*bytes)),
        ByteLimit::Text(text) => string_value(text),
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
