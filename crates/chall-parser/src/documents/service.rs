use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::Value;

/// YAML tag distinguishing generated values from literal scalars; rendered
/// as `!template` in the document text.
pub const TEMPLATE_TAG: &str = "template";

/// A value that is generated from a template expression at deployment time
/// rather than taken literally from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMarker(pub String);

impl TemplateMarker {
    pub fn expression(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    Literal(String),
    Template(TemplateMarker),
}

/// `environment` appears either as a `NAME: value` mapping or as a sequence
/// of `NAME=value` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Map(BTreeMap<String, EnvValue>),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Line(String),
    Argv(Vec<String>),
}

/// Network attachments: a bare name list, or a mapping whose per-network
/// value is null in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceNetworks {
    List(Vec<String>),
    Map(BTreeSet<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    NetAdmin,
    SysPtrace,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::NetAdmin => "NET_ADMIN",
            Capability::SysPtrace => "SYS_PTRACE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NET_ADMIN" => Some(Capability::NetAdmin),
            "SYS_PTRACE" => Some(Capability::SysPtrace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteLimit {
    Bytes(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CpuLimit {
    Count(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub image: String,
    pub hostname: String,
    pub command: Option<Command>,
    pub entrypoint: Option<Command>,
    pub environment: Option<Environment>,
    pub networks: Option<ServiceNetworks>,
    pub cap_add: Option<Vec<Capability>>,
    pub mem_limit: Option<ByteLimit>,
    pub memswap_limit: Option<ByteLimit>,
    pub cpus: Option<CpuLimit>,
    /// Every `x-*` key of the service, captured verbatim.
    pub extensions: BTreeMap<String, Value>,
}

impl Service {
    pub fn new(image: impl Into<String>, hostname: impl Into<String>) -> Self {
        Service {
            image: image.into(),
            hostname: hostname.into(),
            command: None,
            entrypoint: None,
            environment: None,
            networks: None,
            cap_add: None,
            mem_limit: None,
            memswap_limit: None,
            cpus: None,
            extensions: BTreeMap::new(),
        }
    }
}
