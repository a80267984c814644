mod challenge;
mod compose;
mod network;
mod service;

pub use challenge::{ChallengeInfo, Hint, HintContent, Question, Variable};
pub use compose::{ComposeFile, CHALLENGE_EXTENSION_KEY, RESOURCE_NAME_PATTERN};
pub use network::Network;
pub use service::{
    ByteLimit, Capability, Command, CpuLimit, EnvValue, Environment, Service, ServiceNetworks,
    TemplateMarker, TEMPLATE_TAG,
};
