pub mod documents;
pub mod events;
pub mod parse;
pub mod structure;

pub use chall_core::{ComposeError, FieldPath, FieldPathSegment};
pub use documents::{
    ByteLimit, Capability, ChallengeInfo, Command, ComposeFile, CpuLimit, EnvValue, Environment,
    Hint, HintContent, Network, Question, Service, ServiceNetworks, TemplateMarker, Variable,
    CHALLENGE_EXTENSION_KEY, RESOURCE_NAME_PATTERN, TEMPLATE_TAG,
};
pub use parse::{parse_file, parse_reader, parse_string, to_yaml};
pub use structure::{structure_compose, unstructure_compose};
