use std::collections::BTreeMap;

use crate::documents::{ChallengeInfo, Network, Service};

/// Root key carrying the challenge definition; renamed to the `challenge`
/// field during structuring and back on output.
pub const CHALLENGE_EXTENSION_KEY: &str = "x-challenge";

/// Allowed characters for service and network names.
pub const RESOURCE_NAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeFile {
    pub challenge: Option<ChallengeInfo>,
    pub services: BTreeMap<String, Service>,
    pub networks: Option<BTreeMap<String, Network>>,
}
