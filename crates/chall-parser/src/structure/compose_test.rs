use super::{structure_compose, unstructure_compose};
use crate::documents::{ChallengeInfo, ComposeFile, Network, Question, Service};
use chall_core::ComposeError;
use serde_yaml::Value;
use std::collections::BTreeMap;

fn tree(input: &str) -> Value {
    serde_yaml::from_str(input).unwrap()
}

fn mismatch_path(error: &ComposeError) -> String {
    error.field_path().expect("schema mismatch").to_string()
}

#[test]
fn structures_a_minimal_compose_file() {
    let file = structure_compose(&tree(
        "\
services:
  web:
    image: nginx:latest
    hostname: web-server
",
    ))
    .unwrap();
    assert!(file.challenge.is_none());
    assert!(file.networks.is_none());
    assert_eq!(file.services.len(), 1);
    assert_eq!(file.services["web"].image, "nginx:latest");
    assert_eq!(file.services["web"].hostname, "web-server");
}

#[test]
fn renames_the_challenge_extension_key() {
    let file = structure_compose(&tree(
        "\
x-challenge:
  name: Basic Challenge
  description: A basic challenge
  questions:
    - name: flag
      question: What is the flag?
      answer: CTF{placeholder}
      points: 100
      max_attempts: 3
services:
  web:
    image: nginx:latest
    hostname: web-server
",
    ))
    .unwrap();
    let challenge = file.challenge.expect("challenge must be present");
    assert_eq!(challenge.name, "Basic Challenge");
    assert_eq!(challenge.questions[0].points, 100);
}

#[test]
fn missing_services_is_a_mismatch_at_services() {
    let error = structure_compose(&tree("networks:\n  boop:\n    internal: true\n")).unwrap_err();
    assert_eq!(mismatch_path(&error), "services");
}

#[test]
fn unknown_root_key_is_rejected() {
    let error = structure_compose(&tree(
        "services:\n  web:\n    image: a\n    hostname: b\nvolumes: {}\n",
    ))
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "volumes");
}

#[test]
fn non_mapping_root_is_rejected() {
    let error = structure_compose(&tree("- just\n- a\n- list\n")).unwrap_err();
    assert_eq!(mismatch_path(&error), "$");
}

#[test]
fn service_names_must_match_the_resource_pattern() {
    let error = structure_compose(&tree(
        "services:\n  \"web app\":\n    image: a\n    hostname: b\n",
    ))
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web app");

    let file = structure_compose(&tree(
        "services:\n  web-1.app:\n    image: a\n    hostname: b\n",
    ))
    .unwrap();
    assert!(file.services.contains_key("web-1.app"));
}

#[test]
fn networks_must_be_internal() {
    let error = structure_compose(&tree(
        "\
services:
  web:
    image: a
    hostname: b
networks:
  public:
    internal: false
",
    ))
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "networks.public.internal");

    let error = structure_compose(&tree(
        "\
services:
  web:
    image: a
    hostname: b
networks:
  quiet: {}
",
    ))
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "networks.quiet.internal");
}

#[test]
fn null_networks_block_reads_as_absent() {
    let file = structure_compose(&tree(
        "services:\n  web:\n    image: a\n    hostname: b\nnetworks:\n",
    ))
    .unwrap();
    assert!(file.networks.is_none());
}

#[test]
fn unstructure_emits_the_extension_key_and_round_trips() {
    let mut services = BTreeMap::new();
    services.insert("web".to_string(), Service::new("nginx:latest", "web-server"));
    let mut networks = BTreeMap::new();
    networks.insert("boop".to_string(), Network { internal: true });
    let mut challenge = ChallengeInfo::new("Basic Challenge", "A basic challenge");
    challenge.questions = vec![Question {
        name: "flag".to_string(),
        question: "What is the flag?".to_string(),
        answer: "CTF{placeholder}".to_string(),
        points: 100,
        max_attempts: 3,
    }];
    let file = ComposeFile {
        challenge: Some(challenge),
        services,
        networks: Some(networks),
    };

    let value = unstructure_compose(&file);
    let root = value.as_mapping().unwrap();
    assert!(root.contains_key(&Value::String("x-challenge".to_string())));
    assert!(!root.contains_key(&Value::String("challenge".to_string())));

    assert_eq!(structure_compose(&value).unwrap(), file);
}
