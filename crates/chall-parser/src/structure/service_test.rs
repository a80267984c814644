use super::{structure_service, unstructure_service};
use crate::documents::{
    ByteLimit, Capability, Command, CpuLimit, EnvValue, Environment, ServiceNetworks,
    TemplateMarker,
};
use chall_core::{ComposeError, FieldPath};
use serde_yaml::Value;

fn tree(input: &str) -> Value {
    serde_yaml::from_str(input).unwrap()
}

fn path() -> FieldPath {
    FieldPath::root().key("services").key("web")
}

fn mismatch_path(error: &ComposeError) -> String {
    error.field_path().expect("schema mismatch").to_string()
}

#[test]
fn structures_every_modeled_field() {
    let service = structure_service(
        &tree(
            "\
image: nginx:latest
hostname: web-server
command: sleep infinity
entrypoint: [/bin/sh, -c]
environment:
  DEBUG: 'true'
networks:
  - boop
cap_add:
  - NET_ADMIN
  - SYS_PTRACE
mem_limit: 268435456
memswap_limit: 512m
cpus: 0.5
",
        ),
        &path(),
    )
    .unwrap();

    assert_eq!(service.image, "nginx:latest");
    assert_eq!(service.hostname, "web-server");
    assert_eq!(service.command, Some(Command::Line("sleep infinity".to_string())));
    assert_eq!(
        service.entrypoint,
        Some(Command::Argv(vec!["/bin/sh".to_string(), "-c".to_string()]))
    );
    let Some(Environment::Map(variables)) = &service.environment else {
        panic!("expected environment mapping");
    };
    assert_eq!(
        variables["DEBUG"],
        EnvValue::Literal("true".to_string())
    );
    assert_eq!(
        service.networks,
        Some(ServiceNetworks::List(vec!["boop".to_string()]))
    );
    assert_eq!(
        service.cap_add,
        Some(vec![Capability::NetAdmin, Capability::SysPtrace])
    );
    assert_eq!(service.mem_limit, Some(ByteLimit::Bytes(268435456)));
    assert_eq!(
        service.memswap_limit,
        Some(ByteLimit::Text("512m".to_string()))
    );
    assert_eq!(service.cpus, Some(CpuLimit::Count(0.5)));
}

#[test]
fn tagged_environment_value_becomes_a_template_marker() {
    let service = structure_service(
        &tree("image: a\nhostname: b\nenvironment:\n  FLAG: !template flag.flag()\n"),
        &path(),
    )
    .unwrap();
    let Some(Environment::Map(variables)) = &service.environment else {
        panic!("expected environment mapping");
    };
    assert_eq!(
        variables["FLAG"],
        EnvValue::Template(TemplateMarker("flag.flag()".to_string()))
    );
}

#[test]
fn environment_list_form_is_kept_verbatim() {
    let service = structure_service(
        &tree("image: a\nhostname: b\nenvironment:\n  - DEBUG=true\n  - MODE=fast\n"),
        &path(),
    )
    .unwrap();
    assert_eq!(
        service.environment,
        Some(Environment::List(vec![
            "DEBUG=true".to_string(),
            "MODE=fast".to_string()
        ]))
    );
}

#[test]
fn environment_scalar_names_both_alternatives() {
    let error = structure_service(
        &tree("image: a\nhostname: b\nenvironment: DEBUG=true\n"),
        &path(),
    )
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web.environment");
    assert!(error.to_string().contains("mapping of variables"));
    assert!(error.to_string().contains("NAME=value"));
}

#[test]
fn network_mapping_values_must_be_null() {
    let service = structure_service(
        &tree("image: a\nhostname: b\nnetworks:\n  boop:\n  internal:\n"),
        &path(),
    )
    .unwrap();
    let Some(ServiceNetworks::Map(names)) = &service.networks else {
        panic!("expected network mapping");
    };
    assert!(names.contains("boop"));
    assert!(names.contains("internal"));

    let error = structure_service(
        &tree("image: a\nhostname: b\nnetworks:\n  boop:\n    priority: 1\n"),
        &path(),
    )
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web.networks.boop");
}

#[test]
fn extension_keys_are_captured_verbatim() {
    let service = structure_service(
        &tree("image: a\nhostname: b\nx-deploy:\n  replicas: 3\n"),
        &path(),
    )
    .unwrap();
    let extension = &service.extensions["x-deploy"];
    assert_eq!(extension.get("replicas").and_then(Value::as_i64), Some(3));
}

#[test]
fn unknown_key_is_rejected() {
    let error = structure_service(&tree("image: a\nhostname: b\nports:\n  - 80\n"), &path())
        .unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web.ports");
}

#[test]
fn missing_image_and_hostname_are_reported_by_path() {
    let error = structure_service(&tree("hostname: b\n"), &path()).unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web.image");

    let error = structure_service(&tree("image: a\n"), &path()).unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web.hostname");
}

#[test]
fn null_optional_fields_read_as_absent() {
    let service = structure_service(
        &tree("image: a\nhostname: b\ncommand:\nenvironment:\n"),
        &path(),
    )
    .unwrap();
    assert!(service.command.is_none());
    assert!(service.environment.is_none());
}

#[test]
fn unsupported_capability_is_rejected() {
    let error = structure_service(
        &tree("image: a\nhostname: b\ncap_add:\n  - SYS_ADMIN\n"),
        &path(),
    )
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web.cap_add[0]");
}

#[test]
fn fractional_byte_limit_is_rejected() {
    let error = structure_service(
        &tree("image: a\nhostname: b\nmem_limit: 0.5\n"),
        &path(),
    )
    .unwrap_err();
    assert_eq!(mismatch_path(&error), "services.web.mem_limit");
    assert!(error.to_string().contains("whole numbers"));
}

#[test]
fn unstructure_keeps_the_template_tag() {
    let service = structure_service(
        &tree("image: a\nhostname: b\nenvironment:\n  FLAG: !template flag.flag()\n"),
        &path(),
    )
    .unwrap();
    let text = serde_yaml::to_string(&unstructure_service(&service)).unwrap();
    assert!(text.contains("!template"));
    assert!(text.contains("flag.flag()"));
}

#[test]
fn unstructure_round_trips() {
    let source = "\
image: nginx:latest
hostname: web-server
command: [sleep, infinity]
environment:
  FLAG: !template flag.flag()
  DEBUG: 'true'
networks:
  boop:
cap_add:
  - NET_ADMIN
mem_limit: 512m
cpus: '2'
x-note: keep
";
    let service = structure_service(&tree(source), &path()).unwrap();
    let back = structure_service(&unstructure_service(&service), &path()).unwrap();
    assert_eq!(back, service);
}
