use super::{FieldPath, FieldPathSegment};

#[test]
fn root_displays_as_dollar() {
    assert_eq!(FieldPath::root().to_string(), "$");
    assert!(FieldPath::root().is_root());
}

#[test]
fn keys_join_with_dots() {
    let path = FieldPath::root()
        .key("services")
        .key("web")
        .key("environment")
        .key("FLAG");
    assert_eq!(path.to_string(), "services.web.environment.FLAG");
}

#[test]
fn indexes_attach_without_dot() {
    let path = FieldPath::root()
        .key("challenge")
        .key("questions")
        .index(0)
        .key("points");
    assert_eq!(path.to_string(), "challenge.questions[0].points");
}

#[test]
fn child_builders_do_not_mutate_parent() {
    let parent = FieldPath::root().key("services");
    let child = parent.key("web");
    assert_eq!(parent.to_string(), "services");
    assert_eq!(child.to_string(), "services.web");
}

#[test]
fn from_segments_round_trips() {
    let segments = vec![
        FieldPathSegment::Key("hints".to_string()),
        FieldPathSegment::Index(2),
    ];
    let path = FieldPath::from_segments(segments.clone());
    assert_eq!(path.segments(), segments.as_slice());
    assert_eq!(path.to_string(), "hints[2]");
}
