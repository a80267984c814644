/// A challenge-internal network. `internal` must be `true` in the source
/// document; the structuring engine rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub internal: bool,
}
