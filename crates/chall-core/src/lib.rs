pub mod error;
pub mod field_path;

pub use error::ComposeError;
pub use field_path::{FieldPath, FieldPathSegment};
