use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a compose document, used to qualify schema
/// errors. Renders as `services.web.environment.FLAG` or
/// `challenge.questions[0].points`; the empty path renders as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<FieldPathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn from_segments(segments: Vec<FieldPathSegment>) -> Self {
        Self { segments }
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(FieldPathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(FieldPathSegment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[FieldPathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                FieldPathSegment::Key(key) => {
                    if position > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{key}")?;
                }
                FieldPathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "field_path_test.rs"]
mod tests;
