use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub question: String,
    pub answer: String,
    pub points: i64,
    pub max_attempts: i64,
}

/// The body of a hint: structured text, a structured image reference, or a
/// bare string shorthand for plain text. The source format carries no
/// discriminator; the structuring engine picks the alternative by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintContent {
    Text { content: String },
    Image { source: String },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub hint: HintContent,
    pub preview: String,
    /// Points lost when the hint is opened.
    pub deduction: i64,
}

/// A generated variable: `template` and `default` are only valid together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub template: String,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeInfo {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub summary: Option<String>,
    /// Order determines presentation order.
    pub questions: Vec<Question>,
    pub hints: Option<Vec<Hint>>,
    pub template: Option<BTreeMap<String, String>>,
    pub variables: Option<BTreeMap<String, Variable>>,
    pub tags: Option<Vec<String>>,
}

impl ChallengeInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        ChallengeInfo {
            name: name.into(),
            description: description.into(),
            icon: None,
            summary: None,
            questions: Vec::new(),
            hints: None,
            template: None,
            variables: None,
            tags: None,
        }
    }
}
