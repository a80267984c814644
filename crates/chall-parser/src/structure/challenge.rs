use std::collections::BTreeMap;

use chall_core::{ComposeError, FieldPath};
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Number, Value};

use crate::documents::{ChallengeInfo, Hint, HintContent, Question, Variable};
use crate::structure::{
    as_integer, as_mapping, as_sequence, as_str, entry_key, is_template_tag, missing_field,
    shape_name, string_value, template_tag,
};

pub(crate) fn structure_challenge(
    value: &Value,
    path: &FieldPath,
) -> Result<ChallengeInfo, ComposeError> {
    let mapping = as_mapping(value, path)?;

    let mut name = None;
    let mut description = None;
    let mut icon = None;
    let mut summary = None;
    let mut questions = None;
    let mut hints = None;
    let mut template = None;
    let mut variables = None;
    let mut tags = None;

    for (key, entry) in mapping {
        let field = entry_key(key, path)?;
        let field_path = path.key(field);
        // an empty block (`hints:`) reads as null; treat it as absent for
        // everything the schema makes optional
        if entry.is_null() && !matches!(field, "name" | "description" | "questions") {
            continue;
        }
        match field {
            "name" => name = Some(as_str(entry, &field_path)?.to_string()),
            "description" => description = Some(as_str(entry, &field_path)?.to_string()),
            "icon" => icon = Some(as_str(entry, &field_path)?.to_string()),
            "summary" => summary = Some(as_str(entry, &field_path)?.to_string()),
            "questions" => questions = Some(structure_questions(entry, &field_path)?),
            "hints" => hints = Some(structure_hints(entry, &field_path)?),
            "template" => template = Some(structure_template_block(entry, &field_path)?),
            "variables" => variables = Some(structure_variables(entry, &field_path)?),
            "tags" => tags = Some(structure_tags(entry, &field_path)?),
            other => {
                return Err(ComposeError::mismatch(
                    field_path,
                    format!("unexpected key `{other}` in challenge definition"),
                ));
            }
        }
    }

    Ok(ChallengeInfo {
        name: name.ok_or_else(|| missing_field(path, "name"))?,
        description: description.ok_or_else(|| missing_field(path, "description"))?,
        icon,
        summary,
        questions: questions.ok_or_else(|| missing_field(path, "questions"))?,
        hints,
        template,
        variables,
        tags,
    })
}

fn structure_questions(value: &Value, path: &FieldPath) -> Result<Vec<Question>, ComposeError> {
    let items = as_sequence(value, path)?;
    let mut questions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        questions.push(structure_question(item, &path.index(index))?);
    }
    Ok(questions)
}

fn structure_question(value: &Value, path: &FieldPath) -> Result<Question, ComposeError> {
    let mapping = as_mapping(value, path)?;
    let mut name = None;
    let mut question = None;
    let mut answer = None;
    let mut points = None;
    let mut max_attempts = None;
    for (key, entry) in mapping {
        let field = entry_key(key, path)?;
        let field_path = path.key(field);
        match field {
            "name" => name = Some(as_str(entry, &field_path)?.to_string()),
            "question" => question = Some(as_str(entry, &field_path)?.to_string()),
            "answer" => answer = Some(as_str(entry, &field_path)?.to_string()),
            "points" => points = Some(as_integer(entry, &field_path)?),
            "max_attempts" => max_attempts = Some(as_integer(entry, &field_path)?),
            other => {
                return Err(ComposeError::mismatch(
                    field_path,
                    format!("unexpected key `{other}` in question"),
                ));
            }
        }
    }
    Ok(Question {
        name: name.ok_or_else(|| missing_field(path, "name"))?,
        question: question.ok_or_else(|| missing_field(path, "question"))?,
        answer: answer.ok_or_else(|| missing_field(path, "answer"))?,
        points: points.ok_or_else(|| missing_field(path, "points"))?,
        max_attempts: max_attempts.ok_or_else(|| missing_field(path, "max_attempts"))?,
    })
}

fn structure_hints(value: &Value, path: &FieldPath) -> Result<Vec<Hint>, ComposeError> {
    let items = as_sequence(value, path)?;
    let mut hints = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        hints.push(structure_hint(item, &path.index(index))?);
    }
    Ok(hints)
}

fn structure_hint(value: &Value, path: &FieldPath) -> Result<Hint, ComposeError> {
    let mapping = as_mapping(value, path)?;
    let mut content = None;
    let mut preview = None;
    let mut deduction = None;
    for (key, entry) in mapping {
        let field = entry_key(key, path)?;
        let field_path = path.key(field);
        match field {
            "hint" => content = Some(structure_hint_content(entry, &field_path)?),
            "preview" => preview = Some(as_str(entry, &field_path)?.to_string()),
            "deduction" => deduction = Some(as_integer(entry, &field_path)?),
            other => {
                return Err(ComposeError::mismatch(
                    field_path,
                    format!("unexpected key `{other}` in hint"),
                ));
            }
        }
    }
    Ok(Hint {
        hint: content.ok_or_else(|| missing_field(path, "hint"))?,
        preview: preview.ok_or_else(|| missing_field(path, "preview"))?,
        deduction: deduction.ok_or_else(|| missing_field(path, "deduction"))?,
    })
}

// No discriminator in the source format: alternatives are tried in a fixed
// order and matched on the presence of their required key. Extra keys in
// the structured shapes are tolerated.
fn structure_hint_content(value: &Value, path: &FieldPath) -> Result<HintContent, ComposeError> {
    match value {
        Value::Mapping(_) => {
            if let Some(content) = value.get("content") {
                return Ok(HintContent::Text {
                    content: as_str(content, &path.key("content"))?.to_string(),
                });
            }
            if let Some(source) = value.get("source") {
                return Ok(HintContent::Image {
                    source: as_str(source, &path.key("source"))?.to_string(),
                });
            }
            Err(hint_content_mismatch(path, "mapping without `content` or `source`"))
        }
        Value::String(text) => Ok(HintContent::Plain(text.clone())),
        other => Err(hint_content_mismatch(path, shape_name(other))),
    }
}

fn hint_content_mismatch(path: &FieldPath, found: &str) -> ComposeError {
    ComposeError::mismatch(
        path.clone(),
        format!(
            "expected a mapping with `content`, a mapping with `source`, or a plain string, found {found}"
        ),
    )
}

fn structure_template_block(
    value: &Value,
    path: &FieldPath,
) -> Result<BTreeMap<String, String>, ComposeError> {
    let mapping = as_mapping(value, path)?;
    let mut templates = BTreeMap::new();
    for (key, entry) in mapping {
        let name = entry_key(key, path)?;
        templates.insert(
            name.to_string(),
            as_str(entry, &path.key(name))?.to_string(),
        );
    }
    Ok(templates)
}

fn structure_variables(
    value: &Value,
    path: &FieldPath,
) -> Result<BTreeMap<String, Variable>, ComposeError> {
    let mapping = as_mapping(value, path)?;
    let mut variables = BTreeMap::new();
    for (key, entry) in mapping {
        let name = entry_key(key, path)?;
        variables.insert(
            name.to_string(),
            structure_variable(entry, &path.key(name))?,
        );
    }
    Ok(variables)
}

fn structure_variable(value: &Value, path: &FieldPath) -> Result<Variable, ComposeError> {
    let mapping = as_mapping(value, path)?;
    let mut template = None;
    let mut default = None;
    for (key, entry) in mapping {
        let field = entry_key(key, path)?;
        let field_path = path.key(field);
        match field {
            "template" => template = Some(structure_template_expression(entry, &field_path)?),
            "default" => default = Some(scalar_string(entry, &field_path)?),
            other => {
                return Err(ComposeError::mismatch(
                    field_path,
                    format!("unexpected key `{other}` in variable"),
                ));
            }
        }
    }
    Ok(Variable {
        template: template.ok_or_else(|| {
            ComposeError::mismatch(
                path.key("template"),
                "missing required field (`template` and `default` must be present together)",
            )
        })?,
        default: default.ok_or_else(|| {
            ComposeError::mismatch(
                path.key("default"),
                "missing required field (`template` and `default` must be present together)",
            )
        })?,
    })
}

// A rewritable variable block always comes out of the event rewrite with a
// `!template`-tagged template value. An untagged value means the block was
// not rewritten (alias-valued or non-scalar entries) and every alias of its
// default still resolves to the literal fallback, so it must not parse.
fn structure_template_expression(value: &Value, path: &FieldPath) -> Result<String, ComposeError> {
    match value {
        Value::Tagged(tagged) if is_template_tag(&tagged.tag) => {
            Ok(as_str(&tagged.value, path)?.to_string())
        }
        Value::Tagged(tagged) => Err(ComposeError::mismatch(
            path.clone(),
            format!("unsupported tag {} on template expression", tagged.tag),
        )),
        other => Err(ComposeError::mismatch(
            path.clone(),
            format!(
                "expected a !template-tagged expression, found {} (aliased or non-scalar template values are not supported)",
                shape_name(other)
            ),
        )),
    }
}

// Defaults are deployment fallback text; numeric and boolean scalars read
// as their string form.
fn scalar_string(value: &Value, path: &FieldPath) -> Result<String, ComposeError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(ComposeError::mismatch(
            path.clone(),
            format!("expected string scalar, found {}", shape_name(other)),
        )),
    }
}

fn structure_tags(value: &Value, path: &FieldPath) -> Result<Vec<String>, ComposeError> {
    let items = as_sequence(value, path)?;
    let mut tags = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        tags.push(as_str(item, &path.index(index))?.to_string());
    }
    Ok(tags)
}

pub(crate) fn unstructure_challenge(challenge: &ChallengeInfo) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(string_value("name"), string_value(&challenge.name));
    mapping.insert(
        string_value("description"),
        string_value(&challenge.description),
    );
    if let Some(icon) = &challenge.icon {
        mapping.insert(string_value("icon"), string_value(icon));
    }
    if let Some(summary) = &challenge.summary {
        mapping.insert(string_value("summary"), string_value(summary));
    }
    mapping.insert(
        string_value("questions"),
        Value::Sequence(challenge.questions.iter().map(unstructure_question).collect()),
    );
    if let Some(hints) = &challenge.hints {
        mapping.insert(
            string_value("hints"),
            Value::Sequence(hints.iter().map(unstructure_hint).collect()),
        );
    }
    if let Some(template) = &challenge.template {
        let mut block = Mapping::new();
        for (name, expression) in template {
            block.insert(string_value(name), string_value(expression));
        }
        mapping.insert(string_value("template"), Value::Mapping(block));
    }
    if let Some(variables) = &challenge.variables {
        let mut block = Mapping::new();
        for (name, variable) in variables {
            block.insert(string_value(name), unstructure_variable(variable));
        }
        mapping.insert(string_value("variables"), Value::Mapping(block));
    }
    if let Some(tags) = &challenge.tags {
        mapping.insert(
            string_value("tags"),
            Value::Sequence(tags.iter().map(|tag| string_value(tag)).collect()),
        );
    }
    Value::Mapping(mapping)
}

fn unstructure_question(question: &Question) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(string_value("name"), string_value(&question.name));
    mapping.insert(string_value("question"), string_value(&question.question));
    mapping.insert(string_value("answer"), string_value(&question.answer));
    mapping.insert(
        string_value("points"),
        Value::Number(Number::from(question.points)),
    );
    mapping.insert(
        string_value("max_attempts"),
        Value::Number(Number::from(question.max_attempts)),
    );
    Value::Mapping(mapping)
}

fn unstructure_hint(hint: &Hint) -> Value {
    let mut mapping = Mapping::new();
    let content = match &hint.hint {
        HintContent::Text { content } => {
            let mut body = Mapping::new();
            body.insert(string_value("content"), string_value(content));
            Value::Mapping(body)
        }
        HintContent::Image { source } => {
            let mut body = Mapping::new();
            body.insert(string_value("source"), string_value(source));
            Value::Mapping(body)
        }
        HintContent::Plain(text) => string_value(text),
    };
    mapping.insert(string_value("hint"), content);
    mapping.insert(string_value("preview"), string_value(&hint.preview));
    mapping.insert(
        string_value("deduction"),
        Value::Number(Number::from(hint.deduction)),
    );
    Value::Mapping(mapping)
}

fn unstructure_variable(variable: &Variable) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(
        string_value("template"),
        Value::Tagged(Box::new(TaggedValue {
            tag: template_tag(),
            value: string_value(&variable.template),
        })),
    );
    mapping.insert(string_value("default"), string_value(&variable.default));
    Value::Mapping(mapping)
}

#[cfg(test)]
#[path = "challenge_test.rs"]
mod tests;
