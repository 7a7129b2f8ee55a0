use serde_json::{Map, Value};

use crate::answers::Rank;
use crate::spec::catalog::OptionCatalog;
use crate::spec::question::{QuestionKind, QuestionSpec};

/// Generates a JSON schema describing an answers document for `catalog`.
pub fn generate(catalog: &OptionCatalog) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for question in &catalog.questions {
        properties.insert(question.id.clone(), question_schema(question));
        if question.required {
            required.push(Value::String(question.id.clone()));
        }
    }

    let mut root = Map::new();
    root.insert(
        "$schema".into(),
        Value::String("https://json-schema.org/draft/2020-12/schema".into()),
    );
    root.insert("title".into(), Value::String(catalog.title.en.clone()));
    root.insert("type".into(), Value::String("object".into()));
    root.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        root.insert("required".into(), Value::Array(required));
    }

    Value::Object(root)
}

fn option_values(question: &QuestionSpec) -> Value {
    Value::Array(
        question
            .options
            .iter()
            .map(|option| Value::String(option.value.clone()))
            .collect(),
    )
}

fn question_schema(question: &QuestionSpec) -> Value {
    let mut schema = Map::new();
    schema.insert(
        "description".into(),
        Value::String(question.title.en.clone()),
    );
    match question.kind {
        QuestionKind::Text => {
            schema.insert("type".into(), Value::String("string".into()));
            if question.required {
                schema.insert("minLength".into(), Value::Number(1.into()));
            }
        }
        QuestionKind::Choice | QuestionKind::Rating => {
            schema.insert("type".into(), Value::String("string".into()));
            schema.insert("enum".into(), option_values(question));
        }
        QuestionKind::MultiChoice => {
            let mut items = Map::new();
            items.insert("type".into(), Value::String("string".into()));
            items.insert("enum".into(), option_values(question));
            schema.insert("type".into(), Value::String("array".into()));
            schema.insert("uniqueItems".into(), Value::Bool(true));
            schema.insert("items".into(), Value::Object(items));
        }
        QuestionKind::Ranking => {
            let ranks = Value::Array(
                Rank::ALL
                    .iter()
                    .map(|rank| Value::String(rank.as_str().to_string()))
                    .collect(),
            );
            let mut service_props = Map::new();
            for option in &question.options {
                let mut rank_schema = Map::new();
                rank_schema.insert("type".into(), Value::String("string".into()));
                rank_schema.insert("enum".into(), ranks.clone());
                service_props.insert(option.value.clone(), Value::Object(rank_schema));
            }
            schema.insert("type".into(), Value::String("object".into()));
            schema.insert("properties".into(), Value::Object(service_props));
            schema.insert("additionalProperties".into(), Value::Bool(false));
        }
    }
    Value::Object(schema)
}
