use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::answers::{AnswerSet, Rank, SERVICES_NEEDED, ScalarField, Service, SetField};

/// Storage-ready row: every column holds a string, structured fields are JSON text.
pub type FlatRecord = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("column '{column}' does not hold valid JSON: {source}")]
    InvalidJson {
        column: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("column '{column}' must hold a JSON {expected}")]
    UnexpectedShape {
        column: String,
        expected: &'static str,
    },
    #[error("unknown service '{0}' in services_needed")]
    UnknownService(String),
    #[error("invalid rank '{rank}' for service '{service}'")]
    InvalidRank { service: String, rank: String },
}

/// Flattens an answer set into one column per field.
pub fn to_flat_record(answers: &AnswerSet) -> FlatRecord {
    let mut record = FlatRecord::new();
    for field in ScalarField::ALL {
        record.insert(field.key().to_string(), answers.text(field).to_string());
    }
    for field in SetField::ALL {
        let members = answers
            .members(field)
            .iter()
            .cloned()
            .map(Value::String)
            .collect::<Vec<_>>();
        record.insert(field.key().to_string(), Value::Array(members).to_string());
    }
    let services = answers
        .services_needed
        .iter()
        .map(|(service, rank)| {
            (
                service.as_str().to_string(),
                Value::String(rank.as_str().to_string()),
            )
        })
        .collect::<Map<_, _>>();
    record.insert(SERVICES_NEEDED.to_string(), Value::Object(services).to_string());
    record
}

/// Rebuilds an answer set from a flat record.
///
/// Absent columns default to empty. Services stored with an empty rank are
/// treated as unranked, matching rows written before ranks were cleared by key removal.
pub fn from_flat_record(record: &FlatRecord) -> Result<AnswerSet, RecordError> {
    let mut answers = AnswerSet::new();
    for field in ScalarField::ALL {
        if let Some(value) = record.get(field.key()) {
            answers.set_text(field, value.clone());
        }
    }
    for field in SetField::ALL {
        let Some(raw) = record.get(field.key()) else {
            continue;
        };
        for member in parse_string_array(field.key(), raw)? {
            answers.toggle_member(field, member, true);
        }
    }
    if let Some(raw) = record.get(SERVICES_NEEDED) {
        for (key, rank) in parse_object(SERVICES_NEEDED, raw)? {
            let service: Service = key
                .parse()
                .map_err(|_| RecordError::UnknownService(key.clone()))?;
            let parsed = match &rank {
                Value::String(text) if text.trim().is_empty() => continue,
                Value::Null => continue,
                Value::String(text) => text.parse::<Rank>().ok(),
                Value::Number(number) => number.as_u64().and_then(|n| Rank::try_from(n).ok()),
                _ => None,
            }
            .ok_or_else(|| RecordError::InvalidRank {
                service: key.clone(),
                rank: rank.to_string(),
            })?;
            answers.set_rank(service, Some(parsed));
        }
    }
    Ok(answers)
}

/// Decodes a record from a JSON object whose structured columns may be nested values.
pub fn flat_record_from_json(value: &Value) -> Result<FlatRecord, RecordError> {
    let Value::Object(map) = value else {
        return Err(RecordError::UnexpectedShape {
            column: "<record>".to_string(),
            expected: "object",
        });
    };
    Ok(map
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect())
}

fn parse_json(column: &str, raw: &str) -> Result<Value, RecordError> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw).map_err(|source| RecordError::InvalidJson {
        column: column.to_string(),
        source,
    })
}

fn parse_string_array(column: &str, raw: &str) -> Result<Vec<String>, RecordError> {
    match parse_json(column, raw)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                _ => Err(RecordError::UnexpectedShape {
                    column: column.to_string(),
                    expected: "array of strings",
                }),
            })
            .collect(),
        _ => Err(RecordError::UnexpectedShape {
            column: column.to_string(),
            expected: "array of strings",
        }),
    }
}

fn parse_object(column: &str, raw: &str) -> Result<Map<String, Value>, RecordError> {
    match parse_json(column, raw)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        _ => Err(RecordError::UnexpectedShape {
            column: column.to_string(),
            expected: "object",
        }),
    }
}
