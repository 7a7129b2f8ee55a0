use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerSet, Rank, ScalarField, Service};
use crate::i18n::BilingualText;

/// Identity fields, checked first.
pub const IDENTITY_FIELDS: [ScalarField; 4] = [
    ScalarField::Name,
    ScalarField::Age,
    ScalarField::Gender,
    ScalarField::Contact,
];

/// Address, emergency contact and blood group, checked second.
pub const LOGISTICS_FIELDS: [ScalarField; 3] = [
    ScalarField::Address,
    ScalarField::EmergencyContact,
    ScalarField::BloodGroup,
];

pub const CODE_MISSING_IDENTITY: &str = "missing_identity";
pub const CODE_MISSING_LOGISTICS: &str = "missing_logistics";
pub const CODE_DUPLICATE_RANK: &str = "duplicate_rank";

/// Switches for checks that are off unless asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Reject two services sharing the same rank.
    #[serde(default)]
    pub reject_duplicate_ranks: bool,
}

/// One reason an answer set was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: BilingualText,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Result returned from [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
}

impl ValidationResult {
    /// Message of the first failing check, if any.
    pub fn message(&self) -> Option<&BilingualText> {
        self.errors.first().map(|issue| &issue.message)
    }

    pub fn missing_fields(&self) -> Vec<ScalarField> {
        self.missing_required
            .iter()
            .filter_map(|key| ScalarField::from_key(key))
            .collect()
    }
}

pub fn missing_identity_message() -> BilingualText {
    BilingualText::new(
        "Please fill all mandatory personal information fields.",
        "कृपया सभी अनिवार्य व्यक्तिगत जानकारी भरें।",
    )
}

pub fn missing_logistics_message() -> BilingualText {
    BilingualText::new(
        "Please fill all mandatory address, emergency contact, and blood group fields.",
        "कृपया पता, आपातकालीन संपर्क और रक्त समूह अवश्य भरें।",
    )
}

pub fn duplicate_rank_message() -> BilingualText {
    BilingualText::new(
        "Each rank can be given to only one service.",
        "हर क्रम केवल एक सेवा को दिया जा सकता है।",
    )
}

/// Checks the required personal fields.
pub fn validate(answers: &AnswerSet) -> ValidationResult {
    validate_with(answers, ValidationOptions::default())
}

pub fn validate_with(answers: &AnswerSet, options: ValidationOptions) -> ValidationResult {
    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    for (fields, code, message) in [
        (
            &IDENTITY_FIELDS[..],
            CODE_MISSING_IDENTITY,
            missing_identity_message(),
        ),
        (
            &LOGISTICS_FIELDS[..],
            CODE_MISSING_LOGISTICS,
            missing_logistics_message(),
        ),
    ] {
        let missing = fields
            .iter()
            .filter(|field| answers.text(**field).trim().is_empty())
            .map(|field| field.key().to_string())
            .collect::<Vec<_>>();
        if missing.is_empty() {
            continue;
        }
        missing_required.extend(missing.iter().cloned());
        errors.push(ValidationIssue {
            code: code.to_string(),
            message,
            fields: missing,
        });
    }

    if options.reject_duplicate_ranks {
        let duplicates = duplicate_ranks(answers);
        if !duplicates.is_empty() {
            errors.push(ValidationIssue {
                code: CODE_DUPLICATE_RANK.to_string(),
                message: duplicate_rank_message(),
                fields: duplicates
                    .iter()
                    .map(|service| service.as_str().to_string())
                    .collect(),
            });
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        missing_required,
    }
}

/// Services whose rank is shared with at least one other service.
pub fn duplicate_ranks(answers: &AnswerSet) -> Vec<Service> {
    let mut by_rank: BTreeMap<Rank, Vec<Service>> = BTreeMap::new();
    for (service, rank) in &answers.services_needed {
        by_rank.entry(*rank).or_default().push(*service);
    }
    by_rank
        .into_values()
        .filter(|services| services.len() > 1)
        .flatten()
        .collect()
}
