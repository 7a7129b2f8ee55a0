use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::i18n::BilingualText;

/// How a question collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    Choice,
    MultiChoice,
    Ranking,
    Rating,
}

impl QuestionKind {
    pub fn has_options(self) -> bool {
        !matches!(self, QuestionKind::Text)
    }
}

/// A selectable value together with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceOption {
    pub value: String,
    pub label: BilingualText,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: BilingualText) -> Self {
        Self {
            value: value.into(),
            label,
        }
    }
}

/// Only ask a question when another answer equals a given value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AskWhen {
    pub question: String,
    pub equals: String,
}

/// Definition of a single questionnaire item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    pub id: String,
    /// Printed question number, absent for personal and closing items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    pub title: BilingualText,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_when: Option<AskWhen>,
}

impl QuestionSpec {
    pub fn option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn is_known_value(&self, value: &str) -> bool {
        self.option(value).is_some()
    }
}
