use serde::{Deserialize, Serialize};

use crate::answers::{AnswerSet, Rank, ScalarField, Service, SetField};

/// One edit to an answer set.
///
/// Each variant only accepts values of its field category, so a rank can never
/// be written to a text field and a set member can never replace a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldUpdate {
    /// Replace a single-valued field.
    Text { field: ScalarField, value: String },
    /// Add (`present = true`) or remove a member of a multi-select field.
    Toggle {
        field: SetField,
        value: String,
        present: bool,
    },
    /// Rank a service, or clear its rank when `rank` is absent, `""` or `null`.
    Rank {
        service: Service,
        #[serde(
            default,
            deserialize_with = "crate::answers::deserialize_optional_rank",
            skip_serializing_if = "Option::is_none"
        )]
        rank: Option<Rank>,
    },
}

impl FieldUpdate {
    pub fn text(field: ScalarField, value: impl Into<String>) -> Self {
        FieldUpdate::Text {
            field,
            value: value.into(),
        }
    }

    pub fn toggle(field: SetField, value: impl Into<String>, present: bool) -> Self {
        FieldUpdate::Toggle {
            field,
            value: value.into(),
            present,
        }
    }

    pub fn rank(service: Service, rank: Option<Rank>) -> Self {
        FieldUpdate::Rank { service, rank }
    }

    /// Wire key of the field this update touches.
    pub fn field_key(&self) -> &'static str {
        match self {
            FieldUpdate::Text { field, .. } => field.key(),
            FieldUpdate::Toggle { field, .. } => field.key(),
            FieldUpdate::Rank { .. } => crate::answers::SERVICES_NEEDED,
        }
    }
}

impl AnswerSet {
    /// Applies a single update in place.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Text { field, value } => self.set_text(field, value),
            FieldUpdate::Toggle {
                field,
                value,
                present,
            } => {
                self.toggle_member(field, value, present);
            }
            FieldUpdate::Rank { service, rank } => {
                self.set_rank(service, rank);
            }
        }
    }

    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = FieldUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }
}
