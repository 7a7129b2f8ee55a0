use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::answers::{AnswerSet, Rank, ScalarField, Service, SetField};
use crate::clock::Clock;
use crate::gateway::{GatewayError, PersistenceGateway};
use crate::i18n::{BilingualText, Locale};
use crate::record::to_flat_record;
use crate::render::{ReportDocument, render_report};
use crate::spec::catalog::OptionCatalog;
use crate::update::FieldUpdate;
use crate::validate::{ValidationOptions, ValidationResult, validate_with};

/// Lifecycle of one questionnaire session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    /// A gateway insert has been issued and has not reported back.
    Submitting,
    Submitted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Editing => "editing",
            SessionState::Submitting => "submitting",
            SessionState::Submitted => "submitted",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("answers cannot be edited while the session is {0}")]
    NotEditing(SessionState),
    #[error("no submitted answers (session is {0})")]
    NotSubmitted(SessionState),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("validation failed: missing {}", .0.missing_required.join(", "))]
    Validation(ValidationResult),
    #[error("{0}")]
    PersistenceUnavailable(String),
    #[error("{0}")]
    PersistenceRejected(String),
    #[error("cannot submit while the session is {0}")]
    NotEditing(SessionState),
}

impl SubmitError {
    /// Message shown to the respondent.
    pub fn user_message(&self) -> BilingualText {
        match self {
            SubmitError::Validation(result) => result
                .message()
                .cloned()
                .unwrap_or_else(crate::validate::missing_identity_message),
            SubmitError::PersistenceUnavailable(_) => BilingualText::new(
                "Submission service is not configured or unreachable. Please contact the administrator.",
                "जमा करने की सेवा उपलब्ध नहीं है। कृपया व्यवस्थापक से संपर्क करें।",
            ),
            SubmitError::PersistenceRejected(_) => BilingualText::new(
                "Failed to save response. Please try again.",
                "प्रतिक्रिया सहेजी नहीं जा सकी। कृपया पुनः प्रयास करें।",
            ),
            SubmitError::NotEditing(SessionState::Submitting) => BilingualText::new(
                "A submission is already in progress.",
                "जमा करने की प्रक्रिया पहले से चल रही है।",
            ),
            SubmitError::NotEditing(_) => BilingualText::new(
                "This questionnaire has already been submitted.",
                "यह प्रश्नावली पहले ही जमा की जा चुकी है।",
            ),
        }
    }
}

impl From<GatewayError> for SubmitError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unavailable(reason) => SubmitError::PersistenceUnavailable(reason),
            GatewayError::Rejected(reason) => SubmitError::PersistenceRejected(reason),
        }
    }
}

/// Holds the in-progress answers and drives submission through a gateway.
#[derive(Debug)]
pub struct FormController<G> {
    gateway: G,
    answers: AnswerSet,
    state: SessionState,
    options: ValidationOptions,
}

impl<G: PersistenceGateway> FormController<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_answers(gateway, AnswerSet::new())
    }

    /// Starts an editing session pre-filled with `answers`.
    pub fn with_answers(gateway: G, answers: AnswerSet) -> Self {
        Self {
            gateway,
            answers,
            state: SessionState::Editing,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_validation_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    fn ensure_editing(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Editing => Ok(()),
            other => Err(SessionError::NotEditing(other)),
        }
    }

    pub fn update(&mut self, update: FieldUpdate) -> Result<(), SessionError> {
        self.ensure_editing()?;
        debug!(field = update.field_key(), "answer updated");
        self.answers.apply(update);
        Ok(())
    }

    pub fn set_text(
        &mut self,
        field: ScalarField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.update(FieldUpdate::text(field, value))
    }

    pub fn toggle(
        &mut self,
        field: SetField,
        value: impl Into<String>,
        present: bool,
    ) -> Result<(), SessionError> {
        self.update(FieldUpdate::toggle(field, value, present))
    }

    pub fn set_rank(&mut self, service: Service, rank: Option<Rank>) -> Result<(), SessionError> {
        self.update(FieldUpdate::rank(service, rank))
    }

    pub fn validate(&self) -> ValidationResult {
        validate_with(&self.answers, self.options)
    }

    /// Validates, persists and, on success, freezes the answer set.
    ///
    /// On any failure the session is back in `Editing` with the answers untouched.
    /// An insert is never issued twice: if the future is dropped mid-flight the
    /// session stays in `Submitting` and further submits are refused.
    pub async fn submit(&mut self) -> Result<&AnswerSet, SubmitError> {
        if self.state != SessionState::Editing {
            return Err(SubmitError::NotEditing(self.state));
        }

        let validation = self.validate();
        if !validation.valid {
            warn!(
                missing = ?validation.missing_required,
                "submission refused by validation"
            );
            return Err(SubmitError::Validation(validation));
        }

        let record = to_flat_record(&self.answers);
        self.state = SessionState::Submitting;
        info!(columns = record.len(), "submitting questionnaire response");

        match self.gateway.insert(&record).await {
            Ok(()) => {
                self.state = SessionState::Submitted;
                info!("questionnaire response stored");
                Ok(&self.answers)
            }
            Err(err) => {
                self.state = SessionState::Editing;
                warn!(error = %err, "questionnaire response not stored");
                Err(err.into())
            }
        }
    }

    /// Leaves a submitted session and starts over with empty answers.
    pub fn back(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Submitted {
            return Err(SessionError::NotSubmitted(self.state));
        }
        self.answers = AnswerSet::new();
        self.state = SessionState::Editing;
        debug!("new questionnaire session started");
        Ok(())
    }

    /// Renders the submitted answer set.
    pub fn report(
        &self,
        catalog: &OptionCatalog,
        clock: &dyn Clock,
        locale: Locale,
    ) -> Result<ReportDocument, SessionError> {
        if self.state != SessionState::Submitted {
            return Err(SessionError::NotSubmitted(self.state));
        }
        Ok(render_report(&self.answers, catalog, clock, locale))
    }

    pub fn into_parts(self) -> (G, AnswerSet) {
        (self.gateway, self.answers)
    }
}
