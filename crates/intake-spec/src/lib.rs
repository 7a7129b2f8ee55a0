#![allow(missing_docs)]

pub mod answers;
pub mod answers_schema;
pub mod clock;
pub mod controller;
pub mod gateway;
pub mod i18n;
pub mod record;
pub mod render;
pub mod spec;
pub mod template;
pub mod update;
pub mod validate;

pub use answers::{AnswerSet, Rank, SERVICES_NEEDED, ScalarField, Service, SetField, UnknownKey};
pub use answers_schema::generate as answers_schema;
pub use clock::{Clock, FixedClock, SystemClock, format_report_date};
pub use controller::{FormController, SessionError, SessionState, SubmitError};
pub use gateway::{GatewayError, MemoryGateway, PersistenceGateway};
pub use i18n::{BilingualText, Locale, Sentinel, UnsupportedLocale};
pub use record::{FlatRecord, RecordError, flat_record_from_json, from_flat_record, to_flat_record};
pub use render::{ReportBlock, ReportDocument, ReportLine, render_json, render_report, render_text};
pub use spec::{AskWhen, ChoiceOption, OptionCatalog, QuestionKind, QuestionSpec};
pub use template::{PrintRenderer, TemplateError, render_print_html};
pub use update::FieldUpdate;
pub use validate::{ValidationIssue, ValidationOptions, ValidationResult, validate, validate_with};
