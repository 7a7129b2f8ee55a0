use serde::Serialize;
use serde_json::{Value, json};

use crate::answers::{AnswerSet, SERVICES_NEEDED, ScalarField, SetField};
use crate::clock::{Clock, format_report_date};
use crate::i18n::{BilingualText, Locale, Sentinel};
use crate::spec::catalog::OptionCatalog;

/// Delimiter between labels of a multi-select answer.
pub const MULTI_DELIMITER: &str = ", ";
/// Delimiter between ranked services.
pub const RANK_DELIMITER: &str = "; ";

/// A labelled value shown under a question or in the personal block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub label: String,
    pub value: String,
}

/// One rendered question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBlock {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    pub title: String,
    /// Hindi title printed under the English one in bilingual output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub answer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<ReportLine>,
}

impl ReportBlock {
    pub fn heading(&self) -> String {
        match self.number {
            Some(number) => format!("{number}. {}", self.title),
            None => self.title.clone(),
        }
    }
}

/// Read-only, localized rendering of a submitted answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub locale: Locale,
    pub heading: String,
    pub subtitle: String,
    pub date_label: String,
    pub date: String,
    pub answer_label: String,
    pub questions: Vec<ReportBlock>,
    pub personal_title: String,
    pub personal: Vec<ReportLine>,
    pub footer: Vec<String>,
}

/// Blank answers get a sentinel. Anything else is shown exactly as stored.
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

struct Renderer<'a> {
    answers: &'a AnswerSet,
    catalog: &'a OptionCatalog,
    locale: Locale,
}

impl Renderer<'_> {
    fn block(&self, id: &str, answer: String) -> ReportBlock {
        let question = self.catalog.question(id);
        let number = question.and_then(|question| question.number);
        let (title, translation) = match (question, number, self.locale) {
            (Some(question), Some(_), Locale::Bilingual) => (
                question.title.en.clone(),
                question.title.hi.clone().filter(|hi| *hi != question.title.en),
            ),
            _ => (self.catalog.title_of(id, self.locale), None),
        };
        ReportBlock {
            id: id.to_string(),
            number,
            title,
            translation,
            answer,
            notes: Vec::new(),
        }
    }

    fn choice(&self, field: ScalarField) -> String {
        let value = self.answers.text(field);
        if is_blank(value) {
            return Sentinel::NotAnswered.resolve(self.locale);
        }
        self.catalog.label_or_raw(field.key(), value, self.locale)
    }

    fn multi(&self, field: SetField) -> String {
        let members = self.answers.members(field);
        if members.is_empty() {
            return Sentinel::NotAnswered.resolve(self.locale);
        }
        members
            .iter()
            .map(|value| self.catalog.label_or_raw(field.key(), value, self.locale))
            .collect::<Vec<_>>()
            .join(MULTI_DELIMITER)
    }

    fn ranking(&self) -> String {
        let ranked = self.answers.ranked_services();
        if ranked.is_empty() {
            return Sentinel::NotAnswered.resolve(self.locale);
        }
        ranked
            .into_iter()
            .map(|(service, rank)| {
                format!(
                    "{rank}. {}",
                    self.catalog
                        .label_or_raw(SERVICES_NEEDED, service.as_str(), self.locale)
                )
            })
            .collect::<Vec<_>>()
            .join(RANK_DELIMITER)
    }

    fn free_text(&self, field: ScalarField, sentinel: Sentinel) -> String {
        let value = self.answers.text(field);
        if is_blank(value) {
            sentinel.resolve(self.locale)
        } else {
            value.to_string()
        }
    }

    fn note(&self, field: ScalarField) -> ReportLine {
        ReportLine {
            label: self.catalog.title_of(field.key(), self.locale),
            value: self.free_text(field, Sentinel::NotProvided),
        }
    }

    fn follow_up(&self) -> String {
        let phone = self.answers.phone.as_str();
        let whatsapp = self.answers.whatsapp.as_str();
        match self.answers.follow_up.as_str() {
            "phone" if !is_blank(phone) => format!(
                "{}: {phone}",
                self.catalog.title_of(ScalarField::Phone.key(), self.locale)
            ),
            "whatsapp" if !is_blank(whatsapp) => format!(
                "{}: {whatsapp}",
                self.catalog
                    .title_of(ScalarField::Whatsapp.key(), self.locale)
            ),
            "no" => Sentinel::NoFollowUp.resolve(self.locale),
            _ => Sentinel::NotSpecified.resolve(self.locale),
        }
    }

    fn questions(&self) -> Vec<ReportBlock> {
        let mut blocks = Vec::new();

        blocks.push(self.block(
            ScalarField::VisitedDoctor.key(),
            self.choice(ScalarField::VisitedDoctor),
        ));

        let mut reasons = self.block(
            SetField::NoVisitReasons.key(),
            self.multi(SetField::NoVisitReasons),
        );
        reasons.notes.push(self.note(ScalarField::OtherReason));
        blocks.push(reasons);

        blocks.push(self.block(SERVICES_NEEDED, self.ranking()));

        for field in [ScalarField::UseWellnessCentre, ScalarField::CghsImportance] {
            blocks.push(self.block(field.key(), self.choice(field)));
        }

        let mut wrong_treatment = self.block(
            ScalarField::WrongTreatment.key(),
            self.choice(ScalarField::WrongTreatment),
        );
        wrong_treatment
            .notes
            .push(self.note(ScalarField::WrongTreatmentDetails));
        blocks.push(wrong_treatment);

        for field in [ScalarField::BloodTestCost, ScalarField::GenericMedicines] {
            blocks.push(self.block(field.key(), self.choice(field)));
        }

        blocks.push(self.block(
            SetField::VisitHours.key(),
            self.multi(SetField::VisitHours),
        ));

        let mut sessions = self.block(
            ScalarField::HealthSessions.key(),
            self.choice(ScalarField::HealthSessions),
        );
        sessions.notes.push(self.note(ScalarField::HealthTopics));
        blocks.push(sessions);

        blocks.push(self.block(
            ScalarField::Feedback.key(),
            self.free_text(ScalarField::Feedback, Sentinel::NoFeedback),
        ));
        blocks.push(self.block(ScalarField::FollowUp.key(), self.follow_up()));
        blocks.push(self.block(
            ScalarField::Satisfaction.key(),
            self.choice(ScalarField::Satisfaction),
        ));

        blocks
    }

    fn personal(&self) -> Vec<ReportLine> {
        [
            ScalarField::Name,
            ScalarField::Age,
            ScalarField::Gender,
            ScalarField::Contact,
            ScalarField::Address,
            ScalarField::EmergencyContact,
            ScalarField::BloodGroup,
            ScalarField::Area,
        ]
        .into_iter()
        .map(|field| {
            let value = self.answers.text(field);
            let value = if is_blank(value) {
                Sentinel::NotProvided.resolve(self.locale)
            } else {
                self.catalog.label_or_raw(field.key(), value, self.locale)
            };
            ReportLine {
                label: self.catalog.title_of(field.key(), self.locale),
                value,
            }
        })
        .collect()
    }
}

/// Builds the report for a submitted answer set.
///
/// Output depends only on the inputs; the clock is the single source of the date stamp.
pub fn render_report(
    answers: &AnswerSet,
    catalog: &OptionCatalog,
    clock: &dyn Clock,
    locale: Locale,
) -> ReportDocument {
    let renderer = Renderer {
        answers,
        catalog,
        locale,
    };
    ReportDocument {
        locale,
        heading: catalog.title.resolve(locale),
        subtitle: BilingualText::new(
            "Patient Questionnaire Response",
            "रोगी प्रश्नावली प्रतिक्रिया",
        )
        .resolve(locale),
        date_label: BilingualText::new("Date", "दिनांक").resolve(locale),
        date: format_report_date(clock.today()),
        answer_label: BilingualText::new("Answer", "उत्तर").resolve(locale),
        questions: renderer.questions(),
        personal_title: BilingualText::new("Personal Information", "व्यक्तिगत जानकारी")
            .resolve(locale),
        personal: renderer.personal(),
        footer: vec![
            BilingualText::new(
                "Thank you — your time and feedback are valuable to us.",
                "धन्यवाद — आपका कीमती समय और सुझाव हमारे लिए बहुत महत्वपूर्ण हैं।",
            )
            .resolve(locale),
            "— Team (AIIMS alumni outreach / Chhatarpur Wellness Initiative)".to_string(),
        ],
    }
}

/// Plain-text rendering suitable for a terminal.
pub fn render_text(report: &ReportDocument) -> String {
    let mut lines = Vec::new();
    lines.push(report.heading.clone());
    lines.push(report.subtitle.clone());
    lines.push(format!("{}: {}", report.date_label, report.date));
    lines.push(String::new());

    for block in &report.questions {
        lines.push(block.heading());
        if let Some(translation) = &block.translation {
            lines.push(format!("   {translation}"));
        }
        if block.number.is_some() {
            lines.push(format!("   {}: {}", report.answer_label, block.answer));
        } else {
            lines.push(format!("   {}", block.answer));
        }
        for note in &block.notes {
            lines.push(format!("   {}: {}", note.label, note.value));
        }
        lines.push(String::new());
    }

    lines.push(report.personal_title.clone());
    for line in &report.personal {
        lines.push(format!("   {}: {}", line.label, line.value));
    }
    lines.push(String::new());
    lines.extend(report.footer.iter().cloned());

    lines.join("\n")
}

/// JSON rendering for programmatic consumers.
pub fn render_json(report: &ReportDocument) -> Value {
    let questions = report
        .questions
        .iter()
        .map(|block| {
            json!({
                "id": block.id,
                "number": block.number,
                "title": block.title,
                "translation": block.translation,
                "answer": block.answer,
                "notes": block.notes.iter().map(line_json).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    json!({
        "locale": report.locale.as_str(),
        "heading": report.heading,
        "subtitle": report.subtitle,
        "date": report.date,
        "questions": questions,
        "personal": {
            "title": report.personal_title,
            "lines": report.personal.iter().map(line_json).collect::<Vec<_>>(),
        },
        "footer": report.footer,
    })
}

fn line_json(line: &ReportLine) -> Value {
    json!({ "label": line.label, "value": line.value })
}
