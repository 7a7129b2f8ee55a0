pub mod catalog;
pub mod fill;
pub mod i18n;
pub mod prompt;
pub mod render;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use intake_spec::{
    AnswerSet, FieldUpdate, Locale, OptionCatalog, SERVICES_NEEDED, SetField, SystemClock,
    flat_record_from_json, from_flat_record, render_json, render_print_html, render_report,
    render_text,
};
use serde_json::Value;

use crate::cmd::i18n::trf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportLocale {
    #[default]
    Bilingual,
    En,
    Hi,
}

impl From<ReportLocale> for Locale {
    fn from(value: ReportLocale) -> Self {
        match value {
            ReportLocale::Bilingual => Locale::Bilingual,
            ReportLocale::En => Locale::En,
            ReportLocale::Hi => Locale::Hi,
        }
    }
}

/// Reads an answers document.
///
/// Accepts a JSON answer set, a flat storage record whose structured columns
/// are JSON strings, or an array of field updates applied to an empty set.
pub fn load_answers(path: &Path) -> Result<AnswerSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| trf("cli.answers.read_failed", &[&path.display().to_string()]))?;
    parse_answers(&raw)
        .with_context(|| trf("cli.answers.parse_failed", &[&path.display().to_string()]))
}

pub fn parse_answers(raw: &str) -> Result<AnswerSet> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_array() {
        let updates: Vec<FieldUpdate> = serde_json::from_value(value)?;
        let mut answers = AnswerSet::new();
        answers.apply_all(updates);
        return Ok(answers);
    }
    if is_flat_record(&value) {
        let record = flat_record_from_json(&value)?;
        return Ok(from_flat_record(&record)?);
    }
    Ok(serde_json::from_value(value)?)
}

fn is_flat_record(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    SetField::ALL
        .iter()
        .map(|field| field.key())
        .chain([SERVICES_NEEDED])
        .any(|column| matches!(map.get(column), Some(Value::String(_))))
}

/// Writes `contents` to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| trf("cli.output.write_failed", &[&parent.display().to_string()]))?;
    }
    fs::write(path, contents)
        .with_context(|| trf("cli.output.write_failed", &[&path.display().to_string()]))
}

/// Renders `answers` and prints the report, or writes it to `out`.
pub fn emit_report(
    answers: &AnswerSet,
    format: ReportFormat,
    locale: ReportLocale,
    out: Option<&PathBuf>,
) -> Result<()> {
    let report = render_report(
        answers,
        OptionCatalog::builtin(),
        &SystemClock,
        locale.into(),
    );
    let body = match format {
        ReportFormat::Text => render_text(&report),
        ReportFormat::Json => serde_json::to_string_pretty(&render_json(&report))?,
        ReportFormat::Html => render_print_html(&report)?,
    };
    match out {
        Some(path) => {
            write_output(path, &body)?;
            eprintln!("{}", trf("cli.report.written", &[&path.display().to_string()]));
        }
        None => println!("{body}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use intake_spec::{Rank, ScalarField, Service};

    use super::*;

    #[test]
    fn parses_answer_set_document() {
        let answers = parse_answers(
            r#"{"name":"Asha","visit_hours":["morning"],"services_needed":{"diagnostic":"1"}}"#,
        )
        .expect("answers");
        assert_eq!(answers.text(ScalarField::Name), "Asha");
        assert_eq!(answers.members(SetField::VisitHours), ["morning"]);
        assert_eq!(answers.rank(Service::Diagnostic), Some(Rank::First));
    }

    #[test]
    fn parses_form_data_with_unselected_rank() {
        let answers = parse_answers(
            r#"{"name":"Asha","visit_hours":["morning"],"services_needed":{"daycare":"","diagnostic":"1"}}"#,
        )
        .expect("answers");
        assert_eq!(answers.rank(Service::Diagnostic), Some(Rank::First));
        assert_eq!(answers.rank(Service::Daycare), None);
    }

    #[test]
    fn parses_flat_record_document() {
        let answers = parse_answers(
            r#"{"name":"Asha","visit_hours":"[\"evening\"]","services_needed":"{\"daycare\":2}"}"#,
        )
        .expect("answers");
        assert_eq!(answers.members(SetField::VisitHours), ["evening"]);
        assert_eq!(answers.rank(Service::Daycare), Some(Rank::Second));
    }

    #[test]
    fn parses_update_list() {
        let answers = parse_answers(
            r#"[
                {"type":"text","field":"name","value":"Ravi"},
                {"type":"toggle","field":"visit_hours","value":"weekend","present":true},
                {"type":"rank","service":"preventive-checkups","rank":"3"},
                {"type":"rank","service":"daycare","rank":"1"},
                {"type":"rank","service":"daycare","rank":""}
            ]"#,
        )
        .expect("answers");
        assert_eq!(answers.text(ScalarField::Name), "Ravi");
        assert_eq!(answers.members(SetField::VisitHours), ["weekend"]);
        assert_eq!(answers.rank(Service::PreventiveCheckups), Some(Rank::Third));
        assert_eq!(answers.rank(Service::Daycare), None);
    }

    #[test]
    fn rejects_malformed_record_column() {
        let err = parse_answers(r#"{"visit_hours":"[oops"}"#).expect_err("bad json");
        assert!(err.to_string().contains("visit_hours"));
    }
}
