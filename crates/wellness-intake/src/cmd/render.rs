use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::cmd::{ReportFormat, ReportLocale, emit_report, load_answers};

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Answers file (answer set, flat record, or list of updates)
    #[arg(long = "answers", value_name = "FILE")]
    pub answers: PathBuf,
    /// Report format
    #[arg(long = "format", value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
    /// Report language
    #[arg(long = "report-locale", value_enum, default_value_t = ReportLocale::Bilingual)]
    pub report_locale: ReportLocale,
    /// Write the report to this file instead of stdout
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let answers = load_answers(&args.answers)?;
    emit_report(&answers, args.format, args.report_locale, args.out.as_ref())
}
