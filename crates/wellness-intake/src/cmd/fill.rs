use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use intake_spec::validate::CODE_DUPLICATE_RANK;
use intake_spec::{
    AnswerSet, FormController, Locale, MemoryGateway, OptionCatalog, PersistenceGateway,
    SERVICES_NEEDED, SubmitError, ValidationOptions, ValidationResult,
};
use intake_store::StoreConfig;
use tracing::{debug, info};

use crate::cmd::i18n::{tr_key, trf};
use crate::cmd::prompt::Prompter;
use crate::cmd::{ReportFormat, ReportLocale, emit_report, load_answers, write_output};

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// Answers file (answer set, flat record, or list of updates)
    #[arg(long = "answers", value_name = "FILE")]
    pub answers: Option<PathBuf>,
    /// Write the final answers to this file
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Gateway config file (defaults to the user config directory)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Keep the submission in memory instead of the configured store
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Report format
    #[arg(long = "report", value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
    /// Write the report to this file instead of stdout
    #[arg(long = "report-out", value_name = "FILE")]
    pub report_out: Option<PathBuf>,
    /// Report language
    #[arg(long = "report-locale", value_enum, default_value_t = ReportLocale::Bilingual)]
    pub report_locale: ReportLocale,
    /// Reject two services sharing a rank
    #[arg(long = "strict-ranks")]
    pub strict_ranks: bool,
    /// Prompt for answers even when stdin is not a terminal
    #[arg(long = "interactive")]
    pub interactive: bool,
}

pub fn run(args: FillArgs) -> Result<()> {
    let interactive = args.interactive || (args.answers.is_none() && io::stdin().is_terminal());
    let mut answers = match &args.answers {
        Some(path) => load_answers(path)?,
        None if interactive => AnswerSet::new(),
        None => bail!("{}", tr_key("cli.fill.needs_answers")),
    };

    let locale: Locale = args.report_locale.into();
    let catalog = OptionCatalog::builtin();
    let stdin = io::stdin();
    let mut prompter = interactive.then(|| Prompter::new(stdin.lock(), io::stderr(), locale));

    if let Some(prompter) = prompter.as_mut() {
        eprintln!("{}", tr_key("cli.fill.header"));
        prompter.collect(catalog, &mut answers)?;
    }

    let gateway: Box<dyn PersistenceGateway> = if args.dry_run {
        Box::new(MemoryGateway::new())
    } else {
        StoreConfig::load(args.config.as_deref())?.build_gateway()?
    };
    let options = ValidationOptions {
        reject_duplicate_ranks: args.strict_ranks,
    };
    let runtime = tokio::runtime::Runtime::new()?;
    let mut controller = FormController::with_answers(gateway, answers).with_validation_options(options);

    loop {
        let outcome = runtime.block_on(controller.submit()).map(|_| ());
        match outcome {
            Ok(()) => break,
            Err(SubmitError::Validation(result)) => {
                eprintln!(
                    "{}",
                    trf("cli.fill.missing_fields", &[&result.missing_required.join(", ")])
                );
                let Some(prompter) = prompter.as_mut() else {
                    save_for_retry(controller.answers(), args.out.as_ref())?;
                    bail!(
                        "{}",
                        trf(
                            "cli.fill.not_saved",
                            &[&SubmitError::Validation(result).user_message().resolve(locale)]
                        )
                    );
                };
                let (gateway, mut answers) = controller.into_parts();
                reask(prompter, catalog, &result, &mut answers)?;
                controller = FormController::with_answers(gateway, answers)
                    .with_validation_options(options);
            }
            Err(err) => {
                debug!(error = %err, "submission failed");
                save_for_retry(controller.answers(), args.out.as_ref())?;
                bail!(
                    "{}",
                    trf("cli.fill.not_saved", &[&err.user_message().resolve(locale)])
                );
            }
        }
    }

    if args.dry_run {
        eprintln!("{}", tr_key("cli.fill.dry_run"));
    } else {
        eprintln!("{}", tr_key("cli.fill.submitted"));
    }
    info!(dry_run = args.dry_run, "questionnaire submitted");

    if let Some(out) = &args.out {
        write_output(out, &controller.answers().to_json_pretty()?)?;
    }
    emit_report(
        controller.answers(),
        args.report,
        args.report_locale,
        args.report_out.as_ref(),
    )
}

fn reask<R: io::BufRead, W: io::Write>(
    prompter: &mut Prompter<R, W>,
    catalog: &OptionCatalog,
    result: &ValidationResult,
    answers: &mut AnswerSet,
) -> Result<()> {
    for issue in &result.errors {
        if issue.code == CODE_DUPLICATE_RANK {
            if let Some(question) = catalog.question(SERVICES_NEEDED) {
                prompter.ask(question, answers)?;
            }
            continue;
        }
        for field in &issue.fields {
            if let Some(question) = catalog.question(field) {
                prompter.ask(question, answers)?;
            }
        }
    }
    Ok(())
}

fn save_for_retry(answers: &AnswerSet, out: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = out {
        write_output(path, &answers.to_json_pretty()?)?;
        eprintln!(
            "{}",
            trf("cli.fill.answers_kept", &[&path.display().to_string()])
        );
    }
    Ok(())
}
