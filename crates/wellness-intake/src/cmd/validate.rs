use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use intake_spec::{Locale, ValidationOptions, validate_with};

use crate::cmd::i18n::{selected_locale, tr_key, trf};
use crate::cmd::load_answers;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Answers file (answer set, flat record, or list of updates)
    #[arg(long = "answers", value_name = "FILE")]
    pub answers: PathBuf,
    /// Reject two services sharing a rank
    #[arg(long = "strict-ranks")]
    pub strict_ranks: bool,
    /// Print the validation result as JSON
    #[arg(long = "json")]
    pub json: bool,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let answers = load_answers(&args.answers)?;
    let result = validate_with(
        &answers,
        ValidationOptions {
            reject_duplicate_ranks: args.strict_ranks,
        },
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.valid {
        println!("{}", tr_key("cli.validate.ok"));
    } else {
        let locale = match selected_locale() {
            "hi" => Locale::Hi,
            _ => Locale::En,
        };
        for issue in &result.errors {
            println!("- {} ({})", issue.message.resolve(locale), issue.fields.join(", "));
        }
    }

    if !result.valid {
        bail!(
            "{}",
            trf("cli.validate.failed", &[&result.missing_required.join(", ")])
        );
    }
    Ok(())
}
