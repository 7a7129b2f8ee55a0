use anyhow::Result;
use clap::Args;
use intake_spec::{Locale, OptionCatalog, answers_schema};

use crate::cmd::i18n::tr_key;

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Print the catalog as JSON
    #[arg(long = "json", conflicts_with = "schema")]
    pub json: bool,
    /// Print the JSON schema of an answers document
    #[arg(long = "schema")]
    pub schema: bool,
}

pub fn run(args: CatalogArgs) -> Result<()> {
    let catalog = OptionCatalog::builtin();
    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }
    if args.schema {
        println!(
            "{}",
            serde_json::to_string_pretty(&answers_schema(catalog))?
        );
        return Ok(());
    }

    println!("{} ({} {})", catalog.title.resolve(Locale::Bilingual), catalog.id, catalog.version);
    for question in &catalog.questions {
        let number = question
            .number
            .map(|number| format!("Q{number} "))
            .unwrap_or_default();
        let required = if question.required {
            format!(" [{}]", tr_key("cli.catalog.required"))
        } else {
            String::new()
        };
        println!(
            "{number}{} - {}{required}",
            question.id,
            question.title.resolve(Locale::Bilingual)
        );
        for option in &question.options {
            println!("    {} = {}", option.value, option.label.resolve(Locale::Bilingual));
        }
    }
    Ok(())
}
