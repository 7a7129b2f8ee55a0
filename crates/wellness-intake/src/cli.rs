use std::ffi::OsString;

use anyhow::{Error, Result};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{
    self, catalog::CatalogArgs, fill::FillArgs, render::RenderArgs, validate::ValidateArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "wellness-intake",
    about = "Bilingual patient-intake questionnaire for the wellness centre",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Message language (en, hi)
    #[arg(long = "locale", value_name = "LOCALE", global = true)]
    locale: Option<String>,

    /// Increase log verbosity
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill in the questionnaire and submit it
    Fill(Box<FillArgs>),
    /// Render a report from saved answers
    Render(RenderArgs),
    /// Check saved answers for missing required fields
    Validate(ValidateArgs),
    /// List the questionnaire catalog
    Catalog(CatalogArgs),
}

pub fn main() -> Result<()> {
    let argv: Vec<OsString> = std::env::args_os().collect();
    cmd::i18n::init(cmd::i18n::cli_locale_from_argv(&argv));

    let mut command = localize_help(Cli::command(), true);
    let matches = match command.try_get_matches_from_mut(argv) {
        Ok(matches) => matches,
        Err(err) => err.exit(),
    };
    let cli = Cli::from_arg_matches(&matches).map_err(|err| Error::msg(err.to_string()))?;
    cmd::i18n::init(cli.locale.clone());
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fill(args) => cmd::fill::run(*args),
        Commands::Render(args) => cmd::render::run(args),
        Commands::Validate(args) => cmd::validate::run(args),
        Commands::Catalog(args) => cmd::catalog::run(args),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn localize_help(mut command: clap::Command, is_root: bool) -> clap::Command {
    if let Some(about) = command.get_about().map(|s| s.to_string()) {
        command = command.about(cmd::i18n::tr_lit(&about));
    }
    if let Some(long_about) = command.get_long_about().map(|s| s.to_string()) {
        command = command.long_about(cmd::i18n::tr_lit(&long_about));
    }

    command = command
        .disable_help_subcommand(true)
        .disable_help_flag(true)
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::Help)
                .help(cmd::i18n::tr_lit("Print help")),
        );
    if is_root {
        command = command.disable_version_flag(true).arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .action(ArgAction::Version)
                .help(cmd::i18n::tr_lit("Print version")),
        );
    }

    let arg_ids = command
        .get_arguments()
        .map(|arg| arg.get_id().clone())
        .collect::<Vec<_>>();
    for arg_id in arg_ids {
        command = command.mut_arg(arg_id, |arg| {
            let mut arg = arg;
            if let Some(help) = arg.get_help().map(ToString::to_string) {
                arg = arg.help(cmd::i18n::tr_lit(&help));
            }
            if let Some(long_help) = arg.get_long_help().map(ToString::to_string) {
                arg = arg.long_help(cmd::i18n::tr_lit(&long_help));
            }
            arg
        });
    }

    let sub_names = command
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect::<Vec<_>>();
    for name in sub_names {
        command = command.mut_subcommand(name, |sub| localize_help(sub, false));
    }
    command
}
