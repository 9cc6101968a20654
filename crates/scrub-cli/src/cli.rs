//! Command tree construction and routing.

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use scrub_core::settings::Settings;

use crate::commands::{
    health::HealthCommand, providers::ProvidersCommand, text::TextCommand, upload::UploadCommand,
    CommandHandler,
};

/// Build the `scrub` command structure.
pub fn build_cli() -> Command {
    Command::new("scrub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("De-identify medical text through a PHI anonymization backend")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Backend base URL (overrides SCRUB_BASE_URL)")
                .global(true),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds (default: none)")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("NAME")
                .help("LLM provider to anonymize with")
                .default_value("anthropic")
                .global(true),
        )
        .arg(
            Arg::new("param")
                .short('P')
                .long("param")
                .value_name("KEY=VALUE")
                .help("LLM tuning parameter (temperature, max_tokens, top_p, context_length, model_name); repeatable")
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .help("Output the raw response as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("show-original")
                .long("show-original")
                .help("Also print the original text when the backend returns it")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress the progress spinner")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("text")
                .about("Anonymize a block of text")
                .arg(
                    Arg::new("text")
                        .value_name("TEXT")
                        .help("The text to anonymize")
                        .required(false),
                )
                .arg(
                    Arg::new("stdin")
                        .long("stdin")
                        .help("Read the text from standard input")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Anonymize a .pdf or .docx document")
                .arg(
                    Arg::new("path")
                        .value_name("PATH")
                        .help("Path to the document")
                        .required(true),
                ),
        )
        .subcommand(Command::new("providers").about("List the backend's LLM providers"))
        .subcommand(Command::new("health").about("Probe the backend's liveness endpoint"))
}

/// Main CLI entry point: parse arguments, resolve settings, route to the
/// matching command handler.
pub async fn run() -> Result<()> {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        // Clap handles help/version (exit 0) and usage errors (exit 2).
        Err(err) => err.exit(),
    };

    let settings = resolve_settings(&matches);

    match matches.subcommand() {
        Some(("text", sub_matches)) => TextCommand::new().execute(sub_matches, &settings).await,
        Some(("upload", sub_matches)) => UploadCommand::new().execute(sub_matches, &settings).await,
        Some(("providers", sub_matches)) => {
            ProvidersCommand::new().execute(sub_matches, &settings).await
        }
        Some(("health", sub_matches)) => HealthCommand::new().execute(sub_matches, &settings).await,
        _ => {
            let mut app = build_cli();
            app.print_help()?;
            Ok(())
        }
    }
}

/// Environment settings with CLI flag overrides applied on top.
pub fn resolve_settings(matches: &ArgMatches) -> Settings {
    let mut settings = Settings::from_env();
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        settings = settings.with_base_url(base_url);
    }
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        settings = settings.with_timeout(std::time::Duration::from_secs(*seconds));
    }
    settings
}
