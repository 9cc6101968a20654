//! `scrub text` - anonymize typed or piped text.

use std::io::Read;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;

use scrub_client::{AnonymizeSession, HttpTransport};
use scrub_core::error::{ScrubError, ValidationError};
use scrub_core::settings::Settings;

use super::{ensure_provider_available, warn_irrelevant_context_length, CommandHandler};
use crate::output::{self, OutputOptions};
use crate::validation;

pub struct TextCommand;

impl TextCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for TextCommand {
    async fn execute(&self, matches: &ArgMatches, settings: &Settings) -> Result<()> {
        let options = OutputOptions::from_matches(matches);
        let text = read_input_text(matches)?;
        let provider = validation::provider_name(matches);
        let parameters = validation::collect_parameters(matches)?;
        warn_irrelevant_context_length(&provider, parameters.as_ref(), &options);
        if text.trim().is_empty() {
            return Err(ScrubError::from(ValidationError::EmptyText).into());
        }

        let transport = Arc::new(HttpTransport::new(settings)?);
        ensure_provider_available(transport.clone(), &provider).await?;

        let session = AnonymizeSession::new(transport);
        let spinner = output::start_spinner(
            &format!("Anonymizing text via {}...", provider),
            &options,
        );
        let outcome = session.anonymize_text(&text, &provider, parameters).await;
        output::finish_spinner(spinner);

        let result = outcome?;
        output::print_result(&result, &options);
        Ok(())
    }
}

fn read_input_text(matches: &ArgMatches) -> Result<String> {
    if matches.get_flag("stdin") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read text from stdin")?;
        return Ok(buffer);
    }
    matches
        .get_one::<String>("text")
        .cloned()
        .ok_or_else(|| anyhow!("no text given; pass TEXT as an argument or use --stdin"))
}
