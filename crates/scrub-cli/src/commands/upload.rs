//! `scrub upload` - preflight and anonymize a document.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::ArgMatches;

use scrub_client::{AnonymizeSession, HttpTransport};
use scrub_core::error::ScrubError;
use scrub_core::settings::Settings;
use scrub_core::upload::{check_extension, check_size, file_extension, MAX_UPLOAD_BYTES};

use super::{ensure_provider_available, warn_irrelevant_context_length, CommandHandler};
use crate::output::{self, OutputOptions};
use crate::validation;

pub struct UploadCommand;

impl UploadCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UploadCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for UploadCommand {
    async fn execute(&self, matches: &ArgMatches, settings: &Settings) -> Result<()> {
        let options = OutputOptions::from_matches(matches);
        let path = matches
            .get_one::<String>("path")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("PATH is required"))?;
        let provider = validation::provider_name(matches);
        let parameters = validation::collect_parameters(matches)?;
        warn_irrelevant_context_length(&provider, parameters.as_ref(), &options);

        // Cheap preflight on metadata alone, ahead of even the provider
        // list query. The session repeats the full check before reading
        // the file.
        check_extension(file_extension(&path).as_deref()).map_err(ScrubError::from)?;
        let metadata = std::fs::metadata(&path)?;
        check_size(metadata.len(), MAX_UPLOAD_BYTES).map_err(ScrubError::from)?;

        let transport = Arc::new(HttpTransport::new(settings)?);
        ensure_provider_available(transport.clone(), &provider).await?;

        let session = AnonymizeSession::new(transport);
        let spinner = output::start_spinner(
            &format!("Uploading {} via {}...", path.display(), provider),
            &options,
        );
        let outcome = session.anonymize_file(&path, &provider, parameters).await;
        output::finish_spinner(spinner);

        let response = outcome?;
        output::print_upload_response(&response, &options);
        Ok(())
    }
}
