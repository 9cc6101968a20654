//! `scrub providers` - list the backend's provider catalog.

use std::sync::Arc;

use anyhow::Result;
use clap::ArgMatches;

use scrub_client::{HttpTransport, ProviderCatalog};
use scrub_core::settings::Settings;

use super::CommandHandler;
use crate::output::{self, OutputOptions};

pub struct ProvidersCommand;

impl ProvidersCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProvidersCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for ProvidersCommand {
    async fn execute(&self, matches: &ArgMatches, settings: &Settings) -> Result<()> {
        let options = OutputOptions::from_matches(matches);
        let transport = Arc::new(HttpTransport::new(settings)?);
        let catalog = ProviderCatalog::new(transport);
        catalog.load().await?;

        let providers = catalog.providers();
        if options.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&providers).unwrap_or_else(|_| "[]".to_string())
            );
            return Ok(());
        }

        output::print_providers(&providers, &options);
        if catalog.available().is_empty() {
            output::print_warning(
                "no provider is currently available; configure an API key on the backend",
                options.no_color,
            );
        }
        Ok(())
    }
}
