//! `scrub health` - backend liveness probe.

use anyhow::{bail, Result};
use clap::ArgMatches;

use scrub_client::{AnonymizeTransport, HttpTransport};
use scrub_core::settings::Settings;

use super::CommandHandler;
use crate::output::{self, OutputOptions};

pub struct HealthCommand;

impl HealthCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HealthCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for HealthCommand {
    async fn execute(&self, matches: &ArgMatches, settings: &Settings) -> Result<()> {
        let options = OutputOptions::from_matches(matches);
        let transport = HttpTransport::new(settings)?;
        let status = transport.health().await?;

        if options.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
            );
        } else if status.is_healthy() {
            output::print_success(
                &format!("backend at {} is healthy", transport.base_url()),
                options.no_color,
            );
        }

        if !status.is_healthy() {
            bail!("backend reported status '{}'", status.status);
        }
        Ok(())
    }
}
