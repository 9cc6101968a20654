pub mod health;
pub mod providers;
pub mod text;
/// Command handlers, one module per subcommand.
pub mod upload;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::ArgMatches;
use log::warn;

use scrub_client::{AnonymizeTransport, ProviderCatalog};
use scrub_core::params::LlmParameters;
use scrub_core::providers::ProviderKind;
use scrub_core::settings::Settings;

use crate::output::{self, OutputOptions};

/// Trait for CLI command handlers.
#[allow(async_fn_in_trait)]
pub trait CommandHandler {
    /// Execute the command with the given arguments and resolved settings.
    async fn execute(&self, matches: &ArgMatches, settings: &Settings) -> Result<()>;
}

/// Refuse a provider the backend lists as unselectable.
///
/// When the provider list itself cannot be fetched the check is skipped
/// and the backend stays the authority on the submission, so a broken
/// list endpoint does not take the anonymize endpoint down with it.
pub(crate) async fn ensure_provider_available(
    transport: Arc<dyn AnonymizeTransport>,
    provider: &str,
) -> Result<()> {
    let catalog = ProviderCatalog::new(transport);
    match catalog.load().await {
        Ok(()) => Ok(catalog.ensure_available(provider)?),
        Err(error) => {
            warn!(
                "provider list unavailable ({}); submitting without the availability check",
                error.user_message()
            );
            Ok(())
        }
    }
}

/// `context_length` only means anything to local models; flag it when it
/// rides along with a hosted provider. The backend ignores it either way.
pub(crate) fn warn_irrelevant_context_length(
    provider: &str,
    parameters: Option<&LlmParameters>,
    options: &OutputOptions,
) {
    let Some(params) = parameters else { return };
    if params.context_length.is_none() {
        return;
    }
    let kind = ProviderKind::from_str(provider).unwrap_or(ProviderKind::Other(provider.into()));
    if !kind.supports_context_length() {
        output::print_warning(
            &format!(
                "context_length only applies to local models; '{}' will ignore it",
                provider
            ),
            options.no_color,
        );
    }
}
