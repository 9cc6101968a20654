use std::str::FromStr;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use log::debug;

use scrub_core::error::{ScrubError, ScrubResult};
use scrub_core::providers::ProviderKind;
use scrub_core::types::ProviderInfo;

use crate::transport::AnonymizeTransport;

/// Lifecycle of the provider catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub phase: CatalogPhase,
    pub providers: Vec<ProviderInfo>,
    pub error: Option<String>,
}

/// One-shot view of the providers the backend exposes.
///
/// `load()` fetches the list exactly once; later calls are no-ops once
/// the catalog is loaded. The full list is retained, including
/// unconfigured and unreachable providers, so callers can diagnose why
/// a given provider cannot be selected. There is no automatic retry;
/// `refresh()` re-fetches on explicit request only.
pub struct ProviderCatalog {
    transport: Arc<dyn AnonymizeTransport>,
    state: RwLock<CatalogState>,
}

impl ProviderCatalog {
    pub fn new(transport: Arc<dyn AnonymizeTransport>) -> Self {
        Self {
            transport,
            state: RwLock::new(CatalogState::default()),
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state.read().map(|state| state.clone()).unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .read()
            .map(|state| state.phase == CatalogPhase::Loaded)
            .unwrap_or(false)
    }

    /// Full provider list as last fetched, available or not.
    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.state
            .read()
            .map(|state| state.providers.clone())
            .unwrap_or_default()
    }

    /// Only the providers that can actually serve requests right now.
    pub fn available(&self) -> Vec<ProviderInfo> {
        self.providers()
            .into_iter()
            .filter(|provider| provider.available)
            .collect()
    }

    pub fn error(&self) -> Option<String> {
        self.state
            .read()
            .map(|state| state.error.clone())
            .unwrap_or_default()
    }

    /// Fetch the provider list if it has not been loaded yet.
    pub async fn load(&self) -> ScrubResult<()> {
        if self.is_loaded() {
            debug!("provider catalog already loaded; skipping fetch");
            return Ok(());
        }
        self.refresh().await
    }

    /// Re-fetch unconditionally. A failed refresh keeps the previously
    /// fetched list around for diagnostics but marks the catalog `Failed`.
    pub async fn refresh(&self) -> ScrubResult<()> {
        self.write_state().phase = CatalogPhase::Loading;
        match self.transport.providers().await {
            Ok(providers) => {
                debug!("provider catalog loaded ({} providers)", providers.len());
                let mut state = self.write_state();
                state.phase = CatalogPhase::Loaded;
                state.providers = providers;
                state.error = None;
                Ok(())
            }
            Err(error) => {
                let mut state = self.write_state();
                state.phase = CatalogPhase::Failed;
                state.error = Some(error.user_message());
                drop(state);
                Err(error)
            }
        }
    }

    /// Reject a provider the loaded catalog says cannot serve requests.
    ///
    /// The name is canonicalized first, so the `local` alias matches the
    /// catalog's `ollama` entry. When the catalog never loaded there is
    /// no list to consult, so the check passes and the backend stays the
    /// authority on the request itself.
    pub fn ensure_available(&self, name: &str) -> ScrubResult<()> {
        let state = self.state();
        if state.phase != CatalogPhase::Loaded {
            debug!(
                "provider catalog not loaded; deferring availability check for '{}'",
                name
            );
            return Ok(());
        }
        let wire_name = ProviderKind::from_str(name)
            .map(|kind| kind.wire_name())
            .unwrap_or_else(|_| name.to_string());
        let info = state
            .providers
            .iter()
            .find(|provider| provider.name.eq_ignore_ascii_case(&wire_name));
        match info {
            None => Err(ScrubError::UnavailableProvider {
                name: name.to_string(),
                reason: "not in the backend's provider list".to_string(),
            }),
            Some(provider) if provider.available => Ok(()),
            Some(provider) if provider.configured => Err(ScrubError::UnavailableProvider {
                name: name.to_string(),
                reason: "configured but not currently reachable".to_string(),
            }),
            Some(_) => Err(ScrubError::UnavailableProvider {
                name: name.to_string(),
                reason: "no API key configured".to_string(),
            }),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
