use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use log::{debug, warn};

use scrub_core::error::{ScrubResult, ValidationError};
use scrub_core::params::LlmParameters;
use scrub_core::types::{AnonymizationResult, AnonymizeTextRequest, FileUploadResponse};
use scrub_core::upload;

use crate::transport::AnonymizeTransport;

/// Where the session currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Snapshot of the session observable by callers. `result` and `error`
/// are independent slots: a failed retry records its message without
/// discarding the last successful result.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub result: Option<AnonymizationResult>,
    pub error: Option<String>,
}

/// Drives anonymization requests and owns the session state machine.
///
/// Transitions are `Idle -> Loading -> {Success, Failed}`, with
/// `reset()` returning to `Idle`. Each request takes a generation from
/// a monotonic counter; a completion only lands in the state if its
/// generation is still the latest issued, so a slow response can never
/// overwrite the result of a request issued after it.
pub struct AnonymizeSession {
    transport: Arc<dyn AnonymizeTransport>,
    state: RwLock<SessionState>,
    generation: AtomicU64,
}

impl AnonymizeSession {
    pub fn new(transport: Arc<dyn AnonymizeTransport>) -> Self {
        Self {
            transport,
            state: RwLock::new(SessionState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Current state, cloned out so callers never hold the lock.
    pub fn state(&self) -> SessionState {
        self.state.read().map(|state| state.clone()).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.state
            .read()
            .map(|state| state.phase == Phase::Loading)
            .unwrap_or(false)
    }

    /// Clear both slots and return to `Idle`. Any response still in
    /// flight becomes stale and will be discarded when it lands.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.write_state();
        *state = SessionState::default();
        debug!("session reset; in-flight responses are now stale");
    }

    /// Anonymize raw text through the configured transport.
    ///
    /// Input validation happens before the loading phase is entered, so
    /// a rejected request leaves the session untouched and issues no
    /// network call.
    pub async fn anonymize_text(
        &self,
        text: &str,
        provider: &str,
        parameters: Option<LlmParameters>,
    ) -> ScrubResult<AnonymizationResult> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        if let Some(params) = &parameters {
            params.validate()?;
        }
        let mut request = AnonymizeTextRequest::new(text, provider);
        if let Some(params) = parameters {
            request = request.with_parameters(params);
        }

        let guard = self.begin();
        let outcome = self.transport.anonymize_text(&request).await;
        match &outcome {
            Ok(result) => guard.succeed(result.clone()),
            Err(error) => guard.fail(error.user_message()),
        }
        outcome
    }

    /// Anonymize a document from disk. Preflight checks (extension,
    /// size, filename) run before the loading phase and short-circuit
    /// without touching the transport.
    pub async fn anonymize_file(
        &self,
        path: &Path,
        provider: &str,
        parameters: Option<LlmParameters>,
    ) -> ScrubResult<FileUploadResponse> {
        if let Some(params) = &parameters {
            params.validate()?;
        }
        let prepared = upload::prepare_upload(path).await?;

        let guard = self.begin();
        let outcome = self
            .transport
            .anonymize_file(prepared, provider, parameters)
            .await;
        match &outcome {
            Ok(response) => guard.succeed(response.result.clone()),
            Err(error) => guard.fail(error.user_message()),
        }
        outcome
    }

    fn begin(&self) -> LoadingGuard<'_> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.write_state();
            state.phase = Phase::Loading;
        }
        debug!("anonymization request issued (generation {})", generation);
        LoadingGuard {
            session: self,
            generation,
            settled: false,
        }
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    // Recover state from a poisoned lock instead of propagating the panic.
    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Scope guard for one request. Entering the scope flips the session to
/// `Loading`; `succeed`/`fail` settle it, and dropping the guard without
/// settling (the request future was cancelled) restores the phase implied
/// by whatever the slots still hold. The phase therefore always leaves
/// `Loading`, on every exit path.
struct LoadingGuard<'a> {
    session: &'a AnonymizeSession,
    generation: u64,
    settled: bool,
}

impl LoadingGuard<'_> {
    fn succeed(mut self, result: AnonymizationResult) {
        self.settled = true;
        let mut state = self.session.write_state();
        if self.session.current_generation() != self.generation {
            warn!(
                "discarding stale success for request generation {}",
                self.generation
            );
            return;
        }
        state.phase = Phase::Success;
        state.result = Some(result);
        state.error = None;
    }

    fn fail(mut self, message: String) {
        self.settled = true;
        let mut state = self.session.write_state();
        if self.session.current_generation() != self.generation {
            warn!(
                "discarding stale failure for request generation {}",
                self.generation
            );
            return;
        }
        state.phase = Phase::Failed;
        state.error = Some(message);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.session.write_state();
        if self.session.current_generation() != self.generation {
            return;
        }
        if state.phase == Phase::Loading {
            state.phase = if state.error.is_some() {
                Phase::Failed
            } else if state.result.is_some() {
                Phase::Success
            } else {
                Phase::Idle
            };
            debug!(
                "request generation {} dropped mid-flight; phase restored",
                self.generation
            );
        }
    }
}
