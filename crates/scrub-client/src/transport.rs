use async_trait::async_trait;

use scrub_core::error::ScrubResult;
use scrub_core::params::LlmParameters;
use scrub_core::types::{
    AnonymizationResult, AnonymizeTextRequest, FileUploadResponse, HealthStatus, ProviderInfo,
};
use scrub_core::upload::UploadFile;

/// Backend operations needed by the session and discovery layers.
///
/// `HttpTransport` is the production implementation; tests substitute
/// in-process stubs so the state machines can be exercised without a
/// running backend.
#[async_trait]
pub trait AnonymizeTransport: Send + Sync {
    /// Anonymize a block of raw text.
    async fn anonymize_text(
        &self,
        request: &AnonymizeTextRequest,
    ) -> ScrubResult<AnonymizationResult>;

    /// Upload a prepared document and anonymize its extracted text.
    ///
    /// `parameters` rides along as a JSON-encoded form field when present.
    async fn anonymize_file(
        &self,
        upload: UploadFile,
        provider: &str,
        parameters: Option<LlmParameters>,
    ) -> ScrubResult<FileUploadResponse>;

    /// List every provider the backend knows about, configured or not.
    async fn providers(&self) -> ScrubResult<Vec<ProviderInfo>>;

    /// Liveness probe against the backend.
    async fn health(&self) -> ScrubResult<HealthStatus>;
}
