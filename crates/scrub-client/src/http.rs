use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;

use async_trait::async_trait;

use scrub_core::error::{ScrubResult, TransportError};
use scrub_core::params::LlmParameters;
use scrub_core::settings::Settings;
use scrub_core::types::{
    AnonymizationResult, AnonymizeTextRequest, FileUploadResponse, HealthStatus, ProviderInfo,
};
use scrub_core::upload::UploadFile;

use crate::transport::AnonymizeTransport;

const ANONYMIZE_TEXT_PATH: &str = "/api/anonymize/text";
const ANONYMIZE_UPLOAD_PATH: &str = "/api/anonymize/upload";
const PROVIDERS_PATH: &str = "/api/anonymize/providers";
const HEALTH_PATH: &str = "/health";

/// `reqwest`-backed transport speaking the backend's JSON API.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from settings. No request timeout is applied
    /// unless the settings carry one, since local-model anonymization
    /// can legitimately run for minutes.
    pub fn new(settings: &Settings) -> ScrubResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pass 2xx responses through; turn anything else into a status
    /// error carrying whatever detail the body yields.
    async fn require_success(response: Response) -> ScrubResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|_| String::new());
        debug!("request failed with status {}: {}", status, body);
        Err(TransportError::Status {
            status: status.as_u16(),
            detail: error_detail(&body, status.as_u16()),
        }
        .into())
    }
}

#[async_trait]
impl AnonymizeTransport for HttpTransport {
    async fn anonymize_text(
        &self,
        request: &AnonymizeTextRequest,
    ) -> ScrubResult<AnonymizationResult> {
        let url = self.endpoint(ANONYMIZE_TEXT_PATH);
        debug!("POST {} ({} chars)", url, request.text.len());
        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::require_success(response).await?;
        Ok(response.json::<AnonymizationResult>().await?)
    }

    async fn anonymize_file(
        &self,
        upload: UploadFile,
        provider: &str,
        parameters: Option<LlmParameters>,
    ) -> ScrubResult<FileUploadResponse> {
        let url = self.endpoint(ANONYMIZE_UPLOAD_PATH);
        let size = upload.bytes.len();
        debug!("POST {} ({}, {} bytes)", url, upload.filename, size);

        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&upload.mime_type)?;
        let mut form = Form::new()
            .part("file", part)
            .text("provider", provider.to_string());
        if let Some(params) = parameters.filter(|p| !p.is_empty()) {
            form = form.text("parameters", serde_json::to_string(&params)?);
        }

        let response = self.client.post(&url).multipart(form).send().await?;
        let response = Self::require_success(response).await?;
        Ok(response.json::<FileUploadResponse>().await?)
    }

    async fn providers(&self) -> ScrubResult<Vec<ProviderInfo>> {
        let url = self.endpoint(PROVIDERS_PATH);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let response = Self::require_success(response).await?;
        Ok(response.json::<Vec<ProviderInfo>>().await?)
    }

    async fn health(&self) -> ScrubResult<HealthStatus> {
        let url = self.endpoint(HEALTH_PATH);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let response = Self::require_success(response).await?;
        Ok(response.json::<HealthStatus>().await?)
    }
}

/// Best error detail the body offers, falling back to the status code.
fn error_detail(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = extract_error_message(&value) {
            return message;
        }
    }
    format!("request failed with status {}", status)
}

// The backend reports failures as {"detail": "..."}; the other shapes
// cover proxies and upstream services sitting in front of it.
fn extract_error_message(value: &Value) -> Option<String> {
    if let Some(detail) = value["detail"].as_str() {
        return Some(detail.to_string());
    }
    if let Some(message) = value["error"]["message"].as_str() {
        return Some(message.to_string());
    }
    if let Some(message) = value["error"].as_str() {
        return Some(message.to_string());
    }
    if let Some(message) = value["message"].as_str() {
        return Some(message.to_string());
    }
    None
}
