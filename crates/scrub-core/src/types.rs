use serde::{Deserialize, Serialize};

use crate::params::LlmParameters;

/// Body of `POST /api/anonymize/text`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnonymizeTextRequest {
    pub text: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<LlmParameters>,
}

impl AnonymizeTextRequest {
    pub fn new(text: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            parameters: None,
        }
    }

    /// Attach tuning parameters; an all-absent set is dropped so the wire
    /// object stays clean.
    pub fn with_parameters(mut self, parameters: LlmParameters) -> Self {
        self.parameters = if parameters.is_empty() {
            None
        } else {
            Some(parameters)
        };
        self
    }
}

/// One row of the replacement audit log.
///
/// Every occurrence of the same underlying real-world entity in one document
/// carries the same `consistency_key` and the same `replacement`, even when
/// the matched `original_token` spans differ ("John" vs "John Doe"). The key
/// (e.g. `[PATIENT_NAME]`) is never derived reversibly from the original
/// value.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PhiReplacement {
    pub category: String,
    pub original_token: String,
    pub replacement: String,
    pub consistency_key: String,
}

/// Outcome of one anonymization call. `replacement_log` keeps the backend's
/// order (first detection first).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnonymizationResult {
    pub replacement_log: Vec<PhiReplacement>,
    pub anonymized_text: String,
    pub provider_used: String,
    pub processing_time_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

/// One entry of `GET /api/anonymize/providers`. `configured` means an API
/// key or endpoint is present; `available` additionally means reachable.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderInfo {
    pub name: String,
    pub configured: bool,
    pub available: bool,
}

/// Response of `POST /api/anonymize/upload`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileUploadResponse {
    pub filename: String,
    pub file_type: String,
    #[serde(default)]
    pub used_ocr: bool,
    pub result: AnonymizationResult,
}

/// Response of `GET /health`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamField;

    #[test]
    fn test_request_omits_absent_parameters() {
        let request = AnonymizeTextRequest::new("Patient seen today.", "anthropic");
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("parameters").is_none());

        let request = request.with_parameters(LlmParameters::default());
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("parameters").is_none());
    }

    #[test]
    fn test_request_serializes_only_set_parameters() {
        let mut params = LlmParameters::default();
        params.apply_edit(ParamField::Temperature, "0.3").unwrap();
        let request =
            AnonymizeTextRequest::new("Patient seen today.", "ollama").with_parameters(params);
        let json = serde_json::to_value(&request).expect("serialize");
        let params = json.get("parameters").expect("parameters present");
        assert_eq!(params.get("temperature").and_then(|v| v.as_f64()), Some(0.3));
        assert!(params.get("max_tokens").is_none());
        assert!(params.get("model_name").is_none());
    }

    #[test]
    fn test_result_decodes_backend_payload() {
        let body = r#"{
            "replacement_log": [
                {
                    "category": "Name",
                    "original_token": "John Doe",
                    "replacement": "[PATIENT_NAME_1]",
                    "consistency_key": "[PATIENT_NAME_1]"
                },
                {
                    "category": "Date",
                    "original_token": "01/02/1980",
                    "replacement": "[DATE_1]",
                    "consistency_key": "[DATE_1]"
                }
            ],
            "anonymized_text": "Patient [PATIENT_NAME_1], DOB [DATE_1].",
            "provider_used": "anthropic",
            "processing_time_seconds": 2.41
        }"#;
        let result: AnonymizationResult = serde_json::from_str(body).expect("decode");
        assert_eq!(result.replacement_log.len(), 2);
        assert_eq!(result.replacement_log[0].category, "Name");
        assert_eq!(result.replacement_log[0].original_token, "John Doe");
        assert_eq!(result.provider_used, "anthropic");
        assert!(result.original_text.is_none());
        assert!(result.processing_time_seconds >= 0.0);
    }

    #[test]
    fn test_upload_response_defaults_used_ocr() {
        let body = r#"{
            "filename": "chart.pdf",
            "file_type": ".pdf",
            "result": {
                "replacement_log": [],
                "anonymized_text": "",
                "provider_used": "anthropic",
                "processing_time_seconds": 0.0
            }
        }"#;
        let response: FileUploadResponse = serde_json::from_str(body).expect("decode");
        assert!(!response.used_ocr);
        assert_eq!(response.filename, "chart.pdf");
    }

    #[test]
    fn test_health_status() {
        let healthy: HealthStatus = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert!(healthy.is_healthy());
        let degraded: HealthStatus = serde_json::from_str(r#"{"status":"degraded"}"#).unwrap();
        assert!(!degraded.is_healthy());
    }
}
