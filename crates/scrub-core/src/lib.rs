pub mod audit;
pub mod error;
pub mod params;
pub mod providers;
pub mod settings;
pub mod types;
pub mod upload;

pub use error::{ScrubError, ScrubResult, TransportError, ValidationError};
pub use params::{LlmParameters, ParamField};
pub use providers::ProviderKind;
pub use types::{
    AnonymizationResult, AnonymizeTextRequest, FileUploadResponse, HealthStatus, PhiReplacement,
    ProviderInfo,
};
