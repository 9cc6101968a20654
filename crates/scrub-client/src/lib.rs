//! Client-side machinery for the anonymization backend: the transport
//! seam, its `reqwest` implementation, the request session state
//! machine, and provider discovery.

pub mod discovery;
pub mod http;
pub mod session;
pub mod transport;

pub use discovery::{CatalogPhase, CatalogState, ProviderCatalog};
pub use http::HttpTransport;
pub use session::{AnonymizeSession, Phase, SessionState};
pub use transport::AnonymizeTransport;
