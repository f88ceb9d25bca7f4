#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod api;
mod credentials;
mod error;
mod request;
mod resource;
mod response;
mod service;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use api::{AdminApi, DELETE_ACTION, MAX_BATCH_SIZE, SEARCH_ACTION};
pub use credentials::Credentials;
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use request::{ApiRequest, Method};
pub use resource::{DeletionStatus, Resource, ResourcePage};
pub use response::ApiResponse;
pub use service::TransportService;

/// Tracing target for Admin API calls.
pub const TRACING_TARGET: &str = "cloudsweep_client::api";

/// Core trait for executing Admin API requests.
///
/// Implementations resolve the account-scoped URL, authenticate the call and
/// return the raw response. Classification happens in
/// [`ApiResponse::decode`], so an implementation only fails when no
/// response could be obtained at all.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the unclassified response.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// Returns the URL requests for `action` are sent to.
    fn url(&self, action: &str) -> String {
        action.to_owned()
    }
}
