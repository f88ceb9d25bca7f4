//! Resource search and batch deletion.

use crate::{ApiRequest, Error, ErrorKind, ResourcePage, Result, TRACING_TARGET, TransportService};

/// Action path of the search endpoint.
pub const SEARCH_ACTION: &str = "resources/search";

/// Action path of the delete endpoint for uploaded images.
pub const DELETE_ACTION: &str = "resources/image/upload";

/// Maximum number of public identifiers accepted by one delete call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Admin API operations used by the sweeper.
///
/// # Examples
///
/// ```rust,ignore
/// use cloudsweep_client::reqwest::{ReqwestClient, ReqwestConfig};
/// use cloudsweep_client::{AdminApi, Credentials};
///
/// let credentials = Credentials::new("key", "secret", "demo")?;
/// let client = ReqwestClient::new(credentials, ReqwestConfig::default())?;
/// let api = AdminApi::new(client.into_service());
///
/// let page = api.search("uploaded_at<1d", 100).await?;
/// api.batch_delete(&page.public_ids()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AdminApi {
    transport: TransportService,
}

impl AdminApi {
    /// Creates the API on top of a transport.
    pub fn new(transport: TransportService) -> Self {
        Self { transport }
    }

    /// Searches for resources matching `expression`, returning at most
    /// `max_results` of them.
    pub async fn search(&self, expression: &str, max_results: u32) -> Result<ResourcePage> {
        self.search_page(expression, max_results, None).await
    }

    /// Same as [`search`](Self::search), continuing from `next_cursor`.
    ///
    /// # Errors
    ///
    /// Rejects `max_results == 0` as [`InvalidInput`](ErrorKind::InvalidInput)
    /// and propagates every transport or classification error unchanged.
    pub async fn search_page(
        &self,
        expression: &str,
        max_results: u32,
        next_cursor: Option<&str>,
    ) -> Result<ResourcePage> {
        if max_results == 0 {
            return Err(Error::new(ErrorKind::InvalidInput)
                .with_message("max_results must be greater than zero"));
        }

        let mut request = ApiRequest::post(SEARCH_ACTION)
            .with_field("max_results", max_results)
            .with_field("expression", expression);
        if let Some(cursor) = next_cursor.filter(|cursor| !cursor.is_empty()) {
            request = request.with_field("next_cursor", cursor);
        }

        self.transport.call(&request).await
    }

    /// Deletes up to [`MAX_BATCH_SIZE`] resources in one call.
    ///
    /// An empty batch returns an empty page without touching the network.
    ///
    /// # Errors
    ///
    /// Fails with [`BatchTooLarge`](ErrorKind::BatchTooLarge) before any
    /// request when `public_ids` exceeds the limit, and propagates every
    /// transport or classification error unchanged.
    pub async fn batch_delete(&self, public_ids: &[String]) -> Result<ResourcePage> {
        if public_ids.len() > MAX_BATCH_SIZE {
            return Err(Error::batch_too_large(public_ids.len(), MAX_BATCH_SIZE));
        }

        if public_ids.is_empty() {
            tracing::debug!(target: TRACING_TARGET, "Skipping empty delete batch");
            return Ok(ResourcePage::default());
        }

        let request = ApiRequest::delete(DELETE_ACTION).with_field("public_ids", public_ids.to_vec());
        self.transport.call(&request).await
    }
}
