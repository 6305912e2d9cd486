// =============================================================================
// Sheet Fetcher — HTTP client for the published daily-bars CSV
// =============================================================================
//
// The sheet export redirects before serving the document, so the client
// follows redirects (reqwest's default). A non-success final status is a
// cycle failure; the scheduler decides what to do with it.
// =============================================================================

use std::time::Duration;

use tracing::{debug, instrument};

use super::CycleError;

/// HTTP client for the remote CSV dataset.
#[derive(Debug, Clone)]
pub struct SheetClient {
    url: String,
    client: reqwest::Client,
}

impl SheetClient {
    /// Build a client for `url` with a hard per-request `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            url: url.into(),
            client,
        }
    }

    /// Fetch the raw CSV body.
    #[instrument(skip(self), name = "ingest::fetch_csv")]
    pub async fn fetch_csv(&self) -> Result<String, CycleError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CycleError::Status(status));
        }

        let body = resp.text().await?;
        debug!(bytes = body.len(), "dataset fetched");
        Ok(body)
    }
}
