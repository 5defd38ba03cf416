use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use crate::catalog::domain::{CatalogClient, CatalogQuery};
use crate::catalog::domain::model::CatalogResponse;
use crate::core::library::{LibraryError, LibraryResult};

// OpenLibraryClient searches the Open Library catalog over HTTP
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    client: Client,
    api_url: String,
}

impl OpenLibraryClient {
    pub fn new(api_url: &str, timeout: Duration) -> LibraryResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LibraryError::runtime(
                format!("failed to build catalog client {}", err).as_str(), None))?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }
}

#[async_trait]
impl CatalogClient for OpenLibraryClient {
    async fn search(&self, query: &CatalogQuery) -> Option<CatalogResponse> {
        let response = match self.client
            .get(self.api_url.as_str())
            .query(&[query.parameter()])
            .send()
            .await {
            Ok(response) => response,
            Err(err) => {
                warn!("catalog request {} to {} failed {}", query, self.api_url, err);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("catalog request {} returned status {}", query, status);
            return None;
        }

        match response.json::<CatalogResponse>().await {
            Ok(body) => {
                debug!("catalog request {} returned {} records", query, body.docs.len());
                Some(body)
            }
            Err(err) => {
                warn!("catalog request {} returned undecodable body {}", query, err);
                None
            }
        }
    }
}
