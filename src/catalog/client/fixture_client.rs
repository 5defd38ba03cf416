use std::io::ErrorKind;
use std::path::Path;
use async_trait::async_trait;
use tokio::fs;
use tracing::info;
use crate::catalog::domain::{CatalogClient, CatalogQuery};
use crate::catalog::domain::model::{BookRecord, CatalogResponse};
use crate::core::library::{LibraryError, LibraryResult};

// FixtureCatalogClient answers searches from a saved set of catalog records,
// filtering them the way the catalog service does.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalogClient {
    records: Vec<BookRecord>,
}

impl FixtureCatalogClient {
    pub fn new(records: Vec<BookRecord>) -> Self {
        Self { records }
    }

    // Loads records from a file holding a saved search response.
    pub async fn load(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let path = path.as_ref();
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(LibraryError::not_found(
                    format!("catalog fixture {} not found", path.display()).as_str()));
            }
            Err(err) => return Err(err.into()),
        };
        let response: CatalogResponse = serde_json::from_slice(&bytes)?;
        info!("loaded {} catalog records from {}", response.docs.len(), path.display());
        Ok(Self::new(response.docs))
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }
}

#[async_trait]
impl CatalogClient for FixtureCatalogClient {
    async fn search(&self, query: &CatalogQuery) -> Option<CatalogResponse> {
        let docs = self.records.iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        Some(CatalogResponse::new(docs))
    }
}
