use std::time::Duration;
use tracing::debug;
use crate::catalog::CatalogSource;
use crate::catalog::client::fixture_client::FixtureCatalogClient;
use crate::catalog::client::open_library_client::OpenLibraryClient;
use crate::catalog::domain::CatalogClient;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;

pub async fn create_catalog_client(config: &Configuration, source: CatalogSource) -> LibraryResult<Box<dyn CatalogClient>> {
    debug!("creating {:?} catalog client for branch {} remote {}", source, config.branch_id, source.is_remote());
    match source {
        CatalogSource::OpenLibrary => {
            let timeout = Duration::from_secs(config.catalog_timeout_secs);
            Ok(Box::new(OpenLibraryClient::new(config.catalog_url.as_str(), timeout)?))
        }
        CatalogSource::Fixture => {
            Ok(Box::new(FixtureCatalogClient::load(&config.catalog_fixture_file).await?))
        }
    }
}
