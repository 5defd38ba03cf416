use crate::catalog::CatalogSource;
use crate::catalog::factory::create_catalog_client;
use crate::circulation::domain::LibraryService;
use crate::circulation::domain::service::LibraryServiceImpl;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::patrons::factory::create_patron_store;

pub async fn create_library_service(config: &Configuration, store: RepositoryStore,
                                    source: CatalogSource) -> LibraryResult<Box<dyn LibraryService>> {
    let catalog_client = create_catalog_client(config, source).await?;
    let patron_store = create_patron_store(config, store).await?;
    Ok(Box::new(LibraryServiceImpl::new(config, catalog_client, patron_store)))
}
