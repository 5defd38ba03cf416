use tracing::debug;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::patrons::repository::json_patron_store::JsonPatronStore;
use crate::patrons::repository::PatronStore;

pub async fn create_patron_store(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn PatronStore>> {
    debug!("creating {:?} patron store for branch {} durable {}", store, config.branch_id, store.is_durable());
    match store {
        RepositoryStore::JsonFile => {
            Ok(Box::new(JsonPatronStore::open(&config.database_file).await?))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(JsonPatronStore::in_memory()))
        }
    }
}
