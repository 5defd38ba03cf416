pub mod json_patron_store;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::patrons::domain::model::{Patron, PatronRecord};

// PatronStore persists patrons keyed by member id. The member id is unique across the
// collection; duplicates and unknown ids are reported through None rather than errors.
#[async_trait]
pub trait PatronStore: Sync + Send {
    // inserts a new patron and returns its row id, None for an absent patron or a taken member id
    async fn insert_patron(&self, patron: Option<&Patron>) -> LibraryResult<Option<u64>>;

    // overwrites all fields of the record with the same member id, inserting it when missing
    async fn update_patron(&self, patron: Option<&Patron>) -> LibraryResult<Option<u64>>;

    // rebuilds the stored patron, borrowed books included
    async fn retrieve_patron(&self, member_id: &str) -> LibraryResult<Option<Patron>>;

    // deletes the record with the member id, returns whether one existed
    async fn remove_patron(&self, member_id: &str) -> LibraryResult<bool>;

    // all stored records in storage order
    async fn get_all_patrons(&self) -> LibraryResult<Vec<PatronRecord>>;

    async fn get_patron_count(&self) -> LibraryResult<usize>;

    // releases the store, repeated calls are no-ops
    async fn close_db(&self) -> LibraryResult<()>;

    fn convert_patron_to_db_format(&self, patron: &Patron) -> PatronRecord {
        PatronRecord::from(patron)
    }
}
