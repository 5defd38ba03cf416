use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::patrons::domain::model::{Patron, PatronRecord};
use crate::patrons::repository::PatronStore;
use crate::utils::docdb::{DocumentTable, load_table, save_table};

const PATRONS_TABLE: &str = "patrons";

// JsonPatronStore keeps the patron collection in memory and rewrites its document file on
// every change. Without a path it is a purely in-memory collection with the same semantics.
#[derive(Debug)]
pub struct JsonPatronStore {
    path: Option<PathBuf>,
    table: Mutex<Option<DocumentTable<PatronRecord>>>,
}

impl JsonPatronStore {
    pub async fn open(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let table = load_table(&path, PATRONS_TABLE).await?;
        info!("opened patron store {} with {} patrons", path.display(), table.len());
        Ok(Self {
            path: Some(path),
            table: Mutex::new(Some(table)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            table: Mutex::new(Some(DocumentTable::new())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, table: &DocumentTable<PatronRecord>) -> LibraryResult<()> {
        if let Some(path) = &self.path {
            save_table(path, PATRONS_TABLE, table).await?;
        }
        Ok(())
    }
}

fn opened(table: &mut Option<DocumentTable<PatronRecord>>) -> LibraryResult<&mut DocumentTable<PatronRecord>> {
    table.as_mut().ok_or_else(|| LibraryError::closed("patron store is closed"))
}

#[async_trait]
impl PatronStore for JsonPatronStore {
    async fn insert_patron(&self, patron: Option<&Patron>) -> LibraryResult<Option<u64>> {
        let patron = match patron {
            Some(patron) => patron,
            None => return Ok(None),
        };
        let record = self.convert_patron_to_db_format(patron);
        let mut guard = self.table.lock().await;
        let table = opened(&mut guard)?;
        if table.find(|doc| doc.id() == record.member_id).is_some() {
            info!("rejected patron with duplicate member id {}", record.member_id);
            return Ok(None);
        }
        // changes only become visible once written
        let mut next = table.clone();
        let id = next.insert(record);
        self.persist(&next).await?;
        *table = next;
        debug!("inserted patron {} as row {}", patron.member_id(), id);
        Ok(Some(id))
    }

    async fn update_patron(&self, patron: Option<&Patron>) -> LibraryResult<Option<u64>> {
        let patron = match patron {
            Some(patron) => patron,
            None => return Ok(None),
        };
        let record = self.convert_patron_to_db_format(patron);
        let mut guard = self.table.lock().await;
        let table = opened(&mut guard)?;
        let existing = table.find(|doc| doc.id() == record.member_id).map(|(id, _)| id);
        let mut next = table.clone();
        let id = match existing {
            Some(id) => {
                next.replace(id, record);
                id
            }
            None => {
                info!("patron {} not stored yet, inserting on update", patron.member_id());
                next.insert(record)
            }
        };
        self.persist(&next).await?;
        *table = next;
        debug!("updated patron {} at row {}", patron.member_id(), id);
        Ok(Some(id))
    }

    async fn retrieve_patron(&self, member_id: &str) -> LibraryResult<Option<Patron>> {
        let mut guard = self.table.lock().await;
        let table = opened(&mut guard)?;
        match table.find(|doc| doc.member_id == member_id) {
            Some((_, record)) => Patron::try_from(record).map(Some),
            None => Ok(None),
        }
    }

    async fn remove_patron(&self, member_id: &str) -> LibraryResult<bool> {
        let mut guard = self.table.lock().await;
        let table = opened(&mut guard)?;
        let id = match table.find(|doc| doc.member_id == member_id) {
            Some((id, _)) => id,
            None => return Ok(false),
        };
        let mut next = table.clone();
        next.remove(id);
        self.persist(&next).await?;
        *table = next;
        debug!("removed patron {} from row {}", member_id, id);
        Ok(true)
    }

    async fn get_all_patrons(&self) -> LibraryResult<Vec<PatronRecord>> {
        let mut guard = self.table.lock().await;
        let table = opened(&mut guard)?;
        Ok(table.documents().cloned().collect())
    }

    async fn get_patron_count(&self) -> LibraryResult<usize> {
        let mut guard = self.table.lock().await;
        let table = opened(&mut guard)?;
        Ok(table.len())
    }

    async fn close_db(&self) -> LibraryResult<()> {
        let mut guard = self.table.lock().await;
        if guard.take().is_some() {
            match &self.path {
                Some(path) => info!("closed patron store {}", path.display()),
                None => info!("closed in-memory patron store"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use uuid::Uuid;
    use crate::core::library::LibraryError;
    use crate::patrons::domain::model::{Patron, PatronRecord};
    use crate::patrons::repository::json_patron_store::JsonPatronStore;
    use crate::patrons::repository::PatronStore;

    lazy_static! {
        static ref SHARED_STORE: AsyncOnce<JsonPatronStore> = AsyncOnce::new(async {
                JsonPatronStore::in_memory()
            });
    }

    fn make_patron(member_id: &str, first_name: &str, borrowed: &[&str]) -> Patron {
        let mut patron = Patron::new(first_name, "Person", "36", member_id).expect("should build patron");
        for title in borrowed {
            patron.add_borrowed_book(title);
        }
        patron
    }

    async fn open_store(dir: &TempDir) -> JsonPatronStore {
        JsonPatronStore::open(dir.path().join("test_db.json")).await.expect("should open store")
    }

    #[tokio::test]
    async fn test_should_insert_patron_and_increase_count() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        let patron = make_patron("P001", "Test", &[]);

        let id = store.insert_patron(Some(&patron)).await.expect("should insert patron");
        assert_eq!(Some(1), id);
        assert_eq!(1, store.get_patron_count().await.expect("should count"));

        let rows = store.get_all_patrons().await.expect("should list patrons");
        assert_eq!(1, rows.len());
        assert_eq!("P001", rows[0].member_id.as_str());
        assert_eq!("Test", rows[0].fname.as_str());
        assert_eq!("Person", rows[0].lname.as_str());
        assert_eq!("36", rows[0].age.as_str());
        assert!(rows[0].borrowed_books.is_empty());
    }

    #[tokio::test]
    async fn test_should_ignore_absent_patron_on_insert() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        assert_eq!(None, store.insert_patron(None).await.expect("should accept absent patron"));
        assert_eq!(0, store.get_patron_count().await.expect("should count"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_member_id() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        let first = make_patron("X001", "Test", &["book1"]);
        let second = make_patron("X001", "Different", &[]);

        assert!(store.insert_patron(Some(&first)).await.expect("should insert first").is_some());
        assert_eq!(None, store.insert_patron(Some(&second)).await.expect("should reject second"));
        assert_eq!(1, store.get_patron_count().await.expect("should count"));

        let rows = store.get_all_patrons().await.expect("should list patrons");
        assert_eq!(PatronRecord::from(&first), rows[0]);
    }

    #[tokio::test]
    async fn test_should_assign_row_ids_in_insert_order() {
        let store = JsonPatronStore::in_memory();
        for (i, member_id) in ["C1", "C2", "C3"].iter().enumerate() {
            let id = store.insert_patron(Some(&make_patron(member_id, "Test", &[]))).await.expect("should insert");
            assert_eq!(Some(i as u64 + 1), id);
        }
        let ids: Vec<String> = store.get_all_patrons().await.expect("should list patrons")
            .into_iter().map(|r| r.member_id).collect();
        assert_eq!(vec!["C1", "C2", "C3"], ids);
        assert_eq!(3, store.get_patron_count().await.expect("should count"));
    }

    #[tokio::test]
    async fn test_should_update_existing_patron() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        let id = store.insert_patron(Some(&make_patron("U123", "Ada", &["book1"]))).await.expect("should insert");

        let mut updated = Patron::new("Ada-Updated", "Lovelace-Updated", "37", "U123").expect("should build patron");
        updated.add_borrowed_book("book1");
        updated.add_borrowed_book("book2");
        assert_eq!(id, store.update_patron(Some(&updated)).await.expect("should update"));

        let loaded = store.retrieve_patron("U123").await.expect("should retrieve").expect("should exist");
        assert_eq!(updated, loaded);
        assert_eq!("Ada-Updated", loaded.first_name());
        assert_eq!("Lovelace-Updated", loaded.last_name());
        assert_eq!("37", loaded.age());

        let rows = store.get_all_patrons().await.expect("should list patrons");
        assert_eq!(1, rows.len());
        assert_eq!(vec!["book1", "book2"], rows[0].borrowed_books);
    }

    #[tokio::test]
    async fn test_should_ignore_absent_patron_on_update() {
        let store = JsonPatronStore::in_memory();
        store.insert_patron(Some(&make_patron("N1", "Test", &[]))).await.expect("should insert");
        assert_eq!(None, store.update_patron(None).await.expect("should accept absent patron"));
        assert_eq!(1, store.get_patron_count().await.expect("should count"));
    }

    #[tokio::test]
    async fn test_should_insert_unknown_patron_on_update() {
        let store = JsonPatronStore::in_memory();
        store.insert_patron(Some(&make_patron("A1", "Test", &[]))).await.expect("should insert");
        let id = store.update_patron(Some(&make_patron("A2", "Other", &["dune"]))).await.expect("should upsert");
        assert_eq!(Some(2), id);
        assert_eq!(2, store.get_patron_count().await.expect("should count"));
        let loaded = store.retrieve_patron("A2").await.expect("should retrieve").expect("should exist");
        assert_eq!(vec!["dune"], loaded.borrowed_books());
    }

    #[tokio::test]
    async fn test_should_retrieve_patron_with_borrowed_books() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        let patron = make_patron("R42", "Alan", &["The Imitation Game", "Enigma"]);
        store.insert_patron(Some(&patron)).await.expect("should insert");

        let loaded = store.retrieve_patron("R42").await.expect("should retrieve").expect("should exist");
        assert_eq!(patron, loaded);
        assert_eq!(patron.borrowed_books(), loaded.borrowed_books());
        assert_eq!(vec!["the imitation game", "enigma"], loaded.borrowed_books());
    }

    #[tokio::test]
    async fn test_should_not_retrieve_unknown_patron() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        assert!(store.retrieve_patron("NOPE").await.expect("should retrieve").is_none());
    }

    #[tokio::test]
    async fn test_should_remove_patron() {
        let store = JsonPatronStore::in_memory();
        store.insert_patron(Some(&make_patron("D1", "Test", &[]))).await.expect("should insert");
        assert!(store.remove_patron("D1").await.expect("should remove"));
        assert!(!store.remove_patron("D1").await.expect("should remove"));
        assert_eq!(0, store.get_patron_count().await.expect("should count"));
    }

    #[tokio::test]
    async fn test_should_convert_patron_to_db_format() {
        let store = JsonPatronStore::in_memory();
        let patron = make_patron("S9", "Sophie", &["b1", "b2"]);
        let record = store.convert_patron_to_db_format(&patron);
        assert_eq!("Sophie", record.fname.as_str());
        assert_eq!("Person", record.lname.as_str());
        assert_eq!("36", record.age.as_str());
        assert_eq!("S9", record.member_id.as_str());
        assert_eq!(vec!["b1", "b2"], record.borrowed_books);
    }

    #[tokio::test]
    async fn test_should_write_one_document_per_patron() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        store.insert_patron(Some(&make_patron("F1", "Test", &["dune"]))).await.expect("should insert");
        store.insert_patron(Some(&make_patron("F2", "Other", &[]))).await.expect("should insert");

        let text = std::fs::read_to_string(dir.path().join("test_db.json")).expect("should read file");
        let value: Value = serde_json::from_str(text.as_str()).expect("should parse file");
        assert_eq!(json!({
            "patrons": {
                "1": {"fname": "Test", "lname": "Person", "age": "36", "memberID": "F1", "borrowed_books": ["dune"]},
                "2": {"fname": "Other", "lname": "Person", "age": "36", "memberID": "F2", "borrowed_books": []},
            }
        }), value);
    }

    #[tokio::test]
    async fn test_should_read_documents_written_elsewhere() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("test_db.json");
        std::fs::write(&path, r#"{"patrons": {"3": {"fname": "Grace", "lname": "Hopper", "age": 85, "memberID": "G1", "borrowed_books": ["cobol"]}}}"#)
            .expect("should write file");
        let store = JsonPatronStore::open(&path).await.expect("should open store");

        let loaded = store.retrieve_patron("G1").await.expect("should retrieve").expect("should exist");
        assert_eq!("85", loaded.age());
        assert_eq!(vec!["cobol"], loaded.borrowed_books());
        let id = store.insert_patron(Some(&make_patron("G2", "Test", &[]))).await.expect("should insert");
        assert_eq!(Some(4), id);
    }

    #[tokio::test]
    async fn test_should_open_blank_file_as_empty() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("test_db.json");
        std::fs::write(&path, "").expect("should create file");
        let store = JsonPatronStore::open(&path).await.expect("should open store");
        assert_eq!(0, store.get_patron_count().await.expect("should count"));
        assert_eq!(Some(Path::new(&path)), store.path());
    }

    #[tokio::test]
    async fn test_should_persist_across_close_and_reopen() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let store = open_store(&dir).await;
        let mut patron = make_patron("Z1", "Test", &[]);
        store.insert_patron(Some(&patron)).await.expect("should insert");
        patron.add_borrowed_book("Way of Kings");
        store.update_patron(Some(&patron)).await.expect("should update");

        store.close_db().await.expect("should close");
        store.close_db().await.expect("should close twice");

        let reopened = open_store(&dir).await;
        assert_eq!(1, reopened.get_patron_count().await.expect("should count"));
        let loaded = reopened.retrieve_patron("Z1").await.expect("should retrieve").expect("should exist");
        assert_eq!(vec!["way of kings"], loaded.borrowed_books());
        reopened.close_db().await.expect("should close");
    }

    #[tokio::test]
    async fn test_should_fail_operations_after_close() {
        let store = JsonPatronStore::in_memory();
        store.close_db().await.expect("should close");
        let res = store.get_patron_count().await;
        assert!(matches!(res, Err(LibraryError::Database { .. })));
        let res = store.insert_patron(Some(&make_patron("C9", "Test", &[]))).await;
        assert!(res.is_err());
        assert!(store.insert_patron(None).await.expect("should accept absent patron").is_none());
    }

    #[tokio::test]
    async fn test_should_round_trip_through_shared_store() {
        let store = SHARED_STORE.get().await;
        let member_id = Uuid::new_v4().to_string();
        let patron = make_patron(member_id.as_str(), "Shared", &["Learning Python", "Dune"]);
        store.insert_patron(Some(&patron)).await.expect("should insert").expect("should assign id");

        let loaded = store.retrieve_patron(member_id.as_str()).await.expect("should retrieve").expect("should exist");
        assert_eq!(patron.first_name(), loaded.first_name());
        assert_eq!(patron.last_name(), loaded.last_name());
        assert_eq!(patron.age(), loaded.age());
        assert_eq!(patron.member_id(), loaded.member_id());
        assert_eq!(patron.borrowed_books(), loaded.borrowed_books());
    }

    #[tokio::test]
    async fn test_should_leave_other_tables_in_file_alone() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("test_db.json");
        std::fs::write(&path, r#"{"_default": {"1": {"x": 1}}, "patrons": {}}"#).expect("should write file");
        let store = JsonPatronStore::open(&path).await.expect("should open store");
        assert_eq!(0, store.get_patron_count().await.expect("should count"));

        let patron = make_patron("T1", "Test", &[]);
        assert_eq!(Some(1), store.insert_patron(Some(&patron)).await.expect("should insert"));
        store.update_patron(Some(&patron)).await.expect("should update");
        store.close_db().await.expect("should close");

        let written: Value = serde_json::from_slice(&std::fs::read(&path).expect("should read file"))
            .expect("should parse file");
        assert_eq!(json!({"x": 1}), written["_default"]["1"]);
        assert_eq!("T1", written["patrons"]["1"]["memberID"]);
    }
}
