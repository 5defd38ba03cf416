use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::fs;
use tracing::debug;
use crate::core::library::{LibraryError, LibraryResult};

// DocumentTable holds one collection of documents keyed by a collection-assigned row id.
// Iteration follows row id order, which is insertion order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocumentTable<T> {
    documents: BTreeMap<u64, T>,
}

impl<T> DocumentTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
        }
    }

    // row ids start at 1 and continue from the highest id present
    pub(crate) fn next_id(&self) -> u64 {
        self.documents.keys().next_back().map(|id| id + 1).unwrap_or(1)
    }

    pub(crate) fn insert(&mut self, document: T) -> u64 {
        let id = self.next_id();
        self.documents.insert(id, document);
        id
    }

    pub(crate) fn find<P>(&self, predicate: P) -> Option<(u64, &T)> where P: Fn(&T) -> bool {
        self.documents.iter().find(|(_, doc)| predicate(doc)).map(|(id, doc)| (*id, doc))
    }

    pub(crate) fn replace(&mut self, id: u64, document: T) -> Option<T> {
        self.documents.insert(id, document)
    }

    pub(crate) fn remove(&mut self, id: u64) -> Option<T> {
        self.documents.remove(&id)
    }

    pub(crate) fn documents(&self) -> impl Iterator<Item=&T> {
        self.documents.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.documents.len()
    }
}

// Reads every table of a document file laid out as {"<table>": {"<row id>": {...}}}
// without interpreting them. A missing or blank file has no tables.
async fn read_tables(path: &Path) -> LibraryResult<BTreeMap<String, Value>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("document file {} does not exist yet", path.display());
            return Ok(BTreeMap::new());
        }
        Err(err) => return Err(err.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

// Loads one table, other tables in the file may hold documents of any shape.
pub(crate) async fn load_table<T: DeserializeOwned>(path: &Path, table_name: &str) -> LibraryResult<DocumentTable<T>> {
    let mut tables = read_tables(path).await?;
    let rows: BTreeMap<String, T> = match tables.remove(table_name) {
        Some(value) => serde_json::from_value(value)?,
        None => BTreeMap::new(),
    };
    let mut documents = BTreeMap::new();
    for (key, document) in rows {
        let id = key.parse::<u64>().map_err(|_| LibraryError::serialization(
            format!("invalid row id {:?} in {} table {}", key, path.display(), table_name).as_str()))?;
        documents.insert(id, document);
    }
    debug!("loaded {} documents from {} table {}", documents.len(), path.display(), table_name);
    Ok(DocumentTable { documents })
}

// Replaces one table and keeps the others as found in the file. The whole file is
// rewritten through a sibling temp file so readers never see a partial write.
pub(crate) async fn save_table<T: Serialize>(path: &Path, table_name: &str, table: &DocumentTable<T>) -> LibraryResult<()> {
    let mut tables = read_tables(path).await?;
    tables.insert(table_name.to_string(), serde_json::to_value(&table.documents)?);
    let json = serde_json::to_vec_pretty(&tables)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let tmp = temp_path(path);
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_else(|| OsString::from("documents"));
    name.push(".tmp");
    path.with_file_name(name)
}
