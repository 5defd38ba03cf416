use serde::{Deserialize, Serialize};

// RepositoryStore selects the backing collection for patron records
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    JsonFile,
    InMemory,
}

impl RepositoryStore {
    pub fn is_durable(&self) -> bool {
        match self {
            RepositoryStore::JsonFile => true,
            RepositoryStore::InMemory => false,
        }
    }
}
