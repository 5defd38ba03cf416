use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATABASE_FILE: &str = "db.json";
pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org/search.json";
pub const DEFAULT_CATALOG_FIXTURE_FILE: &str = "catalog.json";

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}


// Configuration abstracts config options for library system
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub database_file: PathBuf,
    pub catalog_url: String,
    pub catalog_timeout_secs: u64,
    pub catalog_fixture_file: PathBuf,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            database_file: PathBuf::from(DEFAULT_DATABASE_FILE),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_timeout_secs: 10,
            catalog_fixture_file: PathBuf::from(DEFAULT_CATALOG_FIXTURE_FILE),
        }
    }

    pub fn with_database_file(mut self, path: impl AsRef<Path>) -> Self {
        self.database_file = path.as_ref().to_path_buf();
        self
    }

    pub fn with_catalog_url(mut self, url: &str) -> Self {
        self.catalog_url = url.to_string();
        self
    }

    pub fn with_catalog_fixture_file(mut self, path: impl AsRef<Path>) -> Self {
        self.catalog_fixture_file = path.as_ref().to_path_buf();
        self
    }
}
