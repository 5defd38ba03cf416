pub mod client;
pub mod domain;
pub mod factory;

use serde::{Deserialize, Serialize};

// CatalogSource selects where book metadata is looked up
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum CatalogSource {
    OpenLibrary,
    Fixture,
}

impl CatalogSource {
    pub fn is_remote(&self) -> bool {
        match self {
            CatalogSource::OpenLibrary => true,
            CatalogSource::Fixture => false,
        }
    }
}
