pub mod model;

use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use crate::catalog::domain::model::{BookRecord, CatalogResponse};

// CatalogQuery is a single catalog search, either free text over titles or by author
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CatalogQuery {
    Title(String),
    Author(String),
}

impl CatalogQuery {
    pub fn title(text: &str) -> Self {
        CatalogQuery::Title(text.to_string())
    }

    pub fn author(text: &str) -> Self {
        CatalogQuery::Author(text.to_string())
    }

    // The search parameter as sent to the catalog, `q` for titles and `author` for authors.
    pub fn parameter(&self) -> (&'static str, &str) {
        match self {
            CatalogQuery::Title(text) => ("q", text.as_str()),
            CatalogQuery::Author(text) => ("author", text.as_str()),
        }
    }

    // Whether a record answers this query, matching case-insensitive substrings.
    // Free text matches the title or any author name.
    pub fn matches(&self, record: &BookRecord) -> bool {
        match self {
            CatalogQuery::Title(text) => {
                let needle = text.to_lowercase();
                let in_title = record.title()
                    .map(|title| title.to_lowercase().contains(&needle))
                    .unwrap_or(false);
                in_title || author_matches(record, &needle)
            }
            CatalogQuery::Author(text) => {
                author_matches(record, &text.to_lowercase())
            }
        }
    }
}

fn author_matches(record: &BookRecord, needle: &str) -> bool {
    record.author_names().iter().any(|name| name.to_lowercase().contains(needle))
}

impl Display for CatalogQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (key, value) = self.parameter();
        write!(f, "{}={}", key, value)
    }
}

// CatalogClient looks up book metadata. A failed lookup (unreachable catalog, failure
// status, undecodable body) is None and never an error.
#[async_trait]
pub trait CatalogClient: Sync + Send {
    async fn search(&self, query: &CatalogQuery) -> Option<CatalogResponse>;
}
