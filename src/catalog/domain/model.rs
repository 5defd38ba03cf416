use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// BookRecord is one search result as the catalog returned it. Fields are kept
// verbatim, any of them may be missing.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookRecord(Map<String, Value>);

impl BookRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn title_suggest(&self) -> Option<&str> {
        self.0.get("title_suggest").and_then(Value::as_str)
    }

    pub fn publisher(&self) -> Option<&Value> {
        self.0.get("publisher")
    }

    pub fn publish_year(&self) -> Option<&Value> {
        self.0.get("publish_year")
    }

    pub fn author_names(&self) -> Vec<&str> {
        strings(self.0.get("author_name"))
    }

    // Language codes of all editions, a lone string counts as one code.
    pub fn languages(&self) -> Vec<&str> {
        strings(self.0.get("language"))
    }

    pub fn ebook_count(&self) -> Option<i64> {
        self.0.get("ebook_count_i").and_then(Value::as_i64)
    }
}

fn strings(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(text)) => vec![text.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => vec![],
    }
}

impl From<Map<String, Value>> for BookRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

// CatalogResponse is the decoded body of a search
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub docs: Vec<BookRecord>,
}

impl CatalogResponse {
    pub fn new(docs: Vec<BookRecord>) -> Self {
        Self { docs }
    }
}

// BookInfo keeps the descriptive fields of a record, absent fields are left out
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct BookInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Value>,
}

impl From<&BookRecord> for BookInfo {
    fn from(other: &BookRecord) -> Self {
        Self {
            title: other.get("title").cloned(),
            publisher: other.publisher().cloned(),
            publish_year: other.publish_year().cloned(),
            language: other.get("language").cloned(),
        }
    }
}

// EbookEntry is a title that has at least one electronic edition
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EbookEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub ebook_count: i64,
}

impl EbookEntry {
    pub fn from_record(record: &BookRecord) -> Option<EbookEntry> {
        match record.ebook_count() {
            Some(count) if count > 0 => Some(EbookEntry {
                title: record.title().map(str::to_string),
                ebook_count: count,
            }),
            _ => None,
        }
    }
}
