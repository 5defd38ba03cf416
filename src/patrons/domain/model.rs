use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};

// letters are always allowed, these only between letters
const NAME_SEPARATORS: [char; 3] = [' ', '-', '\''];

// Patron abstracts library member along with the titles currently checked out.
// Equality covers identity fields only, borrowed books are not compared.
#[derive(Debug, Clone)]
pub struct Patron {
    first_name: String,
    last_name: String,
    age: String,
    member_id: String,
    borrowed_books: Vec<String>,
}

impl Patron {
    pub fn new(first_name: &str, last_name: &str, age: &str, member_id: &str) -> LibraryResult<Self> {
        validate_name(first_name)?;
        validate_name(last_name)?;
        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age: age.to_string(),
            member_id: member_id.to_string(),
            borrowed_books: vec![],
        })
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    pub fn age(&self) -> &str {
        self.age.as_str()
    }

    pub fn member_id(&self) -> &str {
        self.member_id.as_str()
    }

    // Titles in the order they were borrowed, all lowercase and without duplicates.
    pub fn borrowed_books(&self) -> &[String] {
        &self.borrowed_books
    }

    // Adds the lowercased title unless it is already borrowed.
    pub fn add_borrowed_book(&mut self, title: &str) {
        let title = title.to_lowercase();
        if !self.borrowed_books.contains(&title) {
            self.borrowed_books.push(title);
        }
    }

    // Removes the lowercased title if borrowed, otherwise leaves the list alone.
    pub fn return_borrowed_book(&mut self, title: &str) {
        let title = title.to_lowercase();
        if let Some(pos) = self.borrowed_books.iter().position(|b| *b == title) {
            self.borrowed_books.remove(pos);
        }
    }
}

pub(crate) fn validate_name(name: &str) -> LibraryResult<()> {
    let allowed = name.chars().all(|c| c.is_alphabetic() || NAME_SEPARATORS.contains(&c));
    let bounded = name.chars().next().map(char::is_alphabetic).unwrap_or(false) &&
        name.chars().next_back().map(char::is_alphabetic).unwrap_or(false);
    if allowed && bounded {
        Ok(())
    } else {
        Err(LibraryError::invalid_name(format!("invalid patron name {:?}", name).as_str()))
    }
}

impl PartialEq for Patron {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name &&
            self.last_name == other.last_name &&
            self.age == other.age &&
            self.member_id == other.member_id
    }
}

impl Eq for Patron {}

impl Identifiable for Patron {
    fn id(&self) -> String {
        self.member_id.to_string()
    }
}

// PatronRecord is the stored document for a patron, one per member id.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PatronRecord {
    pub fname: String,
    pub lname: String,
    #[serde(with = "crate::utils::opaque::serializer")]
    pub age: String,
    #[serde(rename = "memberID")]
    pub member_id: String,
    pub borrowed_books: Vec<String>,
}

impl Identifiable for PatronRecord {
    fn id(&self) -> String {
        self.member_id.to_string()
    }
}

impl From<&Patron> for PatronRecord {
    fn from(other: &Patron) -> Self {
        Self {
            fname: other.first_name.to_string(),
            lname: other.last_name.to_string(),
            age: other.age.to_string(),
            member_id: other.member_id.to_string(),
            borrowed_books: other.borrowed_books.clone(),
        }
    }
}

// borrowed books are restored exactly as stored
impl TryFrom<&PatronRecord> for Patron {
    type Error = LibraryError;

    fn try_from(other: &PatronRecord) -> LibraryResult<Self> {
        let mut patron = Patron::new(other.fname.as_str(), other.lname.as_str(),
                                     other.age.as_str(), other.member_id.as_str())?;
        patron.borrowed_books = other.borrowed_books.clone();
        Ok(patron)
    }
}
