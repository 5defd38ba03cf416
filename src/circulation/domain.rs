use std::collections::HashSet;
use async_trait::async_trait;
use crate::catalog::domain::model::{BookInfo, EbookEntry};
use crate::core::library::LibraryResult;
use crate::patrons::domain::model::Patron;

pub mod service;

// LibraryService answers catalog questions and records patron registration and
// borrowing. Catalog failures read as "no data", store failures are returned.
#[async_trait]
pub trait LibraryService: Sync + Send {
    async fn is_ebook(&self, title: &str) -> bool;
    async fn get_ebooks_count(&self, title: &str) -> usize;
    async fn is_book_by_author(&self, author: &str, title: &str) -> bool;
    async fn get_languages_for_book(&self, title: &str) -> HashSet<String>;
    async fn is_book_available(&self, title: &str) -> bool;
    async fn register_patron(&self, first_name: &str, last_name: &str,
                             age: &str, member_id: &str) -> LibraryResult<Option<u64>>;
    async fn is_patron_registered(&self, patron: &Patron) -> LibraryResult<bool>;
    async fn borrow_book(&self, title: &str, patron: &mut Patron) -> LibraryResult<()>;
    async fn return_borrowed_book(&self, title: &str, patron: &mut Patron) -> LibraryResult<()>;
    fn is_book_borrowed(&self, title: &str, patron: &Patron) -> bool;
    async fn books_by_author(&self, author: &str) -> Vec<String>;
    async fn get_book_info(&self, title: &str) -> Vec<BookInfo>;
    async fn get_ebooks(&self, title: &str) -> Vec<EbookEntry>;
    async fn close(&self) -> LibraryResult<()>;
}
