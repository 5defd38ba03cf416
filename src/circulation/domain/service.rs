use std::collections::HashSet;
use async_trait::async_trait;
use tracing::{debug, info};
use crate::catalog::domain::{CatalogClient, CatalogQuery};
use crate::catalog::domain::model::{BookInfo, BookRecord, EbookEntry};
use crate::circulation::domain::LibraryService;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::patrons::domain::model::Patron;
use crate::patrons::repository::PatronStore;

pub struct LibraryServiceImpl {
    branch_id: String,
    catalog_client: Box<dyn CatalogClient>,
    patron_store: Box<dyn PatronStore>,
}

impl LibraryServiceImpl {
    pub fn new(config: &Configuration, catalog_client: Box<dyn CatalogClient>,
               patron_store: Box<dyn PatronStore>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            catalog_client,
            patron_store,
        }
    }

    // one catalog round trip, a failed lookup is the same as no matches
    async fn find_records(&self, query: CatalogQuery) -> Vec<BookRecord> {
        match self.catalog_client.search(&query).await {
            Some(response) => response.docs,
            None => {
                debug!("no catalog data for {} at branch {}", query, self.branch_id);
                vec![]
            }
        }
    }
}

#[async_trait]
impl LibraryService for LibraryServiceImpl {
    async fn is_ebook(&self, title: &str) -> bool {
        let wanted = title.to_lowercase();
        self.get_ebooks(title).await.iter()
            .any(|ebook| ebook.title.as_deref().map(|t| t.to_lowercase() == wanted).unwrap_or(false))
    }

    async fn get_ebooks_count(&self, title: &str) -> usize {
        self.get_ebooks(title).await.len()
    }

    async fn is_book_by_author(&self, author: &str, title: &str) -> bool {
        let wanted = title.to_lowercase();
        self.books_by_author(author).await.iter().any(|t| t.to_lowercase() == wanted)
    }

    async fn get_languages_for_book(&self, title: &str) -> HashSet<String> {
        let records = self.find_records(CatalogQuery::title(title)).await;
        records.iter()
            .flat_map(BookRecord::languages)
            .map(str::to_string)
            .collect()
    }

    async fn is_book_available(&self, title: &str) -> bool {
        !self.find_records(CatalogQuery::title(title)).await.is_empty()
    }

    async fn register_patron(&self, first_name: &str, last_name: &str,
                             age: &str, member_id: &str) -> LibraryResult<Option<u64>> {
        let patron = Patron::new(first_name, last_name, age, member_id)?;
        let id = self.patron_store.insert_patron(Some(&patron)).await?;
        match id {
            Some(id) => info!("registered patron {} as {} at branch {}", member_id, id, self.branch_id),
            None => info!("patron {} is already registered at branch {}", member_id, self.branch_id),
        }
        Ok(id)
    }

    async fn is_patron_registered(&self, patron: &Patron) -> LibraryResult<bool> {
        Ok(self.patron_store.retrieve_patron(patron.member_id()).await?.is_some())
    }

    async fn borrow_book(&self, title: &str, patron: &mut Patron) -> LibraryResult<()> {
        let title = title.to_lowercase();
        patron.add_borrowed_book(title.as_str());
        self.patron_store.update_patron(Some(&*patron)).await?;
        info!("patron {} borrowed {}", patron.member_id(), title);
        Ok(())
    }

    async fn return_borrowed_book(&self, title: &str, patron: &mut Patron) -> LibraryResult<()> {
        let title = title.to_lowercase();
        patron.return_borrowed_book(title.as_str());
        self.patron_store.update_patron(Some(&*patron)).await?;
        info!("patron {} returned {}", patron.member_id(), title);
        Ok(())
    }

    fn is_book_borrowed(&self, title: &str, patron: &Patron) -> bool {
        let title = title.to_lowercase();
        patron.borrowed_books().contains(&title)
    }

    async fn books_by_author(&self, author: &str) -> Vec<String> {
        self.find_records(CatalogQuery::author(author)).await.iter()
            .filter_map(BookRecord::title_suggest)
            .map(str::to_string)
            .collect()
    }

    async fn get_book_info(&self, title: &str) -> Vec<BookInfo> {
        self.find_records(CatalogQuery::title(title)).await.iter()
            .map(BookInfo::from)
            .collect()
    }

    async fn get_ebooks(&self, title: &str) -> Vec<EbookEntry> {
        self.find_records(CatalogQuery::title(title)).await.iter()
            .filter_map(EbookEntry::from_record)
            .collect()
    }

    async fn close(&self) -> LibraryResult<()> {
        self.patron_store.close_db().await
    }
}
