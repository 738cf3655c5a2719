//! Books resource and the book handlers.

use mockdoc::{
    backend::CollectionBackend,
    bson::Document,
    document::Resource,
    memory::InMemoryCollection,
    ResourceStore,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::{ApiError, Reply, CREATED, OK, parse_identity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Any further fields stored with the book.
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "books"
    }
}

impl Book {
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { id, title: title.into(), author: author.into(), extra: Document::new() }
    }
}

/// The five books the API starts with.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new(1, "The Fellowship of the Ring", "J.R.R. Tolkien"),
        Book::new(2, "Harry Potter and the Philosopher's Stone", "J.K. Rowling"),
        Book::new(3, "The Two Towers", "J.R.R. Tolkien"),
        Book::new(4, "Harry Potter and the Chamber of Secrets", "J.K. Rowling"),
        Book::new(5, "The Return of the King", "J.R.R. Tolkien"),
    ]
}

pub type BookStore<B = InMemoryCollection> = ResourceStore<Book, B>;

#[derive(Serialize)]
struct NewBook<'a> {
    title: &'a str,
    author: &'a str,
}

/// Returns the field as a non-empty string, if it is one.
fn text_field<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Handlers for `/api/books`, minus the transport.
#[derive(Debug, Clone)]
pub struct BookService<B: CollectionBackend = InMemoryCollection> {
    store: BookStore<B>,
}

impl<B: CollectionBackend> BookService<B> {
    pub fn new(store: BookStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &BookStore<B> {
        &self.store
    }

    /// `GET /api/books`
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Reply, ApiError> {
        let books = self.store.find().await?;
        Reply::json(OK, &books)
    }

    /// `GET /api/books/:id`
    #[instrument(skip(self))]
    pub async fn get(&self, raw_id: &str) -> Result<Reply, ApiError> {
        let id = parse_identity(raw_id, "book")?;

        let book = self.store
            .find_one(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Book not found".into()))?;

        Reply::json(OK, &book)
    }

    /// `POST /api/books`
    #[instrument(skip(self, body))]
    pub async fn add(&self, body: &Value) -> Result<Reply, ApiError> {
        let (Some(title), Some(author)) = (text_field(body, "title"), text_field(body, "author")) else {
            return Err(ApiError::MissingRequiredField("Book title and author are required".into()));
        };

        let inserted = self.store.insert_one(&NewBook { title, author }).await?;
        info!(id = inserted.inserted_id, "book added");

        Reply::json(CREATED, &inserted.inserted_document)
    }

    /// `PUT /api/books/:id`
    ///
    /// The author is optional and defaults to the stored one.
    #[instrument(skip(self, body))]
    pub async fn update(&self, raw_id: &str, body: &Value) -> Result<Reply, ApiError> {
        let id = parse_identity(raw_id, "book")?;

        let book = self.store
            .find_one(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Book not found".into()))?;

        let Some(title) = text_field(body, "title") else {
            return Err(ApiError::MissingRequiredField("Book title is required".into()));
        };
        let author = text_field(body, "author").unwrap_or(&book.author);

        self.store.update_one(id, &NewBook { title, author }).await?;

        let updated = self.store
            .find_one(id)
            .await?
            .ok_or_else(|| ApiError::Unexpected(format!("book {id} vanished after update")))?;
        info!(id, title = %updated.title, "book updated");

        Reply::json(OK, &updated)
    }

    /// `DELETE /api/books/:id`
    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<Reply, ApiError> {
        let id = parse_identity(raw_id, "book")?;

        let deleted = self.store.delete_one(id).await?;
        if deleted.deleted_count == 0 {
            return Err(ApiError::NotFound(format!("Book with ID {id} not found")));
        }

        info!(id, "book deleted");
        Ok(Reply::no_content())
    }
}
