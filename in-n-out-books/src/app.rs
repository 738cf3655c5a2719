use mockdoc::memory::InMemoryCollection;
use tracing::info;

use crate::{
    auth::{AuthService, Credentials},
    books::{seed_books, BookService, BookStore},
    config::AppConfig,
    error::{ApiError, Reply, OK},
    users::{seed_users, UserStore},
};

/// Process-wide state: one store per resource, built once and handed to the services.
#[derive(Debug, Clone)]
pub struct App {
    pub books: BookService<InMemoryCollection>,
    pub auth: AuthService<InMemoryCollection>,
}

impl App {
    pub async fn new(cfg: AppConfig) -> Result<Self, ApiError> {
        let credentials = Credentials::new(&cfg.auth)?;

        let (books, users) = if cfg.seed {
            (seed_books(), seed_users(&credentials)?)
        } else {
            (Vec::new(), Vec::new())
        };

        let books = BookStore::in_memory(books).await?;
        let users = UserStore::in_memory(users).await?;
        info!(books = books.count().await?, users = users.count().await?, "stores ready");

        Ok(Self {
            books: BookService::new(books),
            auth: AuthService::new(users, credentials, cfg.auth),
        })
    }

    /// `GET /`
    pub fn welcome(&self) -> Reply {
        Reply::message(OK, "Welcome to the In-N-Out Books API")
    }
}
