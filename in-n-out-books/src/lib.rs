//! The In-N-Out Books API, served in-process over mockdoc stores.
//!
//! Each service method stands for one route and returns `Result<Reply, ApiError>`;
//! [`Reply::from_result`](error::Reply::from_result) turns failures into status codes.
//!
//! ```ignore
//! use in_n_out_books::{app::App, config::AppConfig, error::Reply};
//! use serde_json::json;
//!
//! let app = App::new(AppConfig::from_env()?).await?;
//! let reply = Reply::from_result(app.books.add(&json!({ "title": "X", "author": "Y" })).await);
//! assert_eq!(reply.status, 201);
//! ```

pub mod app;
pub mod auth;
pub mod books;
pub mod config;
pub mod error;
pub mod logging;
pub mod users;
