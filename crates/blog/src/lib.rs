//! # blog
//!
//! Posts, the post form, HTML views and the two controllers of a small blog.
//!
//! Storage sits behind the [`PostTable`] gateway trait; [`InMemoryPostTable`]
//! is the bundled backend. Markup is built with [`blog_html`].
//!
//! ## Example
//!
//! ```rust
//! use blog::{BlogApp, InMemoryPostTable, Post, Request, Response};
//! use chrono::NaiveDate;
//!
//! let mut app = BlogApp::new(InMemoryPostTable::new());
//!
//! let written_on = NaiveDate::from_ymd_opt(2014, 4, 17)
//!     .unwrap()
//!     .and_hms_opt(15, 17, 0)
//!     .unwrap();
//! let mut post = Post::new("hello-world", "Hello World", written_on);
//! post.preview = "<p>The very first post on this blog.</p>".to_string();
//! app.service_mut().save_post(post).unwrap();
//!
//! let Response::Html(page) = app.dispatch("/blog", &Request::Get).unwrap() else {
//!     panic!("expected a page");
//! };
//! assert!(page.contains("<a href=\"/blog/hello-world\">Hello World</a>"));
//! ```

mod controller;
mod form;
mod options;
mod post;
mod routes;
mod service;
mod table;
pub mod view;

pub use controller::{AdminController, BlogApp, BlogController, Request, Response};
pub use form::{FieldKind, FormField, PostForm};
pub use options::BlogOptions;
pub use post::{Post, DATE_FORMAT};
pub use routes::Route;
pub use service::PostService;
pub use table::{InMemoryPostTable, PostFilter, PostOrder, PostQuery, PostTable};

use blog_html::HtmlError;

/// Error type for blog operations
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error(transparent)]
    Html(#[from] HtmlError),
}

pub type Result<T> = std::result::Result<T, BlogError>;
