//! # blog-html
//!
//! HTML helpers for the blog: an element tree builder and an excerpt
//! extractor.
//!
//! ## Building markup
//!
//! ```rust
//! use blog_html::HtmlElement;
//!
//! let mut input = HtmlElement::new("input");
//! input.add_attribute("type", "text")?.add_attribute("disabled", ())?;
//!
//! assert!(input.is_void());
//! assert_eq!(input.render(), "<input type=\"text\" disabled>");
//! # Ok::<(), blog_html::HtmlError>(())
//! ```
//!
//! ## Excerpts
//!
//! Only flat markup is supported: every top-level block must be bare text or
//! an element that holds nothing but text.
//!
//! ```rust
//! use blog_html::ExcerptExtractor;
//!
//! let extractor = ExcerptExtractor::with_markup("<p>Hello world</p>");
//! assert_eq!(extractor.get_excerpt(5).unwrap(), "<p>Hello...</p>");
//! ```

pub mod element;
#[cfg(feature = "excerpt")]
pub mod excerpt;
mod options;
mod utilities;

pub use element::{AttributeValue, ContentPlacement, HtmlElement};
#[cfg(feature = "excerpt")]
pub use excerpt::ExcerptExtractor;
pub use options::ExcerptOptions;
pub use utilities::*;

/// Error type for HTML operations
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, HtmlError>;
