//! Application options

use serde::Deserialize;

/// Options for the blog controllers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlogOptions {
    /// Posts on the public index
    pub latest_limit: usize,

    /// Posts on the admin index
    pub admin_limit: usize,

    /// Excerpt budget for previews on the index, in characters
    pub excerpt_length: usize,
}

impl Default for BlogOptions {
    fn default() -> Self {
        Self {
            latest_limit: 10,
            admin_limit: 100,
            excerpt_length: 300,
        }
    }
}
