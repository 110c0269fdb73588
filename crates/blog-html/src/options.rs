//! Configuration options for excerpt extraction

/// Options for [`ExcerptExtractor`](crate::ExcerptExtractor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptOptions {
    /// A block is cut once the running text length comes within this many
    /// characters of the budget
    pub slack: usize,

    /// Marker appended to the truncated text. Emitted as markup, not escaped.
    pub ellipsis: String,
}

impl Default for ExcerptOptions {
    fn default() -> Self {
        Self {
            slack: 30,
            ellipsis: "...".to_string(),
        }
    }
}
