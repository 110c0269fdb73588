//! Bounded-length excerpts of block-level HTML.
//!
//! Markup is parsed with scraper into a flat list of top-level blocks. Each
//! block is either a run of bare text or an element that holds only text.
//! Deeper nesting is rejected when the excerpt is taken.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::element::{AttributeValue, HtmlElement};
use crate::options::ExcerptOptions;
use crate::utilities::{char_len, escape_html_text, is_valid_attribute_name, truncate_chars};
use crate::{HtmlError, Result};

/// A top-level unit of parsed markup
#[derive(Debug, Clone, PartialEq)]
enum Block {
    /// Bare text, rendered inside a paragraph
    Text(String),
    /// Element whose children are all text
    Leaf {
        tag: String,
        attributes: Vec<(String, String)>,
        text: String,
    },
    /// Element with element children
    Nested { tag: String },
}

impl Block {
    fn text(&self) -> &str {
        match self {
            Block::Text(text) | Block::Leaf { text, .. } => text.as_str(),
            Block::Nested { .. } => "",
        }
    }

    /// Build an empty element carrying this block's tag and attributes
    fn to_element(&self) -> Result<HtmlElement> {
        match self {
            Block::Text(_) => Ok(HtmlElement::new("p")),
            Block::Leaf {
                tag, attributes, ..
            } => {
                let mut element = HtmlElement::new(tag);
                element.set_attributes(attributes.iter().map(|(key, value)| {
                    (key.as_str(), AttributeValue::Text(value.clone()))
                }))?;
                Ok(element)
            }
            Block::Nested { tag } => Err(HtmlError::Processing(format!(
                "Invalid markup detected in <{}>. Only supports single-level depth.",
                tag
            ))),
        }
    }
}

/// Produces excerpts of a piece of markup.
///
/// ```rust
/// use blog_html::ExcerptExtractor;
///
/// let extractor = ExcerptExtractor::with_markup("<p>Hello world</p>");
/// assert_eq!(extractor.get_excerpt(5).unwrap(), "<p>Hello...</p>");
/// assert_eq!(extractor.get_excerpt(100).unwrap(), "<p>Hello world</p>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExcerptExtractor {
    options: ExcerptOptions,
    blocks: Vec<Block>,
}

impl ExcerptExtractor {
    /// Create an extractor with no markup
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options
    pub fn with_options(options: ExcerptOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
        }
    }

    /// Create an extractor for the given markup
    pub fn with_markup(markup: &str) -> Self {
        let mut extractor = Self::new();
        extractor.set_markup(markup);
        extractor
    }

    /// Get the current options
    pub fn options(&self) -> &ExcerptOptions {
        &self.options
    }

    /// Parse markup, replacing whatever was set before
    pub fn set_markup(&mut self, markup: &str) -> &mut Self {
        let document = Html::parse_fragment(markup);
        self.blocks = collect_blocks(document.root_element());
        log::debug!("Parsed {} top-level blocks", self.blocks.len());
        self
    }

    /// Parse raw markup bytes.
    ///
    /// Fails without touching the current markup if the bytes are not UTF-8.
    pub fn set_markup_bytes(&mut self, markup: &[u8]) -> Result<&mut Self> {
        let markup = std::str::from_utf8(markup).map_err(|e| {
            HtmlError::InvalidArgument(format!("Expected UTF-8 markup. Got invalid bytes: {}", e))
        })?;
        Ok(self.set_markup(markup))
    }

    /// Number of top-level blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total text length of all blocks, in characters
    pub fn text_len(&self) -> usize {
        self.blocks.iter().map(|block| char_len(block.text())).sum()
    }

    /// Get an excerpt whose text is at most `budget` characters.
    ///
    /// When all text fits, every block is returned as is. Otherwise blocks are
    /// emitted in order until the running text length comes within the
    /// configured slack of the budget; that block is cut to the remaining
    /// budget, the ellipsis is appended and later blocks are dropped.
    pub fn get_excerpt(&self, budget: usize) -> Result<String> {
        let fits = self.text_len() <= budget;
        let mut markup = String::new();
        let mut consumed = 0;

        for block in &self.blocks {
            let mut element = block.to_element()?;
            let text = block.text();
            let len = char_len(text);

            if !fits && len > 0 && consumed + len + self.options.slack >= budget {
                let kept = truncate_chars(text, budget.saturating_sub(consumed));
                log::debug!(
                    "Truncating <{}> at {} of {} characters",
                    element.tag(),
                    char_len(kept),
                    len
                );

                let mut content = escape_html_text(kept);
                content.push_str(&self.options.ellipsis);
                element.set_content(&content)?;
                markup.push_str(&element.render());
                return Ok(markup);
            }

            consumed += len;
            if len > 0 {
                element.set_content(&escape_html_text(text))?;
            }
            markup.push_str(&element.render());
        }

        Ok(markup)
    }
}

/// Collect the top-level blocks of a parsed fragment
fn collect_blocks(root: ElementRef) -> Vec<Block> {
    let mut blocks = Vec::new();

    for child in root.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                let text: &str = &text.text;
                if !text.trim().is_empty() {
                    blocks.push(Block::Text(text.to_string()));
                }
            }
            ScraperNode::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    blocks.push(element_block(element));
                }
            }
            _ => {}
        }
    }

    blocks
}

fn element_block(element: ElementRef) -> Block {
    let tag = element.value().name().to_string();
    let mut text = String::new();

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(t) => text.push_str(&t.text),
            ScraperNode::Element(_) => return Block::Nested { tag },
            _ => {}
        }
    }

    // html5ever accepts names the builder can't render back
    let attributes = element
        .value()
        .attrs()
        .filter(|(key, _)| {
            let valid = is_valid_attribute_name(key);
            if !valid {
                log::debug!("Dropping attribute {:?} on <{}>", key, tag);
            }
            valid
        })
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    Block::Leaf {
        tag,
        attributes,
        text,
    }
}
