//! HTML element tree builder.
//!
//! An [`HtmlElement`] is a tag with ordered attributes, child elements and a
//! literal content payload. Trees are built programmatically and rendered to a
//! markup string with [`HtmlElement::render`].

use std::fmt;

use indexmap::IndexMap;

use crate::utilities::{escape_html_attr, is_valid_attribute_name, is_void};
use crate::{HtmlError, Result};

/// Position of an element's own content relative to its rendered children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentPlacement {
    /// Content is rendered before the children
    #[default]
    Prepend,
    /// Content is rendered after the children
    Append,
}

/// The value of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// No value, rendered as a bare `key` (e.g. `disabled`)
    Bare,
    /// String value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value, must be finite
    Float(f64),
}

impl AttributeValue {
    /// Check if this is a value-less attribute
    pub fn is_bare(&self) -> bool {
        matches!(self, AttributeValue::Bare)
    }

    /// Get the value as a string, `None` for bare attributes
    pub fn as_string(&self) -> Option<String> {
        match self {
            AttributeValue::Bare => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bare => Ok(()),
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Integer(n) => write!(f, "{}", n),
            AttributeValue::Float(n) => write!(f, "{}", n),
        }
    }
}

impl From<()> for AttributeValue {
    fn from(_: ()) -> Self {
        AttributeValue::Bare
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&String> for AttributeValue {
    fn from(value: &String) -> Self {
        AttributeValue::Text(value.clone())
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttributeValue {
                fn from(value: $t) -> Self {
                    AttributeValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(f64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Bare, Into::into)
    }
}

/// An HTML element with attributes, children and content.
///
/// Mutators return `&mut Self` so calls can be chained. Operations that can
/// violate the element's invariants (void elements never hold content or
/// children, attribute names must be well formed) return a [`Result`] and
/// leave the element untouched on failure.
///
/// ```rust
/// use blog_html::HtmlElement;
///
/// let mut list = HtmlElement::new("ul");
/// list.add_class("posts")?;
/// list.spawn_child("li")?.set_content("First")?;
/// list.spawn_child("li")?.set_content("Second")?;
///
/// assert_eq!(
///     list.render(),
///     "<ul class=\"posts\"><li>First</li><li>Second</li></ul>"
/// );
/// # Ok::<(), blog_html::HtmlError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    tag: String,
    attributes: IndexMap<String, AttributeValue>,
    children: Vec<HtmlElement>,
    content: String,
    placement: ContentPlacement,
    is_void: bool,
    is_xhtml: bool,
}

impl HtmlElement {
    /// Create a new element. Tags in the void registry are marked void.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            content: String::new(),
            placement: ContentPlacement::default(),
            is_void: is_void(tag),
            is_xhtml: false,
        }
    }

    /// Check if a tag name is in the void element registry
    pub fn is_void_element(tag: &str) -> bool {
        is_void(tag)
    }

    /// Get the tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Check if this element is void
    pub fn is_void(&self) -> bool {
        self.is_void
    }

    /// Check if this element renders XHTML-style void tags
    pub fn is_xhtml(&self) -> bool {
        self.is_xhtml
    }

    /// Mark the element void (or not).
    ///
    /// Fails if the element already holds content or children.
    pub fn set_void(&mut self, is_void: bool) -> Result<&mut Self> {
        if is_void && (!self.content.is_empty() || !self.children.is_empty()) {
            return Err(HtmlError::InvalidState(format!(
                "Element <{}> has content or children and can't be made void.",
                self.tag
            )));
        }
        self.is_void = is_void;
        Ok(self)
    }

    /// Render void tags as `<tag />`
    pub fn set_xhtml(&mut self, is_xhtml: bool) -> &mut Self {
        self.is_xhtml = is_xhtml;
        self
    }

    /// Get the content placement
    pub fn content_placement(&self) -> ContentPlacement {
        self.placement
    }

    /// Set where content is rendered relative to children
    pub fn set_content_placement(&mut self, placement: ContentPlacement) -> &mut Self {
        self.placement = placement;
        self
    }

    /// Render content after the children
    pub fn set_append_content(&mut self) -> &mut Self {
        self.set_content_placement(ContentPlacement::Append)
    }

    /// Render content before the children
    pub fn set_prepend_content(&mut self) -> &mut Self {
        self.set_content_placement(ContentPlacement::Prepend)
    }

    /// Replace all attributes
    pub fn set_attributes<I, K, V>(&mut self, attributes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let attributes = collect_attributes(attributes)?;
        self.attributes = attributes.into_iter().collect();
        Ok(self)
    }

    /// Merge attributes into the existing ones.
    ///
    /// Existing keys keep their position and take the new value.
    pub fn add_attributes<I, K, V>(&mut self, attributes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let attributes = collect_attributes(attributes)?;
        self.attributes.extend(attributes);
        Ok(self)
    }

    /// Add a single attribute. Pass `()` for a bare attribute.
    pub fn add_attribute(
        &mut self,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<&mut Self> {
        let value = value.into();
        check_attribute(key, &value)?;
        self.attributes.insert(key.to_string(), value);
        Ok(self)
    }

    /// Remove an attribute if present
    pub fn remove_attribute(&mut self, key: &str) -> &mut Self {
        self.attributes.shift_remove(key);
        self
    }

    /// Get an attribute value by name
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Get all attributes in insertion order
    pub fn attributes(&self) -> &IndexMap<String, AttributeValue> {
        &self.attributes
    }

    /// Append a class to the `class` attribute
    pub fn add_class(&mut self, class: &str) -> Result<&mut Self> {
        let class = match self.attributes.get("class").and_then(AttributeValue::as_string) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.add_attribute("class", class)
    }

    /// Set the content, replacing what was there
    pub fn set_content(&mut self, content: &str) -> Result<&mut Self> {
        self.ensure_can_hold("contain content")?;
        self.content = content.to_string();
        Ok(self)
    }

    /// Add content after the existing content
    pub fn append_content(&mut self, content: &str) -> Result<&mut Self> {
        self.ensure_can_hold("contain content")?;
        self.content.push_str(content);
        Ok(self)
    }

    /// Add content before the existing content
    pub fn prepend_content(&mut self, content: &str) -> Result<&mut Self> {
        self.ensure_can_hold("contain content")?;
        self.content.insert_str(0, content);
        Ok(self)
    }

    /// Clear the content
    pub fn remove_content(&mut self) -> Result<&mut Self> {
        self.ensure_can_hold("contain content")?;
        self.content.clear();
        Ok(self)
    }

    /// Get the content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Create a child element, append it and return it
    pub fn spawn_child(&mut self, tag: &str) -> Result<&mut HtmlElement> {
        self.ensure_can_hold("have child elements")?;
        let index = self.children.len();
        self.children.push(HtmlElement::new(tag));
        Ok(&mut self.children[index])
    }

    /// Append a child element
    pub fn add_child(&mut self, child: HtmlElement) -> Result<&mut Self> {
        self.ensure_can_hold("have child elements")?;
        self.children.push(child);
        Ok(self)
    }

    /// Append several child elements
    pub fn add_children<I>(&mut self, children: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = HtmlElement>,
    {
        self.ensure_can_hold("have child elements")?;
        self.children.extend(children);
        Ok(self)
    }

    /// Replace all children
    pub fn set_children<I>(&mut self, children: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = HtmlElement>,
    {
        self.ensure_can_hold("have child elements")?;
        self.children = children.into_iter().collect();
        Ok(self)
    }

    /// Remove all children
    pub fn remove_children(&mut self) -> &mut Self {
        self.children.clear();
        self
    }

    /// Check if this element has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Get the child elements
    pub fn children(&self) -> &[HtmlElement] {
        &self.children
    }

    /// Render the element and its subtree to markup
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    /// Render only the children, in order
    pub fn render_children(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.render_into(&mut out);
        }
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        self.render_attributes(out);

        if self.is_void {
            if self.is_xhtml {
                out.push_str(" /");
            }
            out.push('>');
            return;
        }

        out.push('>');
        if self.placement == ContentPlacement::Prepend {
            out.push_str(&self.content);
        }
        for child in &self.children {
            child.render_into(out);
        }
        if self.placement == ContentPlacement::Append {
            out.push_str(&self.content);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    fn render_attributes(&self, out: &mut String) {
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            if let Some(value) = value.as_string() {
                out.push_str("=\"");
                out.push_str(&escape_html_attr(&value));
                out.push('"');
            }
        }
    }

    fn ensure_can_hold(&self, what: &str) -> Result<()> {
        if self.is_void {
            return Err(HtmlError::InvalidState(format!(
                "Void element <{}> can't {}.",
                self.tag, what
            )));
        }
        Ok(())
    }
}

impl Default for HtmlElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl fmt::Display for HtmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn check_attribute(key: &str, value: &AttributeValue) -> Result<()> {
    if !is_valid_attribute_name(key) {
        return Err(HtmlError::InvalidArgument(format!(
            "Invalid attribute name \"{}\".",
            key
        )));
    }
    if let AttributeValue::Float(n) = value {
        if !n.is_finite() {
            return Err(HtmlError::InvalidArgument(format!(
                "Invalid value for attribute \"{}\": {} is not a finite number.",
                key, n
            )));
        }
    }
    Ok(())
}

/// Validate every pair before any of them is applied
fn collect_attributes<I, K, V>(attributes: I) -> Result<Vec<(String, AttributeValue)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttributeValue>,
{
    attributes
        .into_iter()
        .map(|(key, value)| {
            let key = key.into();
            let value = value.into();
            check_attribute(&key, &value)?;
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_div() {
        let div = HtmlElement::default();
        assert_eq!(div.tag(), "div");
        assert!(!div.is_void());
        assert_eq!(div.render(), "<div></div>");
    }

    #[test]
    fn test_void_registry() {
        for tag in crate::utilities::VOID_ELEMENTS {
            assert!(HtmlElement::new(tag).is_void(), "{} should be void", tag);
        }
        assert!(HtmlElement::new("BR").is_void());
        assert!(!HtmlElement::new("p").is_void());
    }

    #[test]
    fn test_bare_attribute() {
        let mut input = HtmlElement::new("input");
        input.add_attribute("disabled", ()).unwrap();
        assert_eq!(input.render(), "<input disabled>");
    }

    #[test]
    fn test_xhtml_void() {
        let mut br = HtmlElement::new("br");
        br.set_xhtml(true);
        assert_eq!(br.render(), "<br />");

        let mut img = HtmlElement::new("img");
        img.set_xhtml(true)
            .add_attribute("src", "cat.png")
            .unwrap()
            .add_attribute("alt", "Cat")
            .unwrap();
        assert_eq!(img.render(), "<img src=\"cat.png\" alt=\"Cat\" />");
    }

    #[test]
    fn test_attribute_values() {
        let mut td = HtmlElement::new("td");
        td.add_attribute("colspan", 2)
            .unwrap()
            .add_attribute("data-ratio", 1.5)
            .unwrap()
            .add_attribute("title", "a \"quoted\" title")
            .unwrap()
            .add_attribute("hidden", None::<&str>)
            .unwrap();
        assert_eq!(
            td.render(),
            "<td colspan=\"2\" data-ratio=\"1.5\" title=\"a &quot;quoted&quot; title\" hidden></td>"
        );
    }

    #[test]
    fn test_invalid_attributes() {
        let mut div = HtmlElement::new("div");
        assert!(matches!(
            div.add_attribute("", "x"),
            Err(HtmlError::InvalidArgument(_))
        ));
        assert!(matches!(
            div.add_attribute("on click", "x"),
            Err(HtmlError::InvalidArgument(_))
        ));
        assert!(matches!(
            div.add_attribute("width", f64::NAN),
            Err(HtmlError::InvalidArgument(_))
        ));
        assert!(div.attributes().is_empty());
    }

    #[test]
    fn test_batch_attributes_are_atomic() {
        let mut div = HtmlElement::new("div");
        div.add_attribute("id", "main").unwrap();

        let result = div.set_attributes(vec![("class", "a"), ("bad key", "b")]);
        assert!(result.is_err());
        assert_eq!(div.render(), "<div id=\"main\"></div>");

        let result = div.add_attributes(vec![("class", "a"), ("x>y", "b")]);
        assert!(result.is_err());
        assert_eq!(div.render(), "<div id=\"main\"></div>");
    }

    #[test]
    fn test_set_and_merge_attributes() {
        let mut a = HtmlElement::new("a");
        a.set_attributes(vec![("href", "/blog"), ("class", "link")])
            .unwrap();
        a.add_attributes(vec![("rel", "next"), ("href", "/blog/admin")])
            .unwrap();
        assert_eq!(
            a.render(),
            "<a href=\"/blog/admin\" class=\"link\" rel=\"next\"></a>"
        );

        a.set_attributes(vec![("title", "Home")]).unwrap();
        assert_eq!(a.render(), "<a title=\"Home\"></a>");
    }

    #[test]
    fn test_remove_attribute() {
        let mut div = HtmlElement::new("div");
        div.set_attributes(vec![("a", "1"), ("b", "2"), ("c", "3")])
            .unwrap();
        div.remove_attribute("b").remove_attribute("missing");
        assert_eq!(div.render(), "<div a=\"1\" c=\"3\"></div>");
    }

    #[test]
    fn test_add_class() {
        let mut div = HtmlElement::new("div");
        div.add_class("btn").unwrap().add_class("btn-default").unwrap();
        assert_eq!(
            div.attribute("class"),
            Some(&AttributeValue::Text("btn btn-default".to_string()))
        );
    }

    #[test]
    fn test_content_operations() {
        let mut p = HtmlElement::new("p");
        p.set_content("world").unwrap();
        p.prepend_content("Hello ").unwrap();
        p.append_content("!").unwrap();
        assert_eq!(p.content(), "Hello world!");
        assert_eq!(p.render(), "<p>Hello world!</p>");

        p.remove_content().unwrap();
        assert_eq!(p.render(), "<p></p>");
    }

    #[test]
    fn test_content_placement() {
        let mut label = HtmlElement::new("label");
        label.set_content("Title").unwrap();
        label.spawn_child("input").unwrap();
        assert_eq!(label.render(), "<label>Title<input></label>");

        label.set_append_content();
        assert_eq!(label.content_placement(), ContentPlacement::Append);
        assert_eq!(label.render(), "<label><input>Title</label>");

        label.set_prepend_content();
        assert_eq!(label.render(), "<label>Title<input></label>");
    }

    #[test]
    fn test_void_rejects_content_and_children() {
        let mut hr = HtmlElement::new("hr");
        assert!(matches!(hr.set_content("x"), Err(HtmlError::InvalidState(_))));
        assert!(matches!(hr.append_content("x"), Err(HtmlError::InvalidState(_))));
        assert!(matches!(hr.prepend_content("x"), Err(HtmlError::InvalidState(_))));
        assert!(matches!(hr.remove_content(), Err(HtmlError::InvalidState(_))));
        assert!(matches!(hr.spawn_child("span"), Err(HtmlError::InvalidState(_))));
        assert!(matches!(
            hr.add_child(HtmlElement::new("span")),
            Err(HtmlError::InvalidState(_))
        ));
        assert!(matches!(
            hr.add_children(vec![HtmlElement::new("span")]),
            Err(HtmlError::InvalidState(_))
        ));
        assert!(!hr.has_children());
        assert_eq!(hr.render(), "<hr>");
    }

    #[test]
    fn test_set_void_with_content_fails() {
        let mut span = HtmlElement::new("span");
        span.set_content("text").unwrap();
        assert!(matches!(span.set_void(true), Err(HtmlError::InvalidState(_))));
        assert!(!span.is_void());

        let mut custom = HtmlElement::new("x-icon");
        custom.set_void(true).unwrap();
        assert_eq!(custom.render(), "<x-icon>");
        custom.set_void(false).unwrap();
        custom.set_content("ok").unwrap();
        assert_eq!(custom.render(), "<x-icon>ok</x-icon>");
    }

    #[test]
    fn test_children() {
        let mut table = HtmlElement::new("table");
        let row = table.spawn_child("tr").unwrap();
        row.spawn_child("td").unwrap().set_content("a").unwrap();
        row.spawn_child("td").unwrap().set_content("b").unwrap();

        let mut footer = HtmlElement::new("tr");
        footer.add_child(HtmlElement::new("td")).unwrap();
        table.add_children(vec![footer]).unwrap();

        assert!(table.has_children());
        assert_eq!(table.children().len(), 2);
        assert_eq!(
            table.render(),
            "<table><tr><td>a</td><td>b</td></tr><tr><td></td></tr></table>"
        );
        assert_eq!(
            table.render_children(),
            "<tr><td>a</td><td>b</td></tr><tr><td></td></tr>"
        );

        table.set_children(vec![HtmlElement::new("caption")]).unwrap();
        assert_eq!(table.render(), "<table><caption></caption></table>");

        table.remove_children();
        assert!(!table.has_children());
    }

    #[test]
    fn test_display() {
        let mut em = HtmlElement::new("em");
        em.set_content("hi").unwrap();
        assert_eq!(format!("{}", em), "<em>hi</em>");
    }

    fn attribute_value() -> impl Strategy<Value = AttributeValue> {
        prop_oneof![
            "[a-z0-9 ]{0,10}".prop_map(AttributeValue::Text),
            any::<i64>().prop_map(AttributeValue::Integer),
            Just(AttributeValue::Bare),
        ]
    }

    proptest! {
        #[test]
        fn prop_render_keeps_attribute_order(
            tag in "[a-z][a-z0-9]{0,7}",
            values in prop::collection::vec(attribute_value(), 0..6),
            content in "[a-zA-Z0-9 ]{0,20}",
        ) {
            prop_assume!(!is_void(&tag));

            let mut element = HtmlElement::new(&tag);
            let mut expected_attrs = String::new();
            let count = values.len();
            for (i, value) in values.into_iter().enumerate() {
                let key = format!("data-k{}", count - i);
                match &value {
                    AttributeValue::Bare => expected_attrs.push_str(&format!(" {}", key)),
                    other => expected_attrs.push_str(&format!(" {}=\"{}\"", key, other)),
                }
                element.add_attribute(&key, value).unwrap();
            }
            element.set_content(&content).unwrap();

            let expected = format!("<{}{}>{}</{}>", tag, expected_attrs, content, tag);
            prop_assert_eq!(element.render(), expected);
        }

        #[test]
        fn prop_void_never_closes(index in 0..crate::utilities::VOID_ELEMENTS.len(), xhtml in any::<bool>()) {
            let tag = crate::utilities::VOID_ELEMENTS[index];
            let mut element = HtmlElement::new(tag);
            element.set_xhtml(xhtml);

            prop_assert!(element.set_content("x").is_err());
            prop_assert!(element.spawn_child("span").is_err());
            let rendered = element.render();
            let closing = format!("</{}>", tag);
            prop_assert!(!rendered.contains(&closing));
        }

        #[test]
        fn prop_render_is_idempotent(
            contents in prop::collection::vec("[a-z ]{0,8}", 0..5),
            append in any::<bool>(),
        ) {
            let mut root = HtmlElement::new("section");
            root.set_content("root").unwrap();
            if append {
                root.set_append_content();
            }
            for content in &contents {
                root.spawn_child("p").unwrap().set_content(content).unwrap();
            }
            prop_assert_eq!(root.render(), root.render());
        }
    }
}
