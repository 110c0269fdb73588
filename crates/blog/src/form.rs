//! PostForm - the add/edit form for posts and its input filter.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use blog_html::AttributeValue;

use crate::post::{Post, DATE_FORMAT};
use crate::{BlogError, Result};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("Invalid slug regex"));

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 64;

/// Kind of form control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Hidden,
    Text,
    Textarea,
    Submit,
}

/// A single form field
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub label: Option<&'static str>,
    pub attributes: Vec<(&'static str, AttributeValue)>,
    pub value: String,
}

impl FormField {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            label: None,
            attributes: Vec::new(),
            value: String::new(),
        }
    }

    fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn attribute(mut self, key: &'static str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }
}

/// Form for adding and editing posts.
///
/// Submitted data goes through [`set_data`](PostForm::set_data), then
/// [`is_valid`](PostForm::is_valid) filters and validates it. A valid form
/// yields the post through [`object`](PostForm::object).
#[derive(Debug, Clone)]
pub struct PostForm {
    fields: Vec<FormField>,
    messages: IndexMap<&'static str, Vec<String>>,
    object: Option<Post>,
}

impl PostForm {
    pub fn new() -> Self {
        let fields = vec![
            FormField::new("id", FieldKind::Hidden),
            // lower-only-or-numbers-1234
            FormField::new("slug", FieldKind::Text)
                .label("Slug")
                .attribute("class", "form-control"),
            FormField::new("written_on", FieldKind::Text)
                .label("Written On")
                .attribute("class", "form-control")
                .attribute("readonly", ()),
            FormField::new("title", FieldKind::Text)
                .label("Title")
                .attribute("class", "form-control"),
            FormField::new("preview", FieldKind::Textarea)
                .label("Preview")
                .attribute("class", "form-control"),
            FormField::new("body", FieldKind::Textarea)
                .label("Body")
                .attribute("class", "form-control")
                .attribute("rows", 20),
            FormField::new("views", FieldKind::Hidden).value("0"),
            FormField::new("submit", FieldKind::Submit)
                .attribute("class", "btn btn-default margin-top"),
        ];

        Self {
            fields,
            messages: IndexMap::new(),
            object: None,
        }
    }

    /// All fields in display order
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Current raw value of a field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    fn set_value(&mut self, name: &str, value: String) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value;
        }
    }

    /// Set the label of the submit button
    pub fn set_submit_label(&mut self, label: &str) -> &mut Self {
        self.set_value("submit", label.to_string());
        self
    }

    /// Set the hidden id field
    pub fn set_id(&mut self, id: Option<u64>) -> &mut Self {
        self.set_value("id", id.map(|id| id.to_string()).unwrap_or_default());
        self
    }

    /// Fill the fields from submitted data. Unknown keys are ignored.
    pub fn set_data(&mut self, data: &IndexMap<String, String>) -> &mut Self {
        for (name, value) in data {
            if name != "submit" {
                self.set_value(name, value.clone());
            }
        }
        self.messages.clear();
        self.object = None;
        self
    }

    /// Fill the fields from an existing post
    pub fn bind(&mut self, post: &Post) -> &mut Self {
        self.set_id(post.id);
        self.set_value("slug", post.slug.clone());
        self.set_value("written_on", post.written_on_string());
        self.set_value("title", post.title.clone());
        self.set_value("preview", post.preview.clone());
        self.set_value("body", post.body.clone());
        self.set_value("views", post.views.to_string());
        self.messages.clear();
        self.object = None;
        self
    }

    /// Filter and validate the current values.
    ///
    /// Filtered values replace the raw ones. On success the post is
    /// available from [`object`](Self::object).
    pub fn is_valid(&mut self) -> bool {
        self.messages.clear();
        self.object = None;

        let slug = self.value("slug").unwrap_or_default().trim().to_string();
        self.check_required("slug", &slug);
        if !slug.is_empty() {
            if !SLUG_PATTERN.is_match(&slug) {
                self.add_message(
                    "slug",
                    format!("The input does not match against pattern '{}'", SLUG_PATTERN.as_str()),
                );
            }
            self.check_length("slug", &slug);
        }

        let title = strip_tags(self.value("title").unwrap_or_default())
            .trim()
            .to_string();
        self.check_required("title", &title);
        if !title.is_empty() {
            self.check_length("title", &title);
        }

        let preview = self.value("preview").unwrap_or_default().to_string();
        self.check_required("preview", &preview);
        let body = self.value("body").unwrap_or_default().to_string();
        self.check_required("body", &body);

        let id = self.parse_optional::<u64>("id", "The input must be a positive integer");
        let views = self
            .parse_optional::<u64>("views", "The input must be a non-negative integer")
            .unwrap_or(0);
        let written_on = self.parse_written_on();

        self.set_value("slug", slug.clone());
        self.set_value("title", title.clone());

        if !self.messages.is_empty() {
            log::warn!("Post form rejected: {}", self.message_summary());
            return false;
        }

        self.object = Some(Post {
            id,
            slug,
            title,
            preview,
            body,
            written_on,
            views,
        });
        true
    }

    /// Validation messages per field, from the last [`is_valid`](Self::is_valid)
    pub fn messages(&self) -> &IndexMap<&'static str, Vec<String>> {
        &self.messages
    }

    /// The post built from valid data
    pub fn object(&self) -> Result<Post> {
        self.object.clone().ok_or_else(|| {
            if self.messages.is_empty() {
                BlogError::InvalidForm("form has not been validated".to_string())
            } else {
                BlogError::InvalidForm(self.message_summary())
            }
        })
    }

    fn add_message(&mut self, field: &'static str, message: String) {
        self.messages.entry(field).or_default().push(message);
    }

    fn check_required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add_message(field, "Value is required and can't be empty".to_string());
        }
    }

    fn check_length(&mut self, field: &'static str, value: &str) {
        let len = value.chars().count();
        if len < MIN_LENGTH {
            self.add_message(
                field,
                format!("The input is less than {} characters long", MIN_LENGTH),
            );
        } else if len > MAX_LENGTH {
            self.add_message(
                field,
                format!("The input is more than {} characters long", MAX_LENGTH),
            );
        }
    }

    fn parse_optional<N: std::str::FromStr>(
        &mut self,
        field: &'static str,
        message: &str,
    ) -> Option<N> {
        let raw = self.value(field).unwrap_or_default().trim().to_string();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<N>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.add_message(field, message.to_string());
                None
            }
        }
    }

    fn parse_written_on(&mut self) -> NaiveDateTime {
        let raw = self.value("written_on").unwrap_or_default().trim().to_string();
        if raw.is_empty() {
            return chrono::Local::now().naive_local();
        }
        match NaiveDateTime::parse_from_str(&raw, DATE_FORMAT) {
            Ok(written_on) => written_on,
            Err(_) => {
                self.add_message(
                    "written_on",
                    format!("The input does not fit the date format '{}'", DATE_FORMAT),
                );
                NaiveDateTime::default()
            }
        }
    }

    fn message_summary(&self) -> String {
        self.messages
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Default for PostForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove anything that looks like a tag
fn strip_tags(s: &str) -> String {
    TAG_PATTERN.replace_all(s, "").into_owned()
}
