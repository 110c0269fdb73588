//! HTML views for posts, the admin index and the post form.
//!
//! Every view builds an [`HtmlElement`] tree and renders it. Post previews
//! and bodies are trusted markup written through the admin form and are
//! emitted as is; titles and form values are escaped.

use blog_html::{escape_html_text, ExcerptExtractor, HtmlElement, HtmlError};

use crate::form::{FieldKind, FormField, PostForm};
use crate::post::Post;
use crate::routes::Route;
use crate::Result;

/// The public index: one article per post with an excerpt of its preview
pub fn render_post_list(posts: &[Post], excerpt_length: usize) -> Result<String> {
    let mut section = HtmlElement::new("section");
    section.add_class("posts")?;

    if posts.is_empty() {
        section
            .spawn_child("p")?
            .add_class("empty")?
            .set_content("No posts yet.")?;
    }

    for post in posts {
        let article = section.spawn_child("article")?;
        article.add_class("post")?;

        article
            .spawn_child("h2")?
            .spawn_child("a")?
            .add_attribute("href", Route::Post(post.slug.clone()).path())?
            .set_content(&escape_html_text(&post.title))?;
        article
            .spawn_child("p")?
            .add_class("meta")?
            .set_content(&post.written_on_string())?;
        article
            .spawn_child("div")?
            .add_class("preview")?
            .set_content(&preview_excerpt(post, excerpt_length)?)?;
    }

    Ok(section.render())
}

/// Excerpt of the preview, or the whole preview when it is too deeply nested
fn preview_excerpt(post: &Post, excerpt_length: usize) -> Result<String> {
    match ExcerptExtractor::with_markup(&post.preview).get_excerpt(excerpt_length) {
        Ok(excerpt) => Ok(excerpt),
        Err(HtmlError::Processing(reason)) => {
            log::warn!("No excerpt for post {}: {}", post.slug, reason);
            Ok(post.preview.clone())
        }
        Err(e) => Err(e.into()),
    }
}

/// A single post page
pub fn render_post(post: &Post) -> Result<String> {
    let mut article = HtmlElement::new("article");
    article
        .add_class("post")?
        .add_attribute("data-slug", post.slug.as_str())?;

    article
        .spawn_child("h1")?
        .set_content(&escape_html_text(&post.title))?;
    article.spawn_child("p")?.add_class("meta")?.set_content(&format!(
        "Written on {} &middot; {} views",
        post.written_on_string(),
        post.views
    ))?;
    article
        .spawn_child("div")?
        .add_class("body")?
        .set_content(&post.body)?;

    Ok(article.render())
}

/// Admin overview: a table of posts with edit links
pub fn render_admin_index(posts: &[Post]) -> Result<String> {
    let mut container = HtmlElement::new("div");
    container.add_class("admin")?;

    container
        .spawn_child("a")?
        .add_attribute("href", Route::AdminAdd.path())?
        .add_class("btn")?
        .add_class("btn-primary")?
        .set_content("Add post")?;

    let table = container.spawn_child("table")?;
    table.add_class("table")?;

    let head = table.spawn_child("thead")?.spawn_child("tr")?;
    for heading in ["Title", "Slug", "Written On", "Views", ""] {
        head.spawn_child("th")?.set_content(heading)?;
    }

    let body = table.spawn_child("tbody")?;
    for post in posts {
        let row = body.spawn_child("tr")?;
        row.spawn_child("td")?
            .set_content(&escape_html_text(&post.title))?;
        row.spawn_child("td")?
            .set_content(&escape_html_text(&post.slug))?;
        row.spawn_child("td")?
            .set_content(&post.written_on_string())?;
        row.spawn_child("td")?.set_content(&post.views.to_string())?;

        let actions = row.spawn_child("td")?;
        if let Some(id) = post.id {
            actions
                .spawn_child("a")?
                .add_attribute("href", Route::AdminEdit(id).path())?
                .set_content("Edit")?;
        }
    }

    Ok(container.render())
}

/// The add/edit form, with validation messages under their fields
pub fn render_form(form: &PostForm, action: &str) -> Result<String> {
    let mut element = HtmlElement::new("form");
    element.add_attributes([("method", "post"), ("action", action), ("name", "post")])?;

    for field in form.fields() {
        match field.kind {
            FieldKind::Hidden => {
                element.add_child(control(field)?)?;
            }
            FieldKind::Submit => {
                let mut submit = control(field)?;
                if field.value.is_empty() {
                    submit.add_attribute("value", "Submit")?;
                }
                element.add_child(submit)?;
            }
            FieldKind::Text | FieldKind::Textarea => {
                let group = element.spawn_child("div")?;
                group.add_class("form-group")?;
                if let Some(label) = field.label {
                    group
                        .spawn_child("label")?
                        .add_attribute("for", field.name)?
                        .set_content(label)?;
                }
                group.add_child(control(field)?)?;

                if let Some(messages) = form.messages().get(field.name) {
                    let list = group.spawn_child("ul")?;
                    list.add_class("errors")?;
                    for message in messages {
                        list.spawn_child("li")?
                            .set_content(&escape_html_text(message))?;
                    }
                }
            }
        }
    }

    Ok(element.render())
}

/// The input or textarea for a field
fn control(field: &FormField) -> Result<HtmlElement> {
    let mut control = match field.kind {
        FieldKind::Textarea => {
            let mut textarea = HtmlElement::new("textarea");
            textarea.set_content(&escape_html_text(&field.value))?;
            textarea
        }
        kind => {
            let input_type = match kind {
                FieldKind::Hidden => "hidden",
                FieldKind::Submit => "submit",
                _ => "text",
            };
            let mut input = HtmlElement::new("input");
            input.add_attribute("type", input_type)?;
            input
        }
    };

    control.add_attribute("name", field.name)?;
    if field.kind != FieldKind::Hidden && field.kind != FieldKind::Submit {
        control.add_attribute("id", field.name)?;
    }
    control.add_attributes(field.attributes.iter().map(|(k, v)| (*k, v.clone())))?;
    if field.kind != FieldKind::Textarea && !field.value.is_empty() {
        control.add_attribute("value", field.value.as_str())?;
    }

    Ok(control)
}
