//! Controllers and the application dispatcher.

use indexmap::IndexMap;

use crate::form::PostForm;
use crate::options::BlogOptions;
use crate::routes::Route;
use crate::service::PostService;
use crate::table::PostTable;
use crate::view;
use crate::Result;

/// An incoming request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get,
    /// Submitted form data
    Post(IndexMap<String, String>),
}

/// A controller result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Rendered page
    Html(String),
    /// Redirect to a path
    Redirect(String),
    /// 404
    NotFound,
}

/// Public pages
pub struct BlogController<'a, T: PostTable> {
    service: &'a PostService<T>,
    options: &'a BlogOptions,
}

impl<'a, T: PostTable> BlogController<'a, T> {
    pub fn new(service: &'a PostService<T>, options: &'a BlogOptions) -> Self {
        Self { service, options }
    }

    /// Latest posts with preview excerpts
    pub fn index(&self) -> Result<Response> {
        let posts = self.service.latest_posts(Some(self.options.latest_limit));
        let html = view::render_post_list(&posts, self.options.excerpt_length)?;
        Ok(Response::Html(html))
    }

    /// A single post by slug
    pub fn post(&self, slug: &str) -> Result<Response> {
        match self.service.post_by_slug(slug) {
            Some(post) => Ok(Response::Html(view::render_post(&post)?)),
            None => Ok(Response::NotFound),
        }
    }
}

/// Post management
pub struct AdminController<'a, T: PostTable> {
    service: &'a mut PostService<T>,
    options: &'a BlogOptions,
}

impl<'a, T: PostTable> AdminController<'a, T> {
    pub fn new(service: &'a mut PostService<T>, options: &'a BlogOptions) -> Self {
        Self { service, options }
    }

    /// Table of posts
    pub fn index(&self) -> Result<Response> {
        let posts = self.service.latest_posts(Some(self.options.admin_limit));
        Ok(Response::Html(view::render_admin_index(&posts)?))
    }

    /// Show the empty form, or create a post from submitted data
    pub fn add(&mut self, request: &Request) -> Result<Response> {
        let mut form = PostForm::new();
        self.handle_form(&mut form, request, None, "Add", &Route::AdminAdd.path())
    }

    /// Show the form for a post, or update it from submitted data
    pub fn edit(&mut self, id: u64, request: &Request) -> Result<Response> {
        let post = self.service.require_post(id)?;
        let mut form = PostForm::new();
        form.bind(&post);
        self.handle_form(&mut form, request, Some(id), "Edit", &Route::AdminEdit(id).path())
    }

    fn handle_form(
        &mut self,
        form: &mut PostForm,
        request: &Request,
        id: Option<u64>,
        label: &str,
        action: &str,
    ) -> Result<Response> {
        if let Request::Post(data) = request {
            // The route decides which post is saved, not the hidden field
            form.set_data(data).set_id(id);
            if form.is_valid() {
                self.service.save_post(form.object()?)?;
                return Ok(Response::Redirect(Route::Admin.path()));
            }
        }

        form.set_submit_label(label);
        Ok(Response::Html(view::render_form(form, action)?))
    }
}

/// The blog application: routes requests to the controllers
pub struct BlogApp<T: PostTable> {
    service: PostService<T>,
    options: BlogOptions,
}

impl<T: PostTable> BlogApp<T> {
    /// Create an app over the given table with default options
    pub fn new(table: T) -> Self {
        Self::with_options(table, BlogOptions::default())
    }

    /// Create an app with custom options
    pub fn with_options(table: T, options: BlogOptions) -> Self {
        Self {
            service: PostService::new(table),
            options,
        }
    }

    pub fn service(&self) -> &PostService<T> {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut PostService<T> {
        &mut self.service
    }

    pub fn options(&self) -> &BlogOptions {
        &self.options
    }

    /// Resolve `path` and run the matching action.
    ///
    /// Requests for a post page count as a view of that post.
    pub fn dispatch(&mut self, path: &str, request: &Request) -> Result<Response> {
        let Some(route) = Route::resolve(path) else {
            return Ok(Response::NotFound);
        };

        if let Route::Post(slug) = &route {
            self.service.increment_views_by_slug(slug)?;
        }

        match route {
            Route::Index => BlogController::new(&self.service, &self.options).index(),
            Route::Post(slug) => BlogController::new(&self.service, &self.options).post(&slug),
            Route::Admin => AdminController::new(&mut self.service, &self.options).index(),
            Route::AdminAdd => AdminController::new(&mut self.service, &self.options).add(request),
            Route::AdminEdit(id) => {
                AdminController::new(&mut self.service, &self.options).edit(id, request)
            }
        }
    }
}
