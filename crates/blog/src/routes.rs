//! Route table for the blog.

/// A matched route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/blog`
    Index,
    /// `/blog/{slug}`
    Post(String),
    /// `/blog/admin`
    Admin,
    /// `/blog/admin/add`
    AdminAdd,
    /// `/blog/admin/edit/{id}`
    AdminEdit(u64),
}

impl Route {
    /// Match a request path. A single trailing slash is ignored.
    pub fn resolve(path: &str) -> Option<Route> {
        let path = path.strip_suffix('/').unwrap_or(path);
        let rest = path.strip_prefix("/blog")?;
        if rest.is_empty() {
            return Some(Route::Index);
        }

        let segments: Vec<&str> = rest.strip_prefix('/')?.split('/').collect();
        match segments.as_slice() {
            ["admin"] => Some(Route::Admin),
            ["admin", "add"] => Some(Route::AdminAdd),
            ["admin", "edit", id] => id.parse().ok().map(Route::AdminEdit),
            [slug] if !slug.is_empty() => Some(Route::Post(slug.to_string())),
            _ => None,
        }
    }

    /// The path this route is served at
    pub fn path(&self) -> String {
        match self {
            Route::Index => "/blog".to_string(),
            Route::Post(slug) => format!("/blog/{}", slug),
            Route::Admin => "/blog/admin".to_string(),
            Route::AdminAdd => "/blog/admin/add".to_string(),
            Route::AdminEdit(id) => format!("/blog/admin/edit/{}", id),
        }
    }
}
