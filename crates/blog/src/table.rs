//! Table gateway for posts.
//!
//! [`PostTable`] is the seam between the service and whatever stores the
//! rows. [`InMemoryPostTable`] is the backend used by the application and
//! its tests.

use indexmap::IndexMap;

use crate::post::Post;
use crate::{BlogError, Result};

/// Row ordering for [`PostQuery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    /// Newest `written_on` first
    #[default]
    WrittenOnDesc,
    /// Oldest `written_on` first
    WrittenOnAsc,
}

/// A select over the post table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostQuery {
    pub order: PostOrder,
    pub limit: Option<usize>,
}

impl PostQuery {
    /// Newest posts first, optionally limited
    pub fn latest(limit: Option<usize>) -> Self {
        Self {
            order: PostOrder::WrittenOnDesc,
            limit,
        }
    }
}

/// Lookup of a single post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter<'a> {
    Id(u64),
    Slug(&'a str),
}

impl PostFilter<'_> {
    fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::Id(id) => post.id == Some(*id),
            PostFilter::Slug(slug) => post.slug == *slug,
        }
    }
}

/// Data access for the `post` table
pub trait PostTable {
    /// Select posts
    fn select(&self, query: &PostQuery) -> Vec<Post>;

    /// Find the first post matching the filter
    fn find(&self, filter: &PostFilter) -> Option<Post>;

    /// Insert a new post and return its id
    fn insert(&mut self, post: Post) -> Result<u64>;

    /// Update an existing post, matched by id
    fn update(&mut self, post: &Post) -> Result<()>;
}

/// Post table kept in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryPostTable {
    rows: IndexMap<u64, Post>,
    last_id: u64,
}

impl InMemoryPostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn ensure_unique_slug(&self, slug: &str, id: Option<u64>) -> Result<()> {
        let taken = self
            .rows
            .values()
            .any(|row| row.slug == slug && row.id != id);
        if taken {
            return Err(BlogError::DuplicateSlug(slug.to_string()));
        }
        Ok(())
    }
}

impl PostTable for InMemoryPostTable {
    fn select(&self, query: &PostQuery) -> Vec<Post> {
        let mut posts: Vec<Post> = self.rows.values().cloned().collect();

        // Ties on written_on fall back to insertion order
        match query.order {
            PostOrder::WrittenOnDesc => posts.sort_by(|a, b| {
                b.written_on
                    .cmp(&a.written_on)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            PostOrder::WrittenOnAsc => posts.sort_by(|a, b| {
                a.written_on
                    .cmp(&b.written_on)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }

        if let Some(limit) = query.limit {
            posts.truncate(limit);
        }
        posts
    }

    fn find(&self, filter: &PostFilter) -> Option<Post> {
        match filter {
            PostFilter::Id(id) => self.rows.get(id).cloned(),
            PostFilter::Slug(_) => self.rows.values().find(|row| filter.matches(row)).cloned(),
        }
    }

    fn insert(&mut self, mut post: Post) -> Result<u64> {
        self.ensure_unique_slug(&post.slug, None)?;

        let id = self.last_id + 1;
        post.id = Some(id);
        self.rows.insert(id, post);
        self.last_id = id;
        Ok(id)
    }

    fn update(&mut self, post: &Post) -> Result<()> {
        let id = post
            .id
            .ok_or_else(|| BlogError::NotFound("post without id".to_string()))?;
        if !self.rows.contains_key(&id) {
            return Err(BlogError::NotFound(format!("post with id {}", id)));
        }
        self.ensure_unique_slug(&post.slug, post.id)?;

        self.rows.insert(id, post.clone());
        Ok(())
    }
}
