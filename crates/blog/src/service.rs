//! PostService - list, look up and save posts through a [`PostTable`].

use crate::post::Post;
use crate::table::{PostFilter, PostQuery, PostTable};
use crate::{BlogError, Result};

/// Post operations on top of a table gateway
#[derive(Debug, Clone)]
pub struct PostService<T: PostTable> {
    table: T,
}

impl<T: PostTable> PostService<T> {
    /// Create a service over the given table
    pub fn new(table: T) -> Self {
        Self { table }
    }

    /// Newest posts first. `None` or `Some(0)` means no limit.
    pub fn latest_posts(&self, limit: Option<usize>) -> Vec<Post> {
        let limit = limit.filter(|&n| n > 0);
        self.table.select(&PostQuery::latest(limit))
    }

    /// Find a post by its slug
    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        self.table.find(&PostFilter::Slug(slug))
    }

    /// Find a post by its id
    pub fn post_by_id(&self, id: u64) -> Option<Post> {
        self.table.find(&PostFilter::Id(id))
    }

    /// Insert a post without an id, update one with an id.
    ///
    /// Returns the stored post, with its id assigned.
    pub fn save_post(&mut self, mut post: Post) -> Result<Post> {
        match post.id {
            None => {
                let id = self.table.insert(post.clone())?;
                post.id = Some(id);
                log::debug!("Inserted post {} ({})", id, post.slug);
            }
            Some(id) => {
                self.table.update(&post)?;
                log::debug!("Updated post {} ({})", id, post.slug);
            }
        }
        Ok(post)
    }

    /// Count a view of the post with this slug. Unknown slugs are ignored.
    pub fn increment_views_by_slug(&mut self, slug: &str) -> Result<()> {
        let Some(mut post) = self.post_by_slug(slug) else {
            return Ok(());
        };

        post.views += 1;
        self.table.update(&post)?;
        log::debug!("Post {} now has {} views", slug, post.views);
        Ok(())
    }

    /// Like [`post_by_id`](Self::post_by_id) but fails when the post is missing
    pub fn require_post(&self, id: u64) -> Result<Post> {
        self.post_by_id(id)
            .ok_or_else(|| BlogError::NotFound(format!("Post with id {} cannot be found", id)))
    }

    /// Get the underlying table
    pub fn table(&self) -> &T {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InMemoryPostTable;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 4, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn service() -> PostService<InMemoryPostTable> {
        let mut service = PostService::new(InMemoryPostTable::new());
        for day in 1..=5 {
            let slug = format!("post-{}", day);
            service
                .save_post(Post::new(&slug, &format!("Post {}", day), at(day)))
                .unwrap();
        }
        service
    }

    #[test]
    fn test_latest_posts() {
        let service = service();
        let latest = service.latest_posts(Some(2));
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].slug, "post-5");
        assert_eq!(latest[1].slug, "post-4");

        assert_eq!(service.latest_posts(None).len(), 5);
        assert_eq!(service.latest_posts(Some(0)).len(), 5);
    }

    #[test]
    fn test_lookup() {
        let service = service();
        assert_eq!(service.post_by_slug("post-3").unwrap().id, Some(3));
        assert_eq!(service.post_by_id(1).unwrap().slug, "post-1");
        assert!(service.post_by_slug("nope").is_none());
        assert!(matches!(service.require_post(99), Err(BlogError::NotFound(_))));
    }

    #[test]
    fn test_save_post_upserts() {
        let mut service = service();
        let created = service
            .save_post(Post::new("fresh", "Fresh", at(20)))
            .unwrap();
        assert_eq!(created.id, Some(6));

        let mut edited = created.clone();
        edited.title = "Fresher".to_string();
        let saved = service.save_post(edited).unwrap();
        assert_eq!(saved.id, Some(6));
        assert_eq!(service.post_by_id(6).unwrap().title, "Fresher");
        assert_eq!(service.table().len(), 6);
    }

    #[test]
    fn test_save_unknown_id_fails() {
        let mut service = service();
        let ghost = Post {
            id: Some(100),
            ..Post::new("ghost", "Ghost", at(1))
        };
        assert!(matches!(service.save_post(ghost), Err(BlogError::NotFound(_))));
    }

    #[test]
    fn test_increment_views() {
        let mut service = service();
        service.increment_views_by_slug("post-2").unwrap();
        service.increment_views_by_slug("post-2").unwrap();
        service.increment_views_by_slug("missing").unwrap();
        assert_eq!(service.post_by_slug("post-2").unwrap().views, 2);
        assert_eq!(service.post_by_slug("post-1").unwrap().views, 0);
    }
}
