//! Client-side cache of the post collection.

use std::time::Instant;

use shared::domain::Post;

use crate::{error::FetchError, PostStore, SessionToken};

/// Posts as returned by the last successful listing, in store order.
#[derive(Debug, Clone, Default)]
pub struct PostListState {
    posts: Vec<Post>,
    last_refreshed: Option<Instant>,
}

impl PostListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn last_refreshed(&self) -> Option<Instant> {
        self.last_refreshed
    }

    /// Swaps in a full listing. There is no merge with the previous cache.
    pub fn replace(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.last_refreshed = Some(Instant::now());
    }

    /// Applies a listing result; a failure leaves the cache as it was.
    pub fn apply_fetch(
        &mut self,
        result: Result<Vec<Post>, FetchError>,
    ) -> Result<usize, FetchError> {
        let posts = result?;
        let count = posts.len();
        self.replace(posts);
        Ok(count)
    }

    /// Lists posts from the store and applies the result. Returns `None`,
    /// leaving the cache alone, when `token` was torn down during the call.
    pub async fn refresh<S>(
        &mut self,
        store: &S,
        token: &SessionToken,
    ) -> Option<Result<usize, FetchError>>
    where
        S: PostStore + ?Sized,
    {
        let result = store.list_posts().await;
        if !token.is_live() {
            return None;
        }
        Some(self.apply_fetch(result))
    }
}
