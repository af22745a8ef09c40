use serde::{Deserialize, Serialize};

/// Body of `POST /posts`. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub author: String,
}

pub const POSTS_ROUTE: &str = "/posts";
pub const HEALTH_ROUTE: &str = "/healthz";

/// Upper bound on request bodies accepted by the post store.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
