//! Backend commands queued from UI to backend worker.

use client_core::NewPost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    RefreshPosts,
    CreatePost(NewPost),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RefreshPosts => "refresh_posts",
            BackendCommand::CreatePost(_) => "create_post",
        }
    }
}
