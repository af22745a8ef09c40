//! UI/backend events and error modeling for the desktop blog client.

use client_core::{CreateError, FetchError};
use shared::{domain::Post, error::ErrorCode};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    PostsLoaded(Vec<Post>),
    PostsFailed(FetchError),
    PostCreated,
    CreateFailed(CreateError),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FetchPosts,
    CreatePost,
    General,
}

impl UiErrorContext {
    fn prefix(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Backend worker startup failure",
            UiErrorContext::FetchPosts => "Error fetching posts",
            UiErrorContext::CreatePost => "Error creating post",
            UiErrorContext::General => "Error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("is required")
            || message_lower.contains("invalid")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
            || message_lower.contains("reach")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_fetch(err: &FetchError) -> Self {
        let category = match err {
            FetchError::Transport(_) => UiErrorCategory::Transport,
            FetchError::Status { .. } | FetchError::Decode(_) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context: UiErrorContext::FetchPosts,
            message: err.to_string(),
        }
    }

    pub fn from_create(err: &CreateError) -> Self {
        let category = match err {
            CreateError::Transport(_) => UiErrorCategory::Transport,
            CreateError::Rejected {
                code: ErrorCode::Validation,
                ..
            } => UiErrorCategory::Validation,
            CreateError::Rejected { .. } | CreateError::Status { .. } => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context: UiErrorContext::CreatePost,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Banner text shown to the user.
    pub fn display(&self) -> String {
        format!("{}: {}", self.context.prefix(), self.message)
    }
}
