//! Applies backend events to the UI-owned post session.

use client_core::PostSession;

use crate::controller::events::{UiError, UiEvent};

#[derive(Debug, Clone)]
pub enum StatusUpdate {
    Info(String),
    Error(UiError),
}

pub fn apply_ui_event(session: &mut PostSession, event: UiEvent) -> StatusUpdate {
    match event {
        UiEvent::Info(message) => StatusUpdate::Info(message),
        UiEvent::PostsLoaded(posts) => match session.apply_refresh(Ok(posts)) {
            Ok(1) => StatusUpdate::Info("Loaded 1 post".to_string()),
            Ok(count) => StatusUpdate::Info(format!("Loaded {count} posts")),
            Err(err) => StatusUpdate::Error(UiError::from_fetch(&err)),
        },
        UiEvent::PostsFailed(err) => {
            let ui_error = UiError::from_fetch(&err);
            let _ = session.apply_refresh(Err(err));
            StatusUpdate::Error(ui_error)
        }
        UiEvent::PostCreated => {
            let _ = session.finish_create(Ok(()));
            StatusUpdate::Info("Post created".to_string())
        }
        UiEvent::CreateFailed(err) => {
            let ui_error = UiError::from_create(&err);
            let _ = session.finish_create(Err(err));
            StatusUpdate::Error(ui_error)
        }
        UiEvent::Error(err) => StatusUpdate::Error(err),
    }
}
