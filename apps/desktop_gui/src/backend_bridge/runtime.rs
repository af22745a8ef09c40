//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, HttpPostStore, PostStore};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store: Arc<dyn PostStore> = match HttpPostStore::new(&settings) {
                Ok(store) => Arc::new(store),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("could not build HTTP client: {err:#}"),
                    )));
                    tracing::error!("failed to build post store: {err:#}");
                    return;
                }
            };
            tracing::info!(server_url = %settings.server_url, "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                if !handle_command(store.as_ref(), cmd, &ui_tx).await {
                    tracing::debug!("ui event receiver gone; stopping backend worker");
                    break;
                }
            }
        });
    });
}

/// Runs one command against the store and reports the result to the UI.
/// Returns false once the UI side has gone away.
pub async fn handle_command<S>(store: &S, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) -> bool
where
    S: PostStore + ?Sized,
{
    match cmd {
        BackendCommand::RefreshPosts => deliver(ui_tx, list_event(store).await),
        BackendCommand::CreatePost(post) => {
            match store.create_post(&post.title, &post.body, &post.author).await {
                Ok(()) => {
                    if !deliver_create_result(ui_tx, UiEvent::PostCreated) {
                        return false;
                    }
                    deliver(ui_tx, list_event(store).await)
                }
                Err(err) => {
                    tracing::warn!("Error creating post: {err}");
                    deliver_create_result(ui_tx, UiEvent::CreateFailed(err))
                }
            }
        }
    }
}

async fn list_event<S>(store: &S) -> UiEvent
where
    S: PostStore + ?Sized,
{
    match store.list_posts().await {
        Ok(posts) => UiEvent::PostsLoaded(posts),
        Err(err) => {
            tracing::warn!("Error fetching posts: {err}");
            UiEvent::PostsFailed(err)
        }
    }
}

/// Create results clear the UI's in-flight marker, so they wait for queue
/// space instead of being dropped.
fn deliver_create_result(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    ui_tx.send(event).is_ok()
}

fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!("ui event queue full; dropping backend result");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use client_core::{CreateError, FetchError};
    use crossbeam_channel::bounded;
    use shared::domain::{Post, PostId, Timestamp};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        posts: Mutex<Vec<Post>>,
        reject_create: bool,
    }

    #[async_trait]
    impl PostStore for FakeStore {
        async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
            Ok(self.posts.lock().expect("posts lock").clone())
        }

        async fn create_post(
            &self,
            title: &str,
            body: &str,
            author: &str,
        ) -> Result<(), CreateError> {
            if self.reject_create {
                return Err(CreateError::Transport("connection refused".to_string()));
            }
            let mut posts = self.posts.lock().expect("posts lock");
            let id = posts.len() as i64 + 1;
            posts.insert(
                0,
                Post {
                    id: PostId(id),
                    title: title.to_string(),
                    body: body.to_string(),
                    author: author.to_string(),
                    timestamp: Timestamp(id),
                },
            );
            Ok(())
        }
    }

    fn hello() -> BackendCommand {
        BackendCommand::CreatePost(client_core::NewPost {
            title: "Hello".to_string(),
            body: "World".to_string(),
            author: "Alice".to_string(),
        })
    }

    #[tokio::test]
    async fn create_reports_success_then_fresh_listing() {
        let store = FakeStore::default();
        let (ui_tx, ui_rx) = bounded(8);

        assert!(handle_command(&store, hello(), &ui_tx).await);

        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::PostCreated)));
        match ui_rx.try_recv() {
            Ok(UiEvent::PostsLoaded(posts)) => {
                assert_eq!(posts.len(), 1);
                assert_eq!(posts[0].title, "Hello");
            }
            other => panic!("expected listing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_create_skips_the_listing() {
        let store = FakeStore {
            reject_create: true,
            ..FakeStore::default()
        };
        let (ui_tx, ui_rx) = bounded(8);

        assert!(handle_command(&store, hello(), &ui_tx).await);

        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::CreateFailed(CreateError::Transport(_)))));
        assert!(ui_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn create_result_waits_for_a_full_ui_queue() {
        let store = FakeStore::default();
        let (ui_tx, ui_rx) = bounded(1);
        ui_tx
            .try_send(UiEvent::Info("busy".to_string()))
            .expect("fill queue");

        let reader = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            let mut received = Vec::new();
            while let Ok(event) = ui_rx.recv() {
                received.push(event);
            }
            received
        });

        assert!(handle_command(&store, hello(), &ui_tx).await);
        drop(ui_tx);

        let received = reader.join().expect("reader thread");
        assert!(matches!(received.first(), Some(UiEvent::Info(_))));
        assert!(received.iter().any(|event| matches!(event, UiEvent::PostCreated)));
    }

    #[tokio::test]
    async fn closed_ui_discards_results() {
        let store = FakeStore::default();
        let (ui_tx, ui_rx) = bounded(8);
        drop(ui_rx);

        assert!(!handle_command(&store, BackendCommand::RefreshPosts, &ui_tx).await);
    }
}
