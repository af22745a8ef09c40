use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::domain::Post;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod form;
pub mod post_list;
pub mod session;
pub mod transport;

pub use config::{load_client_settings, ClientSettings};
pub use error::{CreateError, FetchError, FieldError, ValidationError};
pub use form::{validate_draft, DraftField, FieldState, NewPost, SubmissionForm};
pub use post_list::PostListState;
pub use session::{ModalState, PostSession, SubmitRejected};
pub use transport::HttpPostStore;

/// The remote service of record for posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Returns every post in store order, or nothing at all.
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError>;
    /// Creates a post. The assigned id and timestamp only show up in a later listing.
    async fn create_post(&self, title: &str, body: &str, author: &str) -> Result<(), CreateError>;
}

#[async_trait]
impl<T> PostStore for Arc<T>
where
    T: PostStore + ?Sized,
{
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        (**self).list_posts().await
    }

    async fn create_post(&self, title: &str, body: &str, author: &str) -> Result<(), CreateError> {
        (**self).create_post(title, body, author).await
    }
}

pub struct MissingPostStore;

#[async_trait]
impl PostStore for MissingPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        Err(FetchError::Transport("post store is not configured".to_string()))
    }

    async fn create_post(
        &self,
        _title: &str,
        _body: &str,
        _author: &str,
    ) -> Result<(), CreateError> {
        Err(CreateError::Transport("post store is not configured".to_string()))
    }
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    PostsRefreshed { count: usize },
    PostCreated,
    Diagnostic(String),
}

/// Liveness flag shared between a controller and whoever owns its view.
///
/// Once torn down, results of store calls that are still outstanding are
/// dropped instead of being applied.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(Arc<AtomicBool>);

impl SessionToken {
    pub fn tear_down(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        !self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed { count: usize },
    Failed(FetchError),
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { refresh: RefreshOutcome },
    Invalid(ValidationError),
    InFlight,
    Failed(CreateError),
    Discarded,
}

/// Sequences list, validate, create and refresh for one session.
pub struct PostFlowController<S: PostStore + ?Sized> {
    store: Arc<S>,
    session: PostSession,
    token: SessionToken,
    events: broadcast::Sender<ClientEvent>,
}

impl<S: PostStore + ?Sized> PostFlowController<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store,
            session: PostSession::new(),
            token: SessionToken::default(),
            events,
        }
    }

    pub fn session(&self) -> &PostSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PostSession {
        &mut self.session
    }

    pub fn session_token(&self) -> SessionToken {
        self.token.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn open_modal(&mut self) {
        self.session.open_modal();
    }

    pub fn cancel_modal(&mut self) {
        self.session.cancel_modal();
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.session.set_field(field, value);
    }

    /// Initial load. A failure leaves the list empty and is only reported.
    pub async fn start(&mut self) -> RefreshOutcome {
        info!("post flow starting");
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> RefreshOutcome {
        if !self.token.is_live() {
            return RefreshOutcome::Discarded;
        }

        let refreshed = self
            .session
            .posts
            .refresh(self.store.as_ref(), &self.token)
            .await;
        let Some(result) = refreshed else {
            debug!("session torn down during post listing; result discarded");
            return RefreshOutcome::Discarded;
        };

        match result {
            Ok(count) => {
                debug!(count, "post list refreshed");
                let _ = self.events.send(ClientEvent::PostsRefreshed { count });
                RefreshOutcome::Refreshed { count }
            }
            Err(err) => {
                warn!(error = %err, "error fetching posts");
                self.diagnostic(format!("Error fetching posts: {err}"));
                RefreshOutcome::Failed(err)
            }
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.token.is_live() {
            return SubmitOutcome::Discarded;
        }

        let post = match self.session.begin_submit() {
            Ok(post) => post,
            Err(SubmitRejected::Invalid(err)) => {
                debug!(%err, "submission blocked by validation");
                return SubmitOutcome::Invalid(err);
            }
            Err(SubmitRejected::InFlight) => return SubmitOutcome::InFlight,
        };

        let result = self
            .store
            .create_post(&post.title, &post.body, &post.author)
            .await;
        if !self.token.is_live() {
            debug!("session torn down during post creation; result discarded");
            self.session.abandon_create();
            return SubmitOutcome::Discarded;
        }

        if let Err(err) = self.session.finish_create(result) {
            warn!(error = %err, "error creating post");
            self.diagnostic(format!("Error creating post: {err}"));
            return SubmitOutcome::Failed(err);
        }

        info!(title = %post.title, author = %post.author, "post created");
        let _ = self.events.send(ClientEvent::PostCreated);
        let refresh = self.refresh().await;
        SubmitOutcome::Created { refresh }
    }

    fn diagnostic(&self, message: String) {
        let _ = self.events.send(ClientEvent::Diagnostic(message));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
