use super::*;
use shared::domain::{PostId, Timestamp};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CreateCall {
    title: String,
    body: String,
    author: String,
}

#[derive(Default)]
struct RecordingStore {
    posts: Mutex<Vec<Post>>,
    creates: Mutex<Vec<CreateCall>>,
    list_calls: Mutex<usize>,
    fail_list: Mutex<bool>,
    fail_create: Mutex<Option<CreateError>>,
    tear_down_on_call: Mutex<Option<SessionToken>>,
}

impl RecordingStore {
    fn with_posts(posts: Vec<Post>) -> Arc<Self> {
        let store = Self::default();
        *store.posts.lock().expect("posts") = posts;
        Arc::new(store)
    }

    fn set_fail_list(&self, fail: bool) {
        *self.fail_list.lock().expect("fail_list") = fail;
    }

    fn set_fail_create(&self, err: Option<CreateError>) {
        *self.fail_create.lock().expect("fail_create") = err;
    }

    fn tear_down_during_calls(&self, token: SessionToken) {
        *self.tear_down_on_call.lock().expect("token") = Some(token);
    }

    fn list_calls(&self) -> usize {
        *self.list_calls.lock().expect("list_calls")
    }

    fn creates(&self) -> Vec<CreateCall> {
        self.creates.lock().expect("creates").clone()
    }

    fn maybe_tear_down(&self) {
        if let Some(token) = self.tear_down_on_call.lock().expect("token").as_ref() {
            token.tear_down();
        }
    }
}

#[async_trait]
impl PostStore for RecordingStore {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        *self.list_calls.lock().expect("list_calls") += 1;
        self.maybe_tear_down();
        if *self.fail_list.lock().expect("fail_list") {
            return Err(FetchError::Transport("connection refused".to_string()));
        }
        Ok(self.posts.lock().expect("posts").clone())
    }

    async fn create_post(&self, title: &str, body: &str, author: &str) -> Result<(), CreateError> {
        self.creates.lock().expect("creates").push(CreateCall {
            title: title.to_string(),
            body: body.to_string(),
            author: author.to_string(),
        });
        self.maybe_tear_down();
        if let Some(err) = self.fail_create.lock().expect("fail_create").clone() {
            return Err(err);
        }

        let mut posts = self.posts.lock().expect("posts");
        let next_id = posts.iter().map(|post| post.id.0).max().unwrap_or(0) + 1;
        posts.insert(0, post(next_id, title, body, author));
        Ok(())
    }
}

fn post(id: i64, title: &str, body: &str, author: &str) -> Post {
    Post {
        id: PostId(id),
        title: title.to_string(),
        body: body.to_string(),
        author: author.to_string(),
        timestamp: Timestamp(1_700_000_000_000_000_000 + id),
    }
}

fn fill(
    controller: &mut PostFlowController<RecordingStore>,
    title: &str,
    body: &str,
    author: &str,
) {
    controller.set_field(DraftField::Title, title);
    controller.set_field(DraftField::Body, body);
    controller.set_field(DraftField::Author, author);
}

#[tokio::test]
async fn start_populates_list_in_store_order() {
    let store = RecordingStore::with_posts(vec![post(2, "b", "b", "b"), post(1, "a", "a", "a")]);
    let mut controller = PostFlowController::new(store.clone());

    assert_eq!(controller.start().await, RefreshOutcome::Refreshed { count: 2 });

    let ids: Vec<i64> = controller.session().posts().iter().map(|p| p.id.0).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(store.list_calls(), 1);
    assert!(controller.session().posts.last_refreshed().is_some());
}

#[tokio::test]
async fn failed_initial_load_leaves_empty_list_and_reports() {
    let store = RecordingStore::with_posts(vec![post(1, "a", "a", "a")]);
    store.set_fail_list(true);
    let mut controller = PostFlowController::new(store.clone());
    let mut events = controller.subscribe_events();

    let outcome = controller.start().await;
    assert!(matches!(outcome, RefreshOutcome::Failed(FetchError::Transport(_))));
    assert!(controller.session().posts.is_empty());
    assert!(controller.session().posts.last_refreshed().is_none());

    match events.try_recv().expect("diagnostic event") {
        ClientEvent::Diagnostic(message) => assert!(message.starts_with("Error fetching posts")),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn failed_refresh_keeps_previous_cache() {
    let store = RecordingStore::with_posts(vec![post(2, "b", "b", "b"), post(1, "a", "a", "a")]);
    let mut controller = PostFlowController::new(store.clone());
    controller.start().await;
    let before = controller.session().posts.clone();

    store.set_fail_list(true);
    *store.posts.lock().expect("posts") = vec![post(9, "z", "z", "z")];
    let outcome = controller.refresh().await;

    assert!(matches!(outcome, RefreshOutcome::Failed(_)));
    assert_eq!(controller.session().posts(), before.current());
    assert_eq!(
        controller.session().posts.last_refreshed(),
        before.last_refreshed()
    );
}

#[tokio::test]
async fn valid_submit_creates_once_then_refreshes() {
    let store = RecordingStore::with_posts(Vec::new());
    let mut controller = PostFlowController::new(store.clone());
    controller.start().await;

    controller.open_modal();
    fill(&mut controller, "Hello", "World", "Alice");
    let outcome = controller.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Created {
            refresh: RefreshOutcome::Refreshed { count: 1 }
        }
    );
    assert_eq!(
        store.creates(),
        vec![CreateCall {
            title: "Hello".to_string(),
            body: "World".to_string(),
            author: "Alice".to_string(),
        }]
    );
    assert_eq!(store.list_calls(), 2);

    let session = controller.session();
    assert!(!session.modal.is_open());
    assert!(session.form.is_empty());
    assert!(session
        .posts()
        .iter()
        .any(|p| p.title == "Hello" && p.body == "World" && p.author == "Alice"));
}

#[tokio::test]
async fn blank_title_blocks_store_call() {
    let store = RecordingStore::with_posts(Vec::new());
    let mut controller = PostFlowController::new(store.clone());
    controller.start().await;

    controller.open_modal();
    fill(&mut controller, "", "World", "Alice");
    let outcome = controller.submit().await;

    let err = match outcome {
        SubmitOutcome::Invalid(err) => err,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert_eq!(err.fields.len(), 1);
    assert_eq!(err.message_for(DraftField::Title), Some("Title is required"));
    assert!(store.creates().is_empty());
    assert_eq!(store.list_calls(), 1);

    let form = &controller.session().form;
    assert_eq!(form.error(DraftField::Title), Some("Title is required"));
    assert_eq!(form.error(DraftField::Body), None);
    assert_eq!(form.error(DraftField::Author), None);
    assert!(controller.session().modal.is_open());
}

#[tokio::test]
async fn failed_create_keeps_draft_and_modal_without_refresh() {
    let store = RecordingStore::with_posts(Vec::new());
    store.set_fail_create(Some(CreateError::Transport("timed out".to_string())));
    let mut controller = PostFlowController::new(store.clone());
    controller.start().await;
    let mut events = controller.subscribe_events();

    controller.open_modal();
    fill(&mut controller, "Hello", "World", "Alice");
    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(CreateError::Transport(_))));
    assert_eq!(store.list_calls(), 1);
    let session = controller.session();
    assert!(session.modal.is_open());
    assert_eq!(session.form.value(DraftField::Title), "Hello");
    assert_eq!(session.form.value(DraftField::Body), "World");
    assert_eq!(session.form.value(DraftField::Author), "Alice");
    assert!(!session.is_submitting());
    assert!(matches!(
        events.try_recv().expect("event"),
        ClientEvent::Diagnostic(_)
    ));

    store.set_fail_create(None);
    let retry = controller.submit().await;
    assert!(matches!(retry, SubmitOutcome::Created { .. }));
    assert_eq!(store.creates().len(), 2);
}

#[tokio::test]
async fn successful_submit_emits_created_then_refreshed() {
    let store = RecordingStore::with_posts(Vec::new());
    let mut controller = PostFlowController::new(store.clone());
    let mut events = controller.subscribe_events();

    controller.open_modal();
    fill(&mut controller, "Hello", "World", "Alice");
    controller.submit().await;

    assert!(matches!(events.try_recv().expect("created"), ClientEvent::PostCreated));
    assert!(matches!(
        events.try_recv().expect("refreshed"),
        ClientEvent::PostsRefreshed { count: 1 }
    ));
}

#[tokio::test]
async fn teardown_during_listing_discards_result() {
    let store = RecordingStore::with_posts(vec![post(1, "a", "a", "a")]);
    let mut controller = PostFlowController::new(store.clone());
    store.tear_down_during_calls(controller.session_token());

    assert_eq!(controller.start().await, RefreshOutcome::Discarded);
    assert!(controller.session().posts.is_empty());
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn teardown_during_create_discards_result() {
    let store = RecordingStore::with_posts(Vec::new());
    let mut controller = PostFlowController::new(store.clone());
    controller.open_modal();
    fill(&mut controller, "Hello", "World", "Alice");
    store.tear_down_during_calls(controller.session_token());

    assert_eq!(controller.submit().await, SubmitOutcome::Discarded);
    assert_eq!(store.creates().len(), 1);
    assert_eq!(store.list_calls(), 0);
    assert!(controller.session().modal.is_open());
    assert_eq!(controller.session().form.value(DraftField::Title), "Hello");
}

#[tokio::test]
async fn torn_down_session_makes_no_store_calls() {
    let store = RecordingStore::with_posts(Vec::new());
    let mut controller = PostFlowController::new(store.clone());
    controller.session_token().tear_down();

    assert_eq!(controller.refresh().await, RefreshOutcome::Discarded);
    controller.open_modal();
    fill(&mut controller, "Hello", "World", "Alice");
    assert_eq!(controller.submit().await, SubmitOutcome::Discarded);
    assert_eq!(store.list_calls(), 0);
    assert!(store.creates().is_empty());
}

#[tokio::test]
async fn missing_store_degrades_without_panicking() {
    let store: Arc<dyn PostStore> = Arc::new(MissingPostStore);
    let mut controller = PostFlowController::new(store);

    assert!(matches!(controller.start().await, RefreshOutcome::Failed(_)));
    controller.open_modal();
    controller.set_field(DraftField::Title, "Hello");
    controller.set_field(DraftField::Body, "World");
    controller.set_field(DraftField::Author, "Alice");
    assert!(matches!(controller.submit().await, SubmitOutcome::Failed(_)));
    assert!(controller.session().modal.is_open());
}
