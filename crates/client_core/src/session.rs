//! Session-scoped state: post list, draft form and modal gate.
//!
//! Every step here is synchronous. The two store calls happen between
//! [`PostSession::begin_submit`] and [`PostSession::finish_create`], and
//! before [`PostSession::apply_refresh`], so a front end can run them on
//! whatever executor it likes and feed the results back.

use shared::domain::Post;

use crate::{
    error::{CreateError, FetchError, ValidationError},
    form::{DraftField, NewPost, SubmissionForm},
    post_list::PostListState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    Invalid(ValidationError),
    InFlight,
}

#[derive(Debug, Clone, Default)]
pub struct PostSession {
    pub posts: PostListState,
    pub form: SubmissionForm,
    pub modal: ModalState,
    create_in_flight: bool,
}

impl PostSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.current()
    }

    /// Shows the form with an empty draft; leftovers from a cancelled attempt are dropped.
    ///
    /// While a create is outstanding the submitted draft is shown again
    /// instead, so its result still applies to the draft it came from.
    pub fn open_modal(&mut self) {
        self.modal.open();
        if !self.create_in_flight {
            self.form.reset();
        }
    }

    pub fn cancel_modal(&mut self) {
        self.modal.close();
    }

    /// Edits the draft. Ignored while that draft is being created.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        if !self.create_in_flight {
            self.form.set_field(field, value);
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.create_in_flight
    }

    /// Validates the draft and marks a create as outstanding.
    ///
    /// On rejection nothing is sent and the modal stays as it is.
    pub fn begin_submit(&mut self) -> Result<NewPost, SubmitRejected> {
        if self.create_in_flight {
            return Err(SubmitRejected::InFlight);
        }
        let post = self.form.check().map_err(SubmitRejected::Invalid)?;
        self.create_in_flight = true;
        Ok(post)
    }

    /// Applies the create result. Success closes the modal and clears the
    /// draft; the caller refreshes the list afterwards. Failure keeps both.
    pub fn finish_create(&mut self, result: Result<(), CreateError>) -> Result<(), CreateError> {
        self.create_in_flight = false;
        result?;
        self.modal.close();
        self.form.reset();
        Ok(())
    }

    /// Drops the in-flight marker without applying a result.
    pub fn abandon_create(&mut self) {
        self.create_in_flight = false;
    }

    pub fn apply_refresh(
        &mut self,
        result: Result<Vec<Post>, FetchError>,
    ) -> Result<usize, FetchError> {
        self.posts.apply_fetch(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(session: &mut PostSession, title: &str, body: &str, author: &str) {
        session.set_field(DraftField::Title, title);
        session.set_field(DraftField::Body, body);
        session.set_field(DraftField::Author, author);
    }

    #[test]
    fn reopening_after_cancel_shows_empty_draft() {
        let mut session = PostSession::new();
        session.open_modal();
        fill(&mut session, "Hello", "World", "Alice");
        session.cancel_modal();
        assert!(!session.modal.is_open());

        session.open_modal();
        assert!(session.modal.is_open());
        assert!(session.form.is_empty());
    }

    #[test]
    fn invalid_submit_keeps_modal_open_and_is_not_in_flight() {
        let mut session = PostSession::new();
        session.open_modal();
        fill(&mut session, "", "World", "Alice");

        let rejected = session.begin_submit().expect_err("invalid");
        assert!(matches!(rejected, SubmitRejected::Invalid(_)));
        assert!(session.modal.is_open());
        assert!(!session.is_submitting());
        assert_eq!(session.form.error(DraftField::Title), Some("Title is required"));
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut session = PostSession::new();
        session.open_modal();
        fill(&mut session, "Hello", "World", "Alice");

        session.begin_submit().expect("first");
        assert_eq!(session.begin_submit(), Err(SubmitRejected::InFlight));

        session.finish_create(Ok(())).expect("created");
        assert!(!session.is_submitting());
    }

    #[test]
    fn failed_create_keeps_draft_and_modal() {
        let mut session = PostSession::new();
        session.open_modal();
        fill(&mut session, "Hello", "World", "Alice");
        session.begin_submit().expect("valid");

        let err = CreateError::Transport("connection refused".to_string());
        assert_eq!(session.finish_create(Err(err.clone())), Err(err));
        assert!(session.modal.is_open());
        assert_eq!(session.form.value(DraftField::Title), "Hello");
        assert_eq!(session.form.value(DraftField::Author), "Alice");
        assert!(!session.is_submitting());
    }

    #[test]
    fn successful_create_closes_modal_and_clears_draft() {
        let mut session = PostSession::new();
        session.open_modal();
        fill(&mut session, "Hello", "World", "Alice");
        session.begin_submit().expect("valid");

        session.finish_create(Ok(())).expect("created");
        assert!(!session.modal.is_open());
        assert!(session.form.is_empty());
    }

    #[test]
    fn reopening_during_create_shows_submitted_draft() {
        let mut session = PostSession::new();
        session.open_modal();
        fill(&mut session, "Hello", "World", "Alice");
        session.begin_submit().expect("valid");
        session.cancel_modal();

        session.open_modal();
        assert!(session.modal.is_open());
        assert_eq!(session.form.value(DraftField::Title), "Hello");

        session.finish_create(Ok(())).expect("created");
        session.open_modal();
        assert!(session.form.is_empty());
    }

    #[test]
    fn abandoned_create_allows_resubmit() {
        let mut session = PostSession::new();
        fill(&mut session, "Hello", "World", "Alice");
        session.begin_submit().expect("valid");
        session.abandon_create();
        assert!(session.begin_submit().is_ok());
    }
}
