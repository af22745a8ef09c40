//! Submission form state for a post that has not been created yet.

use crate::error::{FieldError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Body,
    Author,
}

impl DraftField {
    pub const ALL: [DraftField; 3] = [DraftField::Title, DraftField::Body, DraftField::Author];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Title => "Title",
            DraftField::Body => "Body",
            DraftField::Author => "Author",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Body => "body",
            DraftField::Author => "author",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub error: Option<String>,
}

/// Draft values that passed validation, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    title: FieldState,
    body: FieldState,
    author: FieldState,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the value as typed. Validation waits for the submit attempt.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.field_mut(field).value = value.into();
    }

    pub fn field(&self, field: DraftField) -> &FieldState {
        match field {
            DraftField::Title => &self.title,
            DraftField::Body => &self.body,
            DraftField::Author => &self.author,
        }
    }

    fn field_mut(&mut self, field: DraftField) -> &mut FieldState {
        match field {
            DraftField::Title => &mut self.title,
            DraftField::Body => &mut self.body,
            DraftField::Author => &mut self.author,
        }
    }

    /// Direct handle for text widgets that edit in place.
    pub fn value_mut(&mut self, field: DraftField) -> &mut String {
        &mut self.field_mut(field).value
    }

    pub fn value(&self, field: DraftField) -> &str {
        &self.field(field).value
    }

    pub fn error(&self, field: DraftField) -> Option<&str> {
        self.field(field).error.as_deref()
    }

    pub fn has_errors(&self) -> bool {
        DraftField::ALL
            .into_iter()
            .any(|field| self.field(field).error.is_some())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Records a "<Field> is required" error on every blank field and
    /// clears the others. Returns whether the draft may be submitted.
    pub fn validate(&mut self) -> bool {
        self.check().is_ok()
    }

    /// Same as [`SubmissionForm::validate`], handing back the validated post
    /// or the field errors that were recorded.
    pub fn check(&mut self) -> Result<NewPost, ValidationError> {
        let outcome = validate_draft(self);
        for field in DraftField::ALL {
            self.field_mut(field).error = None;
        }
        if let Err(err) = &outcome {
            for FieldError { field, message } in &err.fields {
                self.field_mut(*field).error = Some(message.clone());
            }
        }
        outcome
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Maps a draft to either the post to create or the list of blank fields.
pub fn validate_draft(form: &SubmissionForm) -> Result<NewPost, ValidationError> {
    let fields: Vec<FieldError> = DraftField::ALL
        .into_iter()
        .filter(|field| form.value(*field).trim().is_empty())
        .map(FieldError::required)
        .collect();

    if !fields.is_empty() {
        return Err(ValidationError { fields });
    }

    Ok(NewPost {
        title: form.title.value.clone(),
        body: form.body.value.clone(),
        author: form.author.value.clone(),
    })
}
