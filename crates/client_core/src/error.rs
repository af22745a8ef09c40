//! Failure types of the post flow. None of them is fatal to a session.

use shared::error::ErrorCode;
use thiserror::Error;

use crate::form::DraftField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to reach post store: {0}")]
    Transport(String),
    #[error("post store answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed post listing: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("failed to reach post store: {0}")]
    Transport(String),
    #[error("post store rejected the post ({code:?}): {message}")]
    Rejected { code: ErrorCode, message: String },
    #[error("post store answered {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: DraftField,
    pub message: String,
}

impl FieldError {
    pub fn required(field: DraftField) -> Self {
        Self {
            field,
            message: format!("{} is required", field.label()),
        }
    }
}

/// One entry per blank required field, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", joined_messages(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn message_for(&self, field: DraftField) -> Option<&str> {
        self.fields
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }
}

fn joined_messages(fields: &[FieldError]) -> String {
    let messages: Vec<&str> = fields.iter().map(|err| err.message.as_str()).collect();
    messages.join(", ")
}
