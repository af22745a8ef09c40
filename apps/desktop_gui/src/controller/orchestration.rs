//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{PostSession, SubmitRejected};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command for the backend worker. Returns whether it was queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            false
        }
    }
}

/// Validates the draft and hands it to the backend. Invalid drafts never leave the UI.
pub fn submit_draft(
    session: &mut PostSession,
    cmd_tx: &Sender<BackendCommand>,
    status: &mut String,
) {
    match session.begin_submit() {
        Ok(post) => {
            if dispatch_backend_command(cmd_tx, BackendCommand::CreatePost(post), status) {
                *status = "Submitting post...".to_string();
            } else {
                session.abandon_create();
            }
        }
        Err(SubmitRejected::Invalid(err)) => {
            tracing::debug!(%err, "submission blocked by validation");
        }
        Err(SubmitRejected::InFlight) => {
            *status = "A post is already being submitted".to_string();
        }
    }
}
