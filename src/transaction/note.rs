//! Shared pieces of the note update endpoints for emails and manual transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    AppState, alert::Alert, error::NOTE_UPDATE_FAILED_MSG, timezone::get_local_offset,
    transaction::{Transaction, view::transaction_row},
};

/// The message shown after a note is saved.
pub const NOTE_UPDATED_MSG: &str = "Note updated successfully!";

/// The state needed to update a note and re-render its row.
#[derive(Debug, Clone)]
pub struct NoteState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for NoteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form submitted by the edit-note dialog.
#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub note: String,
}

/// The offset for rendering the updated row.
///
/// Endpoints resolve this before writing the note, so that a bad timezone
/// setting fails the request without changing anything.
pub(crate) fn note_local_offset(local_timezone: &str) -> Result<UtcOffset, Response> {
    get_local_offset(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", local_timezone);
        note_update_failed(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// The updated row plus an out-of-band success alert.
pub(crate) fn note_updated_response(transaction: &Transaction, local_offset: UtcOffset) -> Response {
    html! {
        (transaction_row(transaction, local_offset))
        (Alert::SuccessSimple { message: NOTE_UPDATED_MSG.to_owned() }.into_oob_html())
    }
    .into_response()
}

/// An error alert for a note that could not be saved.
pub(crate) fn note_update_failed(status_code: StatusCode) -> Response {
    (
        status_code,
        Alert::ErrorSimple {
            message: NOTE_UPDATE_FAILED_MSG.to_owned(),
        }
        .into_html(),
    )
        .into_response()
}
