//! The endpoint for editing the note on a manual transaction.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    database_id::ManualTransactionId,
    manual::core::{get_manual_transaction, update_manual_transaction_note},
    transaction::{
        NoteForm, NoteState, normalize_manual, note_local_offset, note_update_failed,
        note_updated_response,
    },
};

/// Replace the note of a manual transaction and respond with its re-rendered row.
pub async fn update_manual_note_endpoint(
    State(state): State<NoteState>,
    Path(manual_id): Path<ManualTransactionId>,
    Form(form): Form<NoteForm>,
) -> Response {
    let local_offset = match note_local_offset(&state.local_timezone) {
        Ok(local_offset) => local_offset,
        Err(response) => return response,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return note_update_failed(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match update_manual_transaction_note(manual_id, form.note.trim(), &connection) {
        Ok(0) => {
            tracing::error!(
                "Could not update note of manual transaction {manual_id}: \
                update returned zero rows affected"
            );
            return Error::UpdateMissingManualTransaction.into_alert_response();
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!("Could not update note of manual transaction {manual_id}: {error}");
            return note_update_failed(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    match get_manual_transaction(manual_id, &connection) {
        Ok(manual) => note_updated_response(&normalize_manual(&manual), local_offset),
        Err(error) => {
            tracing::error!(
                "Could not get manual transaction {manual_id} after updating its note: {error}"
            );
            note_update_failed(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
