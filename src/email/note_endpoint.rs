//! The endpoint for editing the note on an email-origin transaction.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    database_id::EmailId,
    email::core::{get_email, update_email_note},
    transaction::{
        NoteForm, NoteState, normalize_email, note_local_offset, note_update_failed,
        note_updated_response,
    },
};

/// Replace the note of an email and respond with its re-rendered row.
pub async fn update_email_note_endpoint(
    State(state): State<NoteState>,
    Path(email_id): Path<EmailId>,
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

    match update_email_note(email_id, form.note.trim(), &connection) {
        Ok(0) => {
            tracing::error!(
                "Could not update note of email {email_id}: update returned zero rows affected"
            );
            return Error::UpdateMissingEmail.into_alert_response();
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!("Could not update note of email {email_id}: {error}");
            return note_update_failed(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    match get_email(email_id, &connection) {
        Ok(email) => note_updated_response(&normalize_email(&email), local_offset),
        Err(error) => {
            tracing::error!("Could not get email {email_id} after updating its note: {error}");
            note_update_failed(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        email::{NewEmail, create_email, get_email},
        error::NOTE_UPDATE_FAILED_MSG,
        test_utils::{assert_valid_html, parse_html_fragment},
        transaction::{NOTE_UPDATED_MSG, NoteForm, NoteState},
    };

    use super::update_email_note_endpoint;

    fn get_state() -> NoteState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        NoteState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Asia/Kolkata".to_owned(),
        }
    }

    fn note_form(note: &str) -> Form<NoteForm> {
        Form(NoteForm {
            note: note.to_owned(),
        })
    }

    #[tokio::test]
    async fn updates_note_and_returns_row_with_alert() {
        let state = get_state();
        let email = {
            let conn = state.db_connection.lock().unwrap();
            create_email(
                &NewEmail::new("INR 80.00 debited", datetime!(2025-02-03 10:00 UTC)),
                &conn,
            )
            .unwrap()
        };

        let response =
            update_email_note_endpoint(State(state.clone()), Path(email.id), note_form(" Lunch "))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let row = html
            .select(&Selector::parse("li").unwrap())
            .next()
            .expect("no row in response");
        assert_eq!(row.value().attr("id"), Some(format!("email-{}", email.id).as_str()));
        let note = row
            .select(&Selector::parse("p.note").unwrap())
            .next()
            .expect("no note in row");
        assert_eq!(note.text().collect::<String>().trim(), "Lunch");

        let alert = html
            .select(&Selector::parse("#alert-container[hx-swap-oob]").unwrap())
            .next()
            .expect("no out-of-band alert");
        assert!(alert.text().collect::<String>().contains(NOTE_UPDATED_MSG));

        let conn = state.db_connection.lock().unwrap();
        assert_eq!(get_email(email.id, &conn).unwrap().note, "Lunch");
    }

    #[tokio::test]
    async fn invalid_timezone_leaves_note_unchanged() {
        let state = NoteState {
            local_timezone: "Middle/Earth".to_owned(),
            ..get_state()
        };
        let email = {
            let conn = state.db_connection.lock().unwrap();
            create_email(
                &NewEmail::new("INR 80.00 debited", datetime!(2025-02-03 10:00 UTC)),
                &conn,
            )
            .unwrap()
        };

        let response =
            update_email_note_endpoint(State(state.clone()), Path(email.id), note_form("Lunch"))
                .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let conn = state.db_connection.lock().unwrap();
        assert_eq!(get_email(email.id, &conn).unwrap().note, "");
    }

    #[tokio::test]
    async fn missing_email_returns_error_alert() {
        let state = get_state();

        let response = update_email_note_endpoint(State(state), Path(42), note_form("Lunch")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains(NOTE_UPDATE_FAILED_MSG));
    }
}
