//! The endpoint for marking an email as read from the inbox.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, alert::Alert, database_id::EmailId, email::core::mark_email_read, endpoints,
};

/// The state needed to mark an email as read.
#[derive(Debug, Clone)]
pub struct MarkReadState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MarkReadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Where to send the client afterwards, e.g. the inbox with its month filter.
    redirect_url: Option<String>,
}

/// Mark an email as read and redirect the client back to the inbox.
pub async fn mark_email_read_endpoint(
    State(state): State<MarkReadState>,
    Path(email_id): Path<EmailId>,
    Query(query_params): Query<QueryParams>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match mark_email_read(email_id, &connection) {
        Ok(0) => {
            tracing::warn!("tried to mark missing email {email_id} as read");
            return (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not mark email as read".to_owned(),
                    details: "The email could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response();
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!("Could not mark email {email_id} as read: {error}");
            return error.into_alert_response();
        }
    }

    let redirect_url = query_params
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url)
        .unwrap_or_else(|| endpoints::INBOX_VIEW.to_owned());

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}

/// The path and query of `raw_url` if it stays on this site.
///
/// URLs with a scheme or authority, protocol-relative URLs (`//host`) and
/// anything not starting with '/' are rejected.
fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    let is_local = path_and_query.starts_with('/')
        && !path_and_query.starts_with("//")
        && !path_and_query.starts_with("/\\");

    is_local.then(|| path_and_query.to_owned())
}
