//! Defines the endpoint for creating a manual transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{
    AppState, Error, endpoints,
    manual::core::{ManualTransaction, create_manual_transaction},
    timezone::get_local_offset,
    transaction::TransactionType,
};

/// The format of the value of a `datetime-local` input, e.g. "2025-02-03T14:30".
pub(crate) const DATETIME_LOCAL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

const DATETIME_LOCAL_WITH_SECONDS_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// The state needed to create a manual transaction.
#[derive(Debug, Clone)]
pub struct CreateManualState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateManualState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a manual transaction.
#[derive(Debug, Deserialize)]
pub struct ManualTransactionForm {
    /// The amount in rupees.
    pub amount: f64,
    /// The local date and time from a `datetime-local` input.
    pub date: String,
    pub kind: TransactionType,
    #[serde(default)]
    pub note: Option<String>,
}

/// Parse the value of a `datetime-local` input as a time at `local_offset`.
///
/// Seconds are optional.
pub(crate) fn parse_local_date_time(
    text: &str,
    local_offset: UtcOffset,
) -> Result<OffsetDateTime, Error> {
    PrimitiveDateTime::parse(text, DATETIME_LOCAL_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, DATETIME_LOCAL_WITH_SECONDS_FORMAT))
        .map(|date_time| date_time.assume_offset(local_offset))
        .map_err(|error| {
            tracing::warn!("could not parse date-time \"{text}\": {error}");
            Error::InvalidDateTime(text.to_owned())
        })
}

/// A route handler for creating a manual transaction, redirects to the
/// transactions page on success.
pub async fn create_manual_transaction_endpoint(
    State(state): State<CreateManualState>,
    Form(form): Form<ManualTransactionForm>,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let date = match parse_local_date_time(&form.date, local_offset) {
        Ok(date) => date,
        Err(error) => return error.into_alert_response(),
    };

    let transaction = ManualTransaction::build(form.amount, date, form.kind)
        .note(form.note.as_deref().unwrap_or_default().trim());

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_manual_transaction(transaction, &connection) {
        Ok(created) => {
            tracing::info!("created manual transaction {}", created.id);
        }
        Err(error) => {
            tracing::error!("could not create manual transaction: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
