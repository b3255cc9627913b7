//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The message shown when a note could not be saved.
pub const NOTE_UPDATE_FAILED_MSG: &str = "Failed to update note. Please try again.";
/// The message shown when a manual transaction could not be deleted.
pub const DELETE_FAILED_MSG: &str = "Failed to delete transaction. Please try again.";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email address is empty or is missing the '@' character.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmailAddress(String),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(OffsetDateTime),

    /// A negative amount was used to create a manual transaction.
    ///
    /// The direction of money is given by the transaction type, so amounts
    /// are always non-negative.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(f64),

    /// An amount that is NaN or infinite was used to create a manual transaction.
    #[error("{0} is not a finite number")]
    NonFiniteAmount(f64),

    /// The date-time string submitted in a form could not be parsed.
    #[error("could not parse the date-time \"{0}\"")]
    InvalidDateTime(String),

    /// The JSON file of emails to import could not be parsed.
    #[error("could not parse the emails to import: {0}")]
    InvalidEmailImport(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update the note of an email that does not exist
    #[error("tried to update an email that is not in the database")]
    UpdateMissingEmail,

    /// Tried to update the note of a manual transaction that does not exist
    #[error("tried to update a manual transaction that is not in the database")]
    UpdateMissingManualTransaction,

    /// Tried to delete a manual transaction that does not exist
    #[error("tried to delete a manual transaction that is not in the database")]
    DeleteMissingManualTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction date".to_owned(),
                    details: format!(
                        "{} is in the future, which is not allowed. Change the date to today or earlier.",
                        date.date()
                    ),
                },
            ),
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!(
                        "{amount} is negative. Enter the amount as a positive number and \
                        choose credit or debit as the type."
                    ),
                },
            ),
            Error::NonFiniteAmount(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: "The amount must be a number, e.g. 250 or 99.50.".to_owned(),
                },
            ),
            Error::InvalidDateTime(text) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction date".to_owned(),
                    details: format!("Could not understand the date and time \"{text}\"."),
                },
            ),
            Error::UpdateMissingEmail | Error::UpdateMissingManualTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: NOTE_UPDATE_FAILED_MSG.to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingManualTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: DELETE_FAILED_MSG.to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
