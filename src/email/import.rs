//! Loading bank notification emails from a JSON export.
//!
//! The export is a JSON array of objects with a `subject`, an RFC 3339
//! `date` and optionally a `sender` (or `from`), a `note` and a `read` flag.

use rusqlite::Connection;

use crate::{
    Error,
    email::core::{Email, NewEmail, create_email},
};

/// Parse a JSON array of emails.
///
/// # Errors
/// Returns an [Error::InvalidEmailImport] if `json` is not an array of emails.
pub fn parse_email_import(json: &str) -> Result<Vec<NewEmail>, Error> {
    serde_json::from_str(json).map_err(|error| Error::InvalidEmailImport(error.to_string()))
}

/// Insert `emails` inside a single database transaction.
///
/// Either every email is inserted or none are.
///
/// # Errors
/// Returns an [Error::SqlError] if any insert fails.
pub fn import_emails(emails: &[NewEmail], connection: &mut Connection) -> Result<Vec<Email>, Error> {
    let tx = connection
        .transaction()
        .inspect_err(|error| tracing::error!("could not start transaction: {error}"))?;

    let imported = emails
        .iter()
        .map(|email| create_email(email, &tx))
        .collect::<Result<Vec<_>, _>>()?;

    tx.commit()
        .inspect_err(|error| tracing::error!("could not commit transaction: {error}"))?;

    tracing::info!("imported {} emails", imported.len());

    Ok(imported)
}
