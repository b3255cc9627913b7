//! Defines the email-origin record and its database queries.
//!
//! Amounts and transaction types are never stored for emails, they are derived
//! from the subject line each time the email is displayed.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::EmailId};

// ============================================================================
// MODELS
// ============================================================================

/// A bank notification email stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub id: EmailId,
    /// The subject line, which holds the amount and the transaction type.
    pub subject: String,
    /// Who sent the email, may be empty.
    pub sender: String,
    /// When the email was received.
    pub date: OffsetDateTime,
    /// The user's note, empty if none has been added.
    pub note: String,
    /// Whether the user has seen the email in the inbox.
    pub read: bool,
}

/// An email that has not been saved yet.
///
/// This is also the shape of each entry in an email import file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewEmail {
    pub subject: String,
    #[serde(default, alias = "from")]
    pub sender: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub read: bool,
}

impl NewEmail {
    /// Create an unread email with no sender and no note.
    pub fn new(subject: &str, date: OffsetDateTime) -> Self {
        Self {
            subject: subject.to_owned(),
            sender: String::new(),
            date,
            note: String::new(),
            read: false,
        }
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the email table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_email_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS email (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject TEXT NOT NULL,
                sender TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                is_read INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_email_date ON email(date);",
        (),
    )?;

    Ok(())
}

/// Insert a new email into the database.
///
/// The date is stored in UTC so that dates sort correctly as text.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn create_email(email: &NewEmail, connection: &Connection) -> Result<Email, Error> {
    connection
        .prepare(
            "INSERT INTO email (subject, sender, date, note, is_read)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, subject, sender, date, note, is_read",
        )?
        .query_row(
            params![
                email.subject,
                email.sender,
                email.date.to_offset(UtcOffset::UTC),
                email.note,
                email.read,
            ],
            map_email_row,
        )
        .map_err(Error::from)
}

/// Retrieve an email by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid email,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_email(id: EmailId, connection: &Connection) -> Result<Email, Error> {
    connection
        .prepare("SELECT id, subject, sender, date, note, is_read FROM email WHERE id = :id")?
        .query_row(&[(":id", &id)], map_email_row)
        .map_err(Error::from)
}

/// Get every email, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_emails(connection: &Connection) -> Result<Vec<Email>, Error> {
    connection
        .prepare(
            "SELECT id, subject, sender, date, note, is_read FROM email
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_email_row)?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Get the number of emails the user has not marked as read.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_unread_emails(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM email WHERE is_read = 0;", [], |row| {
            row.get(0)
        })
        .map_err(Error::from)
}

type RowsAffected = usize;

/// Replace the note of the email with `id`.
///
/// Returns the number of rows changed, which is zero if the email does not exist.
pub fn update_email_note(
    id: EmailId,
    note: &str,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("UPDATE email SET note = ?1 WHERE id = ?2", params![note, id])
        .map_err(Error::from)
}

/// Mark the email with `id` as read.
///
/// Returns the number of rows changed, which is zero if the email does not exist.
pub fn mark_email_read(id: EmailId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("UPDATE email SET is_read = 1 WHERE id = ?1", params![id])
        .map_err(Error::from)
}

/// Map a database row to an [Email].
pub fn map_email_row(row: &Row) -> Result<Email, rusqlite::Error> {
    Ok(Email {
        id: row.get(0)?,
        subject: row.get(1)?,
        sender: row.get(2)?,
        date: row.get(3)?,
        note: row.get(4)?,
        read: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
