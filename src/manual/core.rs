//! Defines the manual transaction model and its database queries.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::ManualTransactionId, transaction::TransactionType};

// ============================================================================
// MODELS
// ============================================================================

/// A transaction entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualTransaction {
    pub id: ManualTransactionId,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// How much money moved, never negative.
    pub amount: f64,
    /// Whether the money was received or spent.
    pub kind: TransactionType,
    /// The user's note, empty if none has been added.
    pub note: String,
}

impl ManualTransaction {
    /// Create a new manual transaction.
    ///
    /// Shortcut for [ManualTransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        date: OffsetDateTime,
        kind: TransactionType,
    ) -> ManualTransactionBuilder {
        ManualTransactionBuilder {
            amount,
            date,
            kind,
            note: String::new(),
        }
    }
}

/// The fields of a manual transaction that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualTransactionBuilder {
    /// The amount of money. The direction is given by `kind`, so this must
    /// not be negative.
    pub amount: f64,
    /// When the transaction happened, must not be in the future.
    pub date: OffsetDateTime,
    pub kind: TransactionType,
    pub note: String,
}

impl ManualTransactionBuilder {
    /// Set the note for the transaction.
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the manual transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_manual_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS manual_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                kind TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_manual_transaction_date ON manual_transaction(date);",
        (),
    )?;

    Ok(())
}

/// Save a new manual transaction in the database.
///
/// The date is stored in UTC so that dates sort correctly as text.
///
/// # Errors
/// This function will return a:
/// - [Error::NonFiniteAmount] if the amount is NaN or infinite,
/// - [Error::NegativeAmount] if the amount is less than zero,
/// - or [Error::FutureDate] if the date is later than now,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_manual_transaction(
    builder: ManualTransactionBuilder,
    connection: &Connection,
) -> Result<ManualTransaction, Error> {
    if !builder.amount.is_finite() {
        return Err(Error::NonFiniteAmount(builder.amount));
    }

    if builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    if builder.date > OffsetDateTime::now_utc() {
        return Err(Error::FutureDate(builder.date));
    }

    connection
        .prepare(
            "INSERT INTO manual_transaction (date, amount, kind, note)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, amount, kind, note",
        )?
        .query_row(
            params![
                builder.date.to_offset(UtcOffset::UTC),
                builder.amount,
                builder.kind,
                builder.note,
            ],
            map_manual_transaction_row,
        )
        .map_err(Error::from)
}

/// Retrieve a manual transaction by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid manual transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_manual_transaction(
    id: ManualTransactionId,
    connection: &Connection,
) -> Result<ManualTransaction, Error> {
    connection
        .prepare("SELECT id, date, amount, kind, note FROM manual_transaction WHERE id = :id")?
        .query_row(&[(":id", &id)], map_manual_transaction_row)
        .map_err(Error::from)
}

/// Get every manual transaction, newest first.
pub fn get_all_manual_transactions(
    connection: &Connection,
) -> Result<Vec<ManualTransaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, amount, kind, note FROM manual_transaction
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_manual_transaction_row)?
        .map(|row| row.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

/// Replace the note of the manual transaction with `id`.
///
/// Returns the number of rows changed, which is zero if the transaction does
/// not exist.
pub fn update_manual_transaction_note(
    id: ManualTransactionId,
    note: &str,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE manual_transaction SET note = ?1 WHERE id = ?2",
            params![note, id],
        )
        .map_err(Error::from)
}

/// Delete the manual transaction with `id`.
///
/// Returns the number of rows deleted, which is zero if the transaction does
/// not exist.
pub fn delete_manual_transaction(
    id: ManualTransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM manual_transaction WHERE id = ?1", params![id])
        .map_err(Error::from)
}

/// Map a database row to a [ManualTransaction].
pub fn map_manual_transaction_row(row: &Row) -> Result<ManualTransaction, rusqlite::Error> {
    Ok(ManualTransaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        note: row.get(4)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        db::initialize,
        manual::{
            ManualTransaction, create_manual_transaction, delete_manual_transaction,
            get_all_manual_transactions, get_manual_transaction, update_manual_transaction_note,
        },
        transaction::TransactionType,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_and_get() {
        let conn = get_test_connection();
        let builder = ManualTransaction::build(
            250.0,
            datetime!(2025-02-10 18:30:00 UTC),
            TransactionType::Debited,
        )
        .note("Groceries");

        let created = create_manual_transaction(builder, &conn).unwrap();
        let got = get_manual_transaction(created.id, &conn).unwrap();

        assert_eq!(created, got);
        assert_eq!(got.amount, 250.0);
        assert_eq!(got.kind, TransactionType::Debited);
        assert_eq!(got.note, "Groceries");
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let conn = get_test_connection();
        let builder = ManualTransaction::build(
            -1.0,
            datetime!(2025-02-10 18:30:00 UTC),
            TransactionType::Debited,
        );

        let result = create_manual_transaction(builder, &conn);

        assert_eq!(result, Err(Error::NegativeAmount(-1.0)));
    }

    #[test]
    fn create_fails_on_non_finite_amount() {
        let conn = get_test_connection();

        for amount in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let builder = ManualTransaction::build(
                amount,
                datetime!(2025-02-10 18:30:00 UTC),
                TransactionType::Debited,
            );

            let result = create_manual_transaction(builder, &conn);

            assert!(
                matches!(result, Err(Error::NonFiniteAmount(_))),
                "want NonFiniteAmount for {amount}, got {result:?}"
            );
        }
        assert_eq!(get_all_manual_transactions(&conn).map(|all| all.len()), Ok(0));
    }

    #[test]
    fn create_fails_on_future_date() {
        let conn = get_test_connection();
        let tomorrow = OffsetDateTime::now_utc() + Duration::days(1);
        let builder = ManualTransaction::build(1.0, tomorrow, TransactionType::Credited);

        let result = create_manual_transaction(builder, &conn);

        assert_eq!(result, Err(Error::FutureDate(tomorrow)));
    }

    #[test]
    fn zero_amount_is_allowed() {
        let conn = get_test_connection();
        let builder = ManualTransaction::build(
            0.0,
            datetime!(2025-02-10 18:30:00 UTC),
            TransactionType::Credited,
        );

        assert!(create_manual_transaction(builder, &conn).is_ok());
    }

    #[test]
    fn get_all_is_newest_first() {
        let conn = get_test_connection();
        let older = create_manual_transaction(
            ManualTransaction::build(
                1.0,
                datetime!(2025-01-01 00:00:00 UTC),
                TransactionType::Debited,
            ),
            &conn,
        )
        .unwrap();
        let newer = create_manual_transaction(
            ManualTransaction::build(
                2.0,
                datetime!(2025-01-02 00:00:00 UTC),
                TransactionType::Debited,
            ),
            &conn,
        )
        .unwrap();

        let got = get_all_manual_transactions(&conn).unwrap();

        assert_eq!(got, vec![newer, older]);
    }

    #[test]
    fn update_note() {
        let conn = get_test_connection();
        let created = create_manual_transaction(
            ManualTransaction::build(
                1.0,
                datetime!(2025-01-01 00:00:00 UTC),
                TransactionType::Debited,
            ),
            &conn,
        )
        .unwrap();

        let rows_affected = update_manual_transaction_note(created.id, "Bus fare", &conn);

        assert_eq!(rows_affected, Ok(1));
        assert_eq!(
            get_manual_transaction(created.id, &conn).unwrap().note,
            "Bus fare"
        );
    }

    #[test]
    fn delete() {
        let conn = get_test_connection();
        let created = create_manual_transaction(
            ManualTransaction::build(
                1.0,
                datetime!(2025-01-01 00:00:00 UTC),
                TransactionType::Debited,
            ),
            &conn,
        )
        .unwrap();

        let rows_affected = delete_manual_transaction(created.id, &conn);

        assert_eq!(rows_affected, Ok(1));
        assert_eq!(
            get_manual_transaction(created.id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_changes_nothing() {
        let conn = get_test_connection();

        assert_eq!(delete_manual_transaction(99, &conn), Ok(0));
    }
}
