/*! This module sets up the application's database. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, email::create_email_table,
    manual::create_manual_transaction_table,
};

/// Create the tables for the user, emails and manual transactions.
///
/// Tables that already exist are left as they are, so this is safe to call
/// on every start-up.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_email_table(&transaction)?;
    create_manual_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
