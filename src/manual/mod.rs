//! Transactions entered by the user.
//!
//! This module contains the `ManualTransaction` record, its database
//! functions, the "Add Expense" page and the endpoints for creating,
//! deleting and editing the notes of manual transactions.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod note_endpoint;

pub use core::{
    ManualTransaction, create_manual_transaction,
    create_manual_transaction_table, delete_manual_transaction, get_all_manual_transactions,
    get_manual_transaction, update_manual_transaction_note,
};
pub use create_endpoint::create_manual_transaction_endpoint;
pub use create_page::get_create_manual_transaction_page;
pub use delete_endpoint::delete_manual_transaction_endpoint;
pub use note_endpoint::update_manual_note_endpoint;
