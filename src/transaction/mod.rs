//! The unified transaction list.
//!
//! This module contains everything related to showing transactions from
//! every source together:
//! - The normalized `Transaction` model and merging of emails and manual entries
//! - Month and week windows, filters and totals
//! - The transactions page and the HTML for a single transaction row

mod filter;
mod merge;
mod models;
mod note;
mod transactions_page;
mod view;
mod week;

pub use filter::{Totals, TransactionFilter, apply, totals};
pub use merge::{available_months, merge_transactions, normalize_email, normalize_manual};
pub use models::{Transaction, TransactionSource, TransactionType};
pub use note::{NOTE_UPDATED_MSG, NoteForm, NoteState};
pub(crate) use note::{note_local_offset, note_update_failed, note_updated_response};
pub use transactions_page::get_transactions_page;
pub(crate) use view::transaction_list;
pub use week::MonthToken;
