//! Bank notification emails.
//!
//! This module contains everything related to email-origin transactions:
//! - The `Email` record and its database functions
//! - Parsing amounts and transaction types from subject lines
//! - The inbox page and the endpoints for marking emails read and editing notes
//! - Importing emails from a JSON export

mod core;
mod import;
mod inbox_page;
mod note_endpoint;
mod read_endpoint;
mod subject;

pub use core::{
    Email, NewEmail, count_unread_emails, create_email, create_email_table, get_all_emails,
    get_email, mark_email_read, update_email_note,
};
pub use import::{import_emails, parse_email_import};
pub use inbox_page::get_inbox_page;
pub use note_endpoint::update_email_note_endpoint;
pub use read_endpoint::mark_email_read_endpoint;
pub use subject::{extract_amount_from_subject, type_from_subject};
