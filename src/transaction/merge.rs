//! Combines email and manual records into one list of [Transaction]s.

use std::collections::BTreeSet;

use time::UtcOffset;

use crate::{
    email::{Email, extract_amount_from_subject, type_from_subject},
    manual::ManualTransaction,
    transaction::{
        models::{Transaction, TransactionSource},
        week::MonthToken,
    },
};

/// Convert an email into a transaction.
///
/// The amount and type are read from the subject line.
pub fn normalize_email(email: &Email) -> Transaction {
    Transaction {
        key: format!("email-{}", email.id),
        id: Some(email.id),
        date: email.date,
        amount: extract_amount_from_subject(&email.subject),
        note: email.note.clone(),
        kind: type_from_subject(&email.subject),
        source: TransactionSource::Email,
    }
}

/// Convert a manual record into a transaction.
pub fn normalize_manual(manual: &ManualTransaction) -> Transaction {
    Transaction {
        key: format!("manual-{}", manual.id),
        id: Some(manual.id),
        date: manual.date,
        amount: manual.amount,
        note: manual.note.clone(),
        kind: manual.kind,
        source: TransactionSource::Manual,
    }
}

/// Normalize both lists and sort the result newest first.
///
/// The sort is stable, so transactions with the same date keep emails before
/// manual records and otherwise keep their source order.
pub fn merge_transactions(emails: &[Email], manual: &[ManualTransaction]) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = emails
        .iter()
        .map(normalize_email)
        .chain(manual.iter().map(normalize_manual))
        .collect();

    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    transactions
}

/// The distinct months that `transactions` fall in, newest first.
///
/// Months are taken from the local calendar date at `local_offset`.
pub fn available_months(transactions: &[Transaction], local_offset: UtcOffset) -> Vec<MonthToken> {
    let months: BTreeSet<MonthToken> = transactions
        .iter()
        .map(|transaction| MonthToken::from_date(transaction.date.to_offset(local_offset).date()))
        .collect();

    months.into_iter().rev().collect()
}
