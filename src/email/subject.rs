//! Extracts the amount and direction of a transaction from the subject line of
//! a bank notification email, e.g. "INR 1,234.50 debited from A/c XX1234".

use std::sync::OnceLock;

use regex::Regex;

use crate::transaction::TransactionType;

fn amount_pattern() -> &'static Regex {
    static AMOUNT_PATTERN: OnceLock<Regex> = OnceLock::new();

    AMOUNT_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:INR|₹)\s?([0-9,]+\.[0-9]{2}|[0-9]+)")
            .expect("amount pattern should be a valid regex")
    })
}

fn credit_pattern() -> &'static Regex {
    static CREDIT_PATTERN: OnceLock<Regex> = OnceLock::new();

    CREDIT_PATTERN
        .get_or_init(|| Regex::new(r"(?i)credit").expect("credit pattern should be a valid regex"))
}

fn debit_pattern() -> &'static Regex {
    static DEBIT_PATTERN: OnceLock<Regex> = OnceLock::new();

    DEBIT_PATTERN
        .get_or_init(|| Regex::new(r"(?i)debit").expect("debit pattern should be a valid regex"))
}

/// Get the first rupee amount in `subject`, or zero if there is none.
///
/// The amount must follow "INR" (any case) or "₹", optionally separated by one
/// whitespace character. Thousands separators are ignored.
pub fn extract_amount_from_subject(subject: &str) -> f64 {
    amount_pattern()
        .captures(subject)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().replace(',', "").parse().ok())
        .unwrap_or(0.0)
}

/// Classify `subject` as a credit or a debit.
///
/// Credit is checked first, so a subject mentioning both is a credit.
pub fn type_from_subject(subject: &str) -> TransactionType {
    if credit_pattern().is_match(subject) {
        TransactionType::Credited
    } else if debit_pattern().is_match(subject) {
        TransactionType::Debited
    } else {
        TransactionType::Unknown
    }
}
