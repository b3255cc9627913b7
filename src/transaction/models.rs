//! The normalized transaction shape shared by both transaction sources.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::database_id::DatabaseId;

/// Whether money came in, went out, or could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money was received.
    Credited,
    /// Money was spent.
    Debited,
    /// The direction could not be determined, e.g. from an email subject.
    Unknown,
}

impl TransactionType {
    /// The value used in query strings, forms and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credited => "credited",
            Self::Debited => "debited",
            Self::Unknown => "unknown",
        }
    }

    /// The short label used in filter dropdowns.
    pub fn label(self) -> &'static str {
        match self {
            Self::Credited => "Credit",
            Self::Debited => "Debit",
            Self::Unknown => "Unknown",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string did not name a transaction type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a transaction type")]
pub struct ParseTransactionTypeError(String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credited" => Ok(Self::Credited),
            "debited" => Ok(Self::Debited),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseTransactionTypeError(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Where a transaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Inferred from a bank notification email.
    Email,
    /// Entered by the user.
    Manual,
}

impl TransactionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Manual => "manual",
        }
    }
}

/// A transaction from either source in a common shape.
///
/// Built at render time from email and manual records, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Identifies the transaction within one rendered list, e.g. "email-3".
    pub key: String,
    /// The ID of the origin record in its own table.
    pub id: Option<DatabaseId>,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// The amount of money, always non-negative.
    pub amount: f64,
    /// The user's note, empty if none has been added.
    pub note: String,
    pub kind: TransactionType,
    pub source: TransactionSource,
}

impl Transaction {
    /// Only manual transactions may be deleted.
    pub fn is_deletable(&self) -> bool {
        self.source == TransactionSource::Manual && self.id.is_some()
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use super::TransactionType;

    #[test]
    fn parses_own_string_representation() {
        for kind in [
            TransactionType::Credited,
            TransactionType::Debited,
            TransactionType::Unknown,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionType>(), Ok(kind));
        }
    }

    #[test]
    fn rejects_unknown_strings() {
        assert!("credit".parse::<TransactionType>().is_err());
        assert!("".parse::<TransactionType>().is_err());
    }

    #[test]
    fn parse_error_names_the_input() {
        let error = "credit".parse::<TransactionType>().unwrap_err();

        assert_eq!(error.to_string(), "\"credit\" is not a transaction type");
    }
}
