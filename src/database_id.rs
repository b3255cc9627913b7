//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of an email-origin record.
pub type EmailId = DatabaseId;
/// The ID of a manually entered transaction.
pub type ManualTransactionId = DatabaseId;
