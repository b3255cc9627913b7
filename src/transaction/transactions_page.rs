//! Defines the route handler for the page that lists transactions from every source.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    AppState, Error,
    auth::UserID,
    email::get_all_emails,
    endpoints,
    manual::get_all_manual_transactions,
    navigation::get_nav_bar,
    timezone::get_local_offset,
};

use super::{
    filter::{TransactionFilter, apply, totals},
    merge::{available_months, merge_transactions},
    models::TransactionType,
    view::{TransactionsPageModel, transactions_view},
    week::{MAX_WEEKS_PER_MONTH, MonthToken},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The raw query parameters of the transactions page.
///
/// Every field is kept as a string so that a bad value can be dropped on its
/// own instead of rejecting the whole request.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub month: Option<String>,
    pub week: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Turn the query parameters into a filter.
///
/// Empty values mean "no filter". Values that cannot be parsed are logged
/// and treated as empty. A week without a month is dropped.
pub(crate) fn parse_filter(query: &TransactionsQuery) -> TransactionFilter {
    let month = non_empty(&query.month).and_then(|month| {
        month
            .parse::<MonthToken>()
            .inspect_err(|error| tracing::warn!("ignoring month filter: {error}"))
            .ok()
    });

    let week = non_empty(&query.week).and_then(|week| match week.parse::<u8>() {
        Ok(number) if (1..=MAX_WEEKS_PER_MONTH as u8).contains(&number) => Some(number),
        _ => {
            tracing::warn!("ignoring week filter \"{week}\"");
            None
        }
    });

    let kind = non_empty(&query.kind).and_then(|kind| {
        kind.parse::<TransactionType>()
            .inspect_err(|error| tracing::warn!("ignoring type filter: {error}"))
            .ok()
    });

    TransactionFilter {
        month,
        week: month.and(week),
        kind,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Render the page listing every transaction, filtered by the query parameters.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let local_offset = get_offset(&state.local_timezone)?;
    let filter = parse_filter(&query);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let emails = get_all_emails(&connection)
        .inspect_err(|error| tracing::error!("could not get emails: {error}"))?;
    let manual_transactions = get_all_manual_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get manual transactions: {error}"))?;
    let nav_bar = get_nav_bar(endpoints::TRANSACTIONS_VIEW, user_id, &connection)?;
    drop(connection);

    let merged = merge_transactions(&emails, &manual_transactions);
    let mut months = available_months(&merged, local_offset);

    if let Some(selected) = filter.month
        && !months.contains(&selected)
    {
        months.push(selected);
        months.sort_unstable_by(|a, b| b.cmp(a));
    }

    let transactions = apply(merged, &filter, local_offset);
    let totals = totals(&transactions);

    Ok(transactions_view(TransactionsPageModel {
        nav_bar,
        filter,
        months: &months,
        transactions: &transactions,
        totals,
        local_offset,
    })
    .into_response())
}

fn get_offset(local_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", local_timezone);
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })
}
