//! Month, week and type filters for the transactions list, and the totals
//! shown above it.

use time::UtcOffset;

use crate::transaction::{
    models::{Transaction, TransactionType},
    week::{MonthToken, WeekWindow, weeks_in_month},
};

/// The filters selected on the transactions page.
///
/// A transaction must match every filter that is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub month: Option<MonthToken>,
    /// The week number within `month`, starting at 1. Ignored without a month.
    pub week: Option<u8>,
    pub kind: Option<TransactionType>,
}

/// The week part of a filter, looked up once per call to [apply].
#[derive(Debug, Clone, PartialEq, Eq)]
enum WeekSelection {
    Any,
    Window(WeekWindow),
    /// The month has no week with the selected number.
    Missing,
}

impl TransactionFilter {
    fn week_selection(&self) -> WeekSelection {
        let (Some(month), Some(week_number)) = (self.month, self.week) else {
            return WeekSelection::Any;
        };

        weeks_in_month(month)
            .into_iter()
            .find(|week| week.number == week_number)
            .map_or(WeekSelection::Missing, WeekSelection::Window)
    }

    /// Whether `transaction` passes every filter.
    ///
    /// Dates are compared as calendar dates at `local_offset`.
    fn matches(
        &self,
        transaction: &Transaction,
        local_offset: UtcOffset,
        week: &WeekSelection,
    ) -> bool {
        let local_date = transaction.date.to_offset(local_offset).date();

        if let Some(month) = self.month {
            if !month.contains(local_date) {
                return false;
            }
        }

        match week {
            WeekSelection::Any => {}
            WeekSelection::Window(window) if window.contains(local_date) => {}
            _ => return false,
        }

        self.kind.is_none_or(|kind| transaction.kind == kind)
    }
}

/// Keep the transactions that match `filter`, preserving their order.
pub fn apply(
    transactions: Vec<Transaction>,
    filter: &TransactionFilter,
    local_offset: UtcOffset,
) -> Vec<Transaction> {
    let week = filter.week_selection();
    if week == WeekSelection::Missing {
        return Vec::new();
    }

    transactions
        .into_iter()
        .filter(|transaction| filter.matches(transaction, local_offset, &week))
        .collect()
}

/// The sum of credits and debits in a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub credit: f64,
    pub debit: f64,
}

/// Add up the credited and debited amounts.
///
/// Transactions of unknown type count toward neither total.
pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions
        .iter()
        .fold(Totals::default(), |mut totals, transaction| {
            match transaction.kind {
                TransactionType::Credited => totals.credit += transaction.amount,
                TransactionType::Debited => totals.debit += transaction.amount,
                TransactionType::Unknown => {}
            }

            totals
        })
}
