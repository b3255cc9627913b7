//! HTML rendering for the transactions page and its rows.

use maud::{Markup, html};
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DANGER_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, format_rupees,
    },
    navigation::NavBar,
};

use super::{
    filter::{Totals, TransactionFilter},
    models::{Transaction, TransactionSource, TransactionType},
    week::{MonthToken, weeks_in_month},
};

/// The max number of graphemes of a note to show in a row before truncating
/// and displaying ellipses.
const MAX_NOTE_GRAPHEMES: usize = 64;

const ROW_DATE_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[day] [month repr:short] [year], [hour repr:12]:[minute] [period case:lower]"
);

/// The message shown in place of an empty note.
pub(crate) const EMPTY_NOTE_TEXT: &str = "No note added";

/// Everything the transactions page shows.
pub(crate) struct TransactionsPageModel<'a> {
    pub nav_bar: NavBar,
    pub filter: TransactionFilter,
    /// The months offered in the month dropdown, newest first.
    pub months: &'a [MonthToken],
    /// The filtered transactions, newest first.
    pub transactions: &'a [Transaction],
    pub totals: Totals,
    pub local_offset: UtcOffset,
}

pub(crate) fn transactions_view(model: TransactionsPageModel) -> Markup {
    let content = html! {
        (model.nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl sm:text-3xl font-extrabold text-gray-900 dark:text-white mb-6 text-center"
            {
                "All Transactions"
            }

            div class="flex flex-col sm:flex-row flex-wrap justify-center items-center gap-3 sm:gap-4 mb-8"
            {
                (filter_form(&model.filter, model.months))
                (totals_view(model.totals))
            }

            (transaction_list(model.transactions, model.local_offset))
        }
    };

    base("Transactions", &content)
}

/// The month, week and type dropdowns.
///
/// The form is submitted with a GET request whenever a dropdown changes.
/// Changing the month clears the week, and the week dropdown is disabled
/// until a month is selected.
fn filter_form(filter: &TransactionFilter, months: &[MonthToken]) -> Markup {
    let weeks = filter.month.map(weeks_in_month).unwrap_or_default();

    html! {
        form
            id="transaction-filters"
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="flex flex-col sm:flex-row gap-3 sm:gap-4 w-full sm:w-auto"
        {
            select
                name="month"
                aria-label="Month"
                class=(FORM_SELECT_STYLE)
                onchange="this.form.elements.week.value = ''; this.form.submit()"
            {
                option value="" selected[filter.month.is_none()] { "All Months" }

                @for month in months {
                    option
                        value=(month.to_string())
                        selected[filter.month == Some(*month)]
                    {
                        (month.label())
                    }
                }
            }

            select
                name="week"
                aria-label="Week"
                class=(FORM_SELECT_STYLE)
                disabled[filter.month.is_none()]
                onchange="this.form.submit()"
            {
                option value="" selected[filter.week.is_none()] { "All Weeks" }

                @for week in &weeks {
                    option
                        value=(week.number)
                        selected[filter.week == Some(week.number)]
                    {
                        (week.label)
                    }
                }
            }

            select
                name="type"
                aria-label="Type"
                class=(FORM_SELECT_STYLE)
                onchange="this.form.submit()"
            {
                option value="" selected[filter.kind.is_none()] { "All Types" }

                @for kind in [TransactionType::Credited, TransactionType::Debited] {
                    option
                        value=(kind.as_str())
                        selected[filter.kind == Some(kind)]
                    {
                        (kind.label())
                    }
                }
            }

            noscript
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply" }
            }
        }
    }
}

pub(crate) fn totals_view(totals: Totals) -> Markup {
    html! {
        div
            id="totals"
            class="flex items-center gap-3 sm:gap-4 text-sm sm:text-base font-semibold text-gray-700 dark:text-gray-200"
        {
            span id="credit-total" class="text-green-600"
            {
                "Credit: " (format_rupees(totals.credit))
            }

            span id="debit-total" class="text-red-600"
            {
                "Debit: " (format_rupees(totals.debit))
            }
        }
    }
}

/// The list of transaction rows, or a message if there are none.
pub(crate) fn transaction_list(transactions: &[Transaction], local_offset: UtcOffset) -> Markup {
    html! {
        @if transactions.is_empty() {
            p
                id="no-transactions"
                class="text-lg text-gray-500 text-center py-6 bg-white dark:bg-gray-800 rounded-2xl shadow-md"
            {
                "No transactions available."
            }
        } @else {
            ul id="transaction-list" class="space-y-4"
            {
                @for transaction in transactions {
                    (transaction_row(transaction, local_offset))
                }
            }
        }
    }
}

fn type_text_style(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Credited => "text-green-600",
        TransactionType::Debited => "text-red-600",
        TransactionType::Unknown => "text-gray-600",
    }
}

fn row_border_style(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Credited => "border-l-green-500",
        TransactionType::Debited => "border-l-red-500",
        TransactionType::Unknown => "border-l-gray-500",
    }
}

/// The endpoint that updates the note of `transaction`.
pub(crate) fn note_endpoint(transaction: &Transaction) -> Option<String> {
    let id = transaction.id?;

    let endpoint = match transaction.source {
        TransactionSource::Email => endpoints::EMAIL_NOTE,
        TransactionSource::Manual => endpoints::MANUAL_NOTE,
    };

    Some(format_endpoint(endpoint, id))
}

fn truncate_note(note: &str) -> String {
    let graphemes: Vec<&str> = note.graphemes(true).collect();

    if graphemes.len() <= MAX_NOTE_GRAPHEMES {
        note.to_owned()
    } else {
        format!("{}…", graphemes[..MAX_NOTE_GRAPHEMES].concat())
    }
}

/// A single transaction with its edit-note dialog and, for manual
/// transactions, a delete button.
///
/// This is also the response to a successful note update, which swaps the
/// old row out with `outerHTML`.
pub(crate) fn transaction_row(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let local_date = transaction.date.to_offset(local_offset);
    let date_text = local_date
        .format(ROW_DATE_FORMAT)
        .unwrap_or_else(|_| local_date.date().to_string());
    let dialog_id = format!("note-dialog-{}", transaction.key);
    let row_style = format!(
        "bg-white dark:bg-gray-800 p-4 sm:p-5 rounded-2xl shadow-md border-l-4 {}",
        row_border_style(transaction.kind)
    );

    html! {
        li id=(transaction.key) data-source=(transaction.source.as_str()) class=(row_style)
        {
            div class="flex flex-col sm:flex-row sm:items-center sm:justify-between gap-3 sm:gap-4"
            {
                div class="space-y-1"
                {
                    p class="text-xs sm:text-sm text-gray-500" { (date_text) }

                    p class={"text-sm sm:text-base font-semibold capitalize " (type_text_style(transaction.kind))}
                    {
                        (transaction.kind.as_str())
                    }

                    p class="text-lg sm:text-xl font-bold text-gray-800 dark:text-gray-100"
                    {
                        (format_rupees(transaction.amount))
                    }
                }

                div class="flex flex-col sm:items-end gap-2 sm:gap-3"
                {
                    p
                        class="note text-xs sm:text-sm text-gray-600 dark:text-gray-300 italic max-w-xs sm:max-w-md"
                        title=(transaction.note)
                    {
                        @if transaction.note.is_empty() {
                            (EMPTY_NOTE_TEXT)
                        } @else {
                            (truncate_note(&transaction.note))
                        }
                    }

                    div class="flex gap-2"
                    {
                        @if let Some(endpoint) = note_endpoint(transaction) {
                            button
                                type="button"
                                class=(BUTTON_SECONDARY_STYLE)
                                title="Edit Note"
                                onclick={"document.getElementById('" (dialog_id) "').showModal()"}
                            {
                                "Edit Note"
                            }

                            (note_dialog(&dialog_id, &endpoint, &transaction.note))
                        }

                        @if let (true, Some(id)) = (transaction.is_deletable(), transaction.id) {
                            (delete_button(transaction, id))
                        }
                    }
                }
            }
        }
    }
}

fn note_dialog(dialog_id: &str, endpoint: &str, note: &str) -> Markup {
    html! {
        dialog
            id=(dialog_id)
            class="p-4 sm:p-6 rounded-2xl shadow-lg max-w-md w-full backdrop:bg-black/50"
        {
            form
                hx-put=(endpoint)
                hx-target="closest li"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
            {
                h2 class="text-lg sm:text-xl font-semibold text-gray-800 mb-4" { "Add/Edit Note" }

                textarea
                    name="note"
                    rows="4"
                    placeholder="Enter note"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (note)
                }

                div class="flex justify-end gap-2 sm:gap-3 mt-4"
                {
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        onclick="this.closest('dialog').close()"
                    {
                        "Cancel"
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Note" }
                }
            }
        }
    }
}

/// The text shown in the confirmation prompt before deleting `transaction`.
pub(crate) fn delete_confirmation_text(transaction: &Transaction) -> String {
    format!(
        "Are you sure you want to delete this transaction for {} ({})?",
        format_rupees(transaction.amount),
        transaction.kind
    )
}

fn delete_button(transaction: &Transaction, id: i64) -> Markup {
    html! {
        button
            type="button"
            class=(BUTTON_DANGER_STYLE)
            title="Delete Transaction"
            hx-delete=(format_endpoint(endpoints::MANUAL_TRANSACTION, id))
            hx-confirm=(delete_confirmation_text(transaction))
            hx-target="closest li"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            "Delete"
        }
    }
}

#[cfg(test)]
mod view_tests {
    use scraper::{Html, Selector};
    use time::{UtcOffset, macros::datetime};

    use crate::transaction::{Transaction, TransactionSource, TransactionType};

    use super::{
        EMPTY_NOTE_TEXT, MAX_NOTE_GRAPHEMES, delete_confirmation_text, transaction_list,
        transaction_row, truncate_note,
    };

    fn manual_transaction() -> Transaction {
        Transaction {
            key: "manual-4".to_owned(),
            id: Some(4),
            date: datetime!(2025-02-10 06:30:00 UTC),
            amount: 1234.5,
            note: String::new(),
            kind: TransactionType::Debited,
            source: TransactionSource::Manual,
        }
    }

    fn email_transaction() -> Transaction {
        Transaction {
            key: "email-9".to_owned(),
            id: Some(9),
            date: datetime!(2025-02-11 06:30:00 UTC),
            amount: 50.0,
            note: "Salary".to_owned(),
            kind: TransactionType::Credited,
            source: TransactionSource::Email,
        }
    }

    fn kolkata() -> UtcOffset {
        UtcOffset::from_hms(5, 30, 0).unwrap()
    }

    #[test]
    fn row_shows_local_date_type_amount_and_placeholder_note() {
        let html = Html::parse_fragment(
            &transaction_row(&manual_transaction(), kolkata()).into_string(),
        );
        let text = html.root_element().text().collect::<String>();

        assert!(text.contains("10 Feb 2025, 12:00 pm"), "got {text}");
        assert!(text.contains("debited"));
        assert!(text.contains("₹1234.50"));
        assert!(text.contains(EMPTY_NOTE_TEXT));
    }

    #[test]
    fn manual_row_has_delete_button() {
        let html = Html::parse_fragment(
            &transaction_row(&manual_transaction(), kolkata()).into_string(),
        );
        let selector = Selector::parse("button[hx-delete]").unwrap();

        let button = html.select(&selector).next().expect("no delete button");

        assert_eq!(button.value().attr("hx-delete"), Some("/api/manual/4"));
        assert_eq!(
            button.value().attr("hx-confirm"),
            Some("Are you sure you want to delete this transaction for ₹1234.50 (debited)?")
        );
    }

    #[test]
    fn email_row_has_no_delete_button() {
        let html = Html::parse_fragment(
            &transaction_row(&email_transaction(), kolkata()).into_string(),
        );
        let selector = Selector::parse("button[hx-delete]").unwrap();

        assert!(html.select(&selector).next().is_none());
    }

    #[test]
    fn note_dialog_targets_source_endpoint() {
        let html = Html::parse_fragment(
            &transaction_row(&email_transaction(), kolkata()).into_string(),
        );
        let form_selector = Selector::parse("dialog form").unwrap();
        let textarea_selector = Selector::parse("textarea[name=note]").unwrap();

        let form = html.select(&form_selector).next().expect("no note form");
        let textarea = form
            .select(&textarea_selector)
            .next()
            .expect("no note textarea");

        assert_eq!(form.value().attr("hx-put"), Some("/api/emails/9/note"));
        assert_eq!(textarea.text().collect::<String>(), "Salary");
    }

    #[test]
    fn empty_list_shows_message() {
        let html = Html::parse_fragment(&transaction_list(&[], kolkata()).into_string());
        let selector = Selector::parse("#no-transactions").unwrap();

        let message = html.select(&selector).next().expect("no empty message");

        assert_eq!(
            message.text().collect::<String>().trim(),
            "No transactions available."
        );
    }

    #[test]
    fn list_keeps_order_and_keys() {
        let transactions = [email_transaction(), manual_transaction()];
        let html = Html::parse_fragment(&transaction_list(&transactions, kolkata()).into_string());
        let selector = Selector::parse("#transaction-list > li").unwrap();

        let ids: Vec<_> = html
            .select(&selector)
            .filter_map(|li| li.value().attr("id"))
            .collect();

        assert_eq!(ids, ["email-9", "manual-4"]);
    }

    #[test]
    fn confirmation_text_uses_type() {
        assert_eq!(
            delete_confirmation_text(&manual_transaction()),
            "Are you sure you want to delete this transaction for ₹1234.50 (debited)?"
        );
    }

    #[test]
    fn long_notes_are_truncated() {
        let long_note = "é".repeat(MAX_NOTE_GRAPHEMES + 10);

        let got = truncate_note(&long_note);

        assert_eq!(got.chars().count(), MAX_NOTE_GRAPHEMES + 1);
        assert!(got.ends_with('…'));
        assert_eq!(truncate_note("short"), "short");
    }
}
