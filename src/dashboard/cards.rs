//! Summary cards for the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{LINK_STYLE, format_rupees},
    transaction::{MonthToken, Totals},
};

const CARD_STYLE: &str = "flex flex-col gap-1 p-5 bg-white dark:bg-gray-800 rounded-2xl shadow-md";

/// The credit and debit totals for `month`, with a link to its transactions.
pub(super) fn month_totals_card(month: MonthToken, totals: Totals) -> Markup {
    let net = totals.credit - totals.debit;
    let net_style = if net < 0.0 {
        "text-red-600"
    } else {
        "text-green-600"
    };

    html! {
        section id="month-totals" class=(CARD_STYLE)
        {
            h3 class="text-lg font-semibold text-gray-900 dark:text-white" { (month.label()) }

            p id="month-credit" class="text-green-600 font-semibold"
            {
                "Credit: " (format_rupees(totals.credit))
            }

            p id="month-debit" class="text-red-600 font-semibold"
            {
                "Debit: " (format_rupees(totals.debit))
            }

            p id="month-net" class={"font-bold " (net_style)}
            {
                "Net: " (format_rupees(net))
            }

            a
                href={(endpoints::TRANSACTIONS_VIEW) "?month=" (month.to_string())}
                class={"text-sm " (LINK_STYLE)}
            {
                "View this month"
            }
        }
    }
}

/// The number of unread emails, with a link to the inbox.
pub(super) fn unread_card(unread_count: u32) -> Markup {
    html! {
        section id="unread-emails" class=(CARD_STYLE)
        {
            h3 class="text-lg font-semibold text-gray-900 dark:text-white" { "Inbox" }

            p class="text-3xl font-bold text-gray-800 dark:text-gray-100"
            {
                span id="unread-count" { (unread_count) }
            }

            p class="text-sm text-gray-500"
            {
                @if unread_count == 1 { "unread email" } @else { "unread emails" }
            }

            a href=(endpoints::INBOX_VIEW) class={"text-sm " (LINK_STYLE)} { "Open inbox" }
        }
    }
}
