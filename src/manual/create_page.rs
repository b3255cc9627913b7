//! Defines the route handler for the "Add Expense" page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
    manual::create_endpoint::DATETIME_LOCAL_FORMAT,
    navigation::{NavBar, get_nav_bar},
    timezone::get_local_offset,
    transaction::TransactionType,
};

fn create_manual_transaction_view(nav_bar: NavBar, max_date_time: &str) -> Markup {
    let content = html! {
        (nav_bar.into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::MANUAL_TRANSACTIONS_API)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Add Expense" }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount (₹)" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date and time" }

                    input
                        name="date"
                        id="date"
                        type="datetime-local"
                        max=(max_date_time)
                        value=(max_date_time)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                    select name="kind" id="kind" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for kind in [TransactionType::Debited, TransactionType::Credited] {
                            option value=(kind.as_str()) { (kind.label()) }
                        }
                    }
                }

                div
                {
                    label for="note" class=(FORM_LABEL_STYLE) { "Note" }

                    textarea
                        name="note"
                        id="note"
                        rows="3"
                        placeholder="What was it for?"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {}
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator"
                    {
                        (loading_spinner())
                    }
                    " Add Expense"
                }
            }
        }
    };

    base("Add Expense", &content)
}

/// The state needed for the "Add Expense" page.
#[derive(Debug, Clone)]
pub struct CreateManualPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateManualPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for adding a manual transaction.
pub async fn get_create_manual_transaction_page(
    State(state): State<CreateManualPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let nav_bar = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_nav_bar(endpoints::NEW_MANUAL_TRANSACTION_VIEW, user_id, &connection)?
    };

    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let now = OffsetDateTime::now_utc().to_offset(local_offset);
    let max_date_time = now
        .format(DATETIME_LOCAL_FORMAT)
        .inspect_err(|error| tracing::error!("could not format {now}: {error}"))
        .unwrap_or_default();

    Ok(create_manual_transaction_view(nav_bar, &max_date_time).into_response())
}
