//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::cards::{month_totals_card, unread_card},
    email::{count_unread_emails, get_all_emails},
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    manual::get_all_manual_transactions,
    navigation::{NavBar, get_nav_bar},
    timezone::get_local_offset,
    transaction::{
        MonthToken, Totals, Transaction, TransactionFilter, apply, merge_transactions, totals,
        transaction_list,
    },
};

/// How many of the newest transactions to show.
const LATEST_TRANSACTION_COUNT: usize = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

struct DashboardModel {
    nav_bar: NavBar,
    month: MonthToken,
    month_totals: Totals,
    unread_count: u32,
    latest: Vec<Transaction>,
    local_offset: UtcOffset,
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let month = MonthToken::from_date(OffsetDateTime::now_utc().to_offset(local_offset).date());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let emails = get_all_emails(&connection)
        .inspect_err(|error| tracing::error!("could not get emails: {error}"))?;
    let manual_transactions = get_all_manual_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get manual transactions: {error}"))?;
    let unread_count = count_unread_emails(&connection)
        .inspect_err(|error| tracing::error!("could not count unread emails: {error}"))?;
    let nav_bar = get_nav_bar(endpoints::DASHBOARD_VIEW, user_id, &connection)?;
    drop(connection);

    let merged = merge_transactions(&emails, &manual_transactions);
    let latest = merged
        .iter()
        .take(LATEST_TRANSACTION_COUNT)
        .cloned()
        .collect();
    let this_month = TransactionFilter {
        month: Some(month),
        ..Default::default()
    };
    let month_totals = totals(&apply(merged, &this_month, local_offset));

    Ok(dashboard_view(DashboardModel {
        nav_bar,
        month,
        month_totals,
        unread_count,
        latest,
        local_offset,
    })
    .into_response())
}

fn dashboard_view(model: DashboardModel) -> Markup {
    let content = html! {
        (model.nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl sm:text-3xl font-extrabold text-gray-900 dark:text-white mb-6 text-center"
            {
                "Dashboard"
            }

            div class="grid grid-cols-1 sm:grid-cols-2 gap-4 mb-8"
            {
                (month_totals_card(model.month, model.month_totals))
                (unread_card(model.unread_count))
            }

            section id="latest-transactions"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h2 class="text-xl font-semibold text-gray-900 dark:text-white"
                    {
                        "Latest Transactions"
                    }

                    a href=(endpoints::TRANSACTIONS_VIEW) class={"text-sm " (LINK_STYLE)}
                    {
                        "View all"
                    }
                }

                (transaction_list(&model.latest, model.local_offset))
            }
        }
    };

    base("Dashboard", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        auth::{PasswordHash, SINGLE_USER_ID, save_user},
        db::initialize,
        email::{NewEmail, create_email},
        html::format_rupees,
        manual::{ManualTransaction, create_manual_transaction},
        test_utils::{assert_valid_html, parse_html_document},
        transaction::TransactionType,
    };

    use super::{DashboardState, LATEST_TRANSACTION_COUNT, get_dashboard_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        save_user(
            "me@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();
        conn
    }

    async fn get_page(conn: Connection) -> Html {
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), Extension(SINGLE_USER_ID))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        parse_html_document(response).await
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("no element matches {selector}"))
            .text()
            .collect::<String>()
    }

    #[tokio::test]
    async fn shows_current_month_totals_and_unread_count() {
        let conn = get_test_connection();
        let now = OffsetDateTime::now_utc();
        create_email(&NewEmail::new("INR 300.00 debited", now), &conn).unwrap();
        create_email(
            &NewEmail::new("INR 50.00 debited", datetime!(2020-01-01 10:00 UTC)).read(true),
            &conn,
        )
        .unwrap();
        create_manual_transaction(
            ManualTransaction::build(1000.0, now, TransactionType::Credited),
            &conn,
        )
        .unwrap();

        let html = get_page(conn).await;

        assert_valid_html(&html);
        assert!(text_of(&html, "#month-credit").contains(&format_rupees(1000.0)));
        assert!(text_of(&html, "#month-debit").contains(&format_rupees(300.0)));
        assert_eq!(text_of(&html, "#unread-count"), "1");
    }

    #[tokio::test]
    async fn shows_only_latest_transactions() {
        let conn = get_test_connection();
        let start = datetime!(2024-01-01 10:00 UTC);
        for day in 0..(LATEST_TRANSACTION_COUNT as i64 + 2) {
            create_email(
                &NewEmail::new("INR 1.00 debited", start + Duration::days(day)),
                &conn,
            )
            .unwrap();
        }

        let html = get_page(conn).await;

        let rows = html
            .select(&Selector::parse("#latest-transactions li").unwrap())
            .count();
        assert_eq!(rows, LATEST_TRANSACTION_COUNT);
    }

    #[tokio::test]
    async fn shows_empty_message_without_transactions() {
        let html = get_page(get_test_connection()).await;

        assert!(text_of(&html, "#no-transactions").contains("No transactions available."));
        assert_eq!(text_of(&html, "#unread-count"), "0");
    }
}
