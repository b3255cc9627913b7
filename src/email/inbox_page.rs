//! The inbox page, listing bank notification emails newest first.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    auth::UserID,
    email::{
        core::{Email, get_all_emails},
        subject::{extract_amount_from_subject, type_from_subject},
    },
    endpoints::{self, format_endpoint},
    html::{BUTTON_SECONDARY_STYLE, FORM_SELECT_STYLE, PAGE_CONTAINER_STYLE, base, format_rupees},
    navigation::{NavBar, get_nav_bar},
    timezone::get_local_offset,
    transaction::{MonthToken, available_months, normalize_email},
};

const INBOX_DATE_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[day] [month repr:short] [year], [hour repr:12]:[minute] [period case:lower]"
);

/// The state needed for the inbox page.
#[derive(Debug, Clone)]
pub struct InboxState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for InboxState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    pub month: Option<String>,
}

/// Render the inbox, optionally limited to one month.
pub async fn get_inbox_page(
    State(state): State<InboxState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<InboxQuery>,
) -> Result<Response, Error> {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    let month = query
        .month
        .as_deref()
        .filter(|month| !month.is_empty())
        .and_then(|month| {
            month
                .parse::<MonthToken>()
                .inspect_err(|error| tracing::warn!("ignoring month filter: {error}"))
                .ok()
        });

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let emails = get_all_emails(&connection)
        .inspect_err(|error| tracing::error!("could not get emails: {error}"))?;
    let nav_bar = get_nav_bar(endpoints::INBOX_VIEW, user_id, &connection)?;
    drop(connection);

    let normalized: Vec<_> = emails.iter().map(normalize_email).collect();
    let months = available_months(&normalized, local_offset);

    let emails: Vec<Email> = emails
        .into_iter()
        .filter(|email| {
            month.is_none_or(|month| month.contains(email.date.to_offset(local_offset).date()))
        })
        .collect();

    Ok(inbox_view(nav_bar, month, &months, &emails, local_offset).into_response())
}

fn inbox_url(month: Option<MonthToken>) -> String {
    match month {
        Some(month) => format!("{}?month={month}", endpoints::INBOX_VIEW),
        None => endpoints::INBOX_VIEW.to_owned(),
    }
}

fn mark_read_endpoint(email: &Email, month: Option<MonthToken>) -> String {
    let endpoint = format_endpoint(endpoints::EMAIL_READ, email.id);

    match serde_urlencoded::to_string([("redirect_url", inbox_url(month))]) {
        Ok(query) => format!("{endpoint}?{query}"),
        Err(error) => {
            tracing::warn!("could not encode redirect URL: {error}");
            endpoint
        }
    }
}

fn inbox_view(
    nav_bar: NavBar,
    month: Option<MonthToken>,
    months: &[MonthToken],
    emails: &[Email],
    local_offset: UtcOffset,
) -> Markup {
    let content = html! {
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl sm:text-3xl font-extrabold text-gray-900 dark:text-white mb-6 text-center"
            {
                "Inbox"
            }

            form
                id="inbox-filters"
                method="get"
                action=(endpoints::INBOX_VIEW)
                class="flex justify-center mb-8"
            {
                select
                    name="month"
                    aria-label="Month"
                    class=(FORM_SELECT_STYLE)
                    onchange="this.form.submit()"
                {
                    option value="" selected[month.is_none()] { "All Months" }

                    @for option_month in months {
                        option
                            value=(option_month.to_string())
                            selected[month == Some(*option_month)]
                        {
                            (option_month.label())
                        }
                    }
                }
            }

            @if emails.is_empty() {
                p
                    id="no-emails"
                    class="text-lg text-gray-500 text-center py-6 bg-white dark:bg-gray-800 rounded-2xl shadow-md"
                {
                    "No emails available."
                }
            } @else {
                ul id="email-list" class="space-y-4"
                {
                    @for email in emails {
                        (email_row(email, month, local_offset))
                    }
                }
            }
        }
    };

    base("Inbox", &content)
}

fn email_row(email: &Email, month: Option<MonthToken>, local_offset: UtcOffset) -> Markup {
    let local_date = email.date.to_offset(local_offset);
    let date_text = local_date
        .format(INBOX_DATE_FORMAT)
        .unwrap_or_else(|_| local_date.date().to_string());
    let kind = type_from_subject(&email.subject);
    let row_style = if email.read {
        "bg-white dark:bg-gray-800 p-4 sm:p-5 rounded-2xl shadow-md"
    } else {
        "bg-indigo-50 dark:bg-gray-700 p-4 sm:p-5 rounded-2xl shadow-md border-l-4 border-l-indigo-500"
    };

    html! {
        li
            id={"inbox-email-" (email.id)}
            class=(row_style)
            data-read=(if email.read { "true" } else { "false" })
        {
            div class="flex flex-col sm:flex-row sm:items-center sm:justify-between gap-3"
            {
                div class="space-y-1"
                {
                    p class="subject font-semibold text-gray-900 dark:text-white" { (email.subject) }

                    @if !email.sender.is_empty() {
                        p class="sender text-sm text-gray-600 dark:text-gray-300" { (email.sender) }
                    }

                    p class="text-xs sm:text-sm text-gray-500" { (date_text) }
                }

                div class="flex flex-col sm:items-end gap-2"
                {
                    p class="text-lg font-bold text-gray-800 dark:text-gray-100"
                    {
                        (format_rupees(extract_amount_from_subject(&email.subject)))
                    }

                    p class="text-sm font-semibold capitalize" { (kind.as_str()) }

                    @if email.read {
                        span class="text-xs text-gray-500" { "Read" }
                    } @else {
                        button
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                            hx-put=(mark_read_endpoint(email, month))
                            hx-target-error="#alert-container"
                        {
                            "Mark as read"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        auth::{PasswordHash, SINGLE_USER_ID, save_user},
        db::initialize,
        email::{NewEmail, create_email},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{InboxQuery, InboxState, get_inbox_page};

    fn get_state() -> InboxState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        save_user(
            "me@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();
        create_email(
            &NewEmail::new("INR 100.00 debited", datetime!(2025-01-20 10:00 UTC)),
            &conn,
        )
        .unwrap();
        create_email(
            &NewEmail::new("INR 250.50 credited", datetime!(2025-02-03 10:00 UTC)).read(true),
            &conn,
        )
        .unwrap();

        InboxState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    async fn get_page(month: Option<&str>) -> Html {
        let response = get_inbox_page(
            State(get_state()),
            Extension(SINGLE_USER_ID),
            Query(InboxQuery {
                month: month.map(str::to_owned),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        parse_html_document(response).await
    }

    fn subjects(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("#email-list .subject").unwrap())
            .map(|subject| subject.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn lists_emails_newest_first() {
        let html = get_page(None).await;

        assert_valid_html(&html);
        assert_eq!(
            subjects(&html),
            vec!["INR 250.50 credited", "INR 100.00 debited"]
        );
    }

    #[tokio::test]
    async fn filters_by_month() {
        let html = get_page(Some("2025-01")).await;

        assert_eq!(subjects(&html), vec!["INR 100.00 debited"]);
    }

    #[tokio::test]
    async fn only_unread_emails_have_mark_read_button() {
        let html = get_page(None).await;

        let buttons: Vec<_> = html
            .select(&Selector::parse("#email-list button[hx-put]").unwrap())
            .collect();
        assert_eq!(buttons.len(), 1);
        let endpoint = buttons[0].value().attr("hx-put").unwrap();
        assert!(endpoint.starts_with("/api/emails/1/read?redirect_url="));
    }

    #[tokio::test]
    async fn shows_message_when_month_has_no_emails() {
        let html = get_page(Some("2024-06")).await;

        let message = html
            .select(&Selector::parse("#no-emails").unwrap())
            .next()
            .expect("no empty message");
        assert_eq!(message.text().collect::<String>().trim(), "No emails available.");
    }
}
