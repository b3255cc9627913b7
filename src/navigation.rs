//! This file defines the templates and a convenience function for creating the sidebar navigation.

use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error,
    auth::{UserID, get_user_by_id},
    email::count_unread_emails,
    endpoints,
};

/// Template for a link in the sidebar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link {
    url: &'static str,
    title: &'static str,
    is_current: bool,
    /// Shown as a badge next to the title when set and non-zero.
    badge: Option<u32>,
}

impl Link {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "flex items-center justify-between px-3 py-2 rounded-lg \
            bg-indigo-50 text-indigo-700 font-semibold \
            dark:bg-indigo-900/30 dark:text-indigo-200"
        } else {
            "flex items-center justify-between px-3 py-2 rounded-lg \
            text-gray-700 hover:bg-gray-100 hover:text-indigo-700 \
            dark:text-gray-200 dark:hover:bg-gray-800"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                span { (self.title) }

                @if let Some(count) = self.badge.filter(|count| *count > 0) {
                    span
                        data-unread-count=(count)
                        class="ml-2 px-2 py-0.5 text-xs font-semibold rounded-full \
                            bg-red-600 text-white"
                    {
                        (count)
                    }
                }
            }
        )
    }
}

/// The sidebar shown on every page for logged in users.
pub struct NavBar {
    links: Vec<Link>,
    avatar_initial: String,
}

impl NavBar {
    /// Get the sidebar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    /// `unread_count` is shown as a badge on the inbox link.
    pub fn new(active_endpoint: &str, user_email: &str, unread_count: u32) -> NavBar {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
                badge: None,
            },
            Link {
                url: endpoints::INBOX_VIEW,
                title: "Inbox",
                is_current: active_endpoint == endpoints::INBOX_VIEW,
                badge: Some(unread_count),
            },
            Link {
                url: endpoints::NEW_MANUAL_TRANSACTION_VIEW,
                title: "Add Expense",
                is_current: active_endpoint == endpoints::NEW_MANUAL_TRANSACTION_VIEW,
                badge: None,
            },
            Link {
                url: endpoints::TRANSACTIONS_VIEW,
                title: "All Transactions",
                is_current: active_endpoint == endpoints::TRANSACTIONS_VIEW,
                badge: None,
            },
        ];

        NavBar {
            links,
            avatar_initial: avatar_initial(user_email),
        }
    }

    pub fn into_html(self) -> Markup {
        html!(
            aside
                id="sidebar"
                class="lg:fixed lg:inset-y-0 lg:left-0 lg:w-64 flex flex-col \
                    bg-white border-r border-gray-200 dark:bg-gray-900 dark:border-gray-700"
            {
                a
                    href=(endpoints::DASHBOARD_VIEW)
                    class="px-6 py-5 text-2xl font-semibold text-gray-900 dark:text-white"
                {
                    "Spendlog"
                }

                nav class="flex-1 px-3 space-y-1"
                {
                    @for link in self.links {
                        (link.into_html())
                    }
                }

                div
                    class="flex items-center justify-between px-6 py-4 \
                        border-t border-gray-200 dark:border-gray-700"
                {
                    span
                        id="avatar"
                        class="flex items-center justify-center w-9 h-9 rounded-full \
                            bg-indigo-600 text-white font-semibold"
                    {
                        (self.avatar_initial)
                    }

                    a
                        href=(endpoints::LOG_OUT)
                        class="text-sm text-gray-700 hover:text-indigo-700 dark:text-gray-200"
                    {
                        "Sign Out"
                    }
                }
            }
        )
    }
}

/// Build the sidebar for the logged in user.
///
/// Looks up the user's email for the avatar and the number of unread emails
/// for the inbox badge.
pub fn get_nav_bar(
    active_endpoint: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<NavBar, Error> {
    let user = get_user_by_id(user_id, connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let unread_count = count_unread_emails(connection)
        .inspect_err(|error| tracing::error!("could not count unread emails: {error}"))?;

    Ok(NavBar::new(active_endpoint, &user.email, unread_count))
}

/// The upper-cased first character of `email`, or "?" if it is empty.
fn avatar_initial(email: &str) -> String {
    email
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_owned())
}
