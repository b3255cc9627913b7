//! Alert messages shown to the user after an HTMX request succeeds or fails.
//!
//! Error alerts are rendered as the whole response body so that forms can
//! target them at `#alert-container` with `hx-target-error`. Success alerts
//! are usually attached to a normal response as an out-of-band swap, see
//! [Alert::into_oob_html].

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A success or error message for the alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with a suggestion for how to fix it.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    /// Render the alert for swapping into `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::SuccessSimple { message } => (true, message, None),
            Alert::Error { message, details } => (false, message, Some(details)),
            Alert::ErrorSimple { message } => (false, message, None),
        };

        let container_style = if is_success {
            "flex items-start gap-3 p-4 mb-4 rounded-lg shadow-lg \
            bg-gray-800 text-gray-100 border-l-4 border-green-500"
        } else {
            "flex items-start gap-3 p-4 mb-4 rounded-lg shadow-lg \
            bg-gray-800 text-gray-100 border-l-4 border-red-500"
        };

        html! {
            div
                role="alert"
                class=(container_style)
                data-alert-kind=(if is_success { "success" } else { "error" })
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if let Some(details) = details {
                        @if !details.is_empty() {
                            p class="text-sm" { (details) }
                        }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="text-gray-400 hover:text-gray-100"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert wrapped in an out-of-band swap for `#alert-container`.
    ///
    /// Append this to the markup of a successful response.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
