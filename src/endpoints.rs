//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/emails/{email_id}/note', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing the bank notification emails.
pub const INBOX_VIEW: &str = "/inbox";
/// The page for adding a manual transaction.
pub const NEW_MANUAL_TRANSACTION_VIEW: &str = "/manual/new";
/// The page listing all transactions from both sources.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to update the note of an email-origin transaction.
pub const EMAIL_NOTE: &str = "/api/emails/{email_id}/note";
/// The route to mark an email as read.
pub const EMAIL_READ: &str = "/api/emails/{email_id}/read";
/// The route to create a manual transaction.
pub const MANUAL_TRANSACTIONS_API: &str = "/api/manual";
/// The route to delete a manual transaction.
pub const MANUAL_TRANSACTION: &str = "/api/manual/{manual_id}";
/// The route to update the note of a manual transaction.
pub const MANUAL_NOTE: &str = "/api/manual/{manual_id}/note";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/manual/{manual_id}', '{manual_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INBOX_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_MANUAL_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::EMAIL_NOTE);
        assert_endpoint_is_valid_uri(endpoints::EMAIL_READ);
        assert_endpoint_is_valid_uri(endpoints::MANUAL_TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::MANUAL_TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::MANUAL_NOTE);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::EMAIL_NOTE, 42);

        assert_eq!(formatted_path, "/api/emails/42/note");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
