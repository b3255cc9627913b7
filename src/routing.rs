//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::get_dashboard_page,
    email::{get_inbox_page, mark_email_read_endpoint, update_email_note_endpoint},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    manual::{
        create_manual_transaction_endpoint, delete_manual_transaction_endpoint,
        get_create_manual_transaction_page, update_manual_note_endpoint,
    },
    not_found::get_404_not_found,
    transaction::get_transactions_page,
};

/// Return a router with all the app's routes.
///
/// Files in `static_dir` are served under [endpoints::STATIC].
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INBOX_VIEW, get(get_inbox_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_MANUAL_TRANSACTION_VIEW,
            get(get_create_manual_transaction_page),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::EMAIL_NOTE, put(update_email_note_endpoint))
            .route(endpoints::EMAIL_READ, put(mark_email_read_endpoint))
            .route(
                endpoints::MANUAL_TRANSACTIONS_API,
                post(create_manual_transaction_endpoint),
            )
            .route(
                endpoints::MANUAL_TRANSACTION,
                delete(delete_manual_transaction_endpoint),
            )
            .route(endpoints::MANUAL_NOTE, put(update_manual_note_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new(static_dir))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
