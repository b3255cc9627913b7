//! The endpoint for deleting a manual transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    database_id::ManualTransactionId,
    error::DELETE_FAILED_MSG,
    manual::core::delete_manual_transaction,
};

/// The message shown after a manual transaction is deleted.
pub const TRANSACTION_DELETED_MSG: &str = "Transaction deleted successfully!";

/// The state needed to delete a manual transaction.
#[derive(Debug, Clone)]
pub struct DeleteManualState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteManualState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a manual transaction.
///
/// On success the response body is empty apart from an out-of-band alert, so
/// the row that made the request is swapped out of the page.
pub async fn delete_manual_transaction_endpoint(
    State(state): State<DeleteManualState>,
    Path(manual_id): Path<ManualTransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return delete_failed();
        }
    };

    match delete_manual_transaction(manual_id, &connection) {
        Ok(0) => Error::DeleteMissingManualTransaction.into_alert_response(),
        // The status code has to be 200 OK or HTMX will not remove the row.
        Ok(_) => {
            tracing::info!("deleted manual transaction {manual_id}");
            Alert::SuccessSimple {
                message: TRANSACTION_DELETED_MSG.to_owned(),
            }
            .into_oob_html()
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete manual transaction {manual_id}: {error}");
            delete_failed()
        }
    }
}

fn delete_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Alert::ErrorSimple {
            message: DELETE_FAILED_MSG.to_owned(),
        }
        .into_html(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        error::DELETE_FAILED_MSG,
        manual::{ManualTransaction, create_manual_transaction, get_manual_transaction},
        test_utils::parse_html_fragment,
        transaction::TransactionType,
    };

    use super::{DeleteManualState, TRANSACTION_DELETED_MSG, delete_manual_transaction_endpoint};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let conn = get_test_connection();
        let manual = create_manual_transaction(
            ManualTransaction::build(
                12.5,
                datetime!(2025-02-03 10:00 UTC),
                TransactionType::Credited,
            ),
            &conn,
        )
        .unwrap();
        let state = DeleteManualState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response =
            delete_manual_transaction_endpoint(State(state.clone()), Path(manual.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains(TRANSACTION_DELETED_MSG));

        let conn = state.db_connection.lock().unwrap();
        assert_eq!(
            get_manual_transaction(manual.id, &conn),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = DeleteManualState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_manual_transaction_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains(DELETE_FAILED_MSG));
    }
}
