//! Dashboard module
//!
//! Provides an overview page with this month's totals, the number of unread
//! emails and the latest transactions.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
