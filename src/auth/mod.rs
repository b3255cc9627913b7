//! Single-user authentication with private cookies.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use user::{
    SINGLE_USER_ID, UserID, count_users, create_user_table, get_user_by_id, save_user,
    validate_email,
};
