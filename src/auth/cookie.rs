//! Defines functions for handling user authentication with cookies.

use std::{cmp::max, num::ParseIntError};

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::auth::UserID;

pub(crate) const COOKIE_USER_ID: &str = "user_id";
pub(crate) const COOKIE_EXPIRY: &str = "expiry";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// The ways reading or updating the auth cookies can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum AuthError {
    /// The user ID or expiry cookie is not in the jar.
    #[error("the auth cookies are missing")]
    CookieMissing,
    /// The cookies are present but do not identify a logged in user.
    #[error("the auth cookies are invalid or have expired")]
    InvalidCredentials,
    /// The expiry could not be parsed, formatted or extended.
    #[error("could not read or update the auth cookie expiry")]
    DateError,
}

/// Add the auth cookies to the cookie jar, indicating that a user is logged in and authenticated.
///
/// Sets the initial expiry of the cookies to `duration` from the current time.
/// You can use [DEFAULT_COOKIE_DURATION] for the default duration.
///
/// # Errors
///
/// Returns a [time::error::Format] if the expiry time cannot be formatted.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, time::error::Format> {
    let expiry = OffsetDateTime::now_utc() + duration;
    // Use format instead of to_string so the value always matches [DATE_TIME_FORMAT].
    let expiry_string = expiry.format(DATE_TIME_FORMAT)?;

    Ok(jar
        .add(auth_cookie(COOKIE_USER_ID, user_id.as_i64().to_string(), expiry))
        .add(auth_cookie(COOKIE_EXPIRY, expiry_string, expiry)))
}

fn auth_cookie(name: &'static str, value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name, value))
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .path("/")
        .build()
}

/// Set the auth cookies to an invalid value with a max age of zero, which
/// deletes them on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let expired = |name: &'static str| {
        Cookie::build((name, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .path("/")
            .build()
    };

    jar.add(expired(COOKIE_USER_ID)).add(expired(COOKIE_EXPIRY))
}

/// Set the expiry of the auth cookies in `jar` to the later of now plus
/// `duration` and their current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [AuthError::CookieMissing] if the auth cookie or expiry cookie are not in the cookie jar.
/// - [AuthError::DateError] if the expiry cannot be read, extended or formatted.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, AuthError> {
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(AuthError::CookieMissing)?;
    let current_expiry = extract_date_time(&expiry_cookie).map_err(|_| AuthError::DateError)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(AuthError::DateError)?;

    set_auth_cookie_expiry(jar, max(current_expiry, new_expiry))
}

fn set_auth_cookie_expiry(
    jar: PrivateCookieJar,
    expiry: OffsetDateTime,
) -> Result<PrivateCookieJar, AuthError> {
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|_| AuthError::DateError)?;

    let mut user_id_cookie = jar.get(COOKIE_USER_ID).ok_or(AuthError::CookieMissing)?;
    let mut expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(AuthError::CookieMissing)?;

    for cookie in [&mut user_id_cookie, &mut expiry_cookie] {
        cookie.set_expires(expiry);
        cookie.set_path("/");
    }
    expiry_cookie.set_value(expiry_string);

    Ok(jar.add(user_id_cookie).add(expiry_cookie))
}

/// Get the logged in user's ID if the auth cookies are present and have not expired.
pub(crate) fn get_user_id_from_auth_cookie(jar: &PrivateCookieJar) -> Result<UserID, AuthError> {
    let user_id_cookie = jar.get(COOKIE_USER_ID).ok_or(AuthError::CookieMissing)?;
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(AuthError::CookieMissing)?;

    let expiry = extract_date_time(&expiry_cookie).map_err(|_| AuthError::InvalidCredentials)?;

    if expiry <= OffsetDateTime::now_utc() {
        return Err(AuthError::InvalidCredentials);
    }

    extract_user_id(&user_id_cookie).map_err(|_| AuthError::InvalidCredentials)
}

/// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

fn extract_date_time(cookie: &Cookie) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(cookie.value_trimmed(), DATE_TIME_FORMAT)
}

fn extract_user_id(cookie: &Cookie) -> Result<UserID, ParseIntError> {
    let id: i64 = cookie.value_trimmed().parse()?;

    Ok(UserID::new(id))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset, macros::datetime};

    use crate::auth::UserID;

    use super::{
        AuthError, COOKIE_EXPIRY, COOKIE_USER_ID, DATE_TIME_FORMAT, DEFAULT_COOKIE_DURATION,
        extend_auth_cookie_duration_if_needed, extract_date_time, get_user_id_from_auth_cookie,
        invalidate_auth_cookie, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(hash.as_slice());
        PrivateCookieJar::new(key)
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn can_extract_date_time_at_midnight() {
        let want = datetime!(2021-01-01 00:00:00).assume_offset(UtcOffset::UTC);
        let cookie = Cookie::build((COOKIE_EXPIRY, want.format(DATE_TIME_FORMAT).unwrap())).build();

        let got = extract_date_time(&cookie).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn set_cookie_succeeds() {
        let user_id = UserID::new(1);

        let jar = set_auth_cookie(get_jar(), user_id, DEFAULT_COOKIE_DURATION).unwrap();

        assert_eq!(get_user_id_from_auth_cookie(&jar), Ok(user_id));
        let user_id_cookie = jar.get(COOKIE_USER_ID).unwrap();
        assert_date_time_close(
            user_id_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
    }

    #[test]
    fn expired_cookie_is_invalid() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(-1)).unwrap();

        assert_eq!(
            get_user_id_from_auth_cookie(&jar),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(
            get_user_id_from_auth_cookie(&get_jar()),
            Err(AuthError::CookieMissing)
        );
    }

    #[test]
    fn invalidate_cookie_removes_user() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);

        let user_id_cookie = jar.get(COOKIE_USER_ID).unwrap();
        assert_eq!(user_id_cookie.value(), "deleted");
        assert_eq!(user_id_cookie.max_age(), Some(Duration::ZERO));
        assert!(get_user_id_from_auth_cookie(&jar).is_err());
    }

    #[test]
    fn extend_cookie_pushes_expiry_forward() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(5)).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5)).unwrap();

        let expiry = extract_date_time(&jar.get(COOKIE_EXPIRY).unwrap()).unwrap();
        assert_date_time_close(expiry, OffsetDateTime::now_utc() + Duration::minutes(5));
    }

    #[test]
    fn extend_cookie_keeps_later_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7)).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5)).unwrap();

        let expiry = extract_date_time(&jar.get(COOKIE_EXPIRY).unwrap()).unwrap();
        assert_date_time_close(expiry, OffsetDateTime::now_utc() + Duration::days(7));
    }

    #[test]
    fn extend_without_cookies_fails() {
        let result = extend_auth_cookie_duration_if_needed(get_jar(), Duration::minutes(5));

        assert_eq!(result.err(), Some(AuthError::CookieMissing));
    }
}
