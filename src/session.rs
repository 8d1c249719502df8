//! Maps a request to the logged-in user id through the signed cookie session.

use std::future::{ready, Ready};

use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::errors::AppError;

const USER_ID_KEY: &str = "user_id";

/// Extracting this fails with `401` before the handler body runs, so
/// unauthenticated requests never reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i32);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user_id = req.get_session().get::<i32>(USER_ID_KEY).ok().flatten();
        ready(user_id.map(CurrentUser).ok_or(AppError::Unauthenticated))
    }
}

pub fn log_in(session: &Session, user_id: i32) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID_KEY, user_id)
        .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn log_out(session: &Session) {
    session.purge();
}
