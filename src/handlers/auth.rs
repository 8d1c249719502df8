use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MessageResponse;
use crate::domain::user::User;
use crate::errors::AppError;
use crate::session::{self, CurrentUser};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// POST /api/register
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Missing field, malformed email or short password"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "auth"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let user = web::block(move || state.auth.register(&body.email, &body.password)).await??;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// POST /api/login
///
/// On success the session cookie is renewed and bound to the user.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in", body = UserResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let user =
        web::block(move || state.auth.authenticate(&body.email, &body.password)).await??;

    session::log_in(&session, user.id)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// POST /api/logout
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn logout(session: Session) -> HttpResponse {
    session::log_out(&session);
    HttpResponse::Ok().json(MessageResponse::new("Logged out"))
}

/// GET /api/user
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "The logged-in user", body = UserResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "auth"
)]
pub async fn current_user(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let user = web::block(move || state.auth.current_user(user.0)).await??;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
