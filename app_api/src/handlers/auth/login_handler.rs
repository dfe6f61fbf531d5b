use crate::handlers::auth::login_handler_dto::LoginReq;
use actix_web::{get, post, web, web::ServiceConfig, Responder};
use biz_service::manager::user_manager_auth::{Landing, LoginResult, UserManagerAuth, UserManagerAuthOpt};
use common::auth::AuthUser;
use common::errors::{AppError, ErrorResponse};
use validator::Validate;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(auth_login);
    cfg.service(session_landing);
}

/// Password sign-in
///
/// Returns the session tokens and the dashboard page for the user's role.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Signed in", body = LoginResult),
        (status = 400, description = "Malformed email or empty password", body = ErrorResponse),
        (status = 401, description = "Wrong email or password", body = ErrorResponse),
    ),
    tag = "Auth"
)]
#[post("/auth/login")]
pub async fn auth_login(dto: web::Json<LoginReq>, user_manager_auth: web::Data<UserManagerAuth>) -> Result<impl Responder, AppError> {
    dto.validate()?;
    let login = user_manager_auth.login(&dto.email, &dto.password).await?;
    Ok(web::Json(login))
}

/// Landing page for the current session
#[utoipa::path(
    get,
    path = "/api/session/landing",
    responses(
        (status = 200, description = "Role and landing route", body = Landing),
        (status = 401, description = "No valid session", body = ErrorResponse),
    ),
    tag = "Auth",
    security(("bearer" = []))
)]
#[get("/api/session/landing")]
pub async fn session_landing(
    user: web::ReqData<AuthUser>,
    user_manager_auth: web::Data<UserManagerAuth>,
) -> Result<impl Responder, AppError> {
    let landing = user_manager_auth.landing_for(&user.id).await?;
    Ok(web::Json(landing))
}
