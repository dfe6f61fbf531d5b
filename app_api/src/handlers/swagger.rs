use crate::handlers::auth::login_handler::*;
use crate::handlers::auth::login_handler_dto::LoginReq;
use crate::handlers::catalog_handler::*;
use crate::handlers::client::client_handler::*;
use crate::handlers::client::client_handler_dto::{ClientCreatedResponse, ClientFormDto};

use actix_web::{get, web, HttpResponse, Responder};
use biz_service::entitys::account_entity::AccountInfo;
use biz_service::entitys::role_entity::Role;
use biz_service::entitys::service_entity::ServiceInfo;
use biz_service::manager::user_manager_auth::{Landing, LoginResult};
use common::errors::{AppError, ErrorResponse, FieldError};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // auth
        auth_login,
        session_landing,

        // clients
        client_create,

        // catalog
        service_list,
        account_list,
    ),
    components(schemas(
        LoginReq,
        LoginResult,
        Landing,
        Role,
        ClientFormDto,
        ClientCreatedResponse,
        ServiceInfo,
        AccountInfo,
        ErrorResponse,
        FieldError,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "cveeez-api", description = "Client intake dashboard API")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}

#[get("/openapi.json")]
async fn openapi_json() -> Result<impl Responder, AppError> {
    let body = ApiDoc::openapi().to_json()?;
    Ok(HttpResponse::Ok().content_type("application/json").body(body))
}
