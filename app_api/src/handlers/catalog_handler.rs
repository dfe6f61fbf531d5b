use actix_web::{get, web, Responder};
use biz_service::biz_services::account_service::AccountService;
use biz_service::biz_services::service_catalog_service::ServiceCatalogService;
use biz_service::entitys::account_entity::AccountInfo;
use biz_service::entitys::service_entity::ServiceInfo;
use common::errors::{AppError, ErrorResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(service_list);
    cfg.service(account_list);
}

/// Active services offered on the intake form, by name
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Active services", body = [ServiceInfo]),
        (status = 401, description = "No valid session", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[get("/api/services")]
pub async fn service_list(service_catalog: web::Data<ServiceCatalogService>) -> Result<impl Responder, AppError> {
    Ok(web::Json(service_catalog.list_active().await?))
}

/// Active receiver accounts for payments
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "Catalog",
    responses(
        (status = 200, description = "Active receiver accounts", body = [AccountInfo]),
        (status = 401, description = "No valid session", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[get("/api/accounts")]
pub async fn account_list(account_service: web::Data<AccountService>) -> Result<impl Responder, AppError> {
    Ok(web::Json(account_service.list_active().await?))
}
