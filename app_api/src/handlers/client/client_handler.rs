use crate::handlers::client::client_form_reader::read_client_form;
use crate::handlers::client::client_handler_dto::{ClientCreatedResponse, ClientFormDto};
use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use biz_service::entitys::role_entity::Role;
use biz_service::manager::client_intake_manager::ClientIntakeManager;
use biz_service::manager::user_manager_auth::{UserManagerAuth, UserManagerAuthOpt};
use common::auth::AuthUser;
use common::config::UploadConfig;
use common::errors::{AppError, ErrorResponse};
use log::info;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(client_create);
}

/// Creates a client with its requested services, files and payment.
///
/// The write sequence runs on its own task so a dropped connection cannot
/// stop it half way; either everything is stored or the partial writes are
/// undone before the error is reported.
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body(
        content = ClientFormDto,
        content_type = "multipart/form-data",
        description = "Form fields plus up to 5 `files[]` parts and an optional `payment_screenshot` part"
    ),
    responses(
        (status = 201, description = "Client created", body = ClientCreatedResponse),
        (status = 400, description = "Invalid form, too many files or a file over the size limit", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role may not create clients", body = ErrorResponse),
        (status = 500, description = "A remote write failed, partial writes were undone", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[post("/api/clients")]
pub async fn client_create(
    user: web::ReqData<AuthUser>,
    payload: Multipart,
    upload: web::Data<UploadConfig>,
    user_manager_auth: web::Data<UserManagerAuth>,
    intake_manager: web::Data<ClientIntakeManager>,
) -> Result<HttpResponse, AppError> {
    let user = user.into_inner();
    let role = user_manager_auth.authorize(&user, &Role::CLIENT_WRITERS).await?;

    let parts = read_client_form(payload, &upload).await?;
    let (total_amount, deposit_amount) = parts.form.check()?;
    let intake = parts.into_intake(&user.id, total_amount, deposit_amount);
    info!(
        "client intake from {} ({}): {} services, {} files",
        user.id,
        role,
        intake.service_ids.len(),
        intake.files.len()
    );

    let manager = intake_manager.into_inner();
    let client_id = actix_web::rt::spawn(async move { manager.create_client(intake).await })
        .await
        .map_err(|e| AppError::Internal(format!("client intake task aborted: {e}")))??;

    Ok(HttpResponse::Created().json(ClientCreatedResponse { id: client_id }))
}
