use crate::biz_services::account_service::AccountService;
use crate::biz_services::service_catalog_service::ServiceCatalogService;
use crate::manager::client_intake_manager::ClientIntakeManager;
use crate::manager::user_manager_auth::UserManagerAuth;
use actix_web::web;
use common::config::{ServerRes, UploadConfig};

pub mod account_service;
pub mod client_file_service;
pub mod client_service;
pub mod client_service_link_service;
pub mod file_service;
pub mod payment_service;
pub mod service_catalog_service;
pub mod user_service;

pub fn configure(cfg: &mut web::ServiceConfig, db_res: ServerRes, upload: &UploadConfig) {
    let user_manager_auth = UserManagerAuth::new(db_res.clone());
    cfg.app_data(web::Data::new(user_manager_auth));

    let client_intake_manager = ClientIntakeManager::new(db_res.clone(), upload.max_files);
    cfg.app_data(web::Data::new(client_intake_manager));

    let service_catalog_service = ServiceCatalogService::new(db_res.clone());
    cfg.app_data(web::Data::new(service_catalog_service));

    let account_service = AccountService::new(db_res);
    cfg.app_data(web::Data::new(account_service));

    cfg.app_data(web::Data::new(upload.clone()));
}
