use actix_web::web;

pub mod login_handler;
pub mod login_handler_dto;

pub fn configure(cfg: &mut web::ServiceConfig) {
    login_handler::configure(cfg);
}
