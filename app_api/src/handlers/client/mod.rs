use actix_web::web;

pub mod client_form_reader;
pub mod client_handler;
pub mod client_handler_dto;

pub fn configure(cfg: &mut web::ServiceConfig) {
    client_handler::configure(cfg);
}
