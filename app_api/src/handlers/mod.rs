mod auth;
mod catalog_handler;
mod client;
mod common_handler;
pub mod swagger;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    common_handler::configure(cfg);
    auth::configure(cfg);
    client::configure(cfg);
    catalog_handler::configure(cfg);
    swagger::configure(cfg);
}
