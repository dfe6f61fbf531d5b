pub mod biz_services;
pub mod entitys;
pub mod manager;

pub use biz_services::configure;
