pub mod account_entity;
pub mod client_entity;
pub mod client_file_entity;
pub mod client_service_entity;
pub mod file_entity;
pub mod payment_entity;
pub mod role_entity;
pub mod service_entity;
pub mod user_entity;
