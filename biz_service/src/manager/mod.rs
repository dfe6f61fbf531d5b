pub mod client_intake_manager;
pub mod compensation;
pub mod user_manager_auth;
pub mod user_manager_auth_impl;
