pub mod auth_gateway;
pub mod static_auth;

pub use auth_gateway::{AuthGateway, AuthSession, AuthUser, SupabaseAuthGateway};
pub use static_auth::StaticAuthGateway;
