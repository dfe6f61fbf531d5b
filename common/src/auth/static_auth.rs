use crate::auth::auth_gateway::{AuthGateway, AuthSession, AuthUser};
use crate::config::DevUserConfig;
use crate::repository::gateway_error::GatewayError;
use async_trait::async_trait;

/// Fixed token table for the memory backend: each configured user owns one
/// long-lived access token.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthGateway {
    users: Vec<DevUserConfig>,
}

impl StaticAuthGateway {
    pub fn new(users: Vec<DevUserConfig>) -> Self {
        Self { users }
    }

    fn to_auth_user(user: &DevUserConfig) -> AuthUser {
        AuthUser { id: user.id.clone(), email: Some(user.email.clone()) }
    }
}

#[async_trait]
impl AuthGateway for StaticAuthGateway {
    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>, GatewayError> {
        Ok(self.users.iter().find(|u| u.token == access_token).map(Self::to_auth_user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<AuthSession>, GatewayError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email) && u.password == password)
            .map(|u| AuthSession {
                access_token: u.token.clone(),
                refresh_token: String::new(),
                expires_in: i64::from(u32::MAX),
                user: Self::to_auth_user(u),
            }))
    }
}
