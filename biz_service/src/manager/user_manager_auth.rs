use crate::biz_services::user_service::UserService;
use crate::entitys::role_entity::Role;
use async_trait::async_trait;
use common::auth::{AuthGateway, AuthUser};
use common::config::ServerRes;
use common::errors::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Issued session plus where the dashboard should send the user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user_id: String,
    pub role: Role,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Landing {
    pub role: Role,
    pub redirect_to: String,
}

/// Session checks in front of every dashboard route.
pub struct UserManagerAuth {
    pub(crate) auth: Arc<dyn AuthGateway>,
    pub(crate) user_service: UserService,
}

impl UserManagerAuth {
    pub fn new(db_res: ServerRes) -> Self {
        Self { auth: db_res.auth.clone(), user_service: UserService::new(db_res) }
    }
}

#[async_trait]
pub trait UserManagerAuthOpt: Send + Sync {
    /// Resolves a bearer token to its user. Unknown or expired tokens are 401.
    async fn authenticate(&self, access_token: &str) -> Result<AuthUser, AppError>;

    /// Looks up the user's role and checks it against `allowed`. A user
    /// without a profile row is refused like any other role mismatch.
    async fn authorize(&self, user: &AuthUser, allowed: &[Role]) -> Result<Role, AppError>;

    /// Password sign-in. Bad credentials are 401.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError>;

    /// Role and landing page for a signed-in user; no profile lands as designer.
    async fn landing_for(&self, user_id: &str) -> Result<Landing, AppError>;
}
