use crate::entitys::role_entity::{landing_route, Role};
use crate::manager::user_manager_auth::{Landing, LoginResult, UserManagerAuth, UserManagerAuthOpt};
use async_trait::async_trait;
use common::auth::AuthUser;
use common::errors::AppError;
use log::{info, warn};

#[async_trait]
impl UserManagerAuthOpt for UserManagerAuth {
    async fn authenticate(&self, access_token: &str) -> Result<AuthUser, AppError> {
        if access_token.is_empty() {
            return Err(AppError::Unauthorized("empty token".to_string()));
        }
        self.auth
            .current_user(access_token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("token rejected by auth provider".to_string()))
    }

    async fn authorize(&self, user: &AuthUser, allowed: &[Role]) -> Result<Role, AppError> {
        match self.user_service.find_role(&user.id).await? {
            Some(role) if allowed.contains(&role) => Ok(role),
            Some(role) => {
                warn!("user {} with role {} refused, needs one of {:?}", user.id, role, allowed);
                Err(AppError::Forbidden)
            }
            None => {
                warn!("user {} has no usable profile role", user.id);
                Err(AppError::Forbidden)
            }
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let session = self
            .auth
            .sign_in(email.trim(), password)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("bad credentials for {}", email.trim())))?;
        let landing = self.landing_for(&session.user.id).await?;
        info!("user {} signed in as {}", session.user.id, landing.role);
        Ok(LoginResult {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            user_id: session.user.id,
            role: landing.role,
            redirect_to: landing.redirect_to,
        })
    }

    async fn landing_for(&self, user_id: &str) -> Result<Landing, AppError> {
        let role = self.user_service.find_role(user_id).await?.unwrap_or(Role::Designer);
        Ok(Landing { role, redirect_to: landing_route(role).to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::auth::StaticAuthGateway;
    use common::config::{DevUserConfig, ServerRes};
    use common::storage::MemoryBlobGateway;
    use common::MemoryRowGateway;
    use serde_json::json;
    use std::sync::Arc;

    fn dev_user(id: &str, role: &str) -> DevUserConfig {
        DevUserConfig {
            id: id.to_string(),
            email: format!("{id}@cveeez.com"),
            password: "pw".to_string(),
            role: role.to_string(),
            token: format!("tok-{id}"),
        }
    }

    fn manager() -> UserManagerAuth {
        let users = vec![dev_user("mod", "moderator"), dev_user("des", "designer"), dev_user("ghost", "")];
        let rows = MemoryRowGateway::new();
        rows.seed(
            "users",
            vec![
                json!({"id": "mod", "email": "mod@cveeez.com", "role": "moderator", "full_name": null}),
                json!({"id": "des", "email": "des@cveeez.com", "role": "designer", "full_name": null}),
            ],
        );
        let res = ServerRes::new(
            Arc::new(rows),
            Arc::new(MemoryBlobGateway::new()),
            Arc::new(StaticAuthGateway::new(users)),
            "client-files",
        );
        UserManagerAuth::new(res)
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let m = manager();
        assert!(matches!(m.authenticate("nope").await, Err(AppError::Unauthorized(_))));
        assert!(matches!(m.authenticate("").await, Err(AppError::Unauthorized(_))));
        assert_eq!(m.authenticate("tok-mod").await.unwrap().id, "mod");
    }

    #[tokio::test]
    async fn only_writers_pass_client_creation() {
        let m = manager();
        let moderator = m.authenticate("tok-mod").await.unwrap();
        assert_eq!(m.authorize(&moderator, &Role::CLIENT_WRITERS).await.unwrap(), Role::Moderator);

        let designer = m.authenticate("tok-des").await.unwrap();
        assert!(matches!(m.authorize(&designer, &Role::CLIENT_WRITERS).await, Err(AppError::Forbidden)));

        let ghost = m.authenticate("tok-ghost").await.unwrap();
        assert!(matches!(m.authorize(&ghost, &Role::CLIENT_WRITERS).await, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn login_returns_landing_route() {
        let m = manager();
        let result = m.login("mod@cveeez.com", "pw").await.unwrap();
        assert_eq!(result.access_token, "tok-mod");
        assert_eq!(result.role, Role::Moderator);
        assert_eq!(result.redirect_to, "/clients/new");

        assert!(matches!(m.login("mod@cveeez.com", "wrong").await, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn user_without_profile_lands_as_designer() {
        let landing = manager().landing_for("ghost").await.unwrap();
        assert_eq!(landing.role, Role::Designer);
        assert_eq!(landing.redirect_to, "/tasks");
    }
}
