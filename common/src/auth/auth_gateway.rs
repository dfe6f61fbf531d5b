use crate::repository::gateway_error::{check_response, GatewayError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity attached to an access token by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `None` when the token is unknown, expired or revoked.
    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>, GatewayError>;
    /// Password grant. `None` on bad credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<AuthSession>, GatewayError>;
}

/// Supabase GoTrue endpoints under `{base_url}/auth/v1`.
#[derive(Clone)]
pub struct SupabaseAuthGateway {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl SupabaseAuthGateway {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.into(), anon_key: anon_key.into(), client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AuthGateway for SupabaseAuthGateway {
    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>, GatewayError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        let response = check_response(response).await?;
        Ok(Some(response.json::<AuthUser>().await?))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<AuthSession>, GatewayError> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        if matches!(response.status(), StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            return Ok(None);
        }
        let response = check_response(response).await?;
        Ok(Some(response.json::<AuthSession>().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::{json, Value};

    async fn user(req: HttpRequest) -> HttpResponse {
        match req.headers().get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer good") => HttpResponse::Ok().json(json!({"id": "u-1", "email": "mod@cveeez.com", "aud": "authenticated"})),
            _ => HttpResponse::Unauthorized().json(json!({"msg": "invalid JWT"})),
        }
    }

    async fn token(query: web::Query<Vec<(String, String)>>, body: web::Json<Value>) -> HttpResponse {
        if !query.iter().any(|(k, v)| k == "grant_type" && v == "password") {
            return HttpResponse::NotFound().finish();
        }
        if body["password"] != "secret" {
            return HttpResponse::BadRequest().json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"}));
        }
        HttpResponse::Ok().json(json!({
            "access_token": "good",
            "refresh_token": "r",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {"id": "u-1", "email": body["email"]}
        }))
    }

    async fn spawn_auth() -> String {
        let server = HttpServer::new(|| {
            App::new().route("/auth/v1/user", web::get().to(user)).route("/auth/v1/token", web::post().to(token))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}")
    }

    #[actix_web::test]
    async fn resolves_user_from_token() {
        let gw = SupabaseAuthGateway::new(spawn_auth().await, "anon", Duration::from_secs(5)).unwrap();
        let user = gw.current_user("good").await.unwrap().unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(gw.current_user("stale").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn password_grant() {
        let gw = SupabaseAuthGateway::new(spawn_auth().await, "anon", Duration::from_secs(5)).unwrap();
        let session = gw.sign_in("mod@cveeez.com", "secret").await.unwrap().unwrap();
        assert_eq!(session.access_token, "good");
        assert_eq!(session.user.email.as_deref(), Some("mod@cveeez.com"));
        assert!(gw.sign_in("mod@cveeez.com", "wrong").await.unwrap().is_none());
    }
}
