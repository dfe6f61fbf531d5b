use crate::repository::gateway_error::{check_response, GatewayError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use std::time::Duration;

/// Object storage addressed by `(bucket, key)`.
#[async_trait]
pub trait BlobGateway: Send + Sync {
    /// Stores a new object; an existing key is an error (no upsert).
    async fn upload(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<(), GatewayError>;
    fn public_url(&self, bucket: &str, key: &str) -> String;
    async fn remove(&self, bucket: &str, key: &str) -> Result<(), GatewayError>;
}

/// Supabase storage API (`{base_url}/storage/v1/object/...`).
#[derive(Clone)]
pub struct SupabaseBlobGateway {
    base_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl SupabaseBlobGateway {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url).map_err(|e| GatewayError::InvalidRequest(format!("storage url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidRequest(format!("storage url {base_url} cannot carry a path")));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, api_key: api_key.into(), client })
    }

    /// `{base}/storage/v1/object/{prefix..}/{bucket}/{key..}` with every segment escaped.
    fn object_url(&self, prefix: &[&str], bucket: &str, key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["storage", "v1", "object"]).extend(prefix).push(bucket);
            segments.extend(key.split('/').filter(|s| !s.is_empty()));
        }
        url
    }
}

#[async_trait]
impl BlobGateway for SupabaseBlobGateway {
    async fn upload(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.object_url(&[], bucket, key))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.object_url(&["public"], bucket, key).to_string()
    }

    async fn remove(&self, bucket: &str, key: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.object_url(&[], bucket, ""))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "prefixes": [key] }))
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }
}
