use crate::auth::{AuthGateway, StaticAuthGateway, SupabaseAuthGateway};
use crate::config::{AppConfig, StorageBackend};
use crate::repository::{MemoryRowGateway, RestRowGateway, RowGateway};
use crate::storage::{BlobGateway, MemoryBlobGateway, SupabaseBlobGateway};
use anyhow::Context;
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Handles to the hosted backend shared by every request.
#[derive(Clone)]
pub struct ServerRes {
    pub rows: Arc<dyn RowGateway>,
    pub blobs: Arc<dyn BlobGateway>,
    pub auth: Arc<dyn AuthGateway>,
    /// Bucket holding client uploads and payment screenshots.
    pub bucket: String,
}

impl ServerRes {
    pub fn new(rows: Arc<dyn RowGateway>, blobs: Arc<dyn BlobGateway>, auth: Arc<dyn AuthGateway>, bucket: impl Into<String>) -> Self {
        Self { rows, blobs, auth, bucket: bucket.into() }
    }

    pub fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let supabase = config.get_supabase();
        match config.get_storage().backend {
            StorageBackend::Supabase => {
                anyhow::ensure!(!supabase.url.is_empty(), "supabase.url is required for the supabase backend");
                let timeout = Duration::from_secs(supabase.timeout_secs);
                let rows = RestRowGateway::new(&supabase.url, &supabase.service_role_key, timeout).context("row gateway")?;
                let blobs =
                    SupabaseBlobGateway::new(&supabase.url, &supabase.service_role_key, timeout).context("blob gateway")?;
                let auth = SupabaseAuthGateway::new(&supabase.url, &supabase.anon_key, timeout).context("auth gateway")?;
                info!("using supabase backend at {}", supabase.url);
                Ok(Self::new(Arc::new(rows), Arc::new(blobs), Arc::new(auth), supabase.bucket))
            }
            StorageBackend::Memory => {
                warn!("using in-memory backend, nothing will be persisted");
                let rows = MemoryRowGateway::new();
                rows.seed(
                    "users",
                    config
                        .dev_users
                        .iter()
                        .map(|u| json!({"id": u.id, "email": u.email, "role": u.role, "full_name": null}))
                        .collect(),
                );
                let auth = StaticAuthGateway::new(config.dev_users.clone());
                Ok(Self::new(Arc::new(rows), Arc::new(MemoryBlobGateway::new()), Arc::new(auth), supabase.bucket))
            }
        }
    }
}
