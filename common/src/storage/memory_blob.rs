use crate::repository::gateway_error::GatewayError;
use crate::storage::blob_gateway::BlobGateway;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// In-process `BlobGateway`. Keys are stored as `{bucket}/{key}`.
#[derive(Default)]
pub struct MemoryBlobGateway {
    objects: DashMap<String, StoredObject>,
    /// uploads whose key contains one of these fragments fail
    failing_keys: DashMap<String, ()>,
    /// uploads that land but whose reply is lost
    lost_keys: DashMap<String, ()>,
    fail_removals: AtomicBool,
}

impl MemoryBlobGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads_matching(&self, fragment: &str) {
        self.failing_keys.insert(fragment.to_string(), ());
    }

    /// Uploads whose key contains `fragment` are stored, then reported as timed out.
    pub fn lose_upload_replies_matching(&self, fragment: &str) {
        self.lost_keys.insert(fragment.to_string(), ());
    }

    pub fn fail_removals(&self) {
        self.fail_removals.store(true, Ordering::SeqCst);
    }

    /// Keys currently held in `bucket`, sorted.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let prefix = format!("{bucket}/");
        let mut keys: Vec<String> =
            self.objects.iter().filter_map(|entry| entry.key().strip_prefix(&prefix).map(str::to_string)).collect();
        keys.sort();
        keys
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects.get(&format!("{bucket}/{key}")).map(|o| o.clone())
    }
}

#[async_trait]
impl BlobGateway for MemoryBlobGateway {
    async fn upload(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<(), GatewayError> {
        if self.failing_keys.iter().any(|fragment| key.contains(fragment.key().as_str())) {
            return Err(GatewayError::Rejected { status: 500, message: format!("upload of {key} failed") });
        }
        let full_key = format!("{bucket}/{key}");
        match self.objects.entry(full_key) {
            Entry::Occupied(_) => {
                Err(GatewayError::Rejected { status: 409, message: "The resource already exists".to_string() })
            }
            Entry::Vacant(slot) => {
                slot.insert(StoredObject { body, content_type: content_type.to_string() });
                if self.lost_keys.iter().any(|fragment| key.contains(fragment.key().as_str())) {
                    return Err(GatewayError::Timeout);
                }
                Ok(())
            }
        }
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }

    async fn remove(&self, bucket: &str, key: &str) -> Result<(), GatewayError> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected { status: 500, message: format!("remove of {key} failed") });
        }
        self.objects.remove(&format!("{bucket}/{key}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_refuses_existing_key() {
        let gw = MemoryBlobGateway::new();
        gw.upload("b", "c-1/1-cv.pdf", Bytes::from_static(b"x"), "application/pdf").await.unwrap();
        let err = gw.upload("b", "c-1/1-cv.pdf", Bytes::from_static(b"y"), "application/pdf").await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { status: 409, .. }));
        assert_eq!(gw.get("b", "c-1/1-cv.pdf").unwrap().body, Bytes::from_static(b"x"));
    }

    #[tokio::test]
    async fn injected_failures() {
        let gw = MemoryBlobGateway::new();
        gw.fail_uploads_matching("broken");
        assert!(gw.upload("b", "c-1/1-broken.pdf", Bytes::new(), "application/pdf").await.is_err());
        gw.upload("b", "c-1/2-ok.pdf", Bytes::new(), "application/pdf").await.unwrap();
        gw.fail_removals();
        assert!(gw.remove("b", "c-1/2-ok.pdf").await.is_err());
        assert_eq!(gw.keys("b"), vec!["c-1/2-ok.pdf".to_string()]);
    }

    #[tokio::test]
    async fn lost_reply_keeps_the_object() {
        let gw = MemoryBlobGateway::new();
        gw.lose_upload_replies_matching("slow");
        let err = gw.upload("b", "c-1/3-slow.pdf", Bytes::new(), "application/pdf").await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
        assert_eq!(gw.keys("b"), vec!["c-1/3-slow.pdf".to_string()]);
    }
}
