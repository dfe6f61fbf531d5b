use crate::entitys::file_entity::UploadedFile;
use common::config::ServerRes;
use common::storage::BlobGateway;
use common::util::common_utils::sanitize_file_name;
use common::util::date_util::now_millis;
use common::GatewayError;
use std::sync::Arc;

/// Blob side of client intake: key layout, upload, removal.
pub struct FileService {
    blobs: Arc<dyn BlobGateway>,
    pub bucket: String,
}

impl FileService {
    pub fn new(db_res: ServerRes) -> Self {
        Self { blobs: db_res.blobs, bucket: db_res.bucket }
    }

    /// `{client_id}/{millis}-{file_name}`
    pub fn client_file_key(client_id: &str, millis: i64, file_name: &str) -> String {
        format!("{}/{}-{}", client_id, millis, sanitize_file_name(file_name))
    }

    /// `payments/{client_id}/{millis}-{file_name}`
    pub fn payment_screenshot_key(client_id: &str, millis: i64, file_name: &str) -> String {
        format!("payments/{}/{}-{}", client_id, millis, sanitize_file_name(file_name))
    }

    pub fn public_url(&self, key: &str) -> String {
        self.blobs.public_url(&self.bucket, key)
    }

    /// Uploads without overwrite and returns the object's public URL.
    pub async fn upload(&self, key: &str, file: &UploadedFile) -> Result<String, GatewayError> {
        self.blobs.upload(&self.bucket, key, file.body.clone(), &file.content_type).await?;
        Ok(self.public_url(key))
    }
}

/// Millisecond stamps for blob keys, strictly increasing within one request
/// so two same-named files never collide on a key.
#[derive(Debug, Default)]
pub struct KeyClock {
    last: i64,
}

impl KeyClock {
    pub fn next(&mut self) -> i64 {
        self.last = now_millis().max(self.last + 1);
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layouts() {
        assert_eq!(FileService::client_file_key("c-1", 1700000000000, "my cv.pdf"), "c-1/1700000000000-my_cv.pdf");
        assert_eq!(
            FileService::payment_screenshot_key("c-1", 1700000000001, "receipt.png"),
            "payments/c-1/1700000000001-receipt.png"
        );
    }

    #[test]
    fn clock_never_repeats() {
        let mut clock = KeyClock::default();
        let stamps: Vec<i64> = (0..50).map(|_| clock.next()).collect();
        assert!(stamps.windows(2).all(|w| w[1] > w[0]));
    }
}
