use serde::{Deserialize, Serialize};

/// Metadata for one uploaded blob, written after the upload succeeds.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewClientFile {
    pub client_id: String,
    /// Original file name as sent by the browser.
    pub label: String,
    pub file_url: String,
    pub mime_type: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFileInfo {
    pub id: String,
    pub client_id: String,
    pub label: String,
    pub file_url: String,
    pub mime_type: String,
    pub file_size: u64,
}
