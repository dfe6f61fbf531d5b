use bytes::Bytes;

/// One file part received from the intake form, fully buffered.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Name as sent by the browser, before key sanitising.
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}
