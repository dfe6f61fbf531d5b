use crate::handlers::client::client_handler_dto::ClientFormParts;
use actix_multipart::{Field, Multipart, MultipartError};
use biz_service::entitys::file_entity::UploadedFile;
use bytes::BytesMut;
use common::config::UploadConfig;
use common::errors::AppError;
use futures_util::TryStreamExt;

/// Ceiling for a single text part.
const MAX_TEXT_FIELD: usize = 64 * 1024;
/// Ceiling for all text parts of one body together.
const MAX_TEXT_TOTAL: usize = 256 * 1024;
/// Text parts accepted per body, repeated `requested_services[]` included.
const MAX_TEXT_PARTS: usize = 64;

/// Streams the intake form out of a multipart body, enforcing the file count,
/// file size and text limits while reading so nothing oversized is ever
/// buffered whole. Empty file parts (an untouched file input) are skipped.
pub async fn read_client_form(mut payload: Multipart, limits: &UploadConfig) -> Result<ClientFormParts, AppError> {
    let mut parts = ClientFormParts::default();
    let mut text_parts = 0;
    let mut text_bytes = 0;
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().trim_end_matches("[]").to_string();
        let file_name = field.content_disposition().and_then(|cd| cd.get_filename()).map(str::to_string);
        match (name.as_str(), file_name) {
            ("files", Some(file_name)) => {
                if parts.files.len() >= limits.max_files {
                    // once full, only an empty part may follow
                    if read_limited(&mut field, 0).await?.is_none() {
                        return Err(AppError::Validation(format!("At most {} files are allowed", limits.max_files)));
                    }
                    continue;
                }
                let file = read_file(&mut field, file_name, limits.max_file_size).await?;
                if file.body.is_empty() {
                    continue;
                }
                parts.files.push(file);
            }
            ("payment_screenshot", Some(file_name)) => {
                let file = read_file(&mut field, file_name, limits.max_file_size).await?;
                if !file.body.is_empty() {
                    parts.payment_screenshot = Some(file);
                }
            }
            (_, Some(file_name)) => {
                return Err(AppError::Validation(format!("Unexpected file part {name} ({file_name})")));
            }
            (_, None) => {
                text_parts += 1;
                if text_parts > MAX_TEXT_PARTS {
                    return Err(AppError::Validation(format!("At most {MAX_TEXT_PARTS} form fields are allowed")));
                }
                let bytes = read_limited(&mut field, MAX_TEXT_FIELD.min(MAX_TEXT_TOTAL - text_bytes))
                    .await?
                    .ok_or_else(|| too_long(&name, text_bytes))?;
                text_bytes += bytes.len();
                let value = String::from_utf8(bytes.to_vec())
                    .map_err(|_| AppError::Validation(format!("Field {name} is not valid UTF-8")))?;
                parts.form.set_field(&name, value);
            }
        }
    }
    Ok(parts)
}

async fn read_file(field: &mut Field, file_name: String, max_size: usize) -> Result<UploadedFile, AppError> {
    let content_type = field
        .content_type()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.essence_str().to_string());
    let body = read_limited(field, max_size)
        .await?
        .ok_or_else(|| AppError::Validation(format!("File {} exceeds the {} limit", file_name, human_size(max_size))))?;
    Ok(UploadedFile { file_name, content_type, body: body.freeze() })
}

/// `None` once the part grows past `limit` bytes.
async fn read_limited(field: &mut Field, limit: usize) -> Result<Option<BytesMut>, AppError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if buf.len() + chunk.len() > limit {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Some(buf))
}

fn human_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else if bytes > KIB && bytes % KIB == 0 {
        format!("{} KiB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

fn too_long(name: &str, text_bytes: usize) -> AppError {
    if MAX_TEXT_TOTAL - text_bytes < MAX_TEXT_FIELD {
        AppError::Validation(format!("Form fields exceed the {} limit", human_size(MAX_TEXT_TOTAL)))
    } else {
        AppError::Validation(format!("Field {name} is too long"))
    }
}

fn malformed(e: MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}
