use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

#[derive(Clone)]
pub struct UploadConfig {
    pub upload_dir: String,
}

/// Reduce a client-supplied filename to a single safe path component.
/// Directory parts are stripped and anything outside `[A-Za-z0-9._-]`
/// becomes an underscore; leading dots are dropped so the result can never
/// point outside the upload directory.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

pub struct UploadService;

impl UploadService {
    /// Write an uploaded image under the upload directory and return the
    /// stored filename. Same-named uploads overwrite; only the filename is
    /// ever recorded against a report row.
    pub async fn save_image(
        config: &UploadConfig,
        data: &[u8],
        original_name: &str,
    ) -> AppResult<String> {
        let mut filename = sanitize_filename(original_name);
        if filename.is_empty() {
            filename = format!("{}.bin", Uuid::new_v4());
        }

        let dir = Path::new(&config.upload_dir);
        fs::create_dir_all(dir).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to create upload directory: {}", e))
        })?;

        let file_path = dir.join(&filename);
        fs::write(&file_path, data)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write file: {}", e)))?;

        Ok(filename)
    }
}
