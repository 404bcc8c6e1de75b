use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Immutable record of a previously uploaded document. Rows are produced by
/// the upload surface; the pipeline only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UploadedFileEntry {
    pub id: String,
    pub original_filename: String,
    pub storage_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}
