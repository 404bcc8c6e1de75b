use sqlx::PgConnection;
use standard_error::StandardError;

use crate::pkg::internal::adaptors::uploads::spec::UploadedFileEntry;
use crate::prelude::Result;

pub struct UploadSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> UploadSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        UploadSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: &str) -> Result<Option<UploadedFileEntry>> {
        let row = sqlx::query_as::<_, UploadedFileEntry>(
            "SELECT id, original_filename, storage_path, mime_type, file_size, created_at
             FROM uploaded_files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn require_by_id(&mut self, id: &str) -> Result<UploadedFileEntry> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StandardError::new("ERR-FILE-404"))
    }
}
