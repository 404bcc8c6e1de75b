use sqlx::PgConnection;

use crate::pkg::internal::adaptors::jobs::spec::EvaluationJobEntry;
use crate::prelude::Result;

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: &str) -> Result<Option<EvaluationJobEntry>> {
        let row = sqlx::query_as::<_, EvaluationJobEntry>(
            "SELECT id, cv_file_id, project_report_file_id, study_case_brief_file_id,
                    job_description, status, result, created_at, updated_at
             FROM evaluation_jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
