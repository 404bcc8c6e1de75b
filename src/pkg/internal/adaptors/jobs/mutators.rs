use sqlx::PgConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::jobs::spec::{EvaluationJobEntry, JobStatus};
use crate::pkg::server::handlers::evaluations::EvaluateInput;
use crate::prelude::Result;

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, input: &EvaluateInput) -> Result<EvaluationJobEntry> {
        let row = sqlx::query_as::<_, EvaluationJobEntry>(
            r#"
            INSERT INTO evaluation_jobs
                (id, cv_file_id, project_report_file_id, study_case_brief_file_id, job_description, status)
            VALUES ($1, $2, $3, $4, $5, 'QUEUED')
            RETURNING id, cv_file_id, project_report_file_id, study_case_brief_file_id,
                      job_description, status, result, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.cv_file_id)
        .bind(&input.project_report_file_id)
        .bind(&input.study_case_brief_file_id)
        .bind(&input.job_description)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Conditional claim for one delivery attempt. Moves the job to
    /// PROCESSING only from QUEUED or FAILED, so a stale redelivery cannot
    /// stomp on a job another worker already completed.
    pub async fn mark_processing(&mut self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE evaluation_jobs
            SET status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND (status = $3 OR status = $4)
            "#,
        )
        .bind(id)
        .bind(JobStatus::Processing)
        .bind(JobStatus::Queued)
        .bind(JobStatus::Failed)
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Single atomic write of the terminal result. Only a PROCESSING job can
    /// complete, and the result column is written exactly here.
    pub async fn complete(&mut self, id: &str, result: &serde_json::Value) -> Result<bool> {
        let done = sqlx::query(
            r#"
            UPDATE evaluation_jobs
            SET status = $2, result = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(id)
        .bind(JobStatus::Completed)
        .bind(result)
        .bind(JobStatus::Processing)
        .execute(&mut *self.pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    pub async fn fail(&mut self, id: &str) -> Result<bool> {
        let done = sqlx::query(
            r#"
            UPDATE evaluation_jobs
            SET status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = $3
            "#,
        )
        .bind(id)
        .bind(JobStatus::Failed)
        .bind(JobStatus::Processing)
        .execute(&mut *self.pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }
}
