use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an evaluation job. Transitions are one-directional:
/// QUEUED -> PROCESSING -> {COMPLETED, FAILED}. FAILED is terminal for a
/// single delivery only; the queue may redeliver until attempts run out,
/// which moves the job back through PROCESSING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    #[allow(dead_code)]
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (*self, next),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
                | (JobStatus::Failed, JobStatus::Processing)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationJobEntry {
    pub id: String,
    pub cv_file_id: String,
    pub project_report_file_id: String,
    pub study_case_brief_file_id: Option<String>,
    pub job_description: Option<String>,
    pub status: JobStatus,
    pub result: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::JobStatus;

    #[test]
    fn test_no_shortcut_to_terminal_states() {
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Processing));
    }

    #[test]
    fn test_completed_is_globally_terminal() {
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn test_failed_allows_redelivery() {
        assert!(JobStatus::Failed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Completed));
    }
}
