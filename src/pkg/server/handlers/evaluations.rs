use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use standard_error::{StandardError, Status};

use crate::{
    pkg::{
        internal::{
            adaptors::{
                jobs::{mutators::JobMutator, selectors::JobSelector, spec::JobStatus},
                uploads::selectors::UploadSelector,
            },
            queue,
        },
        server::state::{AppState, GetTxn},
    },
    prelude::Result,
};

#[derive(Debug, Deserialize)]
pub struct EvaluateInput {
    pub cv_file_id: String,
    pub project_report_file_id: String,
    pub study_case_brief_file_id: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Serialize)]
pub struct EvaluateResponse {
    pub id: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct ResultResponse {
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Accepts an evaluation request: the QUEUED job record and its queue
/// message are committed together, then the job id is returned immediately.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<EvaluateInput>,
) -> Result<(StatusCode, Json<EvaluateResponse>)> {
    let mut tx = state.db_pool.begin_txn().await?;
    UploadSelector::new(&mut tx)
        .require_by_id(&input.cv_file_id)
        .await?;
    UploadSelector::new(&mut tx)
        .require_by_id(&input.project_report_file_id)
        .await?;
    if let Some(brief_id) = &input.study_case_brief_file_id {
        UploadSelector::new(&mut tx).require_by_id(brief_id).await?;
    }

    let job = JobMutator::new(&mut tx).create(&input).await?;
    queue::enqueue(&mut tx, &job.id).await?;
    tx.commit().await?;

    tracing::info!("queued evaluation job {}", job.id);
    Ok((
        StatusCode::ACCEPTED,
        Json(EvaluateResponse {
            id: job.id,
            status: JobStatus::Queued.as_str().into(),
        }),
    ))
}

/// Status query. The result payload is exposed only for COMPLETED jobs; a
/// FAILED job yields a generic message, the underlying error stays in logs.
pub async fn result(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ResultResponse>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobSelector::new(&mut tx)
        .get_by_id(&id)
        .await?
        .ok_or_else(|| StandardError::new("ERR-JOB-404").code(StatusCode::NOT_FOUND))?;

    let response = match job.status {
        JobStatus::Completed => ResultResponse {
            id: job.id,
            status: job.status.as_str().into(),
            result: job.result,
            message: None,
        },
        JobStatus::Failed => ResultResponse {
            id: job.id,
            status: job.status.as_str().into(),
            result: None,
            message: Some("The evaluation process failed. Please try again.".into()),
        },
        _ => ResultResponse {
            id: job.id,
            status: job.status.as_str().into(),
            result: None,
            message: None,
        },
    };
    Ok(Json(response))
}
