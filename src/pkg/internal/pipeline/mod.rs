pub mod prompts;
pub mod spec;
pub mod synthesize;

use std::sync::Arc;

use ai::clients::openai::Client as AIClient;
use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;
use standard_error::{Interpolate, StandardError};

use crate::{
    conf::settings,
    pkg::{
        internal::{
            adaptors::{
                jobs::selectors::JobSelector,
                rubrics::{
                    selectors::RubricSelector,
                    spec::{EvaluationCategory, RubricContext},
                },
                uploads::{selectors::UploadSelector, spec::UploadedFileEntry},
            },
            ai::{
                generate::{GenConfig, GenerateOps},
                read::extract_document,
            },
            github, pii,
            storage::S3Ops,
        },
        server::state::{AppState, GetTxn},
    },
    prelude::Result,
};

use self::spec::{EvaluationOutcome, EvaluationResult, StructuredCv};
use self::synthesize::{PassthroughSynthesizer, Synthesize};

/// Deterministic per-job evaluation chain: read and decode the referenced
/// files, redact the CV, extract a structured CV, run the two rubric-grounded
/// evaluation calls, then hand both outcomes to the synthesizer. Constructed
/// once and shared by the worker; every step suspends on I/O but the steps of
/// one job never overlap.
pub struct EvaluationPipeline {
    db_pool: Arc<PgPool>,
    ai_client: Arc<AIClient>,
    s3_client: Arc<S3Client>,
    http_client: reqwest::Client,
    synthesizer: Box<dyn Synthesize>,
}

impl EvaluationPipeline {
    pub fn new(state: &AppState) -> Self {
        EvaluationPipeline {
            db_pool: state.db_pool.clone(),
            ai_client: state.ai_client.clone(),
            s3_client: state.s3_client.clone(),
            http_client: reqwest::Client::new(),
            synthesizer: Box::new(PassthroughSynthesizer),
        }
    }

    /// Swaps the synthesis stage; the default merge does not issue a fourth
    /// completion call.
    #[allow(dead_code)]
    pub fn with_synthesizer(mut self, synthesizer: Box<dyn Synthesize>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub async fn run(&self, job_id: &str) -> Result<EvaluationResult> {
        let mut tx = self.db_pool.begin_txn().await?;
        let job = JobSelector::new(&mut tx)
            .get_by_id(job_id)
            .await?
            .ok_or_else(|| StandardError::new("ERR-JOB-404"))?;
        let cv_file = UploadSelector::new(&mut tx)
            .require_by_id(&job.cv_file_id)
            .await?;
        let report_file = UploadSelector::new(&mut tx)
            .require_by_id(&job.project_report_file_id)
            .await?;
        let brief_file = match &job.study_case_brief_file_id {
            Some(id) => Some(UploadSelector::new(&mut tx).require_by_id(id).await?),
            None => None,
        };
        drop(tx);

        let cv_text = self.read_text(&cv_file).await?;
        let report_text = self.read_text(&report_file).await?;
        let brief_text = match &brief_file {
            Some(file) => Some(self.read_text(file).await?),
            None => None,
        };

        // only the CV carries candidate PII; report and brief go out as-is
        let redacted_cv = pii::redact(&cv_text);

        let structured_cv: StructuredCv = self
            .ai_client
            .structured_query(
                &prompts::cv_extraction_prompt(&redacted_cv),
                GenConfig::with_temperature(0.1),
            )
            .await?;
        tracing::debug!("extracted {} skills from cv", structured_cv.skills.len());

        let cv_eval = self
            .evaluate_cv_match(&structured_cv, job.job_description.as_deref().unwrap_or(""))
            .await?;
        let project_eval = self
            .evaluate_project(&report_text, brief_text.as_deref())
            .await?;

        self.synthesizer.synthesize(&cv_eval, &project_eval).await
    }

    async fn read_text(&self, file: &UploadedFileEntry) -> Result<String> {
        let (data, _) = self
            .s3_client
            .retrieve_object(&settings.s3_bucket_name, &file.storage_path)
            .await?;
        extract_document(data, &file.mime_type)
    }

    async fn fetch_rubrics(&self, category: EvaluationCategory) -> Result<Vec<RubricContext>> {
        let mut tx = self.db_pool.begin_txn().await?;
        let rubrics = RubricSelector::new(&mut tx)
            .fetch_for_category(category)
            .await?;
        require_rubrics(rubrics, category)
    }

    async fn evaluate_cv_match(
        &self,
        structured_cv: &StructuredCv,
        job_description: &str,
    ) -> Result<EvaluationOutcome> {
        let rubrics = self.fetch_rubrics(EvaluationCategory::CvMatch).await?;
        let prompt = prompts::cv_evaluation_prompt(structured_cv, job_description, &rubrics)?;
        self.ai_client
            .structured_query(&prompt, GenConfig::with_temperature(0.2))
            .await
    }

    async fn evaluate_project(
        &self,
        report_text: &str,
        brief_text: Option<&str>,
    ) -> Result<EvaluationOutcome> {
        let rubrics = self
            .fetch_rubrics(EvaluationCategory::ProjectDeliverable)
            .await?;
        let code_context = match github::find_repo_path(report_text) {
            Some(repo_path) => {
                let fetched = github::fetch_key_files(&self.http_client, &repo_path).await;
                if fetched.is_empty() {
                    None
                } else {
                    Some(fetched)
                }
            }
            None => None,
        };
        let prompt = prompts::project_evaluation_prompt(
            report_text,
            brief_text,
            &rubrics,
            code_context.as_deref(),
        );
        self.ai_client
            .structured_query(&prompt, GenConfig::with_temperature(0.2))
            .await
    }
}

/// Evaluating without grounding rubrics is meaningless, so an empty set
/// aborts before any completion call is spent. Both evaluation stages pass
/// their rubric set through here before building a prompt.
fn require_rubrics(
    rubrics: Vec<RubricContext>,
    category: EvaluationCategory,
) -> Result<Vec<RubricContext>> {
    if rubrics.is_empty() {
        return Err(StandardError::new("ERR-RUBRIC-001")
            .interpolate_err(format!("no rubrics for {}", category.tag())));
    }
    Ok(rubrics)
}

#[cfg(test)]
mod tests {
    use super::require_rubrics;
    use crate::pkg::internal::adaptors::rubrics::spec::{EvaluationCategory, RubricContext};

    #[test]
    fn test_empty_rubric_set_aborts_before_evaluation() {
        assert!(require_rubrics(vec![], EvaluationCategory::CvMatch).is_err());
        assert!(require_rubrics(vec![], EvaluationCategory::ProjectDeliverable).is_err());
    }

    #[test]
    fn test_populated_rubric_set_passes_through_unchanged() {
        let rubrics = vec![RubricContext {
            content: "Parameter: Correctness. Weight: 100%.".into(),
        }];
        let passed = require_rubrics(rubrics, EvaluationCategory::ProjectDeliverable).unwrap();
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].content, "Parameter: Correctness. Weight: 100%.");
    }
}
