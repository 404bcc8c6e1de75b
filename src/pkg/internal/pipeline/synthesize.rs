use crate::pkg::internal::pipeline::spec::{EvaluationOutcome, EvaluationResult};
use crate::prelude::Result;

/// Final merge of the two evaluation outcomes. Kept behind a trait so a real
/// refine-and-verify completion call can replace the passthrough merge
/// without touching the rest of the chain.
#[async_trait::async_trait]
pub trait Synthesize: Send + Sync {
    async fn synthesize(
        &self,
        cv_eval: &EvaluationOutcome,
        project_eval: &EvaluationOutcome,
    ) -> Result<EvaluationResult>;
}

/// Default synthesis: carries both outcomes through and composes the overall
/// summary from their scores and feedback, with no extra completion call.
/// The CV weighted average (1-5) is normalized to the 0-1 match rate.
pub struct PassthroughSynthesizer;

#[async_trait::async_trait]
impl Synthesize for PassthroughSynthesizer {
    async fn synthesize(
        &self,
        cv_eval: &EvaluationOutcome,
        project_eval: &EvaluationOutcome,
    ) -> Result<EvaluationResult> {
        let cv_match_rate = cv_eval.weighted_average_score / 5.0;
        Ok(EvaluationResult {
            cv_match_rate,
            cv_feedback: cv_eval.feedback.clone(),
            project_score: project_eval.weighted_average_score,
            project_feedback: project_eval.feedback.clone(),
            overall_summary: format!(
                "CV match {:.0}%; project {:.1}/5. {} {}",
                cv_match_rate * 100.0,
                project_eval.weighted_average_score,
                cv_eval.feedback,
                project_eval.feedback
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PassthroughSynthesizer, Synthesize};
    use crate::pkg::internal::pipeline::spec::EvaluationOutcome;
    use tracing_test::traced_test;

    fn outcome(score: f64, feedback: &str) -> EvaluationOutcome {
        EvaluationOutcome {
            evaluation_details: vec![],
            weighted_average_score: score,
            feedback: feedback.into(),
        }
    }

    #[traced_test]
    #[tokio::test]
    async fn test_passthrough_carries_all_five_fields() {
        let result = PassthroughSynthesizer
            .synthesize(
                &outcome(4.2, "solid backend profile"),
                &outcome(3.5, "meets the brief"),
            )
            .await
            .unwrap();
        assert!((result.cv_match_rate - 0.84).abs() < 1e-9);
        assert_eq!(result.cv_feedback, "solid backend profile");
        assert_eq!(result.project_score, 3.5);
        assert_eq!(result.project_feedback, "meets the brief");
        assert!(result.overall_summary.contains("84%"));
        assert!(result.overall_summary.contains("3.5/5"));
    }

    #[tokio::test]
    async fn test_cv_match_rate_is_a_fraction() {
        let result = PassthroughSynthesizer
            .synthesize(&outcome(5.0, "perfect"), &outcome(1.0, "misses the brief"))
            .await
            .unwrap();
        assert_eq!(result.cv_match_rate, 1.0);
        assert!(result.cv_match_rate <= 1.0 && result.cv_match_rate >= 0.0);
    }

    #[tokio::test]
    async fn test_result_serializes_with_required_keys() {
        let result = PassthroughSynthesizer
            .synthesize(&outcome(4.0, "a"), &outcome(3.0, "b"))
            .await
            .unwrap();
        let value = serde_json::to_value(&result).unwrap();
        for key in [
            "cv_match_rate",
            "cv_feedback",
            "project_score",
            "project_feedback",
            "overall_summary",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert!(value["cv_match_rate"].is_number());
        assert!(value["project_score"].is_number());
    }
}
