use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which evaluation stage a rubric grounds. The tag doubles as the metadata
/// discriminator stored next to each rubric embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationCategory {
    CvMatch,
    ProjectDeliverable,
}

impl EvaluationCategory {
    pub fn tag(&self) -> &'static str {
        match self {
            EvaluationCategory::CvMatch => "cv_match_evaluation",
            EvaluationCategory::ProjectDeliverable => "project_deliverable_evaluation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RubricEntry {
    pub id: String,
    pub parameter_name: String,
    pub evaluation_type: String,
    pub description: String,
    pub weight: i32,
    pub scoring_guide: String,
    pub embedding_id: String,
}

/// One retrieved rubric line, as fed verbatim into the evaluation prompts.
#[derive(Debug, Clone, FromRow)]
pub struct RubricContext {
    pub content: String,
}

/// Seed-time rubric definition; the full set for one category should sum
/// weights to 100 so the weighted average stays on a 1-5 scale.
pub struct DefaultRubric {
    pub parameter: &'static str,
    pub category: EvaluationCategory,
    pub description: &'static str,
    pub weight: i32,
    pub scoring_guide: &'static str,
}

impl DefaultRubric {
    pub fn content(&self) -> String {
        format!(
            "Parameter: {}. Description: {}. Weight: {}%. Scoring Guide: {}.",
            self.parameter, self.description, self.weight, self.scoring_guide
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::rubrics::mutators::DEFAULT_RUBRICS;

    #[test]
    fn test_category_tags_match_stored_metadata() {
        assert_eq!(EvaluationCategory::CvMatch.tag(), "cv_match_evaluation");
        assert_eq!(
            EvaluationCategory::ProjectDeliverable.tag(),
            "project_deliverable_evaluation"
        );
    }

    #[test]
    fn test_default_rubric_weights_sum_to_100_per_category() {
        for category in [
            EvaluationCategory::CvMatch,
            EvaluationCategory::ProjectDeliverable,
        ] {
            let total: i32 = DEFAULT_RUBRICS
                .iter()
                .filter(|r| r.category == category)
                .map(|r| r.weight)
                .sum();
            assert_eq!(total, 100, "weights for {:?} must sum to 100", category);
        }
    }
}
