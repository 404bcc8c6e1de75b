use pgvector::Vector;
use serde_json::json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::rubrics::spec::{DefaultRubric, EvaluationCategory, RubricEntry};
use crate::prelude::Result;

/// Built-in rubric set applied by the seed subcommand. Weights within each
/// category sum to 100.
pub const DEFAULT_RUBRICS: &[DefaultRubric] = &[
    DefaultRubric {
        parameter: "Technical Skills Match",
        category: EvaluationCategory::CvMatch,
        description: "Alignment of the candidate's skills with the role's required stack",
        weight: 40,
        scoring_guide: "1 = no overlap, 3 = partial overlap with related technologies, 5 = direct hands-on experience with the required stack",
    },
    DefaultRubric {
        parameter: "Experience Level",
        category: EvaluationCategory::CvMatch,
        description: "Years and seniority of relevant professional experience",
        weight: 25,
        scoring_guide: "1 = no professional experience, 3 = 2-4 years in adjacent roles, 5 = 5+ years in directly comparable roles",
    },
    DefaultRubric {
        parameter: "Relevant Achievements",
        category: EvaluationCategory::CvMatch,
        description: "Concrete, measurable outcomes delivered in past roles or projects",
        weight: 20,
        scoring_guide: "1 = duties only, 3 = some outcomes without measures, 5 = quantified impact on systems or teams",
    },
    DefaultRubric {
        parameter: "Collaboration Fit",
        category: EvaluationCategory::CvMatch,
        description: "Evidence of cross-functional work, mentoring, or team leadership",
        weight: 15,
        scoring_guide: "1 = no signal, 3 = occasional collaboration mentioned, 5 = sustained cross-team or leadership track record",
    },
    DefaultRubric {
        parameter: "Correctness",
        category: EvaluationCategory::ProjectDeliverable,
        description: "Whether the delivered project fulfils the study case brief",
        weight: 30,
        scoring_guide: "1 = misses the brief, 3 = core requirements met with gaps, 5 = complete and faithful to the brief",
    },
    DefaultRubric {
        parameter: "Code Quality & Structure",
        category: EvaluationCategory::ProjectDeliverable,
        description: "Readability, modularity, and idiomatic use of the chosen stack",
        weight: 25,
        scoring_guide: "1 = unstructured, 3 = workable but inconsistent, 5 = clean layering and idiomatic code throughout",
    },
    DefaultRubric {
        parameter: "Resilience & Error Handling",
        category: EvaluationCategory::ProjectDeliverable,
        description: "Handling of failures, retries, and edge cases in the delivered system",
        weight: 20,
        scoring_guide: "1 = happy path only, 3 = basic error propagation, 5 = deliberate failure handling with retries and fallbacks",
    },
    DefaultRubric {
        parameter: "Documentation & Explanation",
        category: EvaluationCategory::ProjectDeliverable,
        description: "Clarity of the report, setup instructions, and design rationale",
        weight: 15,
        scoring_guide: "1 = absent, 3 = usable but thin, 5 = clear rationale covering trade-offs and limitations",
    },
    DefaultRubric {
        parameter: "Creativity / Bonus",
        category: EvaluationCategory::ProjectDeliverable,
        description: "Extra work beyond the brief, such as future improvements or bonus features",
        weight: 10,
        scoring_guide: "1 = none, 3 = ideas listed without implementation, 5 = working extras beyond the brief",
    },
];

pub struct RubricMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> RubricMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        RubricMutator { pool }
    }

    /// Drops all rubric rows and their embeddings so seeding stays idempotent.
    pub async fn clear(&mut self) -> Result<()> {
        sqlx::query("DELETE FROM rubrics")
            .execute(&mut *self.pool)
            .await?;
        sqlx::query("DELETE FROM vectorembeddings WHERE metadata->>'type' LIKE '%_evaluation'")
            .execute(&mut *self.pool)
            .await?;
        Ok(())
    }

    pub async fn create(
        &mut self,
        rubric: &DefaultRubric,
        embedding: Vector,
    ) -> Result<RubricEntry> {
        let embedding_id = Uuid::new_v4().to_string();
        let content = rubric.content();
        sqlx::query(
            "INSERT INTO vectorembeddings (id, content, metadata, embedding)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&embedding_id)
        .bind(&content)
        .bind(json!({"type": rubric.category.tag(), "parameter": rubric.parameter}))
        .bind(embedding)
        .execute(&mut *self.pool)
        .await?;

        let row = sqlx::query_as::<_, RubricEntry>(
            r#"
            INSERT INTO rubrics
                (id, parameter_name, evaluation_type, description, weight, scoring_guide, embedding_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, parameter_name, evaluation_type, description, weight, scoring_guide, embedding_id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(rubric.parameter)
        .bind(rubric.category.tag())
        .bind(rubric.description)
        .bind(rubric.weight)
        .bind(rubric.scoring_guide)
        .bind(&embedding_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
