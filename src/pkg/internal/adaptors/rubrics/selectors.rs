use sqlx::PgConnection;

use crate::pkg::internal::adaptors::rubrics::spec::{EvaluationCategory, RubricContext};
use crate::prelude::Result;

pub struct RubricSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> RubricSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        RubricSelector { pool }
    }

    /// Rubric retrieval is an equality filter on the metadata tag, not a
    /// nearest-neighbor search; the embedding column is populated at seed
    /// time but never queried by distance here.
    pub async fn fetch_for_category(
        &mut self,
        category: EvaluationCategory,
    ) -> Result<Vec<RubricContext>> {
        let rows = sqlx::query_as::<_, RubricContext>(
            "SELECT content FROM vectorembeddings WHERE metadata->>'type' = $1 ORDER BY id",
        )
        .bind(category.tag())
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
