use crate::{
    pkg::{
        internal::{
            adaptors::rubrics::mutators::{RubricMutator, DEFAULT_RUBRICS},
            ai::index::IndexOps,
        },
        server::state::{AppState, GetTxn},
    },
    prelude::Result,
};

/// Replaces the stored rubric set with the built-in defaults, embedding each
/// rubric's content alongside its metadata tag.
pub async fn apply() -> Result<()> {
    let state = AppState::new().await?;
    tracing::info!("seeding {} default rubrics", DEFAULT_RUBRICS.len());

    let mut tx = state.db_pool.begin_txn().await?;
    RubricMutator::new(&mut tx).clear().await?;
    for rubric in DEFAULT_RUBRICS {
        tracing::info!("embedding rubric \"{}\"", rubric.parameter);
        let embedding = state.ai_client.embed(&rubric.content()).await?;
        RubricMutator::new(&mut tx).create(rubric, embedding).await?;
    }
    tx.commit().await?;

    println!("Rubrics seeded successfully");
    Ok(())
}
