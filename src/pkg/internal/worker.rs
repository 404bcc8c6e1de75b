use std::time::Duration;

use crate::{
    conf::settings,
    pkg::{
        internal::{
            adaptors::jobs::{
                mutators::JobMutator,
                selectors::JobSelector,
                spec::JobStatus,
            },
            pipeline::EvaluationPipeline,
            queue::{self, backoff_delay_ms, QueueMessage},
        },
        server::state::{AppState, GetTxn},
    },
    prelude::Result,
};

/// Runs the queue consumer until interrupted. One message is processed at a
/// time; additional worker processes may consume the same queue concurrently,
/// which is why every claim is conditional.
pub async fn work() -> Result<()> {
    let state = AppState::new().await?;
    let pipeline = EvaluationPipeline::new(&state);
    tracing::info!("worker consuming evaluation queue");
    tokio::select! {
        r = consume(&state, &pipeline) => {
            tracing::warn!("worker ended unexpectedly: {:?}", &r)
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c interrupt, draining worker");
        }
    }
    Ok(())
}

async fn consume(state: &AppState, pipeline: &EvaluationPipeline) -> Result<()> {
    loop {
        let message = {
            let mut tx = state.db_pool.begin_txn().await?;
            let message = queue::claim(&mut tx).await?;
            tx.commit().await?;
            message
        };
        match message {
            Some(message) => process_delivery(state, pipeline, message).await?,
            None => {
                tokio::time::sleep(Duration::from_millis(settings.queue_poll_interval_ms)).await;
            }
        }
    }
}

/// The claim handing out attempt `max_attempts` is the last delivery a
/// message gets.
fn attempts_exhausted(attempts: i32, max_attempts: i32) -> bool {
    attempts >= max_attempts
}

/// What to do with a delivery whose job refused the PROCESSING transition.
#[derive(Debug, PartialEq)]
enum UnclaimedAction {
    /// the job is settled, the message is a leftover duplicate
    Ack,
    /// another attempt may still be running; the claim already pushed the
    /// message into its backoff window, so redelivery takes care of itself
    Leave,
    /// the final delivery found the job stalled in PROCESSING (a crashed
    /// attempt never settled it), so settle it now
    FailAndAck,
}

fn settle_unclaimed(status: JobStatus, attempts: i32, max_attempts: i32) -> UnclaimedAction {
    match status {
        JobStatus::Completed => UnclaimedAction::Ack,
        JobStatus::Processing if attempts_exhausted(attempts, max_attempts) => {
            UnclaimedAction::FailAndAck
        }
        _ => UnclaimedAction::Leave,
    }
}

/// One delivery attempt. Pipeline failures never escape the loop: the job is
/// marked FAILED and the message either stays queued for redelivery or is
/// dropped once attempts are exhausted.
async fn process_delivery(
    state: &AppState,
    pipeline: &EvaluationPipeline,
    message: QueueMessage,
) -> Result<()> {
    let job_id = message.job_id.clone();
    tracing::info!(
        "processing job {} (attempt {}/{}, visible again at {})",
        job_id,
        message.attempts,
        settings.queue_max_attempts,
        message.available_at
    );

    let mut tx = state.db_pool.begin_txn().await?;
    let claimed = JobMutator::new(&mut tx).mark_processing(&job_id).await?;
    tx.commit().await?;
    if !claimed {
        return settle_unclaimed_delivery(state, message).await;
    }

    match pipeline.run(&job_id).await {
        Ok(result) => {
            let payload = serde_json::to_value(&result)?;
            let mut tx = state.db_pool.begin_txn().await?;
            JobMutator::new(&mut tx).complete(&job_id, &payload).await?;
            queue::ack(&mut tx, message.id).await?;
            tx.commit().await?;
            tracing::info!("job {} completed", job_id);
        }
        Err(err) => {
            tracing::error!("job {} failed: {}", job_id, err);
            let mut tx = state.db_pool.begin_txn().await?;
            JobMutator::new(&mut tx).fail(&job_id).await?;
            if attempts_exhausted(message.attempts, settings.queue_max_attempts) {
                tracing::warn!("job {} exhausted its retries, dropping message", job_id);
                queue::ack(&mut tx, message.id).await?;
            } else {
                tracing::info!(
                    "job {} will be redelivered in {}ms",
                    job_id,
                    backoff_delay_ms(settings.queue_backoff_base_ms, message.attempts)
                );
            }
            tx.commit().await?;
        }
    }
    Ok(())
}

/// The message must stay in the queue while its job might still be in flight,
/// otherwise the remaining retry budget is lost with it.
async fn settle_unclaimed_delivery(state: &AppState, message: QueueMessage) -> Result<()> {
    let mut tx = state.db_pool.begin_txn().await?;
    let status = JobSelector::new(&mut tx)
        .get_by_id(&message.job_id)
        .await?
        .map(|job| job.status);
    match status {
        None => {
            tracing::warn!("job {} no longer exists, discarding delivery", message.job_id);
            queue::ack(&mut tx, message.id).await?;
        }
        Some(status) => match settle_unclaimed(status, message.attempts, settings.queue_max_attempts)
        {
            UnclaimedAction::Ack => {
                tracing::info!("job {} already settled, discarding duplicate", message.job_id);
                queue::ack(&mut tx, message.id).await?;
            }
            UnclaimedAction::Leave => {
                tracing::info!(
                    "job {} is busy, leaving message to reappear at {}",
                    message.job_id,
                    message.available_at
                );
            }
            UnclaimedAction::FailAndAck => {
                tracing::warn!(
                    "job {} stalled in processing with no retries left, marking failed",
                    message.job_id
                );
                JobMutator::new(&mut tx).fail(&message.job_id).await?;
                queue::ack(&mut tx, message.id).await?;
            }
        },
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{attempts_exhausted, settle_unclaimed, UnclaimedAction};
    use crate::pkg::internal::adaptors::jobs::spec::JobStatus;

    #[test]
    fn test_three_attempt_cap() {
        assert!(!attempts_exhausted(1, 3));
        assert!(!attempts_exhausted(2, 3));
        assert!(attempts_exhausted(3, 3));
    }

    #[test]
    fn test_busy_job_keeps_its_message() {
        assert_eq!(
            settle_unclaimed(JobStatus::Processing, 1, 3),
            UnclaimedAction::Leave
        );
        assert_eq!(
            settle_unclaimed(JobStatus::Processing, 2, 3),
            UnclaimedAction::Leave
        );
    }

    #[test]
    fn test_settled_job_drops_duplicate_delivery() {
        assert_eq!(
            settle_unclaimed(JobStatus::Completed, 1, 3),
            UnclaimedAction::Ack
        );
        assert_eq!(
            settle_unclaimed(JobStatus::Completed, 3, 3),
            UnclaimedAction::Ack
        );
    }

    #[test]
    fn test_stalled_job_settles_as_failed_on_last_delivery() {
        assert_eq!(
            settle_unclaimed(JobStatus::Processing, 3, 3),
            UnclaimedAction::FailAndAck
        );
    }
}
