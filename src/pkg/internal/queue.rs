use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};

use crate::{conf::settings, prelude::Result};

/// One durable processing request. `attempts` counts deliveries already
/// handed out, `available_at` is when the message next becomes visible.
#[derive(Debug, Clone, FromRow)]
pub struct QueueMessage {
    pub id: i64,
    pub job_id: String,
    pub attempts: i32,
    pub available_at: DateTime<Utc>,
}

/// Redelivery delay after the nth delivered attempt fails: base, 2x base,
/// 4x base. With the default 5000 ms base that is 5s, 10s, 20s.
pub fn backoff_delay_ms(base_ms: i64, attempt: i32) -> i64 {
    base_ms << (attempt.max(1) - 1)
}

/// Durably records a processing request for `job_id`. Runs inside the same
/// transaction that creates the job record, so a job row and its queue
/// message exist together or not at all.
pub async fn enqueue(txn: &mut PgConnection, job_id: &str) -> Result<()> {
    sqlx::query("INSERT INTO queue_messages (job_id, attempts, available_at) VALUES ($1, 0, now())")
        .bind(job_id)
        .execute(&mut *txn)
        .await?;
    Ok(())
}

/// Claims the next visible message. Claiming counts as a delivery: attempts
/// is incremented and the message is pushed forward by the backoff for this
/// attempt, so a worker that crashes mid-pipeline leaves the message to
/// reappear on its own (at-least-once).
pub async fn claim(txn: &mut PgConnection) -> Result<Option<QueueMessage>> {
    let row = sqlx::query_as::<_, QueueMessage>(
        r#"
        WITH next AS (
            SELECT id FROM queue_messages
            WHERE available_at <= now() AND attempts < $1
            ORDER BY available_at
            FOR UPDATE SKIP LOCKED
            LIMIT 1
        )
        UPDATE queue_messages m
        SET attempts = m.attempts + 1,
            available_at = now() + ($2 * power(2, m.attempts)) * interval '1 millisecond'
        FROM next
        WHERE m.id = next.id
        RETURNING m.id, m.job_id, m.attempts, m.available_at
        "#,
    )
    .bind(settings.queue_max_attempts)
    .bind(settings.queue_backoff_base_ms as f64)
    .fetch_optional(&mut *txn)
    .await?;
    Ok(row)
}

/// Removes a settled message: either the attempt succeeded, or attempts are
/// exhausted and the message is dropped with no further automatic retry.
pub async fn ack(txn: &mut PgConnection, message_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM queue_messages WHERE id = $1")
        .bind(message_id)
        .execute(&mut *txn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::backoff_delay_ms;

    #[test]
    fn test_exponential_backoff_from_5s() {
        assert_eq!(backoff_delay_ms(5000, 1), 5000);
        assert_eq!(backoff_delay_ms(5000, 2), 10000);
        assert_eq!(backoff_delay_ms(5000, 3), 20000);
    }

    #[test]
    fn test_backoff_clamps_low_attempts() {
        assert_eq!(backoff_delay_ms(5000, 0), 5000);
    }
}
