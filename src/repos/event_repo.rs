//! Event store access: append-only inserts and point reads.
//!
//! `(source, event_id)` is unique; `insert_or_get` is the one place that
//! absorbs a duplicate producer retry.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{Event, EventType};

/// Insert a new event row, or return the id of the existing row on a
/// `(source, event_id)` conflict. The bool is `true` when a new row was
/// inserted (the caller must then also enqueue an outbox item).
pub async fn insert_or_get(
    tx: &mut Transaction<'_, Postgres>,
    event_id: &str,
    source: &str,
    event_type: EventType,
    payload: &serde_json::Value,
) -> Result<(i64, bool), sqlx::Error> {
    let inserted: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO events (event_id, source, type, payload, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (source, event_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(event_id)
    .bind(source)
    .bind(event_type.as_str())
    .bind(payload)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some((id,)) = inserted {
        return Ok((id, true));
    }

    let (id,): (i64,) = sqlx::query_as(
        "SELECT id FROM events WHERE source = $1 AND event_id = $2",
    )
    .bind(source)
    .bind(event_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok((id, false))
}

/// All events of one type, oldest first. Used by the projection rebuild
/// tool to replay mastery in commit order across the whole event log.
pub async fn list_by_type_ordered(
    pool: &PgPool,
    event_type: EventType,
) -> Result<Vec<Event>, sqlx::Error> {
    let rows: Vec<(i64, String, String, String, serde_json::Value, DateTime<Utc>)> =
        sqlx::query_as(
            "SELECT id, event_id, source, type, payload, created_at FROM events WHERE type = $1 ORDER BY created_at, id",
        )
        .bind(event_type.as_str())
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, event_id, source, r#type, payload, created_at)| Event {
            id,
            event_id,
            source,
            r#type: EventType::from_str(&r#type).expect("stored type is always valid"),
            payload,
            created_at,
        })
        .collect())
}

pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Event>, sqlx::Error> {
    let row: Option<(i64, String, String, String, serde_json::Value, DateTime<Utc>)> =
        sqlx::query_as(
            "SELECT id, event_id, source, type, payload, created_at FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(id, event_id, source, r#type, payload, created_at)| Event {
        id,
        event_id,
        source,
        r#type: EventType::from_str(&r#type).expect("stored type is always valid"),
        payload,
        created_at,
    }))
}
