//! Claim exclusivity under concurrent callers. Requires `DATABASE_URL`;
//! run with `--ignored`. Serialized: `claim_next`
//! claims globally across the whole outbox table, so this test cannot
//! share a database with another test racing for the same pending rows.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use mastery_rs::services::queue_service::Queue;
use serde_json::json;
use serial_test::serial;
use uuid::Uuid;

async fn seed_pending(pool: &sqlx::PgPool, class_id: &str, count: usize) {
    for i in 0..count {
        let mut tx = pool.begin().await.expect("begin");
        let event_id = format!("claim-{i}-{}", Uuid::new_v4());
        let payload = json!({
            "event_id": event_id,
            "source": "claim-test",
            "student_id": "st1",
            "class_id": class_id,
            "assignment_id": "a1",
            "standard_ids": ["std1"],
        });
        let (event_db_id,): (i64,) = sqlx::query_as(
            "INSERT INTO events (event_id, source, type, payload, created_at) VALUES ($1, $2, 'ASSIGNMENT_ASSIGNED', $3, NOW()) RETURNING id",
        )
        .bind(&event_id)
        .bind("claim-test")
        .bind(&payload)
        .fetch_one(&mut *tx)
        .await
        .expect("insert event");

        sqlx::query("INSERT INTO event_outbox (event_db_id, status, attempts) VALUES ($1, 'pending', 0)")
            .bind(event_db_id)
            .execute(&mut *tx)
            .await
            .expect("insert outbox");

        tx.commit().await.expect("commit");
    }
}

#[tokio::test]
#[ignore]
#[serial]
async fn concurrent_claims_never_overlap() {
    let pool = common::get_test_pool().await;
    let class_id = format!("claimtest-{}", Uuid::new_v4());
    seed_pending(&pool, &class_id, 20).await;

    let queue = Arc::new(Queue::new(pool.clone(), 3));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let queue = queue.clone();
        handles.push(tokio::spawn(async move {
            queue.claim(10).await.expect("claim")
        }));
    }

    let mut all_ids = Vec::new();
    for handle in handles {
        let items = handle.await.expect("join");
        all_ids.extend(items.into_iter().map(|i| i.id));
    }

    let unique: HashSet<i64> = all_ids.iter().copied().collect();
    assert_eq!(unique.len(), all_ids.len(), "an item was claimed twice");
    assert!(all_ids.len() <= 20);

    common::cleanup_class(&pool, &class_id).await;
}
