//! Integration tests for work-item lookup by referenced record id.

use sqlx::PgPool;

use profold_db::repositories::WorkItemRepo;

#[sqlx::test(migrations = "./migrations")]
async fn find_referencing_matches_exact_elements_only(pool: PgPool) {
    let sole = WorkItemRepo::create(&pool, "sole", "", "12").await.unwrap();
    let first = WorkItemRepo::create(&pool, "first", "", "12,40,51")
        .await
        .unwrap();
    let middle = WorkItemRepo::create(&pool, "middle", "", "3,12,51")
        .await
        .unwrap();
    let last = WorkItemRepo::create(&pool, "last", "", "3,40,12")
        .await
        .unwrap();
    // Substring decoys: 112 and 120 contain "12" but are different ids.
    WorkItemRepo::create(&pool, "decoy-super", "", "112")
        .await
        .unwrap();
    WorkItemRepo::create(&pool, "decoy-prefix", "", "120,40")
        .await
        .unwrap();
    WorkItemRepo::create(&pool, "decoy-middle", "", "3,112,51")
        .await
        .unwrap();
    WorkItemRepo::create(&pool, "empty", "", "").await.unwrap();

    let found = WorkItemRepo::find_referencing(&pool, 12).await.unwrap();
    let ids: Vec<i64> = found.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![sole.id, first.id, middle.id, last.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_model_ids_overwrites_list(pool: PgPool) {
    let item = WorkItemRepo::create(&pool, "t", "MKT", "5").await.unwrap();

    WorkItemRepo::update_model_ids(&pool, item.id, "5,9,10")
        .await
        .unwrap();

    let loaded = WorkItemRepo::find_by_id(&pool, item.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.model_ids, "5,9,10");
}
