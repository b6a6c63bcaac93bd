//! Integration tests for the widget repository.
//!
//! Exercises the repository layer against a real database via
//! `#[sqlx::test]`: create/get round trips, partial updates, delete
//! semantics, pagination clamping, ordering, and the storage-level
//! check constraint.

use sqlx::PgPool;
use widgets_db::models::widget::{CreateWidget, UpdateWidget};
use widgets_db::repositories::{WidgetRepo, WidgetRepoError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_widget(name: &str, parts: i64) -> CreateWidget {
    CreateWidget {
        name: name.to_string(),
        number_of_parts: parts,
    }
}

async fn seed_names(pool: &PgPool, names: &[&str]) {
    for name in names {
        WidgetRepo::create(pool, &new_widget(name, 1))
            .await
            .expect("seed widget");
    }
}

// ---------------------------------------------------------------------------
// Create / get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_get_round_trip(pool: PgPool) {
    let created = WidgetRepo::create(&pool, &new_widget("Widget A", 5))
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.name, "Widget A");
    assert_eq!(created.number_of_parts, 5);
    // Both timestamps come from the same insert statement.
    assert_eq!(created.created_at, created.updated_at);

    let fetched = WidgetRepo::get_by_id(&pool, created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Widget A");
    assert_eq!(fetched.number_of_parts, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ids_are_assigned_monotonically(pool: PgPool) {
    let first = WidgetRepo::create(&pool, &new_widget("first", 1))
        .await
        .unwrap();
    let second = WidgetRepo::create(&pool, &new_widget("second", 1))
        .await
        .unwrap();
    assert!(second.id > first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_names_allowed(pool: PgPool) {
    WidgetRepo::create(&pool, &new_widget("same", 1)).await.unwrap();
    WidgetRepo::create(&pool, &new_widget("same", 2)).await.unwrap();

    let page = WidgetRepo::list(&pool, 1, 10, "id", false).await.unwrap();
    assert_eq!(page.total, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_id_is_not_found(pool: PgPool) {
    let err = WidgetRepo::get_by_id(&pool, 9999).await.unwrap_err();
    assert!(matches!(err, WidgetRepoError::NotFound { id: 9999 }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_constraint_rejects_nonpositive_parts(pool: PgPool) {
    // The boundary validates this too; the CHECK constraint is the
    // storage-level line of defense.
    let err = WidgetRepo::create(&pool, &new_widget("bad", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, WidgetRepoError::Create(_)));

    let page = WidgetRepo::list(&pool, 1, 10, "id", false).await.unwrap();
    assert_eq!(page.total, 0, "failed create must not persist a row");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update_leaves_other_fields(pool: PgPool) {
    let created = WidgetRepo::create(&pool, &new_widget("Widget A", 5))
        .await
        .unwrap();

    let updated = WidgetRepo::update(
        &pool,
        created.id,
        &UpdateWidget {
            name: None,
            number_of_parts: Some(9),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Widget A");
    assert_eq!(updated.number_of_parts, 9);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_update_returns_unchanged_row(pool: PgPool) {
    let created = WidgetRepo::create(&pool, &new_widget("Widget A", 5))
        .await
        .unwrap();

    let updated = WidgetRepo::update(&pool, created.id, &UpdateWidget::default())
        .await
        .unwrap();

    assert_eq!(updated.name, created.name);
    assert_eq!(updated.number_of_parts, created.number_of_parts);
    // No write was issued, so updated_at must be untouched.
    assert_eq!(updated.updated_at, created.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_id_is_not_found(pool: PgPool) {
    let err = WidgetRepo::update(
        &pool,
        424242,
        &UpdateWidget {
            name: Some("ghost".into()),
            number_of_parts: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, WidgetRepoError::NotFound { id: 424242 }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_constraint_violation_rolls_back(pool: PgPool) {
    let created = WidgetRepo::create(&pool, &new_widget("Widget A", 5))
        .await
        .unwrap();

    let err = WidgetRepo::update(
        &pool,
        created.id,
        &UpdateWidget {
            name: None,
            number_of_parts: Some(-1),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, WidgetRepoError::Update(_)));

    let fetched = WidgetRepo::get_by_id(&pool, created.id).await.unwrap();
    assert_eq!(fetched.number_of_parts, 5);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_succeeds_exactly_once(pool: PgPool) {
    let created = WidgetRepo::create(&pool, &new_widget("Widget A", 5))
        .await
        .unwrap();

    WidgetRepo::delete(&pool, created.id).await.unwrap();

    let second = WidgetRepo::delete(&pool, created.id).await.unwrap_err();
    assert!(matches!(second, WidgetRepoError::NotFound { .. }));

    let get = WidgetRepo::get_by_id(&pool, created.id).await.unwrap_err();
    assert!(matches!(get, WidgetRepoError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_id_is_not_found(pool: PgPool) {
    let err = WidgetRepo::delete(&pool, 31337).await.unwrap_err();
    assert!(matches!(err, WidgetRepoError::NotFound { id: 31337 }));
}

// ---------------------------------------------------------------------------
// Listing / pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pagination_counts_and_pages(pool: PgPool) {
    for i in 0..25 {
        WidgetRepo::create(&pool, &new_widget(&format!("widget-{i:02}"), i + 1))
            .await
            .unwrap();
    }

    let page = WidgetRepo::list(&pool, 1, 10, "id", false).await.unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.pages, 3);
    assert_eq!(page.widgets.len(), 10);

    let last = WidgetRepo::list(&pool, 3, 10, "id", false).await.unwrap();
    assert_eq!(last.widgets.len(), 5);

    // Beyond the last page: empty items, same total.
    let beyond = WidgetRepo::list(&pool, 4, 10, "id", false).await.unwrap();
    assert!(beyond.widgets.is_empty());
    assert_eq!(beyond.total, 25);
    assert_eq!(beyond.pages, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_listing_shape(pool: PgPool) {
    let page = WidgetRepo::list(&pool, 1, 10, "id", false).await.unwrap();
    assert!(page.widgets.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.page, 1);
    assert_eq!(page.size, 10);
    assert_eq!(page.pages, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_pagination_inputs_are_clamped(pool: PgPool) {
    seed_names(&pool, &["a", "b", "c"]).await;

    // Negative page clamps to 1.
    let page = WidgetRepo::list(&pool, -1, 10, "id", false).await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.widgets.len(), 3);

    // Zero size falls back to the default of 10.
    let page = WidgetRepo::list(&pool, 1, 0, "id", false).await.unwrap();
    assert_eq!(page.size, 10);

    // Oversized requests cap at 100.
    let page = WidgetRepo::list(&pool, 1, 1000, "id", false).await.unwrap();
    assert_eq!(page.size, 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ordering_by_name(pool: PgPool) {
    seed_names(&pool, &["charlie", "alpha", "bravo"]).await;

    let asc = WidgetRepo::list(&pool, 1, 10, "name", false).await.unwrap();
    let names: Vec<&str> = asc.widgets.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "bravo", "charlie"]);

    let desc = WidgetRepo::list(&pool, 1, 10, "name", true).await.unwrap();
    let names: Vec<&str> = desc.widgets.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["charlie", "bravo", "alpha"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_order_field_falls_back_to_id(pool: PgPool) {
    seed_names(&pool, &["zed", "ann"]).await;

    let page = WidgetRepo::list(&pool, 1, 10, "number_of_parts", false)
        .await
        .unwrap();
    let ids: Vec<i64> = page.widgets.iter().map(|w| w.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

// ---------------------------------------------------------------------------
// Exists / search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_exists(pool: PgPool) {
    let created = WidgetRepo::create(&pool, &new_widget("here", 1))
        .await
        .unwrap();

    assert!(WidgetRepo::exists(&pool, created.id).await);
    assert!(!WidgetRepo::exists(&pool, created.id + 1000).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_name_pattern_search_is_case_insensitive(pool: PgPool) {
    seed_names(&pool, &["Gear Assembly", "Sprocket", "Small gear", "Axle"]).await;

    let matches = WidgetRepo::find_by_name_pattern(&pool, "GEAR").await.unwrap();
    let names: Vec<&str> = matches.iter().map(|w| w.name.as_str()).collect();
    // Ordered by name ascending.
    assert_eq!(names, vec!["Gear Assembly", "Small gear"]);

    let none = WidgetRepo::find_by_name_pattern(&pool, "widgetless")
        .await
        .unwrap();
    assert!(none.is_empty());
}
