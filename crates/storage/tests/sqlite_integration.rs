use learn_core::model::{ProgressState, Theme, TopicId};
use learn_core::time::fixed_clock;
use sqlx::Row;
use storage::repository::{PROGRESS_KEY, ProgressRecord, ProgressRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url)
        .await
        .expect("connect")
        .with_clock(fixed_clock());
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_missing_progress_is_none() {
    let repo = connect("memdb_progress_missing").await;
    assert!(repo.load_progress().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress() {
    let repo = connect("memdb_progress_roundtrip").await;

    let mut state = ProgressState::default();
    state.set_current_step(7);
    state.complete_module(TopicId::new("ownership").unwrap());
    state.complete_module(TopicId::new("borrowing").unwrap());
    state.toggle_theme();
    repo.save_progress(&ProgressRecord::from_state(&state))
        .await
        .unwrap();

    let loaded = repo
        .load_progress()
        .await
        .unwrap()
        .expect("record present")
        .into_state()
        .unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.theme(), Theme::Light);
}

#[tokio::test]
async fn sqlite_save_overwrites_single_entry() {
    let repo = connect("memdb_progress_overwrite").await;

    for step in 1..=3 {
        let mut state = ProgressState::default();
        state.set_current_step(step);
        repo.save_progress(&ProgressRecord::from_state(&state))
            .await
            .unwrap();
    }

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM kv_store WHERE key = ?1")
        .bind(PROGRESS_KEY)
        .fetch_one(repo.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 1);

    let loaded = repo.load_progress().await.unwrap().unwrap();
    assert_eq!(loaded.current_step, 3);
}

#[tokio::test]
async fn sqlite_stores_json_document() {
    let repo = connect("memdb_progress_json").await;
    let record = ProgressRecord {
        current_step: 2,
        completed_modules: vec![TopicId::new("variables").unwrap()],
        theme: Theme::Dark,
    };
    repo.save_progress(&record).await.unwrap();

    let raw: String = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
        .bind(PROGRESS_KEY)
        .fetch_one(repo.pool())
        .await
        .unwrap()
        .get("value");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["currentStep"], 2);
    assert_eq!(json["completedModules"][0], "variables");
    assert_eq!(json["theme"], "dark");
}

#[tokio::test]
async fn sqlite_corrupt_document_is_serialization_error() {
    let repo = connect("memdb_progress_corrupt").await;
    sqlx::query("INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)")
        .bind(PROGRESS_KEY)
        .bind("{not json")
        .bind(fixed_clock().now())
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.load_progress().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let repo = connect("memdb_progress_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
