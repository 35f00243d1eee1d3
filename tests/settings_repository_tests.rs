use storyboard_lib::db::{
    repositories::settings::{self, GEMINI_MODEL_KEY},
    Database,
};

#[tokio::test]
async fn settings_repository_upserts_values() {
    let db = Database::in_memory().await.expect("db should initialize");
    assert!(settings::get_setting(db.pool(), GEMINI_MODEL_KEY)
        .await
        .expect("read")
        .is_none());

    let first = settings::set_setting(db.pool(), GEMINI_MODEL_KEY, "gemini-1.5-pro")
        .await
        .expect("insert");
    assert_eq!(first.value, "gemini-1.5-pro");

    let second = settings::set_setting(db.pool(), GEMINI_MODEL_KEY, "gemini-2.0-flash")
        .await
        .expect("update");
    assert_eq!(second.value, "gemini-2.0-flash");
    assert!(second.updated_at >= first.updated_at);

    let stored = settings::get_setting(db.pool(), GEMINI_MODEL_KEY)
        .await
        .expect("read")
        .expect("present");
    assert_eq!(stored.key, GEMINI_MODEL_KEY);
    assert_eq!(stored.value, "gemini-2.0-flash");
}

#[tokio::test]
async fn deleting_a_setting_reports_whether_it_existed() {
    let db = Database::in_memory().await.expect("db should initialize");
    settings::set_setting(db.pool(), "theme", "dark")
        .await
        .expect("insert");
    assert!(settings::delete_setting(db.pool(), "theme").await.expect("delete"));
    assert!(!settings::delete_setting(db.pool(), "theme").await.expect("delete again"));
}

#[tokio::test]
async fn on_disk_database_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let db = Database::new(dir.path()).await.expect("open");
        settings::set_setting(db.pool(), GEMINI_MODEL_KEY, "gemini-1.5-flash")
            .await
            .expect("insert");
        db.pool().close().await;
    }
    let db = Database::new(dir.path()).await.expect("reopen");
    let stored = settings::get_setting(db.pool(), GEMINI_MODEL_KEY)
        .await
        .expect("read")
        .expect("present");
    assert_eq!(stored.value, "gemini-1.5-flash");
}
