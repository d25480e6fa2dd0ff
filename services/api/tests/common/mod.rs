use api::ocr::OcrClient;
use api::state::AppState;
use api::storage::FileStore;
use auth::JwtKeys;

/// Builds an AppState against TEST_DATABASE_URL, or None to let the test
/// skip when no database is available (e.g. plain `cargo test` on a dev
/// machine without Postgres).
pub async fn test_state() -> Option<AppState> {
    dotenvy::dotenv().ok();
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping integration test");
            return None;
        }
    };
    let db = db::connect(&url, 5).await.expect("connect test db");
    db::migrate(&db).await.expect("migrate test db");

    let (changes, _) = tokio::sync::broadcast::channel(16);
    Some(AppState {
        db,
        jwt: JwtKeys::from_secret("test_secret_key"),
        access_ttl: 3600,
        refresh_ttl: 60 * 60 * 24 * 7,
        cookie_domain: "localhost".into(),
        cookie_secure: false,
        // port 9 is discard; OCR calls in tests are expected to fail fast
        ocr: OcrClient::new("http://127.0.0.1:9/annotate", ""),
        storage: FileStore::new(std::env::temp_dir().join("medicart-test-uploads")),
        changes,
    })
}
