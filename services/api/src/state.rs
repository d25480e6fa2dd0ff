use auth::JwtKeys;
use db::Db;
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::ocr::OcrClient;
use crate::storage::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub jwt: JwtKeys,
    pub access_ttl: i64,
    pub refresh_ttl: i64,
    pub cookie_domain: String,
    pub cookie_secure: bool,
    pub ocr: OcrClient,
    pub storage: FileStore,
    /// Fan-out of appointment change notifications; feed workers subscribe.
    pub changes: broadcast::Sender<()>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: Option<String>,
    pub access_ttl_seconds: Option<i64>,
    pub refresh_ttl_seconds: Option<i64>,
    pub cookie_domain: Option<String>,
    pub cookie_secure: Option<bool>,
    pub ocr_endpoint: Option<String>,
    pub ocr_api_key: Option<String>,
    pub storage_root: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .expect("config");

        cfg.try_deserialize::<Settings>()
            .expect("deserialize settings")
    }
}
