use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod extractors;
mod feed;
mod middleware;
mod ocr;
mod routes;
mod schemas;
mod state;
mod storage;
use state::{AppState, Settings};

const VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let s = Settings::from_env();
    let db = db::connect(&s.database_url, 10).await.expect("db");
    db::migrate(&db).await.expect("migrations");

    let changes = feed::spawn_change_relay(db.clone());

    let state = AppState {
        db: db.clone(),
        jwt: auth::JwtKeys::from_secret(&s.jwt_secret),
        access_ttl: s.access_ttl_seconds.unwrap_or(900),
        refresh_ttl: s.refresh_ttl_seconds.unwrap_or(60 * 60 * 24 * 7),
        cookie_domain: s.cookie_domain.unwrap_or_else(|| "localhost".into()),
        cookie_secure: s.cookie_secure.unwrap_or(false),
        ocr: ocr::OcrClient::new(
            s.ocr_endpoint.unwrap_or_else(|| VISION_ENDPOINT.into()),
            s.ocr_api_key.unwrap_or_default(),
        ),
        storage: storage::FileStore::new(s.storage_root.unwrap_or_else(|| "uploads".into())),
        changes,
    };

    let governor_conf = GovernorConfigBuilder::default()
        .burst_size(10)
        .finish()
        .unwrap();

    let bind = s.bind_addr.unwrap_or_else(|| "0.0.0.0:8080".into());
    info!(%bind, "starting api");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method();
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(Governor::new(&governor_conf))
            .wrap(middleware::Authn)
            .app_data(web::Data::new(state.clone()))
            .service(routes::auth::register)
            .service(routes::auth::login)
            .service(routes::auth::refresh)
            .service(routes::auth::logout)
            .service(routes::appointments::book)
            .service(routes::appointments::feed)
            .service(routes::appointments::list)
            .service(routes::appointments::claim)
            .service(routes::products::list)
            .service(routes::products::get)
            .service(routes::products::create)
            .service(routes::products::update)
            .service(routes::products::remove)
            .service(routes::cart::list)
            .service(routes::cart::add)
            .service(routes::cart::set_quantity)
            .service(routes::cart::remove)
            .service(routes::profile::get)
            .service(routes::profile::update)
            .service(routes::prescriptions::list)
            .service(routes::prescriptions::verify)
            .service(routes::admin::stats)
            .service(routes::admin::users)
            .service(routes::admin::doctors)
            .default_service(web::to(|| async { HttpResponse::NotFound().finish() }))
    })
    .bind(bind)?
    .run()
    .await
}
