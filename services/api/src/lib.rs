pub mod error;
pub mod extractors;
pub mod feed;
pub mod middleware;
pub mod ocr;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod storage;

use actix_web::{App, web};

pub fn create_app(
    state: state::AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(middleware::Authn)
        .app_data(web::Data::new(state))
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
}
