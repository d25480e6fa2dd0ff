use actix_web::test;
use api::create_app;
use serde_json::json;
use uuid::Uuid;

mod common;

#[actix_web::test]
async fn auth_flow_register_login_refresh_logout() {
    let Some(state) = common::test_state().await else {
        return;
    };
    let app = test::init_service(create_app(state)).await;

    let email = format!("patient-{}@example.test", Uuid::new_v4());

    // register
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": email, "password": "supersecret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"].as_str().unwrap(), email);
    // absent role registers as patient
    assert_eq!(body["user"]["role"].as_str().unwrap(), "patient");
    assert!(body["tokens"]["access"].as_str().unwrap().starts_with("ey"));

    // duplicate email is a conflict
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": email, "password": "supersecret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);

    // login
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "supersecret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    let refresh_token = body["tokens"]["refresh"].as_str().unwrap().to_string();

    // wrong password
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "not-it" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // refresh rotates the token
    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .cookie(
            actix_web::cookie::Cookie::build("refresh_token", refresh_token.clone())
                .path("/")
                .finish(),
        )
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["access_token"].as_str().unwrap().starts_with("ey"));

    // the spent refresh token no longer works
    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .cookie(
            actix_web::cookie::Cookie::build("refresh_token", refresh_token.clone())
                .path("/")
                .finish(),
        )
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // logout clears cookies
    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .cookie(
            actix_web::cookie::Cookie::build("refresh_token", refresh_token)
                .path("/")
                .finish(),
        )
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn register_requires_valid_fields() {
    let Some(state) = common::test_state().await else {
        return;
    };
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "not-an-email", "password": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "someone@example.test", "password": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}
