use actix_web::test;
use api::create_app;
use base64::Engine;
use serde_json::json;
use uuid::Uuid;

mod common;

#[actix_web::test]
async fn catalog_and_cart_flow() {
    let Some(state) = common::test_state().await else {
        return;
    };
    let app = test::init_service(create_app(state)).await;

    let run = Uuid::new_v4();
    let mut tokens = std::collections::HashMap::new();
    for (name, role) in [("admin", "admin"), ("shopper", "patient")] {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "email": format!("{name}-{run}@example.test"),
                "password": "supersecret",
                "role": role,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        tokens.insert(
            name,
            format!("Bearer {}", body["tokens"]["access"].as_str().unwrap()),
        );
    }

    let product = json!({
        "name": format!("Paracetamol {run}"),
        "description": "500mg tablets",
        "category": "painkillers",
        "price": 4.99,
        "stock_quantity": 120,
        "prescription_required": false,
        "image_url": null,
    });

    // only admins may create products
    let req = test::TestRequest::post()
        .uri("/products")
        .insert_header(("Authorization", tokens["shopper"].clone()))
        .set_json(&product)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    let req = test::TestRequest::post()
        .uri("/products")
        .insert_header(("Authorization", tokens["admin"].clone()))
        .set_json(&product)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let product_id = created["id"].as_str().unwrap().to_string();

    // the catalog is public and searchable
    let req = test::TestRequest::get()
        .uri(&format!("/products?search=paracetamol+{run}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // adding the same product twice merges into one row
    for quantity in [1, 2] {
        let req = test::TestRequest::post()
            .uri("/cart")
            .insert_header(("Authorization", tokens["shopper"].clone()))
            .set_json(json!({ "product_id": product_id, "quantity": quantity }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/cart")
        .insert_header(("Authorization", tokens["shopper"].clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let lines = body.as_array().unwrap();
    let line = lines
        .iter()
        .find(|l| l["product_id"].as_str() == Some(product_id.as_str()))
        .expect("cart line present");
    assert_eq!(line["quantity"].as_i64().unwrap(), 3);
    let line_id = line["id"].as_str().unwrap().to_string();

    // quantity zero deletes the row
    let req = test::TestRequest::put()
        .uri(&format!("/cart/{line_id}"))
        .insert_header(("Authorization", tokens["shopper"].clone()))
        .set_json(json!({ "quantity": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["deleted"].as_bool(), Some(true));

    let req = test::TestRequest::get()
        .uri("/cart")
        .insert_header(("Authorization", tokens["shopper"].clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l["id"].as_str() == Some(line_id.as_str())));
}

#[actix_web::test]
async fn prescription_verify_failure_paths() {
    let Some(state) = common::test_state().await else {
        return;
    };
    let app = test::init_service(create_app(state)).await;

    let run = Uuid::new_v4();
    let mut tokens = std::collections::HashMap::new();
    for (name, role) in [("admin", "admin"), ("patient", "patient")] {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "email": format!("rx-{name}-{run}@example.test"),
                "password": "supersecret",
                "role": role,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        tokens.insert(
            name,
            format!("Bearer {}", body["tokens"]["access"].as_str().unwrap()),
        );
    }

    let req = test::TestRequest::post()
        .uri("/products")
        .insert_header(("Authorization", tokens["admin"].clone()))
        .set_json(json!({
            "name": format!("Amoxicillin {run}"),
            "description": null,
            "category": "antibiotics",
            "price": 12.50,
            "stock_quantity": 40,
            "prescription_required": true,
            "image_url": null,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let product: serde_json::Value = test::read_body_json(resp).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    // malformed base64 is rejected before any store call
    let req = test::TestRequest::post()
        .uri("/prescriptions/verify")
        .insert_header(("Authorization", tokens["patient"].clone()))
        .set_json(json!({ "product_id": product_id, "image_base64": "!!not-base64!!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // the test OCR endpoint is unreachable: the call surfaces as 503
    let image = base64::engine::general_purpose::STANDARD.encode(b"fake image bytes");
    let req = test::TestRequest::post()
        .uri("/prescriptions/verify")
        .insert_header(("Authorization", tokens["patient"].clone()))
        .set_json(json!({ "product_id": product_id, "image_base64": image }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);

    // nothing was recorded for the failed attempt
    let req = test::TestRequest::get()
        .uri("/prescriptions")
        .insert_header(("Authorization", tokens["patient"].clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.as_array().unwrap().is_empty());
}
