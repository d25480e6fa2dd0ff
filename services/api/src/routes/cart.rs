use actix_web::{HttpResponse, delete, get, post, put, web};
use common::AppError;
use db::cart::{add_to_cart, list_cart, remove_cart_item, set_cart_quantity};
use db::products::get_product;
use uuid::Uuid;

use crate::error::HttpApiError;
use crate::extractors::AuthUser;
use crate::schemas::{CartAddInput, CartQuantityInput};
use crate::state::AppState;

#[get("/cart")]
pub async fn list(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, HttpApiError> {
    let rows = list_cart(&data.db, user.id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/cart")]
pub async fn add(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CartAddInput>,
) -> Result<HttpResponse, HttpApiError> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation("quantity must be at least 1".into()).into());
    }
    if get_product(&data.db, body.product_id).await?.is_none() {
        return Err(AppError::NotFound.into());
    }
    let row = add_to_cart(&data.db, user.id, body.product_id, quantity).await?;
    Ok(HttpResponse::Created().json(row))
}

/// Sets a row's quantity; zero or less removes the row.
#[put("/cart/{id}")]
pub async fn set_quantity(
    data: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<CartQuantityInput>,
) -> Result<HttpResponse, HttpApiError> {
    let id = path.into_inner();
    match set_cart_quantity(&data.db, user.id, id, body.quantity).await? {
        Some(row) => Ok(HttpResponse::Ok().json(row)),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": true }))),
    }
}

#[delete("/cart/{id}")]
pub async fn remove(
    data: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, HttpApiError> {
    let id = path.into_inner();
    let affected = remove_cart_item(&data.db, user.id, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound.into());
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": affected })))
}
