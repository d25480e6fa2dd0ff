use actix_web::{HttpResponse, delete, get, post, put, web};
use common::{AppError, Role};
use db::products::{delete_product, get_product, insert_product, list_products, update_product};
use tracing::info;
use uuid::Uuid;

use crate::error::HttpApiError;
use crate::extractors::{AuthUser, require_role};
use crate::schemas::{ProductFilter, ProductIn};
use crate::state::AppState;

fn validate(body: &ProductIn) -> Result<(), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if body.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }
    if body.stock_quantity < 0 {
        return Err(AppError::Validation("stock must not be negative".into()));
    }
    Ok(())
}

/// Public catalog listing. Category and name search are both optional.
#[get("/products")]
pub async fn list(
    data: web::Data<AppState>,
    query: web::Query<ProductFilter>,
) -> Result<HttpResponse, HttpApiError> {
    let rows = list_products(
        &data.db,
        query.category.as_deref().filter(|s| !s.is_empty()),
        query.search.as_deref().filter(|s| !s.is_empty()),
    )
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/products/{id}")]
pub async fn get(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, HttpApiError> {
    let id = path.into_inner();
    match get_product(&data.db, id).await? {
        Some(row) => Ok(HttpResponse::Ok().json(row)),
        None => Err(AppError::NotFound.into()),
    }
}

#[post("/products")]
pub async fn create(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<ProductIn>,
) -> Result<HttpResponse, HttpApiError> {
    require_role(&user, Role::Admin)?;
    validate(&body)?;
    let row = insert_product(
        &data.db,
        body.name.trim(),
        body.description.as_deref(),
        body.category.as_deref(),
        body.price,
        body.stock_quantity,
        body.prescription_required,
        body.image_url.as_deref(),
    )
    .await?;
    info!(product = %row.id, "product created");
    Ok(HttpResponse::Created().json(row))
}

#[put("/products/{id}")]
pub async fn update(
    data: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<ProductIn>,
) -> Result<HttpResponse, HttpApiError> {
    require_role(&user, Role::Admin)?;
    validate(&body)?;
    let id = path.into_inner();
    match update_product(
        &data.db,
        id,
        body.name.trim(),
        body.description.as_deref(),
        body.category.as_deref(),
        body.price,
        body.stock_quantity,
        body.prescription_required,
        body.image_url.as_deref(),
    )
    .await?
    {
        Some(row) => Ok(HttpResponse::Ok().json(row)),
        None => Err(AppError::NotFound.into()),
    }
}

#[delete("/products/{id}")]
pub async fn remove(
    data: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, HttpApiError> {
    require_role(&user, Role::Admin)?;
    let id = path.into_inner();
    let affected = delete_product(&data.db, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound.into());
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": affected })))
}
