use actix_web::{HttpResponse, get, put, web};
use common::Profile;
use db::profiles::{get_profile, upsert_profile};

use crate::error::HttpApiError;
use crate::extractors::AuthUser;
use crate::schemas::ProfileInput;
use crate::state::AppState;

/// The caller's profile; an empty one if nothing has been saved yet.
#[get("/profile")]
pub async fn get(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, HttpApiError> {
    let profile = get_profile(&data.db, user.id).await?.unwrap_or(Profile {
        id: user.id,
        name: None,
        phone: None,
        address: None,
        updated_at: None,
    });
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
pub async fn update(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<ProfileInput>,
) -> Result<HttpResponse, HttpApiError> {
    let row = upsert_profile(
        &data.db,
        user.id,
        body.name.as_deref(),
        body.phone.as_deref(),
        body.address.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(row))
}
