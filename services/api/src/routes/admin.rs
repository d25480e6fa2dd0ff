use actix_web::{HttpResponse, get, web};
use common::Role;
use db::appointments::appointment_stats;
use db::users::{count_users_by_role, list_accounts};
use serde_json::json;

use crate::error::HttpApiError;
use crate::extractors::{AuthUser, require_role};
use crate::state::AppState;

/// Dashboard numbers: per-status appointment totals (with unassigned
/// counts) and user counts per role.
#[get("/admin/stats")]
pub async fn stats(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, HttpApiError> {
    require_role(&user, Role::Admin)?;
    let appointments = appointment_stats(&data.db).await?;
    let user_counts = count_users_by_role(&data.db).await?;
    Ok(HttpResponse::Ok().json(json!({
        "appointments": appointments,
        "users": user_counts,
    })))
}

#[get("/admin/users")]
pub async fn users(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, HttpApiError> {
    require_role(&user, Role::Admin)?;
    let rows = list_accounts(&data.db, None).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/admin/doctors")]
pub async fn doctors(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, HttpApiError> {
    require_role(&user, Role::Admin)?;
    let rows = list_accounts(&data.db, Some(Role::Doctor.as_str())).await?;
    Ok(HttpResponse::Ok().json(rows))
}
