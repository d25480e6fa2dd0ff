use crate::error::HttpApiError;
use crate::{
    schemas::{LoginInput, RegisterInput},
    state::AppState,
};
use actix_web::{HttpRequest, HttpResponse, post, web};
use auth::{hash_password, sha256_hex, sign_access, sign_refresh, verify_password};
use chrono::{Duration, Utc};
use common::{AppError, Role};
use db::tokens::{get_refresh_by_jti, insert_refresh, revoke_refresh};
use db::users::{UserRow, find_user_by_email, insert_user};
use serde_json::json;
use tracing::{info, warn};

const ACCESS_COOKIE: &str = "access_token";
const REFRESH_COOKIE: &str = "refresh_token";

async fn issue_tokens(
    data: &AppState,
    user: &UserRow,
) -> Result<serde_json::Value, HttpApiError> {
    let keys = &data.jwt;
    let access = sign_access(keys, user.id, &user.role, &user.email, data.access_ttl)?;
    let (refresh_token, claims) =
        sign_refresh(keys, user.id, &user.role, &user.email, data.refresh_ttl)?;

    let token_hash = format!("sha256:{}", sha256_hex(&refresh_token));
    let expires_at = Utc::now() + Duration::seconds(data.refresh_ttl);
    insert_refresh(&data.db, user.id, &claims.jti, &token_hash, expires_at).await?;

    Ok(json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "role": user.role,
        },
        "tokens": {
            "access": access,
            "refresh": refresh_token,
            "jti": claims.jti,
        }
    }))
}

#[post("/auth/register")]
pub async fn register(
    data: web::Data<AppState>,
    payload: web::Json<RegisterInput>,
) -> Result<HttpResponse, HttpApiError> {
    let payload = payload.into_inner();

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".into()).into());
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("password is required".into()).into());
    }

    if find_user_by_email(&data.db, &email).await?.is_some() {
        warn!(%email, "registration rejected, email taken");
        return Err(AppError::Conflict.into());
    }

    let role = payload
        .role
        .as_deref()
        .map(Role::from_claim)
        .unwrap_or_default();

    let hash = hash_password(&payload.password).map_err(|_| AppError::Internal)?;
    let user = insert_user(&data.db, &email, &hash, role.as_str()).await?;
    info!(user_id = %user.id, role = %user.role, "registered");

    let body = issue_tokens(&data, &user).await?;
    Ok(HttpResponse::Created().json(body))
}

#[post("/auth/login")]
pub async fn login(
    data: web::Data<AppState>,
    payload: web::Json<LoginInput>,
) -> Result<HttpResponse, HttpApiError> {
    let payload = payload.into_inner();
    let email = payload.email.trim().to_lowercase();

    let user = find_user_by_email(&data.db, &email)
        .await?
        .ok_or(AppError::NotAuthenticated)?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::NotAuthenticated.into());
    }

    info!(user_id = %user.id, "login");
    let body = issue_tokens(&data, &user).await?;
    Ok(HttpResponse::Ok().json(body))
}

#[post("/auth/refresh")]
pub async fn refresh(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, HttpApiError> {
    let refresh_cookie = req
        .cookie(REFRESH_COOKIE)
        .ok_or(AppError::NotAuthenticated)?;
    let token = refresh_cookie.value().to_string();
    let claims = auth::verify(&data.jwt, &token).map_err(|_| AppError::NotAuthenticated)?;

    match get_refresh_by_jti(&data.db, &claims.jti).await? {
        Some(row) => {
            if row.revoked {
                warn!(jti = %claims.jti, "refresh with revoked token");
                return Err(AppError::NotAuthenticated.into());
            }
            let given_hash = format!("sha256:{}", sha256_hex(&token));
            if given_hash != row.token_hash {
                warn!(jti = %claims.jti, "refresh token hash mismatch");
                return Err(AppError::NotAuthenticated.into());
            }
        }
        None => return Err(AppError::NotAuthenticated.into()),
    }

    // rotation: the presented token is spent regardless of what follows
    revoke_refresh(&data.db, &claims.jti).await?;

    let access = auth::sign_access(
        &data.jwt,
        claims.sub,
        &claims.role,
        &claims.email,
        data.access_ttl,
    )?;
    let (refresh_new, claims_new) = auth::sign_refresh(
        &data.jwt,
        claims.sub,
        &claims.role,
        &claims.email,
        data.refresh_ttl,
    )?;

    let token_hash = format!("sha256:{}", sha256_hex(&refresh_new));
    let expires_at = Utc::now() + Duration::seconds(data.refresh_ttl);
    insert_refresh(&data.db, claims.sub, &claims_new.jti, &token_hash, expires_at).await?;

    let cookie = actix_web::cookie::Cookie::build(REFRESH_COOKIE, refresh_new)
        .domain(data.cookie_domain.clone())
        .secure(data.cookie_secure)
        .http_only(true)
        .path("/")
        .finish();

    let mut resp = HttpResponse::Ok().json(json!({ "access_token": access }));
    resp.add_cookie(&cookie).ok();
    Ok(resp)
}

#[post("/auth/logout")]
pub async fn logout(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, HttpApiError> {
    if let Some(c) = req.cookie(REFRESH_COOKIE) {
        if let Ok(claims) = auth::verify(&data.jwt, c.value()) {
            revoke_refresh(&data.db, &claims.jti).await?;
        }
    }
    let clear = |name: &'static str| {
        actix_web::cookie::Cookie::build(name, "")
            .path("/")
            .domain(data.cookie_domain.clone())
            .secure(data.cookie_secure)
            .http_only(true)
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .finish()
    };
    let mut resp = HttpResponse::Ok().finish();
    resp.add_cookie(&clear(ACCESS_COOKIE)).ok();
    resp.add_cookie(&clear(REFRESH_COOKIE)).ok();
    Ok(resp)
}
