use actix_web::{HttpResponse, get, post, web};
use common::{AppError, Role};
use db::appointments::{claim_appointment, insert_appointment, list_appointments};
use db::{AppointmentScope, ClaimOutcome};
use tracing::info;
use uuid::Uuid;

use crate::error::HttpApiError;
use crate::extractors::AuthUser;
use crate::feed::{AppointmentFeed, sse_frame};
use crate::schemas::{BookAppointmentInput, ClaimInput, TabQuery};
use crate::state::AppState;

/// A patient books a consultation request. It enters the shared pending
/// pool unassigned.
#[post("/appointments")]
pub async fn book(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<BookAppointmentInput>,
) -> Result<HttpResponse, HttpApiError> {
    let body = body.into_inner();
    if body.contact.trim().is_empty() {
        return Err(AppError::Validation("contact is required".into()).into());
    }

    let row = insert_appointment(
        &data.db,
        user.id,
        body.contact.trim(),
        body.preferred_time.as_deref().filter(|s| !s.is_empty()),
        body.notes.as_deref().filter(|s| !s.is_empty()),
    )
    .await?;
    info!(appointment = %row.id, patient = %user.id, "appointment booked");
    Ok(HttpResponse::Created().json(row))
}

/// Role- and tab-shaped listing. What each viewer sees is decided entirely
/// by `AppointmentScope`.
#[get("/appointments")]
pub async fn list(
    data: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<TabQuery>,
) -> Result<HttpResponse, HttpApiError> {
    let scope = AppointmentScope::new(user.role, user.id, query.tab);
    let rows = list_appointments(&data.db, scope).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// A doctor claims a pending appointment and decides it in one step.
/// Losing the race surfaces as 409; the client is expected to re-fetch.
#[post("/appointments/{id}/claim")]
pub async fn claim(
    data: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<ClaimInput>,
) -> Result<HttpResponse, HttpApiError> {
    if user.role != Role::Doctor {
        return Err(AppError::PermissionDenied.into());
    }
    let id = path.into_inner();
    match claim_appointment(&data.db, id, user.id, body.decision).await? {
        ClaimOutcome::Claimed(row) => {
            info!(appointment = %id, doctor = %user.id, decision = body.decision.as_str(),
                  "appointment claimed");
            Ok(HttpResponse::Ok().json(row))
        }
        ClaimOutcome::AlreadyAssigned => Err(AppError::AlreadyAssigned.into()),
        ClaimOutcome::NotFound => Err(AppError::NotFound.into()),
    }
}

/// Live view of the caller's appointment list as Server-Sent Events. Each
/// event carries the full list; the worker behind it polls every 30s and
/// re-fetches on every change notification.
#[get("/appointments/feed")]
pub async fn feed(
    data: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<TabQuery>,
) -> Result<HttpResponse, HttpApiError> {
    let scope = AppointmentScope::new(user.role, user.id, query.tab);
    let rx = AppointmentFeed::start(data.db.clone(), scope, data.changes.subscribe());

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        match rx.changed().await {
            Ok(()) => {
                let frame = sse_frame(&rx.borrow_and_update().clone());
                Some((Ok::<_, actix_web::Error>(frame), rx))
            }
            Err(_) => None,
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream))
}
