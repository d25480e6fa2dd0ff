use actix_web::{HttpResponse, get, post, web};
use base64::Engine;
use common::AppError;
use db::prescriptions::{insert_prescription, list_prescriptions};
use db::products::get_product;
use serde_json::json;
use tracing::{error, info};

use crate::error::HttpApiError;
use crate::extractors::AuthUser;
use crate::ocr::medicine_matches;
use crate::schemas::VerifyPrescriptionInput;
use crate::state::AppState;

#[get("/prescriptions")]
pub async fn list(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, HttpApiError> {
    let rows = list_prescriptions(&data.db, user.id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Uploads a prescription image and verifies it against the selected
/// product: store the file, run text recognition, check the medicine name
/// appears in the recognized text, and record the attempt. The recorded
/// status is set here once and never revised.
#[post("/prescriptions/verify")]
pub async fn verify(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<VerifyPrescriptionInput>,
) -> Result<HttpResponse, HttpApiError> {
    let body = body.into_inner();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body.image_base64.as_bytes())
        .map_err(|_| AppError::Validation("image_base64 is not valid base64".into()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("image is empty".into()).into());
    }

    let product = get_product(&data.db, body.product_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let file_url = data
        .storage
        .save("prescriptions", &bytes)
        .await
        .map_err(|e| {
            error!("failed to store prescription image: {e}");
            AppError::Internal
        })?;

    let recognized = data
        .ocr
        .recognize_text(&body.image_base64)
        .await
        .map_err(|e| {
            error!("ocr call failed: {e}");
            AppError::Store
        })?;

    let (matched, message) = match recognized.as_deref() {
        None | Some("") => (
            false,
            "No text could be detected in the prescription image. Please ensure the image \
             is clear and contains readable text.",
        ),
        Some(text) if medicine_matches(text, &product.name) => {
            (true, "Prescription verified successfully")
        }
        Some(_) => (
            false,
            "The medicine name in the prescription does not match the selected medicine. \
             Please verify and try again.",
        ),
    };

    let status = if matched { "approved" } else { "rejected" };
    let record =
        insert_prescription(&data.db, user.id, &file_url, &product.name, status).await?;
    info!(prescription = %record.id, user = %user.id, matched, "prescription verified");

    Ok(HttpResponse::Ok().json(json!({
        "matched": matched,
        "message": message,
        "prescription": record,
    })))
}
