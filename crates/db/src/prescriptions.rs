use common::Prescription;
use uuid::Uuid;

use crate::{Db, DbError};

/// Records one verification attempt. The status is set here, once, and is
/// never revised afterwards.
pub async fn insert_prescription(
    db: &Db,
    user_id: Uuid,
    file_url: &str,
    medicine_name: &str,
    status: &str,
) -> Result<Prescription, DbError> {
    let row = sqlx::query_as::<_, Prescription>(
        r#"INSERT INTO prescriptions (user_id, file_url, medicine_name, status)
           VALUES ($1, $2, $3, $4)
           RETURNING id, user_id, file_url, medicine_name, status, created_at"#,
    )
    .bind(user_id)
    .bind(file_url)
    .bind(medicine_name)
    .bind(status)
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}

pub async fn list_prescriptions(db: &Db, user_id: Uuid) -> Result<Vec<Prescription>, DbError> {
    let rows = sqlx::query_as::<_, Prescription>(
        "SELECT id, user_id, file_url, medicine_name, status, created_at \
         FROM prescriptions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&db.0)
    .await?;
    Ok(rows)
}
