use common::Profile;
use uuid::Uuid;

use crate::{Db, DbError};

pub async fn get_profile(db: &Db, user_id: Uuid) -> Result<Option<Profile>, DbError> {
    let row = sqlx::query_as::<_, Profile>(
        "SELECT id, name, phone, address, updated_at FROM profiles WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn upsert_profile(
    db: &Db,
    user_id: Uuid,
    name: Option<&str>,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<Profile, DbError> {
    let row = sqlx::query_as::<_, Profile>(
        r#"INSERT INTO profiles (id, name, phone, address, updated_at)
           VALUES ($1, $2, $3, $4, now())
           ON CONFLICT (id)
           DO UPDATE SET name = EXCLUDED.name, phone = EXCLUDED.phone,
                         address = EXCLUDED.address, updated_at = now()
           RETURNING id, name, phone, address, updated_at"#,
    )
    .bind(user_id)
    .bind(name)
    .bind(phone)
    .bind(address)
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}
