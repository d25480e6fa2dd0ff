use common::{CartItem, CartLine};
use uuid::Uuid;

use crate::{Db, DbError};

pub async fn list_cart(db: &Db, user_id: Uuid) -> Result<Vec<CartLine>, DbError> {
    let rows = sqlx::query_as::<_, CartLine>(
        r#"SELECT c.id, c.product_id, c.quantity,
                  p.name, p.price, p.prescription_required, p.image_url
           FROM cart_items c
           JOIN products p ON p.id = c.product_id
           WHERE c.user_id = $1
           ORDER BY c.created_at"#,
    )
    .bind(user_id)
    .fetch_all(&db.0)
    .await?;
    Ok(rows)
}

/// Adds a product to the cart. Adding a product that is already carted
/// increments its quantity instead of creating a second row.
pub async fn add_to_cart(
    db: &Db,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> Result<CartItem, DbError> {
    let row = sqlx::query_as::<_, CartItem>(
        r#"INSERT INTO cart_items (user_id, product_id, quantity)
           VALUES ($1, $2, $3)
           ON CONFLICT (user_id, product_id)
           DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
           RETURNING id, user_id, product_id, quantity, created_at, updated_at"#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}

/// Sets a cart row's quantity. Zero or less removes the row, matching the
/// quantity >= 1 invariant.
pub async fn set_cart_quantity(
    db: &Db,
    user_id: Uuid,
    item_id: Uuid,
    quantity: i32,
) -> Result<Option<CartItem>, DbError> {
    if quantity <= 0 {
        remove_cart_item(db, user_id, item_id).await?;
        return Ok(None);
    }
    let row = sqlx::query_as::<_, CartItem>(
        r#"UPDATE cart_items SET quantity = $3
           WHERE id = $2 AND user_id = $1
           RETURNING id, user_id, product_id, quantity, created_at, updated_at"#,
    )
    .bind(user_id)
    .bind(item_id)
    .bind(quantity)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn remove_cart_item(db: &Db, user_id: Uuid, item_id: Uuid) -> Result<u64, DbError> {
    let res = sqlx::query("DELETE FROM cart_items WHERE id = $2 AND user_id = $1")
        .bind(user_id)
        .bind(item_id)
        .execute(&db.0)
        .await?;
    Ok(res.rows_affected())
}
