use common::Product;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{Db, DbError};

const COLUMNS: &str = "id, name, description, category, price, stock_quantity, \
     prescription_required, image_url, created_at, updated_at";

/// Catalog listing with optional category filter and case-insensitive name
/// search.
pub async fn list_products(
    db: &Db,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<Product>, DbError> {
    let mut qb =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM products WHERE TRUE"));
    if let Some(category) = category {
        qb.push(" AND category = ");
        qb.push_bind(category);
    }
    if let Some(search) = search {
        qb.push(" AND name ILIKE ");
        qb.push_bind(format!("%{search}%"));
    }
    qb.push(" ORDER BY name");
    let rows: Vec<Product> = qb.build_query_as().fetch_all(&db.0).await?;
    Ok(rows)
}

pub async fn get_product(db: &Db, id: Uuid) -> Result<Option<Product>, DbError> {
    let row =
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&db.0)
            .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_product(
    db: &Db,
    name: &str,
    description: Option<&str>,
    category: Option<&str>,
    price: f64,
    stock_quantity: i32,
    prescription_required: bool,
    image_url: Option<&str>,
) -> Result<Product, DbError> {
    let row = sqlx::query_as::<_, Product>(&format!(
        r#"INSERT INTO products
               (name, description, category, price, stock_quantity,
                prescription_required, image_url)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING {COLUMNS}"#
    ))
    .bind(name)
    .bind(description)
    .bind(category)
    .bind(price)
    .bind(stock_quantity)
    .bind(prescription_required)
    .bind(image_url)
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_product(
    db: &Db,
    id: Uuid,
    name: &str,
    description: Option<&str>,
    category: Option<&str>,
    price: f64,
    stock_quantity: i32,
    prescription_required: bool,
    image_url: Option<&str>,
) -> Result<Option<Product>, DbError> {
    let row = sqlx::query_as::<_, Product>(&format!(
        r#"UPDATE products
           SET name = $2, description = $3, category = $4, price = $5,
               stock_quantity = $6, prescription_required = $7, image_url = $8
           WHERE id = $1
           RETURNING {COLUMNS}"#
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(category)
    .bind(price)
    .bind(stock_quantity)
    .bind(prescription_required)
    .bind(image_url)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn delete_product(db: &Db, id: Uuid) -> Result<u64, DbError> {
    let res = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&db.0)
        .await?;
    Ok(res.rows_affected())
}
