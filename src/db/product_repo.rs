use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Product, ProductAttributes};

const PRODUCT_COLUMNS: &str = r#"
    "id", "companyId", "name", "cost", "measuringUnit", "ddvPercentage",
    "createdAt", "updatedAt"
"#;

/// List all products of one company
pub async fn list_by_company(
    pool: &PgPool,
    company_id: Uuid,
) -> Result<Vec<Product>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products
        WHERE "companyId" = $1
        ORDER BY "createdAt" DESC
        "#
    );

    sqlx::query_as::<_, Product>(&query)
        .bind(company_id)
        .fetch_all(pool)
        .await
}

/// List all products of a set of companies (eager attach on company reads)
pub async fn list_by_companies(
    pool: &PgPool,
    company_ids: &[Uuid],
) -> Result<Vec<Product>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products
        WHERE "companyId" = ANY($1)
        ORDER BY "createdAt" DESC
        "#
    );

    sqlx::query_as::<_, Product>(&query)
        .bind(company_ids)
        .fetch_all(pool)
        .await
}

/// Lookup by primary key alone; ownership is resolved separately through
/// the parent company (two-step lookup).
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products
        WHERE "id" = $1
        "#
    );

    sqlx::query_as::<_, Product>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Batch lookup by primary keys; ids without a match are simply absent
/// from the result.
pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Product>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products
        WHERE "id" = ANY($1)
        "#
    );

    sqlx::query_as::<_, Product>(&query)
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Count products belonging to a company (company delete policy check)
pub async fn count_by_company(pool: &PgPool, company_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM products WHERE "companyId" = $1"#)
        .bind(company_id)
        .fetch_one(pool)
        .await
}

/// Insert a new product under its parent company
pub async fn insert(
    pool: &PgPool,
    company_id: Uuid,
    attrs: &ProductAttributes,
) -> Result<Product, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO products ("companyId", "name", "cost", "measuringUnit", "ddvPercentage")
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {PRODUCT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Product>(&query)
        .bind(company_id)
        .bind(&attrs.name)
        .bind(attrs.cost)
        .bind(&attrs.measuring_unit)
        .bind(attrs.ddv_percentage)
        .fetch_one(pool)
        .await
}

/// Persist the merged state of a product update
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    attrs: &ProductAttributes,
) -> Result<Option<Product>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE products
        SET "name" = $2, "cost" = $3, "measuringUnit" = $4,
            "ddvPercentage" = $5, "updatedAt" = NOW()
        WHERE "id" = $1
        RETURNING {PRODUCT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Product>(&query)
        .bind(id)
        .bind(&attrs.name)
        .bind(attrs.cost)
        .bind(&attrs.measuring_unit)
        .bind(attrs.ddv_percentage)
        .fetch_optional(pool)
        .await
}

/// Hard-delete a product; returns whether a row was removed
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM products WHERE "id" = $1"#)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
