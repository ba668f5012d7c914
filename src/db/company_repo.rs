use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Company, CompanyAttributes};

const COMPANY_COLUMNS: &str = r#"
    "id", "userId", "companyName", "street", "streetAdditional", "postalCode",
    "city", "iban", "bic", "registrationNumber", "vatPayer", "vatId",
    "additionalInfo", "documentLocation", "reverseCharge", "createdAt", "updatedAt"
"#;

/// List all companies owned by the given identity
pub async fn list_by_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Company>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {COMPANY_COLUMNS}
        FROM companies
        WHERE "userId" = $1
        ORDER BY "createdAt" DESC
        "#
    );

    sqlx::query_as::<_, Company>(&query)
        .bind(owner)
        .fetch_all(pool)
        .await
}

/// Owner-scoped single-step lookup: filters by primary key AND owning
/// identity, so "missing" and "not yours" are indistinguishable.
pub async fn find_by_id_and_owner(
    pool: &PgPool,
    id: Uuid,
    owner: Uuid,
) -> Result<Option<Company>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {COMPANY_COLUMNS}
        FROM companies
        WHERE "id" = $1 AND "userId" = $2
        "#
    );

    sqlx::query_as::<_, Company>(&query)
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await
}

/// Unscoped lookup by primary key. Used by the internal RPC surface only.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Company>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {COMPANY_COLUMNS}
        FROM companies
        WHERE "id" = $1
        "#
    );

    sqlx::query_as::<_, Company>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a new company bound to the owning identity
pub async fn insert(
    pool: &PgPool,
    owner: Uuid,
    attrs: &CompanyAttributes,
) -> Result<Company, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO companies (
            "userId", "companyName", "street", "streetAdditional", "postalCode",
            "city", "iban", "bic", "registrationNumber", "vatPayer", "vatId",
            "additionalInfo", "documentLocation", "reverseCharge"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {COMPANY_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Company>(&query)
        .bind(owner)
        .bind(&attrs.company_name)
        .bind(&attrs.street)
        .bind(&attrs.street_additional)
        .bind(&attrs.postal_code)
        .bind(&attrs.city)
        .bind(&attrs.iban)
        .bind(&attrs.bic)
        .bind(&attrs.registration_number)
        .bind(attrs.vat_payer)
        .bind(&attrs.vat_id)
        .bind(&attrs.additional_info)
        .bind(&attrs.document_location)
        .bind(attrs.reverse_charge)
        .fetch_one(pool)
        .await
}

/// Persist the merged state of an owner-scoped update.
///
/// The owning identity is part of the WHERE clause, never of the SET list:
/// it is immutable after creation.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    owner: Uuid,
    attrs: &CompanyAttributes,
) -> Result<Option<Company>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE companies
        SET "companyName" = $3, "street" = $4, "streetAdditional" = $5,
            "postalCode" = $6, "city" = $7, "iban" = $8, "bic" = $9,
            "registrationNumber" = $10, "vatPayer" = $11, "vatId" = $12,
            "additionalInfo" = $13, "documentLocation" = $14,
            "reverseCharge" = $15, "updatedAt" = NOW()
        WHERE "id" = $1 AND "userId" = $2
        RETURNING {COMPANY_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Company>(&query)
        .bind(id)
        .bind(owner)
        .bind(&attrs.company_name)
        .bind(&attrs.street)
        .bind(&attrs.street_additional)
        .bind(&attrs.postal_code)
        .bind(&attrs.city)
        .bind(&attrs.iban)
        .bind(&attrs.bic)
        .bind(&attrs.registration_number)
        .bind(attrs.vat_payer)
        .bind(&attrs.vat_id)
        .bind(&attrs.additional_info)
        .bind(&attrs.document_location)
        .bind(attrs.reverse_charge)
        .fetch_optional(pool)
        .await
}

/// Hard-delete an owner-scoped company; returns whether a row was removed
pub async fn delete(pool: &PgPool, id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM companies
        WHERE "id" = $1 AND "userId" = $2
        "#,
    )
    .bind(id)
    .bind(owner)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
