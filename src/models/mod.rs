/// Data models for company-service
///
/// Row types map the persisted camelCase column names via sqlx renames and
/// serialize back out in the same camelCase form the API has always used.
/// Attribute types carry the validator rules and are shared between create
/// and update (updates validate the merged result, not the patch).
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A company owned by exactly one identity
#[derive(Debug, Clone, FromRow, Serialize)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub street: String,
    pub street_additional: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub iban: String,
    pub bic: String,
    pub registration_number: String,
    pub vat_payer: bool,
    pub vat_id: Option<String>,
    pub additional_info: Option<String>,
    pub document_location: Option<String>,
    pub reverse_charge: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product belonging to a company; ownership is derived through the
/// parent company, never stored here.
#[derive(Debug, Clone, FromRow, Serialize)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub cost: Decimal,
    pub measuring_unit: String,
    pub ddv_percentage: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Company read model with products eagerly attached
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithProducts {
    #[serde(flatten)]
    pub company: Company,
    pub products: Vec<Product>,
}

/// Validated company fields, used as the create request body and as the
/// merged state on update. A client-supplied `userId` is silently ignored;
/// the owning identity always comes from the caller's credential.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAttributes {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub company_name: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub street: String,

    pub street_additional: Option<String>,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub postal_code: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,

    #[validate(length(min = 15, max = 34, message = "must be 15-34 characters"))]
    pub iban: String,

    #[validate(length(min = 8, max = 11, message = "must be 8-11 characters"))]
    pub bic: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub registration_number: String,

    #[serde(default)]
    pub vat_payer: bool,

    pub vat_id: Option<String>,

    pub additional_info: Option<String>,

    pub document_location: Option<String>,

    #[serde(default)]
    pub reverse_charge: bool,
}

/// Partial company update; absent fields keep their prior values
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    pub company_name: Option<String>,
    pub street: Option<String>,
    pub street_additional: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub registration_number: Option<String>,
    pub vat_payer: Option<bool>,
    pub vat_id: Option<String>,
    pub additional_info: Option<String>,
    pub document_location: Option<String>,
    pub reverse_charge: Option<bool>,
}

/// Validated product fields, used as the create request body and as the
/// merged state on update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributes {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,

    #[validate(custom(function = validate_non_negative))]
    pub cost: Decimal,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub measuring_unit: String,

    #[validate(custom(function = validate_non_negative))]
    pub ddv_percentage: Decimal,
}

/// Partial product update; absent fields keep their prior values
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub cost: Option<Decimal>,
    pub measuring_unit: Option<String>,
    pub ddv_percentage: Option<Decimal>,
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("min"));
    }
    Ok(())
}

/// Shallow-merge a partial update over the existing company row.
///
/// Only provided keys are overwritten; optional fields cannot be cleared
/// back to null through an update.
pub fn merge_company(existing: &Company, patch: CompanyPatch) -> CompanyAttributes {
    CompanyAttributes {
        company_name: patch
            .company_name
            .unwrap_or_else(|| existing.company_name.clone()),
        street: patch.street.unwrap_or_else(|| existing.street.clone()),
        street_additional: patch
            .street_additional
            .or_else(|| existing.street_additional.clone()),
        postal_code: patch
            .postal_code
            .unwrap_or_else(|| existing.postal_code.clone()),
        city: patch.city.unwrap_or_else(|| existing.city.clone()),
        iban: patch.iban.unwrap_or_else(|| existing.iban.clone()),
        bic: patch.bic.unwrap_or_else(|| existing.bic.clone()),
        registration_number: patch
            .registration_number
            .unwrap_or_else(|| existing.registration_number.clone()),
        vat_payer: patch.vat_payer.unwrap_or(existing.vat_payer),
        vat_id: patch.vat_id.or_else(|| existing.vat_id.clone()),
        additional_info: patch
            .additional_info
            .or_else(|| existing.additional_info.clone()),
        document_location: patch
            .document_location
            .or_else(|| existing.document_location.clone()),
        reverse_charge: patch.reverse_charge.unwrap_or(existing.reverse_charge),
    }
}

/// Shallow-merge a partial update over the existing product row.
pub fn merge_product(existing: &Product, patch: ProductPatch) -> ProductAttributes {
    ProductAttributes {
        name: patch.name.unwrap_or_else(|| existing.name.clone()),
        cost: patch.cost.unwrap_or(existing.cost),
        measuring_unit: patch
            .measuring_unit
            .unwrap_or_else(|| existing.measuring_unit.clone()),
        ddv_percentage: patch.ddv_percentage.unwrap_or(existing.ddv_percentage),
    }
}
