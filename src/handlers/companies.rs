/// Company handlers - HTTP endpoints for company operations
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::OwnerId;
use crate::error::Result;
use crate::models::{CompanyAttributes, CompanyPatch};
use crate::services::CompanyService;

/// List all companies owned by the caller
pub async fn get_companies(pool: web::Data<PgPool>, owner: OwnerId) -> Result<HttpResponse> {
    let companies = CompanyService::new(pool.get_ref().clone())
        .list(owner.0)
        .await?;
    Ok(HttpResponse::Ok().json(companies))
}

/// Fetch one company the caller owns
pub async fn get_company(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let company = CompanyService::new(pool.get_ref().clone())
        .get(path.into_inner(), owner.0)
        .await?;
    Ok(HttpResponse::Ok().json(company))
}

/// Create a company bound to the caller
pub async fn create_company(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    body: web::Json<CompanyAttributes>,
) -> Result<HttpResponse> {
    let company = CompanyService::new(pool.get_ref().clone())
        .create(owner.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(company))
}

/// Partially update a company the caller owns
pub async fn update_company(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<Uuid>,
    body: web::Json<CompanyPatch>,
) -> Result<HttpResponse> {
    let company = CompanyService::new(pool.get_ref().clone())
        .update(path.into_inner(), owner.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(company))
}

/// Delete a company the caller owns; refused while it still has products
pub async fn delete_company(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    CompanyService::new(pool.get_ref().clone())
        .delete(path.into_inner(), owner.0)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
