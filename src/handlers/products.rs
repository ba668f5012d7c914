/// Product handlers - HTTP endpoints for product operations
///
/// All routes are nested under /companies/{company_id}/products. Collection
/// routes resolve ownership through the company in the path; item routes
/// resolve it through the product's parent company, ignoring the path's
/// company beyond routing.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::OwnerId;
use crate::error::Result;
use crate::models::{ProductAttributes, ProductPatch};
use crate::services::ProductService;

/// List the products of a company the caller owns
pub async fn get_products(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let products = ProductService::new(pool.get_ref().clone())
        .list_by_company(path.into_inner(), owner.0)
        .await?;
    Ok(HttpResponse::Ok().json(products))
}

/// Create a product under a company the caller owns
pub async fn create_product(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<Uuid>,
    body: web::Json<ProductAttributes>,
) -> Result<HttpResponse> {
    let product = ProductService::new(pool.get_ref().clone())
        .create(path.into_inner(), owner.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(product))
}

/// Fetch one product the caller owns
pub async fn get_product(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (_company_id, product_id) = path.into_inner();
    let product = ProductService::new(pool.get_ref().clone())
        .get(product_id, owner.0)
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Partially update a product the caller owns
pub async fn update_product(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<ProductPatch>,
) -> Result<HttpResponse> {
    let (_company_id, product_id) = path.into_inner();
    let product = ProductService::new(pool.get_ref().clone())
        .update(product_id, owner.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Delete a product the caller owns
pub async fn delete_product(
    pool: web::Data<PgPool>,
    owner: OwnerId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (_company_id, product_id) = path.into_inner();
    ProductService::new(pool.get_ref().clone())
        .delete(product_id, owner.0)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
