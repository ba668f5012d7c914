/// Product service - CRUD for products nested under a company
///
/// Ownership is always derived through the parent company, but the two
/// route families resolve it differently. Collection routes (list, create)
/// look the company up owner-scoped, so absent and foreign companies both
/// read as 404. Item routes (get, update, delete) fetch the product by id
/// alone first, so "no such product" is 404 while "someone else's product"
/// is 403.
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{company_repo, product_repo};
use crate::error::{AppError, Result};
use crate::models::{merge_product, Product, ProductAttributes, ProductPatch};

pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the products of a company the caller owns
    pub async fn list_by_company(&self, company_id: Uuid, owner: Uuid) -> Result<Vec<Product>> {
        self.find_owned_company(company_id, owner).await?;
        Ok(product_repo::list_by_company(&self.pool, company_id).await?)
    }

    /// Create a product under a company the caller owns
    pub async fn create(
        &self,
        company_id: Uuid,
        owner: Uuid,
        attrs: ProductAttributes,
    ) -> Result<Product> {
        self.find_owned_company(company_id, owner).await?;
        attrs.validate()?;

        let product = product_repo::insert(&self.pool, company_id, &attrs).await?;
        tracing::info!(product_id = %product.id, company_id = %company_id, "product created");
        Ok(product)
    }

    /// Fetch one product, enforcing ownership through the parent company
    pub async fn get(&self, id: Uuid, owner: Uuid) -> Result<Product> {
        self.find_owned_product(id, owner).await
    }

    /// Apply a partial update to a product the caller owns
    pub async fn update(&self, id: Uuid, owner: Uuid, patch: ProductPatch) -> Result<Product> {
        let existing = self.find_owned_product(id, owner).await?;
        let merged = merge_product(&existing, patch);
        merged.validate()?;

        product_repo::update(&self.pool, id, &merged)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Delete a product the caller owns
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.find_owned_product(id, owner).await?;

        let removed = product_repo::delete(&self.pool, id).await?;
        if !removed {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    // Owner-scoped company lookup for the collection routes: a foreign
    // company reads the same as a missing one.
    async fn find_owned_company(&self, company_id: Uuid, owner: Uuid) -> Result<()> {
        company_repo::find_by_id_and_owner(&self.pool, company_id, owner)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
    }

    // Two-step resolution for the item routes: the product must exist
    // (404 otherwise), then the owner-scoped lookup of its parent company
    // must match (403 otherwise).
    async fn find_owned_product(&self, id: Uuid, owner: Uuid) -> Result<Product> {
        let product = product_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        company_repo::find_by_id_and_owner(&self.pool, product.company_id, owner)
            .await?
            .ok_or_else(|| AppError::Forbidden("Forbidden".to_string()))?;

        Ok(product)
    }
}
