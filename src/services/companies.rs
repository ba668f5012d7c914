/// Company service - owner-scoped CRUD over the companies table
use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{company_repo, product_repo};
use crate::error::{AppError, Result};
use crate::models::{
    merge_company, Company, CompanyAttributes, CompanyPatch, CompanyWithProducts, Product,
};

pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the caller's companies, newest first, with products attached
    pub async fn list(&self, owner: Uuid) -> Result<Vec<CompanyWithProducts>> {
        let companies = company_repo::list_by_owner(&self.pool, owner).await?;
        if companies.is_empty() {
            return Ok(Vec::new());
        }

        let company_ids: Vec<Uuid> = companies.iter().map(|c| c.id).collect();
        let products = product_repo::list_by_companies(&self.pool, &company_ids).await?;

        let mut by_company: HashMap<Uuid, Vec<Product>> = HashMap::new();
        for product in products {
            by_company.entry(product.company_id).or_default().push(product);
        }

        Ok(companies
            .into_iter()
            .map(|company| {
                let products = by_company.remove(&company.id).unwrap_or_default();
                CompanyWithProducts { company, products }
            })
            .collect())
    }

    /// Fetch one company the caller owns, with products attached.
    ///
    /// The lookup is owner-scoped in a single step, so a company that exists
    /// but belongs to someone else reads the same as one that never existed.
    pub async fn get(&self, id: Uuid, owner: Uuid) -> Result<CompanyWithProducts> {
        let company = self.find_owned(id, owner).await?;
        let products = product_repo::list_by_company(&self.pool, company.id).await?;
        Ok(CompanyWithProducts { company, products })
    }

    /// Create a company bound to the caller's identity
    pub async fn create(&self, owner: Uuid, attrs: CompanyAttributes) -> Result<Company> {
        attrs.validate()?;
        let company = company_repo::insert(&self.pool, owner, &attrs).await?;
        tracing::info!(company_id = %company.id, "company created");
        Ok(company)
    }

    /// Apply a partial update to a company the caller owns.
    ///
    /// The patch is shallow-merged over the current row and the merged
    /// result is validated as a whole before anything is persisted.
    pub async fn update(&self, id: Uuid, owner: Uuid, patch: CompanyPatch) -> Result<Company> {
        let existing = self.find_owned(id, owner).await?;
        let merged = merge_company(&existing, patch);
        merged.validate()?;

        company_repo::update(&self.pool, id, owner, &merged)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
    }

    /// Delete a company the caller owns.
    ///
    /// Refused while products still reference it; callers must delete the
    /// products first.
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.find_owned(id, owner).await?;

        let product_count = product_repo::count_by_company(&self.pool, id).await?;
        if product_count > 0 {
            return Err(AppError::Conflict(
                "Company still has products; delete them before deleting the company"
                    .to_string(),
            ));
        }

        let removed = company_repo::delete(&self.pool, id, owner).await?;
        if !removed {
            return Err(AppError::NotFound("Company not found".to_string()));
        }

        tracing::info!(company_id = %id, "company deleted");
        Ok(())
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Company> {
        company_repo::find_by_id_and_owner(&self.pool, id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
    }
}
