/// Database access layer
///
/// Thin sqlx query functions over the shared `PgPool`. Ownership rules live
/// in the service layer; the repos only distinguish owner-scoped lookups
/// (primary key + owning identity in one WHERE clause) from unscoped ones.
pub mod company_repo;
pub mod product_repo;
