/// HTTP handlers for the REST surface
///
/// This module contains handlers for:
/// - Companies: owner-scoped CRUD plus the external directory search
/// - Products: CRUD nested under a company
/// - Health: liveness probe
pub mod companies;
pub mod directory;
pub mod health;
pub mod products;

// Re-export handler functions at module level
pub use companies::{create_company, delete_company, get_companies, get_company, update_company};
pub use directory::search_directory;
pub use health::health_check;
pub use products::{create_product, delete_product, get_product, get_products, update_product};
