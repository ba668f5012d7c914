/// Business logic layer
///
/// Services own the ownership rules and validation flow; handlers only
/// translate HTTP in and out, repos only run queries.
pub mod companies;
pub mod directory;
pub mod products;

pub use companies::CompanyService;
pub use directory::DirectoryClient;
pub use products::ProductService;
