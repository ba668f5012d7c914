/// company-service
///
/// Multi-tenant CRUD service for companies and their products, exposed over
/// REST (actix-web) and a read-only gRPC surface (tonic), backed by
/// PostgreSQL via sqlx.
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
