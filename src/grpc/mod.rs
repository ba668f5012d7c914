//! gRPC surface for inter-service communication
//!
//! Read-only lookups other services use to resolve companies and products
//! by id. Deliberately unscoped by owner: callers are trusted internal
//! services, not end users.

pub mod server;

pub use server::*;
