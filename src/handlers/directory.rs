/// External directory search handler
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::services::DirectoryClient;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Search the public company directory by name.
///
/// A missing or empty `q` is rejected before any outbound call is made.
/// The route needs no caller identity; the directory is public data.
pub async fn search_directory(
    directory: web::Data<Arc<DirectoryClient>>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let term = query
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".to_string()))?;

    let results = directory.search(term).await?;
    Ok(HttpResponse::Ok().json(results))
}
