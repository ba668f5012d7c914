/// Caller identity extraction
///
/// Decodes the bearer credential (Authorization header first, `jwt` cookie
/// as fallback) into the owning identity for all REST operations.
///
/// The token payload is NOT signature-verified. This service sits behind a
/// gateway that issues the tokens; whatever `userId` the payload claims is
/// taken as the caller. Swapping in a verified decoder only requires
/// changing `identity_from_token`; everything downstream consumes the
/// resulting `OwnerId`.
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use base64::{engine::general_purpose, Engine as _};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Owning identity extracted from the request credential.
///
/// Absence of a usable credential fails the request with 401 before the
/// handler body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub Uuid);

impl FromRequest for OwnerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(identity_from_request(req).map(OwnerId).ok_or(AppError::Unauthorized))
    }
}

/// Resolve the caller identity from request credentials, if any.
pub fn identity_from_request(req: &HttpRequest) -> Option<Uuid> {
    let token = bearer_token(req).or_else(|| cookie_token(req))?;
    identity_from_token(&token)
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|t| t.to_string())
}

fn cookie_token(req: &HttpRequest) -> Option<String> {
    req.cookie("jwt").map(|c| c.value().to_string())
}

/// Decode the `userId` claim out of a JWT-shaped token.
///
/// The token must split into exactly three dot-separated segments; the
/// middle segment is base64-decoded and JSON-parsed. Any failure along the
/// way yields no identity.
pub fn identity_from_token(token: &str) -> Option<Uuid> {
    if token.is_empty() {
        return None;
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = decode_segment(parts[1])?;
    let claims: serde_json::Value = serde_json::from_slice(&payload).ok()?;
    let user_id = claims.get("userId")?.as_str()?;
    Uuid::parse_str(user_id).ok()
}

// Tokens arrive in both base64url (per RFC 7515) and standard-alphabet
// encodings depending on the issuer; accept either, with or without padding.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    general_purpose::URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(trimmed))
        .ok()
}
