use axum::http::{self};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation, TokenData};
use serde_json::Value;

use crate::auth::auth::role_prpl;
use crate::store::Identity;

/// Name of the cookie carrying the token when no Authorization header is sent
pub const AUTH_COOKIE: &str = "auth_token";

/// Who is calling, as established by a validated token
#[derive(Clone, Debug, PartialEq)]
pub struct Caller {
    pub uid: String,
    /// Lease key: the token's session id, or the uid when it has none
    pub identity: Identity,
    pub prpls: Vec<String>,
}

// Get the auth token from a request
pub fn get_auth_token<B>(req: &http::Request<B>) -> Result<String, String> {
    // 1. Try to get token from Authorization header
    if let Some(auth_header) = req.headers().get(http::header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| "Invalid Authorization header".to_string())?;
        Ok(auth_str
            .strip_prefix("Bearer ")
            .unwrap_or(auth_str)
            .to_string())
    }
    // 2. Try to get token from cookies
    else {
        let cookie_header = req.headers().get(http::header::COOKIE)
            .ok_or_else(|| "Missing Authorization header or Cookie".to_string())?
            .to_str()
            .map_err(|_| "Invalid Cookie header".to_string())?;

        cookie::Cookie::split_parse(cookie_header)
            .flatten()
            .find(|c| c.name() == AUTH_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| format!("{} cookie not found", AUTH_COOKIE))
    }
}

// Validate a JWT token and return the token data
pub fn validate_jwt(token: &str, secret: &str) -> Result<TokenData<Value>, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Value>(token, &decoding_key, &validation)
}

// Build the caller from validated claims
pub fn caller_from_claims(claims: &Value) -> Result<Caller, String> {
    let uid = claims
        .get("sub")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "JWT token does not contain 'sub' claim".to_string())?
        .to_string();

    let identity = match claims.get("sid").and_then(|v| v.as_str()).filter(|s| !s.is_empty()) {
        Some(sid) => Identity::new(sid),
        None => Identity::new(uid.clone()),
    };

    let mut prpls = vec![format!("u/{}", uid)];
    if let Some(roles) = claims.get("roles").and_then(|v| v.as_array()) {
        for role in roles.iter().filter_map(|r| r.as_str()) {
            let prpl = role_prpl(role);
            if !prpls.contains(&prpl) {
                prpls.push(prpl);
            }
        }
    }

    Ok(Caller { uid, identity, prpls })
}
