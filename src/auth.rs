use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::SystemTime;

use crate::{config::AppConfig, error::ApiError};

/// Custom header carrying the admin session credential on protected calls.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Claims
///
/// Payload of the opaque session token issued by the Auth Gate. Signed with the
/// configured secret and validated on every protected request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the admin login the token was issued for.
    pub sub: String,
    /// Expiration Time (exp): timestamp after which the token must not be accepted.
    pub exp: usize,
    /// Issued At (iat): timestamp when the token was issued.
    pub iat: usize,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// check_credentials
///
/// Constant-set comparison of the presented login/password pair against the
/// configured admin credentials. Both values are reduced to SHA-256 digests
/// before comparison so timing does not depend on where the strings diverge,
/// and the two checks are combined without short-circuiting so an unknown
/// login and a wrong password are indistinguishable to the caller.
pub fn check_credentials(config: &AppConfig, login: &str, password: &str) -> bool {
    fn digest(value: &str) -> [u8; 32] {
        Sha256::digest(value.as_bytes()).into()
    }

    let login_ok = digest(login) == digest(&config.admin_login);
    let password_ok = digest(password) == digest(&config.admin_password);
    login_ok & password_ok
}

/// issue_token
///
/// Issues an expiring HS256 session token for a successfully authenticated login.
pub fn issue_token(config: &AppConfig, login: &str) -> Result<String, ApiError> {
    let now = unix_now();
    let claims = Claims {
        sub: login.to_string(),
        iat: now as usize,
        exp: (now + config.token_ttl_secs) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// decode_token
///
/// Validates a presented credential. The error messages distinguish an expired
/// token from an otherwise invalid one, as the frontend surfaces them differently.
pub fn decode_token(config: &AppConfig, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::Unauthorized("Token expired".to_string()),
        _ => ApiError::Unauthorized("Invalid token".to_string()),
    })
}

/// AdminUser Extractor Result
///
/// The resolved identity of an authenticated admin request. Handlers take this
/// struct as an argument to require a valid session credential.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// The admin login the presented token was issued for.
    pub login: String,
}

/// AdminUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AdminUser usable as a function
/// argument in any protected handler. Authentication lives in the extractor, the
/// business logic in the handler.
///
/// The process:
/// 1. Dependency resolution: pull AppConfig (signing secret) from the app state.
/// 2. Header extraction: read the credential from the `X-Auth-Token` header.
/// 3. Token validation: HS256 decode with mandatory expiry check.
///
/// Rejection: 401 with `No token provided`, `Token expired`, or `Invalid token`.
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

        let claims = decode_token(&config, token)?;

        Ok(AdminUser { login: claims.sub })
    }
}
