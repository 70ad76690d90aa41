//! Bearer token verification.
//!
//! A token is accepted when it equals the configured debug token, or when it
//! is a JWT signed with an asymmetric key published in the issuer's JWKS
//! document and carrying the expected audience and issuer.

use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::AuthConfig;

const DEBUG_SUBJECT: &str = "debug-user";
const DEBUG_EMAIL: &str = "you@localhost";

const ALLOWED_ALGORITHMS: &[Algorithm] = &[
    Algorithm::ES256,
    Algorithm::ES384,
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
    Algorithm::EdDSA,
];

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingToken,

    #[error("Invalid authorization header format. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("Token verification is not configured")]
    NotConfigured,

    #[error("Token has no key id")]
    MissingKeyId,

    #[error("No signing key matches kid '{0}'")]
    UnknownKey(String),

    #[error("Unsupported signing algorithm {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    #[error("Failed to fetch signing keys: {0}")]
    Jwks(String),

    #[error("Invalid or expired token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Identity attached to a request once its token is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct AuthenticatedUser {
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    email: Option<String>,
    role: Option<String>,
}

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

#[derive(Clone, Debug)]
pub struct TokenVerifier {
    client: Client,
    debug_token: Option<String>,
    jwks_url: Option<Url>,
    issuer: Option<String>,
    audience: String,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Jwks(format!("Failed to create HTTP client: {e}")))?;

        let jwks_url = config
            .resolved_jwks_url()
            .map(|raw| {
                Url::parse(&raw).map_err(|e| AuthError::Jwks(format!("invalid JWKS URL {raw}: {e}")))
            })
            .transpose()?;

        if config.debug_token.is_some() {
            warn!("DEBUG_TOKEN is set; requests presenting it bypass JWT verification");
        }

        Ok(Self {
            client,
            debug_token: config.debug_token.clone(),
            jwks_url,
            issuer: config.expected_issuer(),
            audience: config.audience.clone(),
        })
    }

    pub async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if self.debug_token.as_deref() == Some(token) {
            return Ok(AuthenticatedUser {
                subject: DEBUG_SUBJECT.to_string(),
                email: Some(DEBUG_EMAIL.to_string()),
                role: None,
            });
        }

        let jwks_url = self.jwks_url.as_ref().ok_or(AuthError::NotConfigured)?;

        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        if !ALLOWED_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }

        let jwks = self.fetch_jwks(jwks_url).await?;
        let jwk = jwks
            .find(&kid)
            .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;
        let key = DecodingKey::from_jwk(jwk)?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[&self.audience]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<Claims>(token, &key, &validation)?.claims;
        debug!(subject = %claims.sub, "Verified bearer token");

        Ok(AuthenticatedUser {
            subject: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }

    async fn fetch_jwks(&self, url: &Url) -> Result<JwkSet, AuthError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::Jwks(format!("{url} returned {}", resp.status())));
        }

        resp.json()
            .await
            .map_err(|e| AuthError::Jwks(format!("invalid JWKS document: {e}")))
    }
}
