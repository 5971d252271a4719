//! JWT service for session token issuance and validation
//!
//! Tokens are stateless: nothing is stored server-side and a token stays
//! valid until it expires. Signing uses HS256 with a shared secret or RS256
//! with a PEM key pair, depending on configuration.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TokenError;
use crate::models::Company;

/// Longest accepted token lifetime: ten years
pub const MAX_TOKEN_EXPIRY: i64 = 10 * 365 * 24 * 60 * 60;

/// Signing keys
#[derive(Clone)]
pub enum JwtKeys {
    /// HS256 shared secret
    Secret(String),
    /// RS256 PEM key pair
    Rsa {
        private_key: String,
        public_key: String,
    },
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub keys: JwtKeys,
    /// Token expiration time in seconds (default: 24 hours)
    pub token_expiry: i64,
    /// Issuer written to and required in every token
    pub issuer: String,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HS256 shared secret; takes precedence over the RSA keys
    /// - `JWT_PRIVATE_KEY`: RS256 private key (PEM) or path to the key file
    /// - `JWT_PUBLIC_KEY`: RS256 public key (PEM) or path to the key file
    /// - `JWT_TOKEN_EXPIRY`: Token expiry in seconds (default: 86400)
    /// - `JWT_ISSUER`: Token issuer (default: "company-service")
    pub fn from_env() -> Result<Self, TokenError> {
        let keys = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => JwtKeys::Secret(secret),
            _ => JwtKeys::Rsa {
                private_key: read_pem("JWT_PRIVATE_KEY")?,
                public_key: read_pem("JWT_PUBLIC_KEY")?,
            },
        };

        let token_expiry = match std::env::var("JWT_TOKEN_EXPIRY") {
            Ok(value) => value
                .parse::<i64>()
                .ok()
                .filter(|&seconds| (1..=MAX_TOKEN_EXPIRY).contains(&seconds))
                .ok_or_else(|| {
                    TokenError::Key(format!(
                        "JWT_TOKEN_EXPIRY must be between 1 and {} seconds, got '{}'",
                        MAX_TOKEN_EXPIRY, value
                    ))
                })?,
            Err(_) => 86_400,
        };

        let issuer =
            std::env::var("JWT_ISSUER").unwrap_or_else(|_| "company-service".to_string());

        Ok(Self {
            keys,
            token_expiry,
            issuer,
        })
    }
}

/// Read a PEM key from an environment variable holding either the key or a path to it
fn read_pem(var: &str) -> Result<String, TokenError> {
    let value = std::env::var(var)
        .map_err(|_| TokenError::Key(format!("{} environment variable not set", var)))?;

    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    std::fs::read_to_string(&value)
        .map(|pem| pem.trim().to_string())
        .map_err(|e| TokenError::Key(format!("Failed to read {} file: {}", var, e)))
}

/// Session claims carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Company ID
    pub sub: String,
    /// Company email at issuance
    pub email: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: i64,
    issuer: String,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self, TokenError> {
        if !(1..=MAX_TOKEN_EXPIRY).contains(&config.token_expiry) {
            return Err(TokenError::Key(format!(
                "Token expiry must be between 1 and {} seconds",
                MAX_TOKEN_EXPIRY
            )));
        }

        let (algorithm, encoding_key, decoding_key) = match &config.keys {
            JwtKeys::Secret(secret) => (
                Algorithm::HS256,
                EncodingKey::from_secret(secret.as_bytes()),
                DecodingKey::from_secret(secret.as_bytes()),
            ),
            JwtKeys::Rsa {
                private_key,
                public_key,
            } => (
                Algorithm::RS256,
                EncodingKey::from_rsa_pem(private_key.as_bytes())
                    .map_err(|e| TokenError::Key(e.to_string()))?,
                DecodingKey::from_rsa_pem(public_key.as_bytes())
                    .map_err(|e| TokenError::Key(e.to_string()))?,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        Ok(Self {
            algorithm,
            encoding_key,
            decoding_key,
            validation,
            token_expiry: config.token_expiry,
            issuer: config.issuer,
        })
    }

    /// Issue a session token for a company
    pub fn encode(&self, company: &Company) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: company.id.to_string(),
            email: company.email.clone(),
            iat: now,
            exp: now.checked_add(self.token_expiry).ok_or_else(|| {
                TokenError::Key("Token expiry overflows the timestamp range".to_string())
            })?,
            iss: self.issuer.clone(),
        };

        self.sign(&claims)
    }

    /// Sign arbitrary claims with the configured key
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Validate a token and return its claims
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected token: {}", e);
                TokenError::Invalid
            })
    }
}
