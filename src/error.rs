use std::fmt::Debug;

use thiserror::Error;

use crate::config::TokenUse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Signing keys could not be initialized: {0}")]
    Initialization(String),
    #[error("JWKS fetch error: {0}")]
    JwksFetch(String),
    #[error("Signing key '{kid}' is malformed: {reason}")]
    InvalidKey { kid: String, reason: String },
    #[error("Signing key id '{0}' appears more than once in the key set")]
    DuplicateKeyId(String),
    #[error("Not a valid JWT: {0}")]
    Decode(String),
    #[error("The provided JWT is not from the configured user pool. Provided issuer: {0:?}")]
    IssuerMismatch(Option<String>),
    #[error("Not an {expected} token, got token_use {found:?}")]
    TokenUseMismatch {
        expected: TokenUse,
        found: Option<String>,
    },
    #[error("The provided JWT was issued to another app client: {0:?}")]
    ClientMismatch(Option<String>),
    /// Holds `None` when the header carries no `kid` at all
    #[error("The provided JWT names no key of the signing key set. Key id: {0:?}")]
    UnrecognizedKey(Option<String>),
    #[error("Only RSA signatures are supported, got: {0}")]
    AlgorithmNotSupported(String),
    #[error("JWT signature is invalid")]
    InvalidSignature,
    #[error("The provided JWT has expired. Expiration timestamp: {0}")]
    TokenExpired(i64),
    #[error("The provided JWT exceeds the maximum token age. Issued at: {0}")]
    TokenTooOld(i64),
    #[error("Missing required claim '{0}'")]
    MissingClaim(String),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    /// True for both an elapsed `exp` and an exceeded maximum age.
    pub fn is_expired(&self) -> bool {
        matches!(self, Error::TokenExpired(_) | Error::TokenTooOld(_))
    }
}

/// Configuration problems, reported synchronously at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AWS region not specified")]
    MissingRegion,
    #[error("Cognito user pool id not specified")]
    MissingUserPoolId,
    #[error("Token use not specified. Possible values 'access' | 'id'")]
    MissingTokenUse,
    #[error("Token use '{0}' is not supported. Possible values 'access' | 'id'")]
    InvalidTokenUse(String),
    #[error("Token expiration must be greater than zero")]
    ZeroTokenExpiration,
}

pub(crate) fn fetch_jwks_error(error: reqwest::Error) -> Error {
    Error::JwksFetch(format!("Failed to fetch JWKS: {error}"))
}

pub(crate) fn invalid_key(kid: &str, reason: impl Into<String>) -> Error {
    Error::InvalidKey {
        kid: kid.to_string(),
        reason: reason.into(),
    }
}
