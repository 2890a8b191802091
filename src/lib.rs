//! # cognito-gate
//!
//! Validation of JSON Web Tokens issued by an AWS Cognito user pool.
//!
//! A token is accepted only when it is well formed, comes from the configured pool,
//! has the configured `token_use`, is signed by one of the pool's signing keys, and
//! is neither expired nor older than the configured maximum age.
//!
//! ## Features
//!
//! - RSA signature verification against the pool's JWKS
//! - Signing keys resolved once per verifier and shared by all validations
//! - Pluggable key source: the pool's JWKS endpoint or a fixed key set
//! - Issuer, token use, app client, expiration and maximum age checks
//! - Classified errors for every rejection reason
//!
//! ## Example
//!
//! ```rust,no_run
//! use cognito_gate::{CognitoConfig, CognitoVerifier, ValidateJwt};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CognitoConfig::new("us-east-1", "us-east-1_ABC123", "access")?
//!         .with_token_expiration(Duration::from_secs(1800))?;
//!
//!     let verifier = CognitoVerifier::from_config(config);
//!
//!     let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...";
//!     let claims = verifier.validate(token).await?;
//!
//!     println!("Subject: {:?}", claims.sub);
//!
//!     Ok(())
//! }
//! ```

mod claims;
mod config;
mod decoder;
mod error;
mod keys;
pub mod policy;
mod signature;
mod source;
mod verifier;

// Re-exports for public API
pub use claims::CognitoClaims;
pub use config::CognitoConfig;
pub use config::ConfigRecord;
pub use config::TokenUse;
pub use decoder::decode;
pub use decoder::DecodedToken;
pub use decoder::TokenHeader;
pub use error::ConfigError;
pub use error::Error;
pub use error::Result;
pub use keys::KeySet;
pub use keys::ResolvedKey;
pub use keys::SigningKeyDescriptor;
pub use signature::verify;
pub use signature::VerificationPolicy;
pub use source::JwksEndpoint;
pub use source::KeySource;
pub use source::StaticKeySource;
pub use verifier::CognitoVerifier;
pub use verifier::ValidateJwt;
