use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Validation;

use crate::claims::CognitoClaims;
use crate::config::CognitoConfig;
use crate::decoder::DecodedToken;
use crate::error::Error;
use crate::error::Result;
use crate::keys::ResolvedKey;

/// Time and issuer bounds enforced together with the signature
#[derive(Debug, Clone)]
pub struct VerificationPolicy {
    pub issuer: String,
    pub max_age: Duration,
    /// Clock skew tolerance in seconds
    pub leeway: u64,
}

impl From<&CognitoConfig> for VerificationPolicy {
    fn from(config: &CognitoConfig) -> Self {
        Self {
            issuer: config.issuer().to_string(),
            max_age: config.token_expiration,
            leeway: config.leeway,
        }
    }
}

/// Verify the signature of a decoded token with its key, then the time-bound claims
///
/// Claims are only returned once every check has passed.
pub fn verify(
    decoded: &DecodedToken<'_>,
    key: &ResolvedKey,
    policy: &VerificationPolicy,
) -> Result<CognitoClaims> {
    if Algorithm::from_str(&decoded.header.alg).ok() != Some(key.algorithm()) {
        return Err(Error::AlgorithmNotSupported(decoded.header.alg.clone()));
    }

    let validation = validation_for(key, policy);
    let token_data =
        jsonwebtoken::decode::<CognitoClaims>(decoded.as_str(), key.decoding_key(), &validation)
            .map_err(|e| classify(e, decoded))?;

    let claims = token_data.claims;

    if claims.iss.as_deref() != Some(policy.issuer.as_str()) {
        return Err(Error::IssuerMismatch(claims.iss));
    }

    // `exp` is optional, the maximum age bounds tokens without one
    let now = Utc::now();
    if let Some(exp) = claims.exp {
        if exp.saturating_add(leeway_secs(policy)) < now.timestamp() {
            return Err(Error::TokenExpired(exp));
        }
    }

    let iat = claims.iat.ok_or_else(|| Error::MissingClaim("iat".to_string()))?;
    let age_millis = now.timestamp_millis().saturating_sub(iat.saturating_mul(1000));
    let max_age_millis = i64::try_from(policy.max_age.as_millis())
        .unwrap_or(i64::MAX)
        .saturating_add(leeway_secs(policy).saturating_mul(1000));
    if age_millis > max_age_millis {
        return Err(Error::TokenTooOld(iat));
    }

    Ok(claims)
}

fn validation_for(key: &ResolvedKey, policy: &VerificationPolicy) -> Validation {
    let mut validation = Validation::new(key.algorithm());
    validation.set_issuer(&[policy.issuer.as_str()]);
    validation.set_required_spec_claims(&["iss"]);
    // Cognito puts the app client in `aud` only on id tokens, it is checked by policy instead
    validation.validate_aud = false;
    validation.validate_nbf = true;
    validation.leeway = policy.leeway;
    validation
}

fn leeway_secs(policy: &VerificationPolicy) -> i64 {
    i64::try_from(policy.leeway).unwrap_or(i64::MAX)
}

fn classify(error: jsonwebtoken::errors::Error, decoded: &DecodedToken<'_>) -> Error {
    match error.into_kind() {
        ErrorKind::InvalidSignature => Error::InvalidSignature,
        ErrorKind::ExpiredSignature => Error::TokenExpired(decoded.claims.exp.unwrap_or_default()),
        ErrorKind::InvalidIssuer => Error::IssuerMismatch(decoded.claims.iss.clone()),
        ErrorKind::InvalidAlgorithm => Error::AlgorithmNotSupported(decoded.header.alg.clone()),
        ErrorKind::MissingRequiredClaim(claim) => Error::MissingClaim(claim),
        kind => Error::Jwt(kind.into()),
    }
}
