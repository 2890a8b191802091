//! Claim checks applied to a decoded token before any key material is touched
//!
//! Callers run them in order: issuer, token use, then client. The first failing
//! check decides the error reported for a token that is invalid in several ways.

use crate::config::TokenUse;
use crate::decoder::DecodedToken;
use crate::error::Error;
use crate::error::Result;

/// Exact comparison against the canonical issuer, no normalization
pub fn check_issuer(decoded: &DecodedToken<'_>, expected_issuer: &str) -> Result<()> {
    match decoded.claims.iss.as_deref() {
        Some(iss) if iss == expected_issuer => Ok(()),
        other => Err(Error::IssuerMismatch(other.map(str::to_string))),
    }
}

pub fn check_token_use(decoded: &DecodedToken<'_>, expected: TokenUse) -> Result<()> {
    match decoded.claims.token_use.as_deref() {
        Some(found) if found == expected.as_str() => Ok(()),
        other => Err(Error::TokenUseMismatch {
            expected,
            found: other.map(str::to_string),
        }),
    }
}

/// Id tokens name the app client in `aud`, access tokens in `client_id`
pub fn check_client(
    decoded: &DecodedToken<'_>,
    expected_client: Option<&str>,
    token_use: TokenUse,
) -> Result<()> {
    let Some(expected) = expected_client else {
        return Ok(());
    };

    let claims = &decoded.claims;
    let matches = match token_use {
        TokenUse::Id => claims.has_audience(expected),
        TokenUse::Access => claims.client_id.as_deref() == Some(expected),
    };

    if matches {
        return Ok(());
    }

    let found = match token_use {
        TokenUse::Id => claims.aud.as_ref().map(|aud| aud.to_string()),
        TokenUse::Access => claims.client_id.clone(),
    };
    Err(Error::ClientMismatch(found))
}
