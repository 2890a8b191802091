use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::claims::CognitoClaims;
use crate::error::Error;
use crate::error::Result;

/// JOSE header of a token, read without restricting `alg`
///
/// An algorithm this crate cannot verify still decodes; it is rejected once the
/// token reaches its signing key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
}

/// A structurally valid token whose signature has not been checked
///
/// The claims are untrusted and must never be handed to a caller.
#[derive(Debug)]
pub struct DecodedToken<'a> {
    pub header: TokenHeader,
    pub claims: CognitoClaims,
    token: &'a str,
    segments: [&'a str; 3],
}

impl<'a> DecodedToken<'a> {
    /// The compact serialization this token was decoded from
    pub fn as_str(&self) -> &'a str {
        self.token
    }

    /// The raw `header`, `payload` and `signature` segments
    pub fn segments(&self) -> [&'a str; 3] {
        self.segments
    }

    pub fn kid(&self) -> Option<&str> {
        self.header.kid.as_deref()
    }
}

#[cfg(test)]
impl DecodedToken<'static> {
    pub(crate) fn for_tests(header: TokenHeader, claims: CognitoClaims) -> Self {
        Self {
            header,
            claims,
            token: "",
            segments: ["", "", ""],
        }
    }
}

/// Parse a compact JWT without verifying its signature
pub fn decode(token: &str) -> Result<DecodedToken<'_>> {
    let segments = split_segments(token)?;

    // The payload is only read to route the token to its key and to reject it
    // early on policy
    let header = decode_segment(segments[0], "header")?;
    let claims = decode_segment(segments[1], "payload")?;

    Ok(DecodedToken {
        header,
        claims,
        token,
        segments,
    })
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| Error::Decode(format!("{name} is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::Decode(format!("{name} is malformed: {e}")))
}

fn split_segments(token: &str) -> Result<[&str; 3]> {
    let mut parts = token.split('.');

    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok([header, payload, signature])
        }
        _ => Err(Error::Decode(
            "expected three non-empty dot separated segments".to_string(),
        )),
    }
}
