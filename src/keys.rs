use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use jsonwebtoken::jwk::AlgorithmParameters;
use jsonwebtoken::jwk::Jwk;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::jwk::PublicKeyUse;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;

use crate::error::invalid_key;
use crate::error::Error;
use crate::error::Result;

/// A public signing key as published in the pool's JWKS document
///
/// Untrusted until it has been resolved into a [`ResolvedKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKeyDescriptor {
    pub kid: String,
    pub kty: String,
    /// Modulus, base64url encoded
    pub n: String,
    /// Public exponent, base64url encoded
    pub e: String,
    pub alg: Option<String>,
    /// The JWK `use` member
    pub key_use: Option<String>,
}

impl SigningKeyDescriptor {
    /// An RS256 signature key
    pub fn rsa(kid: impl Into<String>, n: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            kid: kid.into(),
            kty: "RSA".to_string(),
            n: n.into(),
            e: e.into(),
            alg: Some("RS256".to_string()),
            key_use: Some("sig".to_string()),
        }
    }
}

impl SigningKeyDescriptor {
    /// Descriptors of every key in a JWKS document, failing on the first one
    /// that is not an RSA key
    pub fn from_jwks(jwks: &JwkSet) -> Result<Vec<Self>> {
        jwks.keys.iter().map(Self::try_from).collect()
    }
}

impl TryFrom<&Jwk> for SigningKeyDescriptor {
    type Error = Error;

    fn try_from(jwk: &Jwk) -> Result<Self> {
        let kid = jwk.common.key_id.clone().unwrap_or_default();

        let AlgorithmParameters::RSA(rsa) = &jwk.algorithm else {
            return Err(invalid_key(&kid, "key type is not RSA"));
        };

        let key_use = jwk.common.public_key_use.as_ref().map(|key_use| match key_use {
            PublicKeyUse::Signature => "sig".to_string(),
            PublicKeyUse::Encryption => "enc".to_string(),
            PublicKeyUse::Other(other) => other.clone(),
        });

        Ok(Self {
            kid,
            kty: "RSA".to_string(),
            n: rsa.n.clone(),
            e: rsa.e.clone(),
            alg: jwk.common.key_algorithm.as_ref().map(|alg| format!("{alg:?}")),
            key_use,
        })
    }
}

/// Verification-ready key material
#[derive(Clone)]
pub struct ResolvedKey {
    kid: String,
    algorithm: Algorithm,
    decoding_key: DecodingKey,
}

impl ResolvedKey {
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// The single algorithm tokens signed with this key may declare
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TryFrom<&SigningKeyDescriptor> for ResolvedKey {
    type Error = Error;

    fn try_from(descriptor: &SigningKeyDescriptor) -> Result<Self> {
        let kid = descriptor.kid.as_str();

        if kid.is_empty() {
            return Err(invalid_key(kid, "empty key id"));
        }
        if descriptor.kty != "RSA" {
            return Err(invalid_key(
                kid,
                format!("key type '{}' is not RSA", descriptor.kty),
            ));
        }
        if let Some(key_use) = descriptor.key_use.as_deref() {
            if key_use != "sig" {
                return Err(invalid_key(kid, format!("key use '{key_use}' is not 'sig'")));
            }
        }
        if descriptor.n.is_empty() || descriptor.e.is_empty() {
            return Err(invalid_key(kid, "missing modulus or exponent"));
        }

        let algorithm = rsa_algorithm(kid, descriptor.alg.as_deref())?;
        let decoding_key = DecodingKey::from_rsa_components(&descriptor.n, &descriptor.e)
            .map_err(|e| invalid_key(kid, e.to_string()))?;

        Ok(Self {
            kid: kid.to_string(),
            algorithm,
            decoding_key,
        })
    }
}

fn rsa_algorithm(kid: &str, alg: Option<&str>) -> Result<Algorithm> {
    let Some(alg) = alg else {
        return Ok(Algorithm::RS256);
    };

    match Algorithm::from_str(alg) {
        Ok(algorithm @ (Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512)) => Ok(algorithm),
        _ => Err(invalid_key(kid, format!("algorithm '{alg}' is not supported"))),
    }
}

/// Signing keys of one issuer, indexed by key id
///
/// Built in one go and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, ResolvedKey>,
}

impl KeySet {
    /// Resolve every descriptor, failing on the first malformed one
    ///
    /// A partially resolved set is never returned.
    pub fn resolve(descriptors: &[SigningKeyDescriptor]) -> Result<Self> {
        let mut keys = HashMap::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let key = ResolvedKey::try_from(descriptor)?;
            if keys.contains_key(key.kid()) {
                return Err(Error::DuplicateKeyId(key.kid.clone()));
            }
            keys.insert(key.kid.clone(), key);
        }

        Ok(Self { keys })
    }

    /// Find the key a token header names; a header without `kid` names none
    pub fn lookup(&self, kid: Option<&str>) -> Result<&ResolvedKey> {
        kid.and_then(|kid| self.keys.get(kid))
            .ok_or_else(|| Error::UnrecognizedKey(kid.map(str::to_string)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}
