use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use reqwest::Client;

use crate::error::fetch_jwks_error;
use crate::error::Error;
use crate::error::Result;
use crate::keys::SigningKeyDescriptor;

/// Supplier of the raw signing key descriptors for an issuer
///
/// Consulted once per verifier, when its key set is initialized.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn signing_keys(&self) -> Result<Vec<SigningKeyDescriptor>>;
}

/// A fixed, in-memory key set
#[derive(Debug, Clone, Default)]
pub struct StaticKeySource {
    keys: Vec<SigningKeyDescriptor>,
}

impl StaticKeySource {
    pub fn new(keys: Vec<SigningKeyDescriptor>) -> Self {
        Self { keys }
    }
}

impl TryFrom<&JwkSet> for StaticKeySource {
    type Error = Error;

    fn try_from(jwks: &JwkSet) -> Result<Self> {
        SigningKeyDescriptor::from_jwks(jwks).map(Self::new)
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn signing_keys(&self) -> Result<Vec<SigningKeyDescriptor>> {
        Ok(self.keys.clone())
    }
}

#[async_trait]
impl KeySource for Vec<SigningKeyDescriptor> {
    async fn signing_keys(&self) -> Result<Vec<SigningKeyDescriptor>> {
        Ok(self.clone())
    }
}

/// Fetches the key set from a JWKS endpoint, normally
/// `https://cognito-idp.{region}.amazonaws.com/{user_pool_id}/.well-known/jwks.json`
#[derive(Debug, Clone)]
pub struct JwksEndpoint {
    url: String,
    client: Client,
}

impl JwksEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::default(),
        }
    }

    /// Set a custom HTTP client, e.g. one with a request timeout
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for JwksEndpoint {
    async fn signing_keys(&self) -> Result<Vec<SigningKeyDescriptor>> {
        tracing::debug!(url = %self.url, "fetching signing keys");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(fetch_jwks_error)?;

        if !response.status().is_success() {
            return Err(Error::JwksFetch(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(fetch_jwks_error)?;

        SigningKeyDescriptor::from_jwks(&jwks)
    }
}
