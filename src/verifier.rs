use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::claims::CognitoClaims;
use crate::config::CognitoConfig;
use crate::decoder;
use crate::error::Error;
use crate::error::Result;
use crate::keys::KeySet;
use crate::policy;
use crate::signature;
use crate::signature::VerificationPolicy;
use crate::source::JwksEndpoint;
use crate::source::KeySource;

/// Trait for JWT validation
#[async_trait]
pub trait ValidateJwt {
    /// The claim set returned for a valid token
    type Claims;

    /// Validate a JWT and return its verified claims
    async fn validate(&self, token: &str) -> Result<Self::Claims>;
}

/// Outcome of the one-shot key set initialization. Failures are kept as their
/// message so every later call can report the same reason.
type KeySetOutcome = std::result::Result<Arc<KeySet>, String>;

struct Inner {
    config: CognitoConfig,
    policy: VerificationPolicy,
    source: Box<dyn KeySource>,
    keys: OnceCell<KeySetOutcome>,
}

/// Validator for the tokens of one Cognito user pool
///
/// The signing keys are requested from the [`KeySource`] once and cached for the
/// lifetime of the verifier. Validations issued while the keys are still being
/// resolved wait for that single initialization. If it fails, the verifier is
/// unusable and every call returns [`Error::Initialization`]; build a new one to
/// recover.
///
/// Clones share the same key set.
#[derive(Clone)]
pub struct CognitoVerifier {
    inner: Arc<Inner>,
}

impl CognitoVerifier {
    /// Create a verifier that resolves its keys on first use
    pub fn new(config: CognitoConfig, source: impl KeySource + 'static) -> Self {
        let policy = VerificationPolicy::from(&config);

        Self {
            inner: Arc::new(Inner {
                config,
                policy,
                source: Box::new(source),
                keys: OnceCell::new(),
            }),
        }
    }

    /// Create a verifier and resolve its keys right away
    ///
    /// # Errors
    /// Returns `Error::Initialization` if the keys could not be fetched or resolved
    pub async fn connect(config: CognitoConfig, source: impl KeySource + 'static) -> Result<Self> {
        let verifier = Self::new(config, source);
        verifier.initialize().await?;
        Ok(verifier)
    }

    /// Create a verifier reading the keys from the pool's public JWKS endpoint
    pub fn from_config(config: CognitoConfig) -> Self {
        let endpoint = JwksEndpoint::new(config.jwks_uri());
        Self::new(config, endpoint)
    }

    /// Wait for the key set to be resolved
    pub async fn initialize(&self) -> Result<()> {
        self.key_set().await.map(|_| ())
    }

    /// Whether the key set has been resolved successfully
    pub fn is_ready(&self) -> bool {
        matches!(self.inner.keys.get(), Some(Ok(_)))
    }

    pub fn config(&self) -> &CognitoConfig {
        &self.inner.config
    }

    pub fn issuer(&self) -> &str {
        self.inner.config.issuer()
    }

    /// Validate a token and hand the outcome to `callback`
    ///
    /// The callback is invoked exactly once, with the same result [`ValidateJwt::validate`]
    /// would have returned.
    pub async fn validate_with<F>(&self, token: &str, callback: F)
    where
        F: FnOnce(Result<CognitoClaims>) + Send,
    {
        callback(self.validate(token).await);
    }

    async fn key_set(&self) -> Result<Arc<KeySet>> {
        let outcome = self
            .inner
            .keys
            .get_or_init(|| async {
                match load_key_set(self.inner.source.as_ref()).await {
                    Ok(keys) => {
                        tracing::info!(
                            issuer = %self.issuer(),
                            keys = keys.len(),
                            "resolved signing keys"
                        );
                        Ok(Arc::new(keys))
                    }
                    Err(e) => {
                        tracing::error!(
                            issuer = %self.issuer(),
                            error = %e,
                            "unable to resolve signing keys"
                        );
                        Err(e.to_string())
                    }
                }
            })
            .await;

        outcome.clone().map_err(Error::Initialization)
    }

    async fn run_checks(&self, token: &str) -> Result<CognitoClaims> {
        let keys = self.key_set().await?;
        let config = &self.inner.config;

        let decoded = decoder::decode(token)?;

        policy::check_issuer(&decoded, config.issuer())?;
        policy::check_token_use(&decoded, config.token_use)?;
        policy::check_client(&decoded, config.client_id(), config.token_use)?;

        let key = keys.lookup(decoded.kid())?;

        signature::verify(&decoded, key, &self.inner.policy)
    }
}

#[async_trait]
impl ValidateJwt for CognitoVerifier {
    type Claims = CognitoClaims;

    async fn validate(&self, token: &str) -> Result<Self::Claims> {
        let result = self.run_checks(token).await;

        match &result {
            Ok(claims) => tracing::trace!(sub = ?claims.sub, "token accepted"),
            Err(e) => tracing::debug!(error = %e, "token rejected"),
        }

        result
    }
}

impl fmt::Debug for CognitoVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CognitoVerifier")
            .field("issuer", &self.issuer())
            .field("token_use", &self.inner.config.token_use)
            .field("ready", &self.is_ready())
            .finish()
    }
}

async fn load_key_set(source: &dyn KeySource) -> Result<KeySet> {
    let descriptors = source.signing_keys().await?;
    KeySet::resolve(&descriptors)
}
