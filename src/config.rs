use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::error::Error;
use crate::error::Result;

/// Default maximum token age: one hour
const DEFAULT_TOKEN_EXPIRATION_MILLIS: u64 = 3_600_000;

/// The kind of token a verifier accepts, carried in the `token_use` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenUse {
    Access,
    Id,
}

impl TokenUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenUse::Access => "access",
            TokenUse::Id => "id",
        }
    }
}

impl fmt::Display for TokenUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenUse {
    type Err = ConfigError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "" => Err(ConfigError::MissingTokenUse),
            "access" => Ok(TokenUse::Access),
            "id" => Ok(TokenUse::Id),
            other => Err(ConfigError::InvalidTokenUse(other.to_string())),
        }
    }
}

/// Configuration for a Cognito user pool verifier
///
/// Immutable once built. The canonical issuer is derived from the region and
/// the user pool id and compared byte for byte against the `iss` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CognitoConfig {
    pub(crate) region: String,
    pub(crate) user_pool_id: String,
    pub(crate) token_use: TokenUse,
    /// Maximum time since `iat` for a token to be accepted (default: 1 hour)
    pub(crate) token_expiration: Duration,
    /// App client the tokens must have been issued to, if any
    pub(crate) client_id: Option<String>,
    /// Clock skew tolerance in seconds applied to `exp`, `nbf` and the age check
    pub(crate) leeway: u64,
    issuer: String,
}

impl CognitoConfig {
    /// Create a new configuration for the given pool and token use
    ///
    /// # Errors
    /// Returns `Error::Configuration` if the region, the user pool id or the token
    /// use is empty, or if the token use is not one of `access` or `id`
    pub fn new(
        region: impl Into<String>,
        user_pool_id: impl Into<String>,
        token_use: &str,
    ) -> Result<Self> {
        let region = region.into();
        let user_pool_id = user_pool_id.into();

        if region.is_empty() {
            return Err(ConfigError::MissingRegion.into());
        }
        if user_pool_id.is_empty() {
            return Err(ConfigError::MissingUserPoolId.into());
        }
        let token_use = token_use.parse::<TokenUse>()?;

        let issuer = format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}");

        Ok(Self {
            region,
            user_pool_id,
            token_use,
            token_expiration: Duration::from_millis(DEFAULT_TOKEN_EXPIRATION_MILLIS),
            client_id: None,
            leeway: 0,
            issuer,
        })
    }

    /// Set the maximum token age
    ///
    /// # Errors
    /// Returns `Error::Configuration` for a zero duration
    pub fn with_token_expiration(mut self, max_age: Duration) -> Result<Self> {
        if max_age.is_zero() {
            return Err(ConfigError::ZeroTokenExpiration.into());
        }
        self.token_expiration = max_age;
        Ok(self)
    }

    /// Require tokens to be issued to this app client
    ///
    /// Id tokens carry the client in `aud`, access tokens in `client_id`.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the clock skew tolerance in seconds
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// The canonical issuer, `https://cognito-idp.{region}.amazonaws.com/{user_pool_id}`
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Location of the pool's public signing keys
    pub fn jwks_uri(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    pub fn token_use(&self) -> TokenUse {
        self.token_use
    }

    pub fn token_expiration(&self) -> Duration {
        self.token_expiration
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}

/// Construction input in its serialized shape, e.g. read from a JSON file
///
/// ```json
/// { "region": "us-east-1", "userPoolId": "us-east-1_ABC123", "tokenUse": "id", "tokenExpiration": 3600000 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, alias = "cognitoUserPoolId", alias = "userPoolIdentifier")]
    pub user_pool_id: Option<String>,
    #[serde(default)]
    pub token_use: Option<String>,
    /// Maximum token age in milliseconds
    #[serde(default, alias = "tokenExpirationMillis")]
    pub token_expiration: Option<u64>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub leeway: Option<u64>,
}

impl TryFrom<ConfigRecord> for CognitoConfig {
    type Error = Error;

    fn try_from(record: ConfigRecord) -> Result<Self> {
        let region = record.region.ok_or(ConfigError::MissingRegion)?;
        let user_pool_id = record.user_pool_id.ok_or(ConfigError::MissingUserPoolId)?;
        let token_use = record.token_use.ok_or(ConfigError::MissingTokenUse)?;

        let mut config = CognitoConfig::new(region, user_pool_id, &token_use)?;

        if let Some(millis) = record.token_expiration {
            config = config.with_token_expiration(Duration::from_millis(millis))?;
        }
        if let Some(client_id) = record.client_id {
            config = config.with_client_id(client_id);
        }
        if let Some(leeway) = record.leeway {
            config = config.with_leeway(leeway);
        }

        Ok(config)
    }
}
