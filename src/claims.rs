use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Claim set of a Cognito token
///
/// The registered claims used for validation are typed; every other member of
/// the payload is kept verbatim in `extra`, so serializing the claims yields the
/// original payload object. Typed fields are optional since the same type holds the
/// untrusted claims of a decoded token; presence is enforced by the policy checks and
/// the signature verifier.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CognitoClaims {
    /// Issuer - the user pool URL
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub iss: Option<String>,
    /// Either `access` or `id`
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_use: Option<String>,
    /// Subject - the user's UUID within the pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience - the app client id, present on id tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
    /// App client id, present on access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Expiration time as Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at as Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// All remaining claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CognitoClaims {
    /// Look up any claim by name, typed or not
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "iss" => self.iss.clone().map(Value::String),
            "token_use" => self.token_use.clone().map(Value::String),
            "sub" => self.sub.clone().map(Value::String),
            "aud" => self.aud.clone(),
            "client_id" => self.client_id.clone().map(Value::String),
            "exp" => self.exp.map(Value::from),
            "iat" => self.iat.map(Value::from),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Whether `aud` names the given client, as a single string or within an array
    pub fn has_audience(&self, client_id: &str) -> bool {
        match &self.aud {
            Some(Value::String(aud)) => aud == client_id,
            Some(Value::Array(auds)) => auds.iter().any(|aud| aud.as_str() == Some(client_id)),
            _ => false,
        }
    }

    /// Cognito usernames are carried as `cognito:username` on id tokens and
    /// `username` on access tokens
    pub fn username(&self) -> Option<&str> {
        self.extra
            .get("cognito:username")
            .or_else(|| self.extra.get("username"))
            .and_then(Value::as_str)
    }

    /// The full claim set as a JSON object
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// `iss` and `token_use` are compared against expected strings; any other JSON type
/// can never match and is read as absent.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(Some(value)),
        _ => Ok(None),
    }
}
