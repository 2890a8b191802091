use std::time::Duration;

use cognito_gate::CognitoConfig;
use cognito_gate::CognitoVerifier;
use cognito_gate::ConfigRecord;
use cognito_gate::JwksEndpoint;
use cognito_gate::ValidateJwt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Example JWT token (this is just a placeholder - use a real token in practice)
    let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...";

    // Example 1: Simple usage with default settings
    println!("=== Example 1: Simple Usage ===");
    let config = CognitoConfig::new("us-east-1", "us-east-1_ABC123", "access")?;
    let verifier = CognitoVerifier::from_config(config);

    match verifier.validate(token).await {
        Ok(claims) => {
            println!("✓ Token verified successfully!");
            println!("  Subject: {:?}", claims.sub);
            println!("  Username: {:?}", claims.username());
        }
        Err(e) => {
            eprintln!("✗ Token verification failed: {}", e);
        }
    }

    println!();

    // Example 2: Configuration record, shorter maximum age and eager key resolution
    println!("=== Example 2: Configuration Record ===");
    let record: ConfigRecord = serde_json::from_str(
        r#"{ "region": "eu-west-1", "userPoolId": "eu-west-1_XYZ789", "tokenUse": "id", "tokenExpiration": 900000 }"#,
    )?;
    let config = CognitoConfig::try_from(record)?.with_client_id("my-app-client");

    let custom_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let endpoint = JwksEndpoint::new(config.jwks_uri()).with_http_client(custom_client);

    match CognitoVerifier::connect(config, endpoint).await {
        Ok(verifier) => {
            verifier
                .validate_with(token, |result| match result {
                    Ok(claims) => println!("✓ Token verified, subject {:?}", claims.sub),
                    Err(e) => eprintln!("✗ Token verification failed: {}", e),
                })
                .await;
        }
        Err(e) => {
            eprintln!("✗ Signing keys unavailable: {}", e);
        }
    }

    Ok(())
}
