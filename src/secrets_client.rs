use crate::error::DeviceNotifierError;
use async_trait::async_trait;

use rusoto_secretsmanager::{GetSecretValueRequest, SecretsManager, SecretsManagerClient};
use serde_json::Value;
use tracing::{info, warn};

pub struct SecretsTokenClient {
    client: SecretsManagerClient,
    secret_id: Option<String>,
}

#[async_trait]
pub trait ResolveToken {
    async fn resolve_token(&self) -> Result<String, DeviceNotifierError>;
}

#[async_trait]
impl ResolveToken for SecretsTokenClient {
    async fn resolve_token(&self) -> Result<String, DeviceNotifierError> {
        let secret_id = self
            .secret_id
            .as_deref()
            .ok_or(DeviceNotifierError::MissingSecretId)?;

        info!("Retrieving API token from Secrets Manager");
        let response = self
            .client
            .get_secret_value(GetSecretValueRequest {
                secret_id: secret_id.to_string(),
                ..GetSecretValueRequest::default()
            })
            .await?;

        let secret_string = response
            .secret_string
            .ok_or(DeviceNotifierError::MissingSecretString)?;
        let token = extract_token(secret_string);

        echo_sanitized(&token);
        Ok(token)
    }
}

impl SecretsTokenClient {
    pub fn new_with_client(client: SecretsManagerClient, secret_id: Option<String>) -> Self {
        SecretsTokenClient { client, secret_id }
    }
}

/// Sanitized echo so a misconfigured secret is visible in the logs. Counts
/// and slices by characters; tokens are not guaranteed to be ASCII.
fn echo_sanitized(token: &str) {
    let length = token.chars().count();
    if length > 8 {
        let head: String = token.chars().take(4).collect();
        let tail: String = token.chars().skip(length - 4).collect();
        info!(
            "Using token that starts with '{}' and ends with '{}'",
            head, tail
        );
    } else {
        warn!("Retrieved token is very short or empty, which may cause issues");
    }
}

/// The secret has no documented key name. When it parses as a JSON object the
/// first value in document order is taken, whatever its key; anything else is
/// returned verbatim.
fn extract_token(secret_string: String) -> String {
    match serde_json::from_str::<Value>(&secret_string) {
        Ok(Value::Object(map)) => match map.values().next() {
            Some(Value::String(token)) => token.clone(),
            Some(other) => other.to_string(),
            None => secret_string,
        },
        _ => secret_string,
    }
}
