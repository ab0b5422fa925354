//! HTTP suppression registry client.
//!
//! Issues `PUT {endpoint}` with `{"EmailAddress": …, "Reason": …}`. A
//! `409 Conflict` means the address is already suppressed and counts as
//! success, so repeated registration is idempotent.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::error::RegistryError;
use crate::pipeline::types::{SuppressionReason, SuppressionRegistrar};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SuppressionRequest<'a> {
    email_address: &'a str,
    reason: SuppressionReason,
}

pub struct HttpSuppressionRegistrar {
    endpoint: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpSuppressionRegistrar {
    pub fn new(endpoint: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SuppressionRegistrar for HttpSuppressionRegistrar {
    fn name(&self) -> &str {
        "http"
    }

    async fn register(
        &self,
        address: &str,
        reason: SuppressionReason,
    ) -> Result<(), RegistryError> {
        let mut request = self.client.put(&self.endpoint).json(&SuppressionRequest {
            email_address: address,
            reason,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RegistryError::Request(e.to_string()))?;

        let status = resp.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(RegistryError::Rejected {
            address: address.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(SuppressionRequest {
            email_address: "a@x.com",
            reason: SuppressionReason::Bounce,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"EmailAddress": "a@x.com", "Reason": "BOUNCE"})
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_request_error() {
        let registrar = HttpSuppressionRegistrar::new("http://127.0.0.1:9/suppression", None);
        let result = registrar.register("a@x.com", SuppressionReason::Bounce).await;
        assert!(matches!(result, Err(RegistryError::Request(_))));
    }
}
