//! SendGrid v3 mail-send client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{EmailGateway, GatewayError, SendRequest, SendResult};
use crate::config::EmailConfig;

/// SendGrid API client.
#[derive(Clone)]
pub struct SendGridClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SendGridClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.sendgrid.com";

    /// Create a client for the given key and API base URL.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GatewayError::MissingCredential);
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the email section of the relay configuration.
    pub fn from_config(config: &EmailConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential)?;
        Self::new(api_key, config.api_base_url.as_str())
    }

    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.base_url)
    }
}

impl std::fmt::Debug for SendGridClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// SendGrid API request types
#[derive(Debug, Serialize)]
struct MailSendBody<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address<'a>>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

impl<'a> From<&'a SendRequest> for MailSendBody<'a> {
    fn from(request: &'a SendRequest) -> Self {
        Self {
            personalizations: [Personalization {
                to: [Address { email: &request.to }],
            }],
            from: Address {
                email: &request.from,
            },
            reply_to: request.reply_to.as_deref().map(|email| Address { email }),
            subject: &request.subject,
            content: [Content {
                kind: "text/plain",
                value: &request.body,
            }],
        }
    }
}

#[async_trait]
impl EmailGateway for SendGridClient {
    async fn send(&self, request: &SendRequest) -> Result<SendResult, GatewayError> {
        debug!(to = %request.to, subject = %request.subject, "Sending via SendGrid");

        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(&self.api_key)
            .json(&MailSendBody::from(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(SendResult {
            status_code: status.as_u16(),
        })
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}
