use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

const SENDGRID_API_BASE: &str = "https://api.sendgrid.com";

/// One outbound message: everything the delivery API needs for a single send.
#[derive(Debug, Serialize, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Delivery failure. When the provider answered with an error status, the
/// response body is kept for diagnostics.
#[derive(Debug)]
pub struct SendError {
    pub message: String,
    pub response_body: Option<String>,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SendError {}

/// Port for dispatching one message through the email delivery API.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &OutboundEmail) -> Result<(), SendError>;
}

/// SendGrid v3 `mail/send` client.
pub struct SendGridClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: MailAddress<'a>,
    subject: &'a str,
    content: Vec<MailContent<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<MailAddress<'a>>,
}

#[derive(Serialize)]
struct MailAddress<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct MailContent<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl SendGridClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, SENDGRID_API_BASE.to_string())
    }

    /// Base URL override, used to point the client at a local test server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    fn request_body<'a>(message: &'a OutboundEmail) -> MailSendRequest<'a> {
        MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![MailAddress { email: &message.to }],
            }],
            from: MailAddress { email: &message.from },
            subject: &message.subject,
            content: vec![
                MailContent {
                    content_type: "text/plain",
                    value: &message.text,
                },
                MailContent {
                    content_type: "text/html",
                    value: &message.html,
                },
            ],
        }
    }
}

#[async_trait]
impl EmailSender for SendGridClient {
    async fn send(&self, message: &OutboundEmail) -> Result<(), SendError> {
        let url = format!("{}/v3/mail/send", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&Self::request_body(message))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| SendError {
                message: format!("Failed to reach SendGrid: {}", e),
                response_body: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let response_body = response.text().await.ok();
            return Err(SendError {
                message: format!("SendGrid API error: {}", status),
                response_body,
            });
        }

        log::debug!("📮 SendGrid accepted message for {}", message.to);

        Ok(())
    }
}
