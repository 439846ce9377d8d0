use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

/// Письмо к отправке
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Канал доставки писем
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Имя канала для журнала: "webhook", "log"
    fn channel(&self) -> &'static str;

    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Отправка через HTTP-вебхук почтового шлюза: POST JSON `{from, to, subject, body}`
pub struct WebhookEmailSender {
    client: reqwest::Client,
    url: String,
}

impl WebhookEmailSender {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl EmailSender for WebhookEmailSender {
    fn channel(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(email)
            .send()
            .await
            .context("Email webhook request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Email webhook returned {}: {}", status, body);
        }
        Ok(())
    }
}

/// Письмо только пишется в лог. Используется, когда вебхук не настроен.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    fn channel(&self) -> &'static str {
        "log"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        tracing::info!(
            "Email (log only) from {} to {}: {}\n{}",
            email.from,
            email.to,
            email.subject,
            email.body
        );
        Ok(())
    }
}

/// Канал по настройкам `[email]`
pub fn from_config(webhook_url: Option<&str>) -> Result<Box<dyn EmailSender>> {
    match webhook_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => Ok(Box::new(WebhookEmailSender::new(url)?)),
        None => Ok(Box::new(LogEmailSender)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_selection() {
        assert_eq!(from_config(None).unwrap().channel(), "log");
        assert_eq!(from_config(Some("  ")).unwrap().channel(), "log");
        assert_eq!(
            from_config(Some("http://localhost:9000/mail")).unwrap().channel(),
            "webhook"
        );
    }

    #[tokio::test]
    async fn log_sender_always_succeeds() {
        let email = OutgoingEmail {
            from: "noreply@rental.local".into(),
            to: "client@example.com".into(),
            subject: "Договор".into(),
            body: "Текст".into(),
        };
        assert!(LogEmailSender.send(&email).await.is_ok());
    }

    #[test]
    fn webhook_payload_shape() {
        let email = OutgoingEmail {
            from: "a@b.c".into(),
            to: "d@e.f".into(),
            subject: "s".into(),
            body: "b".into(),
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["from"], "a@b.c");
        assert_eq!(json["to"], "d@e.f");
        assert_eq!(json["subject"], "s");
        assert_eq!(json["body"], "b");
    }
}
