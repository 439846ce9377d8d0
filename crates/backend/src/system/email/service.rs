use anyhow::Result;
use chrono::Utc;
use contracts::system::audit::AuditAction;
use contracts::system::email::{SendEmailRequest, SendEmailResponse};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use super::sender::{self, OutgoingEmail};
use crate::shared::config;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;
use crate::system::audit::service as audit;
use crate::system::auth::extractor::Actor;

async fn log_outbox(email: &OutgoingEmail, channel: &str, error: Option<String>) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_email_outbox (id, recipient, subject, body, channel, status, error, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            [
                uuid::Uuid::new_v4().to_string().into(),
                email.to.clone().into(),
                email.subject.clone().into(),
                email.body.clone().into(),
                channel.to_string().into(),
                (if error.is_none() { "sent" } else { "failed" }).into(),
                error.into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await?;
    Ok(())
}

/// Отправить письмо через настроенный канал. Каждая попытка пишется в sys_email_outbox.
pub async fn send(
    request: SendEmailRequest,
    actor: &Actor,
    entity: &str,
    entity_id: Option<&str>,
) -> Result<SendEmailResponse> {
    request.validate().map_err(ServiceError::validation)?;

    let cfg = &config::get().email;
    let email = OutgoingEmail {
        from: cfg.from.clone(),
        to: request.to.trim().to_string(),
        subject: request.subject,
        body: request.body,
    };
    let sender = sender::from_config(cfg.webhook_url.as_deref())?;
    let channel = sender.channel();

    if let Err(e) = sender.send(&email).await {
        tracing::error!("Email to {} failed via {}: {:#}", email.to, channel, e);
        log_outbox(&email, channel, Some(format!("{:#}", e))).await?;
        return Err(e.context("Не удалось отправить письмо"));
    }

    log_outbox(&email, channel, None).await?;
    audit::record(
        actor,
        AuditAction::EmailSent,
        entity,
        entity_id,
        Some(format!("{}: {}", email.to, email.subject)),
    )
    .await;

    Ok(SendEmailResponse {
        channel: channel.to_string(),
    })
}
