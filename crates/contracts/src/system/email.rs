use serde::{Deserialize, Serialize};

/// Запрос на отправку письма
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl SendEmailRequest {
    pub fn validate(&self) -> Result<(), String> {
        crate::shared::validation::validate_email(&self.to)?;
        crate::shared::validation::require(&self.subject, "Тема")?;
        crate::shared::validation::require(&self.body, "Текст письма")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailResponse {
    /// Канал доставки: "webhook" или "log"
    pub channel: String,
}
