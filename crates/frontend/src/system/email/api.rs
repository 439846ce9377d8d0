use contracts::system::email::{SendEmailRequest, SendEmailResponse};

use crate::shared::api_utils::post_json;

pub async fn send_email(request: &SendEmailRequest) -> Result<SendEmailResponse, String> {
    post_json("/api/system/email", request).await
}

/// Текст для пользователя: куда ушло письмо
pub fn channel_message(channel: &str) -> String {
    match channel {
        "webhook" => "Письмо передано почтовому сервису".to_string(),
        "log" => "Почтовый сервис не настроен, письмо записано в журнал сервера".to_string(),
        other => format!("Письмо отправлено ({})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_messages() {
        assert!(channel_message("webhook").contains("почтовому сервису"));
        assert!(channel_message("log").contains("журнал"));
        assert_eq!(channel_message("smtp"), "Письмо отправлено (smtp)");
    }
}
