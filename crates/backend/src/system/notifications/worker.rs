use anyhow::Result;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use super::service;

/// Фоновая проверка правил уведомлений.
pub struct NotificationWorker {
    interval_seconds: u64,
}

impl NotificationWorker {
    pub fn new(interval_seconds: u64) -> Self {
        Self { interval_seconds }
    }

    /// Запускает цикл проверки. Первая проверка выполняется сразу.
    pub async fn run_loop(&self) {
        info!(
            "Notification worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.process().await {
                error!("Error checking notifications: {:?}", e);
            }
        }
    }

    async fn process(&self) -> Result<()> {
        let result = service::check().await?;
        if result.created > 0 {
            info!(
                "Notification check: {} new, {} unread",
                result.created, result.unread_total
            );
        }
        Ok(())
    }
}

/// Запустить воркер, если интервал задан
pub fn spawn(interval_seconds: u64) {
    if interval_seconds == 0 {
        info!("Notification worker disabled");
        return;
    }
    tokio::spawn(async move {
        NotificationWorker::new(interval_seconds).run_loop().await;
    });
}
