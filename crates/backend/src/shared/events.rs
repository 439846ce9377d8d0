//! Шина изменений данных для подписчиков `/api/events`.

use contracts::shared::events::{ChangeAction, ChangeEvent};
use once_cell::sync::Lazy;
use tokio::sync::broadcast;

/// Ёмкость буфера: отстающий подписчик теряет старые события и просто
/// перечитывает данные при следующем событии.
const CHANNEL_CAPACITY: usize = 256;

static BUS: Lazy<EventBus> = Lazy::new(|| EventBus::new(CHANNEL_CAPACITY));

pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: ChangeEvent) -> usize {
        // Ошибка означает только отсутствие подписчиков
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

pub fn bus() -> &'static EventBus {
    &BUS
}

/// Опубликовать изменение записи коллекции
pub fn publish(entity: &str, id: Option<String>, action: ChangeAction) {
    let receivers = bus().publish(ChangeEvent::new(entity, id, action));
    tracing::debug!("change event {} {} -> {} subscribers", entity, action.as_str(), receivers);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let delivered = bus.publish(ChangeEvent::new(
            "vehicle",
            Some("42".into()),
            ChangeAction::Updated,
        ));
        assert_eq!(delivered, 1);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.entity, "vehicle");
        assert_eq!(event.action, ChangeAction::Updated);
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = EventBus::new(8);
        assert_eq!(
            bus.publish(ChangeEvent::new("customer", None, ChangeAction::Created)),
            0
        );
    }
}
