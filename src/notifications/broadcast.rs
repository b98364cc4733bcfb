//! In-process notification fan-out.
//!
//! Wraps a `tokio::sync::broadcast` channel so any number of consumers can
//! observe conversion lifecycle events. Sending never blocks; with no
//! subscribers the notification is simply dropped.
//!
//! The `unwebp` binary does not register one; it is for embedders driving
//! [`crate::service::run_with_notifier`] and for tests. Combine it with the
//! configured targets through [`super::NotificationManager::add_target`].

use tokio::sync::broadcast;

use super::{Notification, Notifier};

/// Default channel capacity used by [`BroadcastNotifier::default`].
const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: &Notification) {
        // Err only means nobody is listening.
        let _ = self.tx.send(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_without_subscribers_is_silent() {
        let notifier = BroadcastNotifier::default();
        notifier.notify(&Notification::Started {
            file_name: "a.webp".into(),
        });
    }

    #[test]
    fn subscribers_receive_in_order() {
        let notifier = BroadcastNotifier::default();
        let mut rx = notifier.subscribe();

        notifier.notify(&Notification::Started {
            file_name: "a.webp".into(),
        });
        notifier.notify(&Notification::Completed {
            file_name: "a.webp".into(),
        });

        assert!(matches!(rx.try_recv().unwrap(), Notification::Started { .. }));
        assert!(matches!(rx.try_recv().unwrap(), Notification::Completed { .. }));
    }
}
