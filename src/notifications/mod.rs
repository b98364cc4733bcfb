pub mod broadcast;
pub mod command;

pub use broadcast::BroadcastNotifier;
pub use command::CommandNotifier;

use crate::config::NotificationConfig;
use std::sync::Arc;

/// User-visible conversion lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Started { file_name: String },
    Completed { file_name: String },
    Failed { file_name: String, message: String },
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::Started { .. } => "Conversion Started",
            Notification::Completed { .. } => "Conversion Complete",
            Notification::Failed { .. } => "Conversion Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::Started { file_name } => format!("Converting {} to PNG", file_name),
            Notification::Completed { file_name } => format!("{} converted to PNG", file_name),
            Notification::Failed { file_name, message } => {
                format!("Failed to convert {}: {}", file_name, message)
            }
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Notification::Started { file_name }
            | Notification::Completed { file_name }
            | Notification::Failed { file_name, .. } => file_name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notification::Failed { .. })
    }
}

/// A sink for conversion notifications.
///
/// Delivery is best-effort: implementations must not block for long and must
/// swallow (and log) their own errors.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Renders notifications as log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        if notification.is_failure() {
            tracing::warn!(title = notification.title(), "{}", notification.message());
        } else {
            tracing::info!(title = notification.title(), "{}", notification.message());
        }
    }
}

/// Manages all notification targets (log, desktop command, subscribers)
#[derive(Default)]
pub struct NotificationManager {
    targets: Vec<Arc<dyn Notifier>>,
}

impl NotificationManager {
    pub fn new(config: &NotificationConfig) -> Self {
        let mut manager = Self::default();

        if config.log {
            manager.add_target(Arc::new(LogNotifier));
        }

        if let Some(ref command) = config.command {
            match CommandNotifier::new(command) {
                Some(notifier) => manager.add_target(Arc::new(notifier)),
                None => tracing::warn!("Ignoring empty notification command"),
            }
        }

        manager
    }

    pub fn add_target(&mut self, target: Arc<dyn Notifier>) {
        self.targets.push(target);
    }

    /// Check if there are any notification targets
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

impl Notifier for NotificationManager {
    fn notify(&self, notification: &Notification) {
        for target in &self.targets {
            target.notify(notification);
        }
    }
}
