//! Desktop notifications through an external program.
//!
//! Each notification spawns the configured command (for example
//! `notify-send "{title}" "{message}"`) without waiting for it. The child is
//! reaped on a short-lived thread so nothing ever blocks the conversion.

use std::process::{Command, Stdio};

use super::{Notification, Notifier};

pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// Build a notifier from `[program, args...]`. Returns `None` when no
    /// program is given.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }

        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Expand `{title}`, `{message}` and `{file}` in the configured arguments.
    pub fn render_args(&self, notification: &Notification) -> Vec<String> {
        let title = notification.title();
        let message = notification.message();
        let file = notification.file_name();

        self.args
            .iter()
            .map(|arg| {
                arg.replace("{title}", title)
                    .replace("{message}", &message)
                    .replace("{file}", file)
            })
            .collect()
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) {
        let args = self.render_args(notification);

        tracing::trace!("Running notification command: {} {:?}", self.program, args);

        let spawned = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                let program = self.program.clone();
                std::thread::spawn(move || match child.wait() {
                    Ok(status) if !status.success() => {
                        tracing::debug!("Notification command {} exited with {}", program, status);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::debug!("Failed to wait for {}: {}", program, e),
                });
            }
            Err(e) => {
                tracing::warn!("Failed to run notification command {}: {}", self.program, e);
            }
        }
    }
}
