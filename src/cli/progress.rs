//! Spinner shown while waiting for provisioning
//!
//! Drawn on stderr, and only when stderr is a terminal, so piped JSON output
//! on stdout stays clean.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::ProvisioningState;

/// Provisioning spinner; a no-op when disabled
#[derive(Debug)]
pub struct WaitSpinner {
    bar: Option<ProgressBar>,
    subject: String,
}

impl WaitSpinner {
    /// Start a spinner for `subject` if `enabled` and stderr is a terminal
    pub fn start(subject: impl Into<String>, enabled: bool) -> Self {
        let subject = subject.into();
        let is_terminal = atty::is(atty::Stream::Stderr);

        let bar = (enabled && is_terminal).then(|| {
            let bar = ProgressBar::new_spinner();
            let template = "{spinner:.green} {msg} [{elapsed}]";
            if let Ok(style) = ProgressStyle::default_spinner().template(template) {
                bar.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
            }
            bar.set_message(format!("Creating {}...", subject));
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });

        Self { bar, subject }
    }

    /// Show the latest provisioning state
    pub fn update(&self, state: Option<&ProvisioningState>) {
        if let Some(ref bar) = self.bar {
            let state = state.map_or("Pending", ProvisioningState::as_str);
            bar.set_message(format!("Waiting for {} ({})", self.subject, state));
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for WaitSpinner {
    fn drop(&mut self) {
        self.finish();
    }
}
