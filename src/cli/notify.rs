//! Desktop notifications after clipboard copies.
//!
//! Purely informational: a missing notification daemon, or a build
//! without the `notify` feature, just means no popup.

use std::ffi::OsStr;

use crate::config::Settings;

/// Set to any non-empty value to suppress every notification.
pub const NO_NOTIFY_ENV: &str = "PASSLINE_NO_NOTIFY";

/// Whether notifications are wanted under these settings and environment.
pub fn enabled(settings: &Settings) -> bool {
    enabled_with(
        settings.notifications,
        std::env::var_os(NO_NOTIFY_ENV).as_deref(),
    )
}

fn enabled_with(setting: bool, no_notify: Option<&OsStr>) -> bool {
    setting && no_notify.map_or(true, OsStr::is_empty)
}

/// Show `body` under the title `summary`, if notifications are enabled.
pub fn notify(settings: &Settings, summary: &str, body: &str) {
    if !enabled(settings) {
        tracing::debug!("notifications disabled");
        return;
    }
    show(summary, body);
}

#[cfg(feature = "notify")]
fn show(summary: &str, body: &str) {
    let result = notify_rust::Notification::new()
        .appname("passline")
        .summary(summary)
        .body(body)
        .timeout(notify_rust::Timeout::Milliseconds(5_000))
        .show();
    if let Err(e) = result {
        tracing::debug!(error = %e, "desktop notification failed");
    }
}

#[cfg(not(feature = "notify"))]
fn show(summary: &str, _body: &str) {
    tracing::debug!(summary, "built without desktop notifications");
}
