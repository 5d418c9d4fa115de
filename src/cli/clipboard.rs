//! Clipboard copies that clean up after themselves.
//!
//! A copied password is cleared again after the configured timeout, but
//! only if the clipboard still holds that password; anything the user
//! copied in the meantime is left alone.  The process stays alive for the
//! timeout, which also keeps the selection served on X11 and Wayland.

use std::thread;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::errors::{PasslineError, Result};

/// The operations passline needs from a clipboard.
pub trait ClipboardBackend {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn get_text(&mut self) -> Result<Zeroizing<String>>;
    fn clear(&mut self) -> Result<()>;
}

/// The desktop clipboard, via `arboard`.
pub struct SystemClipboard(arboard::Clipboard);

impl SystemClipboard {
    pub fn open() -> Result<Self> {
        arboard::Clipboard::new()
            .map(Self)
            .map_err(|e| PasslineError::ClipboardError(e.to_string()))
    }
}

impl ClipboardBackend for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.0
            .set_text(text)
            .map_err(|e| PasslineError::ClipboardError(e.to_string()))
    }

    fn get_text(&mut self) -> Result<Zeroizing<String>> {
        self.0
            .get_text()
            .map(Zeroizing::new)
            .map_err(|e| PasslineError::ClipboardError(e.to_string()))
    }

    fn clear(&mut self) -> Result<()> {
        self.0
            .clear()
            .map_err(|e| PasslineError::ClipboardError(e.to_string()))
    }
}

/// Wait `timeout`, then clear the clipboard if it still holds `secret`.
///
/// Returns whether it was cleared.  A zero timeout never clears.
pub fn clear_after<B: ClipboardBackend>(
    backend: &mut B,
    secret: &str,
    timeout: Duration,
) -> Result<bool> {
    if timeout.is_zero() {
        return Ok(false);
    }
    thread::sleep(timeout);

    // Unreadable (e.g. an image was copied since) counts as changed.
    let still_ours = backend
        .get_text()
        .map(|current| current.as_str() == secret)
        .unwrap_or(false);
    if !still_ours {
        tracing::debug!("clipboard changed since copy, leaving it alone");
        return Ok(false);
    }

    backend.clear()?;
    tracing::debug!("clipboard cleared");
    Ok(true)
}
