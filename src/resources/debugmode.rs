//! Debug toggle and on-screen diagnostic lines.
//!
//! When enabled, the default draw handler adds crosshairs and body outlines,
//! the scene manager shades its margins, and the renderer draws the message
//! slots as an overlay after each frame.

use arrayvec::ArrayVec;
use log::{info, warn};

/// Number of diagnostic message rows.
pub const DEBUG_SLOTS: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct DebugMode {
    enabled: bool,
    messages: ArrayVec<String, DEBUG_SLOTS>,
}

impl DebugMode {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            messages: ArrayVec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.enabled = enabled;
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        info!("Debug mode {}", if self.enabled { "enabled" } else { "disabled" });
        self.enabled
    }

    /// Set the text of one row. Rows in between are created empty.
    pub fn set_message(&mut self, row: usize, text: impl Into<String>) -> bool {
        if row >= DEBUG_SLOTS {
            warn!("Debug message row {} out of range (max {})", row, DEBUG_SLOTS - 1);
            return false;
        }
        while self.messages.len() <= row {
            self.messages.push(String::new());
        }
        self.messages[row] = text.into();
        true
    }

    /// Replace all rows. Rows past the slot count are dropped.
    pub fn set_messages<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.clear();
        self.messages
            .extend(messages.into_iter().take(DEBUG_SLOTS).map(Into::into));
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}
