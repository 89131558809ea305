//! Embedded meeting frame sequencing.
//!
//! Tracks the blank → loading → loaded presentation of the embedded meeting
//! room. The frame itself lives in the rendering layer; this module only
//! computes its target URL and which placeholder (if any) to show.

use serde::Serialize;

/// Sentinel target meaning "no meeting embedded".
pub const BLANK_TARGET: &str = "about:blank";

const PLACEHOLDER_BLANK: &str = "The meeting will appear here once it is created.";
const PLACEHOLDER_LOADING: &str = "Loading meeting room…";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FramePhase {
    Blank,
    Loading,
    Loaded,
}

/// State machine for the embedded meeting frame.
#[derive(Debug, Clone)]
pub struct MeetingFrame {
    phase: FramePhase,
    target: String,
}

impl MeetingFrame {
    pub fn new() -> Self {
        Self {
            phase: FramePhase::Blank,
            target: BLANK_TARGET.to_string(),
        }
    }

    /// Point the frame at a meeting URL.
    ///
    /// A new URL (including the same URL again after a reset) enters the
    /// loading phase. Re-assigning the URL the frame already shows is a
    /// no-op, so periodic reconciles don't bounce a loaded frame back to
    /// the placeholder.
    pub fn assign(&mut self, url: &str) {
        if url.is_empty() || url == BLANK_TARGET {
            self.reset();
            return;
        }
        if self.target == url {
            return;
        }
        self.target = url.to_string();
        self.phase = FramePhase::Loading;
    }

    /// Load-completion signal from the embedded frame. Ignored while the
    /// target is still the blank sentinel (the initial about:blank load).
    pub fn load_completed(&mut self) {
        if self.target != BLANK_TARGET {
            self.phase = FramePhase::Loaded;
        }
    }

    /// Back to blank: clears the target and shows the idle placeholder.
    pub fn reset(&mut self) {
        self.phase = FramePhase::Blank;
        self.target = BLANK_TARGET.to_string();
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Placeholder text to show over the frame, if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self.phase {
            FramePhase::Blank => Some(PLACEHOLDER_BLANK),
            FramePhase::Loading => Some(PLACEHOLDER_LOADING),
            FramePhase::Loaded => None,
        }
    }
}

impl Default for MeetingFrame {
    fn default() -> Self {
        Self::new()
    }
}
