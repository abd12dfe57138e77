//! Tunables for segment grouping.

use serde::{Deserialize, Serialize};

use swarm_core::{Error, Result};

/// Largest gap between a segment's expected playback end and the next chunk
/// that still continues the segment.
pub const MAX_PAUSE_WITHIN_SEGMENT: f64 = 1.0;

fn default_max_pause() -> f64 {
    MAX_PAUSE_WITHIN_SEGMENT
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpreterSettings {
    /// See [`MAX_PAUSE_WITHIN_SEGMENT`].
    #[serde(default = "default_max_pause")]
    pub max_pause_within_segment: f64,

    /// Longest duration a segment may grow to. A chunk that would push a
    /// segment past this limit starts a new segment. Unset means unlimited.
    #[serde(default)]
    pub max_segment_duration: Option<f64>,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            max_pause_within_segment: MAX_PAUSE_WITHIN_SEGMENT,
            max_segment_duration: None,
        }
    }
}

impl InterpreterSettings {
    pub fn with_max_segment_duration(mut self, max: f64) -> Self {
        self.max_segment_duration = Some(max);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_pause_within_segment.is_finite() && self.max_pause_within_segment > 0.0) {
            return Err(Error::validation(format!(
                "max_pause_within_segment must be a positive number, got {}",
                self.max_pause_within_segment
            )));
        }
        if let Some(max) = self.max_segment_duration {
            if !(max.is_finite() && max > 0.0) {
                return Err(Error::validation(format!(
                    "max_segment_duration must be a positive number, got {max}"
                )));
            }
        }
        Ok(())
    }
}
