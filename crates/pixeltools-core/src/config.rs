//! Editor configuration and view preferences.
//!
//! Both types are plain serde structs with defaults, so the host can pass a
//! partial JSON object and get the rest filled in.

use serde::{Deserialize, Serialize};

use crate::encode::{OutputFormat, DEFAULT_QUALITY};
use crate::geometry::{AspectLock, GestureOptions, DEFAULT_MIN_SIZE};

/// Default fraction of the shorter frame side covered by a new selection.
pub const DEFAULT_INITIAL_COVERAGE: f64 = 0.8;

/// Tunables for a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Minimum selection side, in display pixels.
    pub min_selection_size: f64,
    /// Fraction (0..=1) of the shorter frame side covered by a new selection.
    pub initial_coverage: f64,
    pub aspect_lock: AspectLock,
    pub default_format: OutputFormat,
    /// 1-100; only lossy formats use it.
    pub default_quality: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_selection_size: DEFAULT_MIN_SIZE,
            initial_coverage: DEFAULT_INITIAL_COVERAGE,
            aspect_lock: AspectLock::Square,
            default_format: OutputFormat::Png,
            default_quality: DEFAULT_QUALITY,
        }
    }
}

impl EditorConfig {
    pub fn gesture_options(&self) -> GestureOptions {
        GestureOptions {
            min_size: self.min_selection_size,
            aspect: self.aspect_lock,
        }
    }

    /// Replace out-of-range values with defaults or clamp them.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.min_selection_size.is_finite() || self.min_selection_size < 1.0 {
            self.min_selection_size = defaults.min_selection_size;
        }
        if !self.initial_coverage.is_finite() {
            self.initial_coverage = defaults.initial_coverage;
        }
        self.initial_coverage = self.initial_coverage.clamp(0.0, 1.0);
        self.default_quality = self.default_quality.clamp(1, 100);
        self
    }
}

/// View state owned by the host page and passed in explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub dark_mode: bool,
}

impl Preferences {
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn theme_name(&self) -> &'static str {
        if self.dark_mode {
            "dark"
        } else {
            "light"
        }
    }
}
