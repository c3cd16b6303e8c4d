//! Runtime settings and their environment loader.
use std::env;
use std::time::Duration;

pub const DEFAULT_CROSSHAIR_IMAGE: &str = "modules/target-assistant/assets/default_crosshair.png";

const SCALE_RANGE: (f64, f64) = (0.5, 5.0);
const ALPHA_RANGE: (f64, f64) = (0.0, 1.0);

/// Settings shared by every invocation of the assistant.
#[derive(Clone, Debug, PartialEq)]
pub struct AssistSettings {
    /// Marker asset drawn at each picked anchor.
    pub crosshair_image: String,
    /// Marker size multiplier, clamped to `[0.5, 5.0]`.
    pub crosshair_scale: f64,
    /// Marker opacity, clamped to `[0.0, 1.0]`.
    pub crosshair_alpha: f64,
    /// Refuse to run outside a started combat.
    pub only_in_combat: bool,
    pub ready_poll_attempts: u32,
    pub ready_poll_interval: Duration,
    /// Pause after the canvas is ready so queued range highlights land.
    pub highlight_settle_delay: Duration,
}

impl Default for AssistSettings {
    fn default() -> Self {
        Self {
            crosshair_image: DEFAULT_CROSSHAIR_IMAGE.to_string(),
            crosshair_scale: 1.0,
            crosshair_alpha: 1.0,
            only_in_combat: true,
            ready_poll_attempts: 50,
            ready_poll_interval: Duration::from_millis(100),
            highlight_settle_delay: Duration::from_millis(100),
        }
    }
}

impl AssistSettings {
    /// Construct settings from process environment variables.
    ///
    /// Environment variables:
    /// - `ASSIST_CROSSHAIR_IMAGE` - Marker asset path
    /// - `ASSIST_CROSSHAIR_SCALE` - Marker size multiplier (default: 1.0)
    /// - `ASSIST_CROSSHAIR_ALPHA` - Marker opacity (default: 1.0)
    /// - `ASSIST_ONLY_IN_COMBAT` - Require a started combat (default: true)
    /// - `ASSIST_READY_POLL_ATTEMPTS` - Canvas readiness polls (default: 50)
    /// - `ASSIST_READY_POLL_INTERVAL_MS` - Delay between polls (default: 100)
    /// - `ASSIST_SETTLE_DELAY_MS` - Delay before the first pick (default: 100)
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(image) = env::var("ASSIST_CROSSHAIR_IMAGE")
            && !image.trim().is_empty()
        {
            settings.crosshair_image = image;
        }

        if let Some(scale) = read_env::<f64>("ASSIST_CROSSHAIR_SCALE") {
            settings = settings.with_crosshair_scale(scale);
        }

        if let Some(alpha) = read_env::<f64>("ASSIST_CROSSHAIR_ALPHA") {
            settings = settings.with_crosshair_alpha(alpha);
        }

        if let Some(only) = read_env::<bool>("ASSIST_ONLY_IN_COMBAT") {
            settings.only_in_combat = only;
        }

        if let Some(attempts) = read_env::<u32>("ASSIST_READY_POLL_ATTEMPTS") {
            settings.ready_poll_attempts = attempts.max(1);
        }

        if let Some(ms) = read_env::<u64>("ASSIST_READY_POLL_INTERVAL_MS") {
            settings.ready_poll_interval = Duration::from_millis(ms);
        }

        if let Some(ms) = read_env::<u64>("ASSIST_SETTLE_DELAY_MS") {
            settings.highlight_settle_delay = Duration::from_millis(ms);
        }

        settings
    }

    #[must_use]
    pub fn with_crosshair_scale(mut self, scale: f64) -> Self {
        self.crosshair_scale = clamp_finite(scale, SCALE_RANGE, 1.0);
        self
    }

    #[must_use]
    pub fn with_crosshair_alpha(mut self, alpha: f64) -> Self {
        self.crosshair_alpha = clamp_finite(alpha, ALPHA_RANGE, 1.0);
        self
    }

    #[must_use]
    pub fn with_only_in_combat(mut self, only: bool) -> Self {
        self.only_in_combat = only;
        self
    }

    /// Zero-delay polling for scripted hosts and tests.
    #[must_use]
    pub fn immediate(mut self) -> Self {
        self.ready_poll_interval = Duration::ZERO;
        self.highlight_settle_delay = Duration::ZERO;
        self
    }
}

fn clamp_finite(value: f64, (min, max): (f64, f64), fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_and_alpha_are_clamped() {
        let settings = AssistSettings::default()
            .with_crosshair_scale(10.0)
            .with_crosshair_alpha(-0.5);
        assert_eq!(settings.crosshair_scale, 5.0);
        assert_eq!(settings.crosshair_alpha, 0.0);

        let settings = settings.with_crosshair_scale(f64::NAN);
        assert_eq!(settings.crosshair_scale, 1.0);
    }

    #[test]
    fn defaults_follow_module_settings() {
        let settings = AssistSettings::default();
        assert!(settings.only_in_combat);
        assert_eq!(settings.ready_poll_attempts, 50);
        assert_eq!(settings.crosshair_image, DEFAULT_CROSSHAIR_IMAGE);
    }
}
