//! Speed → inter-step delay mapping
//!
//! `delay = clamp(max_delay_ms - speed, min_delay_ms, max_delay_ms)`. Higher
//! speed means a shorter delay. The mapping is total: NaN and unparsable input
//! fall back to `default_speed`, infinities clamp to the bounds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MIN_DELAY_MS: u64 = 10;
pub const DEFAULT_MAX_DELAY_MS: u64 = 1010;
pub const DEFAULT_SPEED: f64 = 400.0;

/// Pacing bounds, as read from the `[playback]` config section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Floor for the delay between two checkpoints
    pub min_delay_ms: u64,
    /// Ceiling for the delay between two checkpoints
    pub max_delay_ms: u64,
    /// Used when the speed input is missing or not a number
    pub default_speed: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        DelayConfig {
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            default_speed: DEFAULT_SPEED,
        }
    }
}

impl DelayConfig {
    /// Zero delay everywhere; used by headless `--fast` runs and tests
    pub fn immediate() -> Self {
        DelayConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
            default_speed: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayPolicy {
    min_ms: f64,
    max_ms: f64,
    default_speed: f64,
}

impl DelayPolicy {
    /// Build a policy. Swapped bounds are reordered and a non-finite default
    /// speed is replaced by [`DEFAULT_SPEED`], so the policy is always total.
    pub fn new(config: DelayConfig) -> Self {
        let (lo, hi) = if config.min_delay_ms <= config.max_delay_ms {
            (config.min_delay_ms, config.max_delay_ms)
        } else {
            (config.max_delay_ms, config.min_delay_ms)
        };
        let default_speed = if config.default_speed.is_finite() {
            config.default_speed
        } else {
            DEFAULT_SPEED
        };
        DelayPolicy {
            min_ms: lo as f64,
            max_ms: hi as f64,
            default_speed,
        }
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_ms as u64)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_ms as u64)
    }

    pub fn default_speed(&self) -> f64 {
        self.default_speed
    }

    pub fn delay(&self, speed: f64) -> Duration {
        let speed = if speed.is_nan() {
            self.default_speed
        } else {
            speed
        };
        let ms = (self.max_ms - speed).clamp(self.min_ms, self.max_ms);
        Duration::from_millis(ms.round() as u64)
    }

    /// Delay for a speed that may not have been set yet
    pub fn delay_for(&self, speed: Option<f64>) -> Duration {
        self.delay(speed.unwrap_or(self.default_speed))
    }

    /// Delay for raw UI text (e.g. a slider value or a CLI argument)
    pub fn delay_for_input(&self, raw: &str) -> Duration {
        self.delay_for(parse_speed(raw))
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::new(DelayConfig::default())
    }
}

/// Lenient speed parsing: surrounding whitespace is ignored, integers and
/// decimals are accepted, anything else is `None`
pub fn parse_speed(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_speed_maps_to_610ms() {
        let policy = DelayPolicy::default();
        assert_eq!(policy.delay(400.0), Duration::from_millis(610));
        assert_eq!(policy.delay_for(None), Duration::from_millis(610));
    }

    #[test]
    fn test_bounds() {
        let policy = DelayPolicy::default();
        assert_eq!(policy.delay(1000.0), Duration::from_millis(10));
        assert_eq!(policy.delay(5000.0), Duration::from_millis(10));
        assert_eq!(policy.delay(-300.0), Duration::from_millis(1010));
        assert_eq!(policy.delay(f64::INFINITY), Duration::from_millis(10));
        assert_eq!(policy.delay(f64::NEG_INFINITY), Duration::from_millis(1010));
    }

    #[test]
    fn test_non_numeric_uses_default() {
        let policy = DelayPolicy::default();
        assert_eq!(policy.delay(f64::NAN), Duration::from_millis(610));
        assert_eq!(policy.delay_for_input("fast"), Duration::from_millis(610));
        assert_eq!(policy.delay_for_input(""), Duration::from_millis(610));
        assert_eq!(policy.delay_for_input(" 900 "), Duration::from_millis(110));
        assert_eq!(policy.delay_for_input("NaN"), Duration::from_millis(610));
    }

    #[test]
    fn test_swapped_bounds_are_reordered() {
        let policy = DelayPolicy::new(DelayConfig {
            min_delay_ms: 500,
            max_delay_ms: 100,
            default_speed: f64::NAN,
        });
        assert_eq!(policy.min_delay(), Duration::from_millis(100));
        assert_eq!(policy.max_delay(), Duration::from_millis(500));
        assert_eq!(policy.default_speed(), DEFAULT_SPEED);
    }

    #[test]
    fn test_immediate_policy_is_zero() {
        let policy = DelayPolicy::new(DelayConfig::immediate());
        assert_eq!(policy.delay(123.0), Duration::ZERO);
        assert_eq!(policy.delay(f64::NAN), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_higher_speed_never_slower(a in -5000.0f64..5000.0, b in -5000.0f64..5000.0) {
            let policy = DelayPolicy::default();
            let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(policy.delay(slow) >= policy.delay(fast));
        }

        #[test]
        fn prop_delay_within_bounds(speed in any::<f64>()) {
            let policy = DelayPolicy::default();
            let d = policy.delay(speed);
            prop_assert!(d >= policy.min_delay());
            prop_assert!(d <= policy.max_delay());
        }

        #[test]
        fn prop_text_input_within_bounds(raw in ".{0,12}") {
            let policy = DelayPolicy::default();
            let d = policy.delay_for_input(&raw);
            prop_assert!(d >= policy.min_delay() && d <= policy.max_delay());
        }
    }
}
