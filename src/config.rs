//! Configuration file handling
//!
//! Settings live in `config.toml` under `<config_dir>/stepviz/`, or at the
//! path given with `--config`. Every section and key is optional.
//!
//! ```toml
//! [playback]
//! min_delay_ms = 10
//! max_delay_ms = 1010
//! default_speed = 400
//!
//! [speed]
//! min = 10
//! max = 1000
//! step = 50
//! initial = 400
//!
//! [sizes]
//! sorting = 20
//! heap = 10
//! hanoi = 3
//! graph = 7
//! ```

use crate::playback::DelayConfig;
use crate::viz::{Category, VizKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: DelayConfig,
    pub speed: SpeedConfig,
    pub sizes: SizeDefaults,
}

/// Range and granularity of the speed control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub min: f64,
    pub max: f64,
    /// Increment applied by `+` and `-`
    pub step: f64,
    pub initial: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            min: 10.0,
            max: 1000.0,
            step: 50.0,
            initial: 400.0,
        }
    }
}

impl SpeedConfig {
    pub fn clamp(&self, speed: f64) -> f64 {
        speed.clamp(self.min, self.max)
    }

    pub fn faster(&self, speed: f64) -> f64 {
        self.clamp(speed + self.step)
    }

    pub fn slower(&self, speed: f64) -> f64 {
        self.clamp(speed - self.step)
    }
}

/// Initial size for each size-aware category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeDefaults {
    pub sorting: usize,
    pub heap: usize,
    pub hanoi: usize,
    pub graph: usize,
}

impl Default for SizeDefaults {
    fn default() -> Self {
        SizeDefaults {
            sorting: 20,
            heap: 10,
            hanoi: 3,
            graph: 7,
        }
    }
}

impl SizeDefaults {
    /// Configured starting size for `kind`, if size applies to it
    pub fn for_kind(&self, kind: VizKind) -> Option<usize> {
        match kind.category() {
            Category::Sorting => Some(self.sorting),
            Category::Recursion => Some(self.hanoi),
            Category::Graphs => Some(self.graph),
            _ if kind.is_heap() => Some(self.heap),
            _ => None,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/stepviz/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stepviz").join(CONFIG_FILE))
    }

    /// Load from `explicit` if given, otherwise from the default location.
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path: path.clone(), source },
            other => other,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.playback;
        if p.min_delay_ms > p.max_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "playback.min_delay_ms ({}) exceeds playback.max_delay_ms ({})",
                p.min_delay_ms, p.max_delay_ms
            )));
        }
        if !p.default_speed.is_finite() {
            return Err(ConfigError::Invalid("playback.default_speed must be a number".into()));
        }

        let s = &self.speed;
        if !(s.min.is_finite() && s.max.is_finite() && s.step.is_finite() && s.initial.is_finite()) {
            return Err(ConfigError::Invalid("speed values must be finite".into()));
        }
        if s.min > s.max {
            return Err(ConfigError::Invalid(format!(
                "speed.min ({}) exceeds speed.max ({})",
                s.min, s.max
            )));
        }
        if s.step <= 0.0 {
            return Err(ConfigError::Invalid("speed.step must be positive".into()));
        }
        if !(s.min..=s.max).contains(&s.initial) {
            return Err(ConfigError::Invalid(format!(
                "speed.initial ({}) is outside {}..={}",
                s.initial, s.min, s.max
            )));
        }

        let sizes = [
            ("sorting", self.sizes.sorting, VizKind::BubbleSort),
            ("heap", self.sizes.heap, VizKind::MinHeap),
            ("hanoi", self.sizes.hanoi, VizKind::Hanoi),
            ("graph", self.sizes.graph, VizKind::Bfs),
        ];
        for (key, value, kind) in sizes {
            if let Some(range) = kind.size_range() {
                if !range.contains(&value) {
                    return Err(ConfigError::Invalid(format!(
                        "sizes.{} ({}) is outside {}..={}",
                        key,
                        value,
                        range.start(),
                        range.end()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.playback.max_delay_ms, 1010);
        assert_eq!(config.speed.initial, 400.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml("[speed]\nstep = 25\n\n[sizes]\nhanoi = 5\n").unwrap();
        assert_eq!(config.speed.step, 25.0);
        assert_eq!(config.speed.max, 1000.0);
        assert_eq!(config.sizes.hanoi, 5);
        assert_eq!(config.sizes.for_kind(VizKind::Hanoi), Some(5));
        assert_eq!(config.sizes.for_kind(VizKind::Stack), None);
    }

    #[test]
    fn test_validation() {
        let swapped = AppConfig::from_toml("[playback]\nmin_delay_ms = 500\nmax_delay_ms = 100\n");
        assert!(matches!(swapped, Err(ConfigError::Invalid(_))));

        let initial = AppConfig::from_toml("[speed]\ninitial = 5000\n");
        assert!(matches!(initial, Err(ConfigError::Invalid(m)) if m.contains("speed.initial")));

        let size = AppConfig::from_toml("[sizes]\ngraph = 40\n");
        assert!(matches!(size, Err(ConfigError::Invalid(m)) if m.contains("sizes.graph")));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[speed]\nmin = \"fast\"\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let missing = Path::new("/definitely/not/here/stepviz.toml");
        assert!(matches!(AppConfig::load(Some(missing)), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_speed_steps_clamp() {
        let speed = SpeedConfig::default();
        assert_eq!(speed.faster(980.0), 1000.0);
        assert_eq!(speed.slower(30.0), 10.0);
        assert_eq!(speed.faster(400.0), 450.0);
    }
}
