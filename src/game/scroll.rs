use std::fmt;
use std::str::FromStr;

/// Time a note takes to fall from spawn to the judgment line at speed 1.
pub const DEFAULT_FALL_TIME_MS: f64 = 5000.0;
/// Grace window a note stays alive past the judgment line at speed 1.
pub const DEFAULT_VALID_TIME_MS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    NonPositiveFallSpeed(f64),
    NonPositiveTempo(f64),
    EmptyTimeWindow { fall_time_units: f64, valid_time_units: f64 },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::NonPositiveFallSpeed(speed) => {
                write!(f, "Fall speed must be greater than zero, got {}", speed)
            }
            ConfigurationError::NonPositiveTempo(bpms) => {
                write!(f, "Tempo must be greater than zero, got {} beats/ms", bpms)
            }
            ConfigurationError::EmptyTimeWindow { fall_time_units, valid_time_units } => write!(
                f,
                "Fall window is empty (fall {} + valid {} beats)",
                fall_time_units, valid_time_units
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Multiplier applied to the default fall time. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallSpeed(f64);

impl Default for FallSpeed {
    fn default() -> Self {
        FallSpeed(1.0)
    }
}

impl FallSpeed {
    pub fn new(value: f64) -> Result<Self, ConfigurationError> {
        if value.is_finite() && value > 0.0 {
            Ok(FallSpeed(value))
        } else {
            Err(ConfigurationError::NonPositiveFallSpeed(value))
        }
    }

    #[inline(always)]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for FallSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.0 - self.0.round()).abs() < f64::EPSILON {
            write!(f, "{}", self.0.round() as i64)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

impl FromStr for FallSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("FallSpeed value is empty".to_string());
        }
        let value_str = trimmed
            .strip_prefix('x')
            .or_else(|| trimmed.strip_prefix('X'))
            .unwrap_or(trimmed);
        let value: f64 = value_str
            .trim()
            .parse()
            .map_err(|_| format!("FallSpeed '{}' is not a valid number", trimmed))?;
        FallSpeed::new(value).map_err(|e| format!("FallSpeed '{}': {}", trimmed, e))
    }
}

/// Fall and grace windows in beat units, derived from tempo and fall speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallTiming {
    pub fall_time_units: f64,
    pub valid_time_units: f64,
}

impl FallTiming {
    pub fn new(
        beats_per_ms: f64,
        speed: FallSpeed,
        fall_time_ms: f64,
        valid_time_ms: f64,
    ) -> Result<Self, ConfigurationError> {
        if !beats_per_ms.is_finite() || beats_per_ms <= 0.0 {
            return Err(ConfigurationError::NonPositiveTempo(beats_per_ms));
        }
        let fall_time_units = fall_time_ms * beats_per_ms / speed.get();
        let valid_time_units = valid_time_ms * beats_per_ms / speed.get();
        let span = fall_time_units + valid_time_units;
        if !span.is_finite() || span <= 0.0 {
            return Err(ConfigurationError::EmptyTimeWindow {
                fall_time_units,
                valid_time_units,
            });
        }
        Ok(Self { fall_time_units, valid_time_units })
    }

    #[inline(always)]
    pub fn span(&self) -> f64 {
        self.fall_time_units + self.valid_time_units
    }

    #[inline(always)]
    pub fn spawn_beat(&self, beat: f64) -> f64 {
        beat - self.fall_time_units
    }

    #[inline(always)]
    pub fn expiry_beat(&self, beat: f64) -> f64 {
        beat + self.valid_time_units
    }

    #[inline(always)]
    pub fn is_unspawned(&self, beat: f64, progress: f64) -> bool {
        self.spawn_beat(beat) > progress
    }

    #[inline(always)]
    pub fn is_expired(&self, beat: f64, progress: f64) -> bool {
        self.expiry_beat(beat) < progress
    }
}
