use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: f64 = 60.0 * 1000.0;

/// The chart's single tempo record.
///
/// `beat` is the beat the tempo takes effect on. Charts carry exactly one
/// tempo, so it is only kept so that saving a chart echoes it back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    pub bpm: f64,
    pub beat: f64,
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 120.0, beat: 0.0 }
    }
}

impl Tempo {
    pub const fn new(bpm: f64, beat: f64) -> Self {
        Self { bpm, beat }
    }

    /// Conversion factor from wall-clock milliseconds to beat units.
    #[inline(always)]
    pub fn beats_per_ms(&self) -> f64 {
        self.bpm / MS_PER_MINUTE
    }

    #[inline(always)]
    pub fn beat_for_ms(&self, ms: f64) -> f64 {
        ms * self.beats_per_ms()
    }

    /// Inverse of [`Tempo::beat_for_ms`]. Returns 0 for a non-positive tempo.
    pub fn ms_for_beat(&self, beat: f64) -> f64 {
        let bpms = self.beats_per_ms();
        if bpms > 0.0 { beat / bpms } else { 0.0 }
    }

    pub fn is_valid(&self) -> bool {
        self.bpm.is_finite() && self.bpm > 0.0
    }
}
