//! Effect knobs: the four per-channel settings the mixer writes every frame

use serde::{Deserialize, Serialize};

/// Lowest cutoff a low-pass knob may be set to
pub const MIN_LOWPASS_HZ: f32 = 10.0;
/// Highest cutoff a low-pass knob may be set to
pub const MAX_LOWPASS_HZ: f32 = 22000.0;

/// Setting of a single knob.
///
/// `Off` bypasses the effect entirely. It is not the same as the minimum
/// value: a filter set to an extreme value still processes audio.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Knob {
    #[default]
    Off,
    Set(f32),
}

impl Knob {
    /// Unit-range level (volume, distortion, reverb), clamped to [0, 1]
    pub fn level(value: f32) -> Self {
        if value.is_nan() {
            return Self::Set(0.0);
        }
        Self::Set(value.clamp(0.0, 1.0))
    }

    /// Low-pass cutoff, clamped to [MIN_LOWPASS_HZ, MAX_LOWPASS_HZ]
    pub fn cutoff(hz: f32) -> Self {
        if hz.is_nan() {
            return Self::Set(MIN_LOWPASS_HZ);
        }
        Self::Set(hz.clamp(MIN_LOWPASS_HZ, MAX_LOWPASS_HZ))
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    pub fn value(&self) -> Option<f32> {
        match self {
            Self::Off => None,
            Self::Set(v) => Some(*v),
        }
    }
}

/// Complete set of knob values for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectKnobSet {
    pub volume: Knob,
    pub lowpass_hz: Knob,
    pub distortion: Knob,
    pub reverb: Knob,
}

impl EffectKnobSet {
    /// Every knob off (silence, no filters)
    pub fn all_off() -> Self {
        Self::default()
    }

    /// Full volume, every filter bypassed
    pub fn dry(volume: f32) -> Self {
        Self {
            volume: Knob::level(volume),
            ..Self::default()
        }
    }

    pub fn with_lowpass(mut self, lowpass_hz: Knob) -> Self {
        self.lowpass_hz = lowpass_hz;
        self
    }

    pub fn with_distortion(mut self, distortion: Knob) -> Self {
        self.distortion = distortion;
        self
    }

    pub fn with_reverb(mut self, reverb: Knob) -> Self {
        self.reverb = reverb;
        self
    }
}

/// Partial update: `None` leaves a knob untouched on the channel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KnobUpdate {
    pub volume: Option<Knob>,
    pub lowpass_hz: Option<Knob>,
    pub distortion: Option<Knob>,
    pub reverb: Option<Knob>,
}

impl From<EffectKnobSet> for KnobUpdate {
    fn from(set: EffectKnobSet) -> Self {
        Self {
            volume: Some(set.volume),
            lowpass_hz: Some(set.lowpass_hz),
            distortion: Some(set.distortion),
            reverb: Some(set.reverb),
        }
    }
}
