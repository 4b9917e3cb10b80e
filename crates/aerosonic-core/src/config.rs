//! Tunable soundscape coefficients

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::knobs::MIN_LOWPASS_HZ;

/// Tunables for the classifier and the visual-effect model.
///
/// Loading and saving is left to the host; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundscapeConfig {
    /// Mach number where shockwave audio and condensation begin
    pub lower_mach_threshold: f32,
    /// Mach number where the condensation effect ends
    pub upper_mach_threshold: f32,
    /// Peak distortion and reverb on the shock edges
    pub max_distortion: f32,
    pub interior_volume_scale: f32,
    pub interior_max_freq_hz: f32,
    pub interior_reverb: f32,
    pub after_shock_reverb: f32,
    pub condensation_effect_strength: f32,
    /// Below 10 Hz the vacuum is silent
    pub vacuum_lowpass_floor_hz: f32,
    /// Below 10 Hz the air ahead of the shock is silent
    pub supersonic_lowpass_floor_hz: f32,
    /// Density to maximum audible frequency, Hz per kg/m^3
    pub max_freq_coef: f32,
}

impl Default for SoundscapeConfig {
    fn default() -> Self {
        Self {
            lower_mach_threshold: 0.80,
            upper_mach_threshold: 1.20,
            max_distortion: 0.95,
            interior_volume_scale: 0.7,
            interior_max_freq_hz: 300.0,
            interior_reverb: 0.05,
            after_shock_reverb: 0.15,
            condensation_effect_strength: 0.5,
            vacuum_lowpass_floor_hz: 0.0,
            supersonic_lowpass_floor_hz: 0.0,
            max_freq_coef: 2_500_000.0,
        }
    }
}

impl SoundscapeConfig {
    /// Quiet vacuum instead of silence
    pub fn quiet_vacuum(&self) -> bool {
        self.vacuum_lowpass_floor_hz >= MIN_LOWPASS_HZ
    }

    /// Low rumble ahead of the shock instead of silence
    pub fn distant_boom(&self) -> bool {
        self.supersonic_lowpass_floor_hz >= MIN_LOWPASS_HZ
    }

    /// Copy with every invalid value replaced by its default
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut out = self.clone();

        let unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        let transonic = |v: f32| v.is_finite() && v > 0.0 && v < 1.0;

        reset_invalid(
            "lower_mach_threshold",
            &mut out.lower_mach_threshold,
            defaults.lower_mach_threshold,
            transonic,
        );
        let lower = out.lower_mach_threshold;
        let upper_default = defaults.upper_mach_threshold.max(lower);
        reset_invalid("upper_mach_threshold", &mut out.upper_mach_threshold, upper_default, |v| {
            v.is_finite() && v > lower
        });

        reset_invalid("max_distortion", &mut out.max_distortion, defaults.max_distortion, unit);
        reset_invalid(
            "interior_volume_scale",
            &mut out.interior_volume_scale,
            defaults.interior_volume_scale,
            unit,
        );
        reset_invalid(
            "interior_max_freq_hz",
            &mut out.interior_max_freq_hz,
            defaults.interior_max_freq_hz,
            non_negative,
        );
        reset_invalid("interior_reverb", &mut out.interior_reverb, defaults.interior_reverb, unit);
        reset_invalid(
            "after_shock_reverb",
            &mut out.after_shock_reverb,
            defaults.after_shock_reverb,
            unit,
        );
        reset_invalid(
            "condensation_effect_strength",
            &mut out.condensation_effect_strength,
            defaults.condensation_effect_strength,
            non_negative,
        );
        reset_invalid(
            "vacuum_lowpass_floor_hz",
            &mut out.vacuum_lowpass_floor_hz,
            defaults.vacuum_lowpass_floor_hz,
            non_negative,
        );
        reset_invalid(
            "supersonic_lowpass_floor_hz",
            &mut out.supersonic_lowpass_floor_hz,
            defaults.supersonic_lowpass_floor_hz,
            non_negative,
        );
        reset_invalid("max_freq_coef", &mut out.max_freq_coef, defaults.max_freq_coef, |v| {
            v.is_finite() && v > 0.0
        });

        out
    }

    /// Set one value by key. Returns false for unknown keys.
    pub fn apply_setting(&mut self, key: &str, value: f32) -> bool {
        let slot = match key {
            "lower_mach_threshold" => &mut self.lower_mach_threshold,
            "upper_mach_threshold" => &mut self.upper_mach_threshold,
            "max_distortion" => &mut self.max_distortion,
            "interior_volume_scale" => &mut self.interior_volume_scale,
            "interior_max_freq_hz" => &mut self.interior_max_freq_hz,
            "interior_reverb" => &mut self.interior_reverb,
            "after_shock_reverb" => &mut self.after_shock_reverb,
            "condensation_effect_strength" => &mut self.condensation_effect_strength,
            "vacuum_lowpass_floor_hz" => &mut self.vacuum_lowpass_floor_hz,
            "supersonic_lowpass_floor_hz" => &mut self.supersonic_lowpass_floor_hz,
            "max_freq_coef" => &mut self.max_freq_coef,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// All settings in persistence order
    pub fn settings(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("interior_volume_scale", self.interior_volume_scale),
            ("interior_max_freq_hz", self.interior_max_freq_hz),
            ("interior_reverb", self.interior_reverb),
            ("lower_mach_threshold", self.lower_mach_threshold),
            ("upper_mach_threshold", self.upper_mach_threshold),
            ("max_distortion", self.max_distortion),
            ("after_shock_reverb", self.after_shock_reverb),
            ("condensation_effect_strength", self.condensation_effect_strength),
            ("vacuum_lowpass_floor_hz", self.vacuum_lowpass_floor_hz),
            ("supersonic_lowpass_floor_hz", self.supersonic_lowpass_floor_hz),
            ("max_freq_coef", self.max_freq_coef),
        ]
    }
}

fn reset_invalid(name: &str, value: &mut f32, default: f32, valid: impl Fn(f32) -> bool) {
    if !valid(*value) {
        warn!("Invalid {name} = {value}, using {default}");
        *value = default;
    }
}
