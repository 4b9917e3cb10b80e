//! High-frequency loss in thin air

use crate::knobs::{Knob, MAX_LOWPASS_HZ};

/// Every audible frequency propagates above this density, kg/m^3
pub const MIN_FULL_SPECTRUM_DENSITY: f32 = 0.0089;

/// Low-pass cutoff imposed by the atmosphere.
///
/// A linear proxy: the highest audible frequency is `density * freq_coef`,
/// never below `floor_hz`. Dense air leaves the full spectrum (`Off`).
pub fn lowpass_cutoff(density: f32, freq_coef: f32, floor_hz: f32) -> Knob {
    if density > MIN_FULL_SPECTRUM_DENSITY {
        return Knob::Off;
    }
    Knob::cutoff((density * freq_coef).max(floor_hz))
}

/// Linear interpolation with `t` clamped to [0, 1]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Cutoff ahead of the shock when a supersonic floor is configured.
///
/// Opens from the floor toward the full spectrum as the shock weakens,
/// and never exceeds the atmospheric cutoff.
pub fn distant_boom_cutoff(atmospheric: Knob, supersonic_floor_hz: f32, shock_strength: f32) -> Knob {
    let supersonic = lerp(supersonic_floor_hz, MAX_LOWPASS_HZ, 1.0 - shock_strength);
    match atmospheric {
        Knob::Set(hz) => Knob::cutoff(hz.min(supersonic)),
        Knob::Off => Knob::cutoff(supersonic),
    }
}
