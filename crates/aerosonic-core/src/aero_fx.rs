//! Aerodynamic visual effects (condensation and re-entry glow)
//!
//! The host's stock effect shows condensation and plasma based on raw airspeed.
//! These settings take it over so the visuals follow the same Mach thresholds
//! as the audio.

use serde::{Deserialize, Serialize};

use crate::config::SoundscapeConfig;

/// Surface speed where re-entry heating starts to show, m/s
pub const THERMAL_START_SPEED: f32 = 800.0;
/// Surface speed of full re-entry heating, m/s
pub const THERMAL_FULL_SPEED: f32 = 1150.0;
/// Airspeed the host effect is pinned to during condensation, m/s
pub const CONDENSATION_LOCK_AIRSPEED: f32 = 400.0;
/// Base effect intensity while an effect is shown
const ACTIVE_INTENSITY: f32 = 3.0;

/// Which effect the host should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AeroFxPhase {
    Disabled,
    Condensation,
    Supersonic,
    Reentry,
}

/// Settings for the host's aerodynamic effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeroFxSettings {
    pub phase: AeroFxPhase,
    pub intensity: f32,
    /// 0 is condensation, 1 is full plasma
    pub thermal_blend: f32,
    pub locked_airspeed: Option<f32>,
}

impl AeroFxSettings {
    pub fn disabled() -> Self {
        Self {
            phase: AeroFxPhase::Disabled,
            intensity: 0.0,
            thermal_blend: 0.0,
            locked_airspeed: None,
        }
    }

    pub fn evaluate(mach_number: f32, surface_speed: f32, config: &SoundscapeConfig) -> Self {
        let lower = config.lower_mach_threshold;
        let upper = config.upper_mach_threshold;

        if mach_number < lower {
            return Self::disabled();
        }

        if mach_number <= upper {
            let distance = ((mach_number - 1.0) / (1.0 - lower)).abs();
            return Self {
                phase: AeroFxPhase::Condensation,
                intensity: ACTIVE_INTENSITY + (1.0 - distance) * config.condensation_effect_strength,
                thermal_blend: 0.0,
                locked_airspeed: Some(CONDENSATION_LOCK_AIRSPEED),
            };
        }

        if surface_speed < THERMAL_START_SPEED {
            return Self {
                phase: AeroFxPhase::Supersonic,
                ..Self::disabled()
            };
        }

        let blend = if surface_speed >= THERMAL_FULL_SPEED {
            1.0
        } else {
            (surface_speed - THERMAL_START_SPEED) / (THERMAL_FULL_SPEED - THERMAL_START_SPEED)
        };
        Self {
            phase: AeroFxPhase::Reentry,
            intensity: ACTIVE_INTENSITY,
            thermal_blend: blend,
            locked_airspeed: None,
        }
    }
}

impl Default for AeroFxSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(mach: f32, speed: f32) -> AeroFxSettings {
        AeroFxSettings::evaluate(mach, speed, &SoundscapeConfig::default())
    }

    #[test]
    fn test_subsonic_disabled() {
        assert_eq!(eval(0.5, 170.0), AeroFxSettings::disabled());
    }

    #[test]
    fn test_condensation_peaks_at_mach_one() {
        let peak = eval(1.0, 340.0);
        assert_eq!(peak.phase, AeroFxPhase::Condensation);
        assert!((peak.intensity - 3.5).abs() < 1e-5);
        assert_eq!(peak.locked_airspeed, Some(CONDENSATION_LOCK_AIRSPEED));

        let edge = eval(0.8, 272.0);
        assert!((edge.intensity - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_condensation_wins_over_heating() {
        // Transonic in thin, cold air can be fast in m/s
        assert_eq!(eval(1.1, 900.0).phase, AeroFxPhase::Condensation);
    }

    #[test]
    fn test_supersonic_clear() {
        let fx = eval(2.0, 680.0);
        assert_eq!(fx.phase, AeroFxPhase::Supersonic);
        assert_eq!(fx.intensity, 0.0);
    }

    #[test]
    fn test_reentry_blend() {
        let fx = eval(3.0, 975.0);
        assert_eq!(fx.phase, AeroFxPhase::Reentry);
        assert!((fx.thermal_blend - 0.5).abs() < 1e-5);
        assert_eq!(eval(5.0, 2000.0).thermal_blend, 1.0);
        assert_eq!(eval(2.5, 800.0).thermal_blend, 0.0);
    }
}
