//! Soundscape classifier: telemetry in, regime and knob values out

use serde::Serialize;

use crate::attenuation::{distant_boom_cutoff, lerp, lowpass_cutoff};
use crate::config::SoundscapeConfig;
use crate::knobs::{EffectKnobSet, Knob};
use crate::regime::Regime;
use crate::shock::{ShockBand, ShockGeometry};
use crate::telemetry::FrameTelemetry;

/// Result of classifying one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub regime: Regime,
    pub knobs: EffectKnobSet,
    /// Present once the Mach number reaches the lower threshold in atmosphere
    pub shock: Option<ShockGeometry>,
}

impl Classification {
    fn plain(regime: Regime, knobs: EffectKnobSet) -> Self {
        Self { regime, knobs, shock: None }
    }
}

/// Maps a frame's physical state onto a regime and the knob values for that regime.
///
/// Pure: the same telemetry always gives the same classification. The previous
/// regime is never consulted, so there is no hysteresis at band edges.
#[derive(Debug, Clone, Default)]
pub struct SoundscapeClassifier {
    config: SoundscapeConfig,
}

impl SoundscapeClassifier {
    pub fn new(config: SoundscapeConfig) -> Self {
        Self { config: config.sanitized() }
    }

    pub fn config(&self) -> &SoundscapeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SoundscapeConfig) {
        self.config = config.sanitized();
    }

    pub fn classify(&self, frame: &FrameTelemetry) -> Classification {
        let cfg = &self.config;
        let ship_volume = frame.ship_volume;

        if frame.view_mode.is_interior() {
            let knobs = EffectKnobSet::dry(ship_volume * cfg.interior_volume_scale)
                .with_lowpass(Knob::cutoff(cfg.interior_max_freq_hz))
                .with_reverb(Knob::level(cfg.interior_reverb));
            return Classification::plain(Regime::Interior, knobs);
        }

        let state = &frame.state;
        if state.density <= 0.0 {
            let knobs = if cfg.quiet_vacuum() {
                EffectKnobSet::dry(ship_volume).with_lowpass(Knob::cutoff(cfg.vacuum_lowpass_floor_hz))
            } else {
                EffectKnobSet::all_off()
            };
            return Classification::plain(Regime::Vacuum, knobs);
        }

        let atmospheric = lowpass_cutoff(state.density, cfg.max_freq_coef, cfg.vacuum_lowpass_floor_hz);

        if state.mach_number < cfg.lower_mach_threshold {
            let knobs = EffectKnobSet::dry(ship_volume).with_lowpass(atmospheric);
            return Classification::plain(Regime::NormalFlight, knobs);
        }

        let shock = ShockGeometry::new(state.mach_number, cfg.lower_mach_threshold);
        let strength = shock.shock_strength;
        let band = shock.band(state.camera_angle_deg);

        let knobs = match band {
            ShockBand::Before if cfg.distant_boom() => EffectKnobSet::dry(ship_volume).with_lowpass(
                distant_boom_cutoff(atmospheric, cfg.supersonic_lowpass_floor_hz, strength),
            ),
            ShockBand::Before => EffectKnobSet::dry(ship_volume * (1.0 - strength)),
            ShockBand::PositiveSlope { progress } => {
                let effect = Knob::level(progress * strength * cfg.max_distortion);
                EffectKnobSet::dry(ship_volume * lerp(1.0 - strength, 1.0, progress))
                    .with_lowpass(atmospheric)
                    .with_distortion(effect)
                    .with_reverb(effect)
            }
            ShockBand::NegativeSlope { progress } => {
                let effect = Knob::level(progress * strength * cfg.max_distortion);
                EffectKnobSet::dry(ship_volume)
                    .with_lowpass(atmospheric)
                    .with_distortion(effect)
                    .with_reverb(effect)
            }
            ShockBand::After => EffectKnobSet::dry(ship_volume)
                .with_lowpass(atmospheric)
                .with_reverb(Knob::level(cfg.after_shock_reverb)),
        };

        Classification {
            regime: band.regime(),
            knobs,
            shock: Some(shock),
        }
    }
}
