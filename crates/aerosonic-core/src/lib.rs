//! aerosonic-core: Flight soundscape classification
//!
//! Turns per-frame flight telemetry into an acoustic regime and the
//! volume/low-pass/distortion/reverb values for that regime.

pub mod aero_fx;
pub mod attenuation;
mod classifier;
mod config;
mod knobs;
mod regime;
pub mod shock;
pub mod telemetry;

pub use aero_fx::{AeroFxPhase, AeroFxSettings};
pub use attenuation::{lowpass_cutoff, MIN_FULL_SPECTRUM_DENSITY};
pub use classifier::{Classification, SoundscapeClassifier};
pub use config::SoundscapeConfig;
pub use knobs::{EffectKnobSet, Knob, KnobUpdate, MAX_LOWPASS_HZ, MIN_LOWPASS_HZ};
pub use regime::{Regime, RegimeTransition};
pub use shock::{mach_angle_deg, shock_strength, ShockBand, ShockGeometry};
pub use telemetry::{
    camera_angle_deg, mach_from_temperature, speed_of_sound, FrameTelemetry, PhysicalState,
    TelemetryProvider, ViewMode,
};
