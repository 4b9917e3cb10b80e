//! aerosonic-services: Host-facing soundscape services and the software audio backend

pub mod audio_effects;
pub mod controller;
pub mod host;
pub mod mixer;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use audio_effects::{AudioEffect, EffectChain, EffectParam};
pub use audio_effects::{DistortionEffect, GainEffect, LowPassEffect, ReverbEffect};
pub use audio_effects::{SoftwareChannel, SoftwareChannelSource, SoundProfile};
pub use controller::{FrameReport, SoundscapeController};
pub use host::{ChannelId, ChannelSource, FilterHandle, FilterKind, SoundChannel};
pub use mixer::EffectMixer;
pub use registry::{ChannelRegistry, ChannelStrip, LoadGate, RefreshOutcome, REQUIRED_LOAD_CYCLES};
