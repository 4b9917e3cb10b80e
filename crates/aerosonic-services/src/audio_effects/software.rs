//! In-process sound channels implementing the host channel interfaces

use std::sync::{Arc, Mutex};

use aerosonic_core::MAX_LOWPASS_HZ;
use serde::{Deserialize, Serialize};

use super::{AudioEffect, DistortionEffect, EffectChain, GainEffect, LowPassEffect, ReverbEffect};
use crate::host::{ChannelId, ChannelSource, FilterHandle, FilterKind, SoundChannel};

// Effect order in every voice: low-pass runs last so it also muffles the distortion and reverb
const DISTORTION_SLOT: usize = 0;
const REVERB_SLOT: usize = 1;
const LOWPASS_SLOT: usize = 2;

/// What a software channel sounds like
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundProfile {
    /// Harmonic-rich engine drone
    Engine { frequency_hz: f32 },
    /// Broadband wind noise
    Airflow,
}

impl SoundProfile {
    fn slot_param(kind: FilterKind) -> (usize, &'static str) {
        match kind {
            FilterKind::LowPass => (LOWPASS_SLOT, "cutoff"),
            FilterKind::Distortion => (DISTORTION_SLOT, "level"),
            FilterKind::Reverb => (REVERB_SLOT, "level"),
        }
    }
}

#[derive(Debug)]
struct ChannelVoice {
    profile: SoundProfile,
    phase: f32,
    sample_rate: f32,
    rng: fastrand::Rng,
    chain: EffectChain,
    gain: GainEffect,
    alive: bool,
    attached: usize,
}

impl ChannelVoice {
    fn new(id: ChannelId, profile: SoundProfile, sample_rate: f32) -> Self {
        let mut chain = EffectChain::new();
        chain.add(Box::new(DistortionEffect::new(0.0)));
        chain.add(Box::new(ReverbEffect::new(0.6, 0.5, 0.0, sample_rate)));
        chain.add(Box::new(LowPassEffect::new(MAX_LOWPASS_HZ, sample_rate)));
        for slot in [DISTORTION_SLOT, REVERB_SLOT, LOWPASS_SLOT] {
            if let Some(effect) = chain.get_mut(slot) {
                effect.set_bypass(true);
            }
        }
        Self {
            profile,
            phase: 0.0,
            sample_rate,
            rng: fastrand::Rng::with_seed(id.0),
            chain,
            gain: GainEffect::new(1.0),
            alive: true,
            attached: 0,
        }
    }

    fn next_sample(&mut self) -> f32 {
        match self.profile {
            SoundProfile::Engine { frequency_hz } => {
                self.phase = (self.phase + frequency_hz / self.sample_rate).fract();
                let t = self.phase * std::f32::consts::TAU;
                0.5 * t.sin() + 0.25 * (2.0 * t).sin() + 0.125 * (3.0 * t).sin()
            }
            SoundProfile::Airflow => (self.rng.f32() * 2.0 - 1.0) * 0.5,
        }
    }

    fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
        self.chain.process(out);
        self.gain.process(out);
    }
}

/// A software sound channel. Clones share the same voice.
#[derive(Debug, Clone)]
pub struct SoftwareChannel {
    id: ChannelId,
    voice: Arc<Mutex<ChannelVoice>>,
}

impl SoftwareChannel {
    pub fn new(id: ChannelId, profile: SoundProfile, sample_rate: f32) -> Self {
        Self {
            id,
            voice: Arc::new(Mutex::new(ChannelVoice::new(id, profile, sample_rate))),
        }
    }

    /// Overwrite `out` with the next block of this channel's output
    pub fn render(&self, out: &mut [f32]) {
        match self.voice.lock() {
            Ok(mut voice) if voice.alive => voice.render(out),
            _ => out.fill(0.0),
        }
    }

    /// Simulate the host object going away
    pub fn destroy(&self) {
        if let Ok(mut voice) = self.voice.lock() {
            voice.alive = false;
        }
    }

    pub fn volume(&self) -> f32 {
        self.voice.lock().map(|v| v.gain.volume()).unwrap_or(0.0)
    }

    pub fn filter_enabled(&self, kind: FilterKind) -> bool {
        let (slot, _) = SoundProfile::slot_param(kind);
        self.voice
            .lock()
            .ok()
            .and_then(|v| v.chain.get(slot).map(|e| !e.is_bypassed()))
            .unwrap_or(false)
    }

    /// Current value of a filter's main parameter
    pub fn filter_value(&self, kind: FilterKind) -> Option<f32> {
        let (slot, param) = SoundProfile::slot_param(kind);
        let voice = self.voice.lock().ok()?;
        let effect = voice.chain.get(slot)?;
        effect.get_params().into_iter().find(|p| p.name == param).map(|p| p.value)
    }

    /// Filters handed out so far
    pub fn attached_filters(&self) -> usize {
        self.voice.lock().map(|v| v.attached).unwrap_or(0)
    }
}

impl SoundChannel for SoftwareChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.voice.lock().map(|v| v.alive).unwrap_or(false)
    }

    fn set_volume(&mut self, volume: f32) {
        if let Ok(mut voice) = self.voice.lock() {
            voice.gain.set_param("volume", volume);
        }
    }

    fn attach_filter(&mut self, kind: FilterKind) -> Box<dyn FilterHandle> {
        if let Ok(mut voice) = self.voice.lock() {
            voice.attached += 1;
        }
        Box::new(SoftwareFilter { voice: self.voice.clone(), kind })
    }
}

#[derive(Debug)]
struct SoftwareFilter {
    voice: Arc<Mutex<ChannelVoice>>,
    kind: FilterKind,
}

impl SoftwareFilter {
    fn with_effect(&self, f: impl FnOnce(&mut dyn AudioEffect, &'static str)) {
        let (slot, param) = SoundProfile::slot_param(self.kind);
        if let Ok(mut voice) = self.voice.lock() {
            if let Some(effect) = voice.chain.get_mut(slot) {
                f(effect.as_mut(), param);
            }
        }
    }
}

impl FilterHandle for SoftwareFilter {
    fn set_enabled(&mut self, enabled: bool) {
        self.with_effect(|effect, _| effect.set_bypass(!enabled));
    }

    fn is_enabled(&self) -> bool {
        let mut enabled = false;
        self.with_effect(|effect, _| enabled = !effect.is_bypassed());
        enabled
    }

    fn set_value(&mut self, value: f32) {
        self.with_effect(|effect, param| effect.set_param(param, value));
    }
}

/// A simulated vehicle made of software channels
#[derive(Debug)]
pub struct SoftwareChannelSource {
    channels: Vec<SoftwareChannel>,
    next_id: u64,
    sample_rate: f32,
    scratch: Vec<f32>,
}

impl SoftwareChannelSource {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            channels: Vec::new(),
            next_id: 0,
            sample_rate,
            scratch: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn add(&mut self, profile: SoundProfile) -> SoftwareChannel {
        let channel = SoftwareChannel::new(ChannelId(self.next_id), profile, self.sample_rate);
        self.next_id += 1;
        self.channels.push(channel.clone());
        channel
    }

    /// Destroy a channel and drop it from the vehicle
    pub fn remove(&mut self, id: ChannelId) -> bool {
        let Some(pos) = self.channels.iter().position(|c| c.id == id) else {
            return false;
        };
        self.channels.remove(pos).destroy();
        true
    }

    pub fn channels(&self) -> &[SoftwareChannel] {
        &self.channels
    }

    /// Sum every live channel into `out`
    pub fn render_mix(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        self.scratch.resize(out.len(), 0.0);
        for channel in &self.channels {
            channel.render(&mut self.scratch);
            for (acc, s) in out.iter_mut().zip(&self.scratch) {
                *acc += *s;
            }
        }
    }
}

impl ChannelSource for SoftwareChannelSource {
    fn structure_count(&self) -> usize {
        self.channels.len()
    }

    fn enumerate_channels(&mut self) -> Vec<Box<dyn SoundChannel>> {
        self.channels
            .iter()
            .map(|c| Box::new(c.clone()) as Box<dyn SoundChannel>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use aerosonic_core::{EffectKnobSet, Knob, Regime};

    use super::*;
    use crate::mixer::EffectMixer;
    use crate::registry::ChannelRegistry;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_filters_start_bypassed() {
        let channel = SoftwareChannel::new(ChannelId(0), SoundProfile::Airflow, 44_100.0);
        for kind in FilterKind::ALL {
            assert!(!channel.filter_enabled(kind));
        }
    }

    #[test]
    fn test_mixer_drives_software_channels() {
        let mut source = SoftwareChannelSource::new(44_100.0);
        let engine = source.add(SoundProfile::Engine { frequency_hz: 110.0 });
        let wind = source.add(SoundProfile::Airflow);

        let mut registry = ChannelRegistry::new();
        registry.gate_mut().open();
        registry.refresh(&mut source);
        assert_eq!(engine.attached_filters(), 3);
        assert_eq!(wind.attached_filters(), 3);

        let knobs = EffectKnobSet::dry(0.5)
            .with_lowpass(Knob::Set(2_500.0))
            .with_distortion(Knob::Set(0.3))
            .with_reverb(Knob::Off);
        EffectMixer::new().apply(Regime::Unknown, Regime::NegativeSlope, &knobs, &mut registry);

        assert_eq!(engine.volume(), 0.5);
        assert!(engine.filter_enabled(FilterKind::LowPass));
        assert_eq!(engine.filter_value(FilterKind::LowPass), Some(2_500.0));
        assert_eq!(wind.filter_value(FilterKind::Distortion), Some(0.3));
        assert!(!wind.filter_enabled(FilterKind::Reverb));
    }

    #[test]
    fn test_muted_channels_are_silent() {
        let mut source = SoftwareChannelSource::new(44_100.0);
        let mut engine = source.add(SoundProfile::Engine { frequency_hz: 110.0 });
        let mut out = vec![0.0; 512];
        source.render_mix(&mut out);
        assert!(peak(&out) > 0.1);

        engine.set_volume(0.0);
        source.render_mix(&mut out);
        assert_eq!(peak(&out), 0.0);
    }

    #[test]
    fn test_channels_build_at_any_sample_rate() {
        let mut source = SoftwareChannelSource::new(20.0);
        let wind = source.add(SoundProfile::Airflow);
        let mut out = vec![0.0; 16];
        source.render_mix(&mut out);
        assert!(wind.is_alive());
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_removed_channel_is_dead() {
        let mut source = SoftwareChannelSource::new(44_100.0);
        let wind = source.add(SoundProfile::Airflow);
        assert!(source.remove(wind.id()));
        assert!(!wind.is_alive());
        assert_eq!(source.structure_count(), 0);
        assert!(!source.remove(wind.id()));
    }
}
