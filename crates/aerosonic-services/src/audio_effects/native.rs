//! Native audio effects backing the software channels

use std::cmp::Ord;
use std::fmt;

use aerosonic_core::{MAX_LOWPASS_HZ, MIN_LOWPASS_HZ};
use fundsp::hacker::*;

use super::{AudioEffect, EffectParam};

/// Fraction of the sample rate the low-pass cutoff is held under
const NYQUIST_MARGIN: f32 = 0.45;

/// Linear volume
#[derive(Debug)]
pub struct GainEffect {
    volume: f32,
    bypassed: bool,
}

impl GainEffect {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            bypassed: false,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioEffect for GainEffect {
    fn name(&self) -> &str { "Gain" }

    fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample *= self.volume;
        }
    }

    fn set_param(&mut self, name: &str, value: f32) {
        if name == "volume" {
            self.volume = value.clamp(0.0, 1.0);
        }
    }

    fn get_params(&self) -> Vec<EffectParam> {
        vec![EffectParam::new("volume", self.volume, 0.0, 1.0, "")]
    }

    fn set_bypass(&mut self, bypass: bool) { self.bypassed = bypass; }
    fn is_bypassed(&self) -> bool { self.bypassed }
}

/// Resonance-free low-pass for atmospheric and interior muffling
pub struct LowPassEffect {
    cutoff_hz: f32,
    sample_rate: f32,
    filter: An<FixedSvf<f64, LowpassMode<f64>>>,
    bypassed: bool,
}

impl LowPassEffect {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let cutoff_hz = Self::limit(cutoff_hz, sample_rate);
        let mut filter = lowpass_hz(cutoff_hz, 0.707);
        filter.set_sample_rate(sample_rate as f64);
        Self { cutoff_hz, sample_rate, filter, bypassed: false }
    }

    fn limit(cutoff_hz: f32, sample_rate: f32) -> f32 {
        // Nyquist ceiling first; at very low sample rates the floor wins
        cutoff_hz.min(MAX_LOWPASS_HZ.min(sample_rate * NYQUIST_MARGIN)).max(MIN_LOWPASS_HZ)
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }
}

impl fmt::Debug for LowPassEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LowPassEffect")
            .field("cutoff_hz", &self.cutoff_hz)
            .field("sample_rate", &self.sample_rate)
            .field("bypassed", &self.bypassed)
            .finish()
    }
}

impl AudioEffect for LowPassEffect {
    fn name(&self) -> &str { "Low Pass" }

    fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            let input = Frame::from([*sample]);
            let output = self.filter.tick(&input);
            *sample = output[0];
        }
    }

    fn set_param(&mut self, name: &str, value: f32) {
        if name != "cutoff" {
            return;
        }
        self.cutoff_hz = Self::limit(value, self.sample_rate);
        self.filter.set(Setting::center(self.cutoff_hz));
    }

    fn get_params(&self) -> Vec<EffectParam> {
        vec![EffectParam::new("cutoff", self.cutoff_hz, MIN_LOWPASS_HZ, MAX_LOWPASS_HZ, "Hz")]
    }

    fn set_bypass(&mut self, bypass: bool) { self.bypassed = bypass; }
    fn is_bypassed(&self) -> bool { self.bypassed }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.filter.set_sample_rate(sample_rate as f64);
        self.set_param("cutoff", self.cutoff_hz);
    }
}

/// Soft-clipping distortion for the shockwave edges.
///
/// `level` blends from the dry signal toward a hard-driven tanh curve.
#[derive(Debug)]
pub struct DistortionEffect {
    level: f32,
    bypassed: bool,
}

impl DistortionEffect {
    const MAX_DRIVE: f32 = 25.0;

    pub fn new(level: f32) -> Self {
        Self { level: level.clamp(0.0, 1.0), bypassed: false }
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl AudioEffect for DistortionEffect {
    fn name(&self) -> &str { "Distortion" }

    fn process(&mut self, samples: &mut [f32]) {
        let drive = 1.0 + self.level * Self::MAX_DRIVE;
        let norm = drive.tanh();
        for sample in samples.iter_mut() {
            let shaped = (*sample * drive).tanh() / norm;
            *sample = *sample * (1.0 - self.level) + shaped * self.level;
        }
    }

    fn set_param(&mut self, name: &str, value: f32) {
        if name == "level" {
            self.level = value.clamp(0.0, 1.0);
        }
    }

    fn get_params(&self) -> Vec<EffectParam> {
        vec![EffectParam::new("level", self.level, 0.0, 1.0, "")]
    }

    fn set_bypass(&mut self, bypass: bool) { self.bypassed = bypass; }
    fn is_bypassed(&self) -> bool { self.bypassed }
}

/// Comb-filter reverb (Schroeder style); `level` is the wet mix
pub struct ReverbEffect {
    room_size: f32,
    damping: f32,
    level: f32,
    lines: Vec<Vec<f32>>,
    heads: Vec<usize>,
    sample_rate: f32,
    bypassed: bool,
}

impl ReverbEffect {
    /// Delay ratios of the comb lines, relative to the base delay
    const LINE_RATIOS: [f32; 4] = [1.0, 1.13, 1.27, 1.41];

    pub fn new(room_size: f32, damping: f32, level: f32, sample_rate: f32) -> Self {
        let mut effect = Self {
            room_size: room_size.clamp(0.0, 1.0),
            damping: damping.clamp(0.0, 1.0),
            level: level.clamp(0.0, 1.0),
            lines: Vec::new(),
            heads: Vec::new(),
            sample_rate,
            bypassed: false,
        };
        effect.allocate_lines();
        effect
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    fn allocate_lines(&mut self) {
        let base_ms = 10.0 + self.room_size * 50.0;
        self.lines = Self::LINE_RATIOS
            .iter()
            .map(|ratio| {
                let len = (base_ms * ratio * self.sample_rate / 1000.0) as usize;
                vec![0.0; Ord::max(len, 1)]
            })
            .collect();
        self.heads = vec![0; self.lines.len()];
    }
}

impl fmt::Debug for ReverbEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReverbEffect")
            .field("room_size", &self.room_size)
            .field("damping", &self.damping)
            .field("level", &self.level)
            .field("bypassed", &self.bypassed)
            .finish()
    }
}

impl AudioEffect for ReverbEffect {
    fn name(&self) -> &str { "Reverb" }

    fn process(&mut self, samples: &mut [f32]) {
        let feedback = 0.7 * (1.0 - self.damping * 0.4);
        let count = self.lines.len() as f32;

        for sample in samples.iter_mut() {
            let dry = *sample;
            let mut wet = 0.0;
            for (line, head) in self.lines.iter_mut().zip(self.heads.iter_mut()) {
                let echo = line[*head];
                wet += echo;
                line[*head] = dry + echo * feedback;
                *head = (*head + 1) % line.len();
            }
            *sample = dry * (1.0 - self.level) + (wet / count) * self.level;
        }
    }

    fn set_param(&mut self, name: &str, value: f32) {
        match name {
            "room_size" => {
                self.room_size = value.clamp(0.0, 1.0);
                self.allocate_lines();
            }
            "damping" => self.damping = value.clamp(0.0, 1.0),
            "level" => self.level = value.clamp(0.0, 1.0),
            _ => {}
        }
    }

    fn get_params(&self) -> Vec<EffectParam> {
        vec![
            EffectParam::new("room_size", self.room_size, 0.0, 1.0, ""),
            EffectParam::new("damping", self.damping, 0.0, 1.0, ""),
            EffectParam::new("level", self.level, 0.0, 1.0, ""),
        ]
    }

    fn set_bypass(&mut self, bypass: bool) { self.bypassed = bypass; }
    fn is_bypassed(&self) -> bool { self.bypassed }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if (sample_rate - self.sample_rate).abs() < 1.0 {
            return;
        }
        self.sample_rate = sample_rate;
        self.allocate_lines();
    }
}
