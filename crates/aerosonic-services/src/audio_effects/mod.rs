//! Software audio backend: effects and channels rendered in-process

mod native;
mod software;

pub use native::{DistortionEffect, GainEffect, LowPassEffect, ReverbEffect};
pub use software::{SoftwareChannel, SoftwareChannelSource, SoundProfile};

use std::fmt::Debug;

/// Effect stage on a channel; processes a mono block in place
pub trait AudioEffect: Send + Debug {
    fn name(&self) -> &str;
    fn process(&mut self, samples: &mut [f32]);
    fn set_param(&mut self, name: &str, value: f32);
    fn get_params(&self) -> Vec<EffectParam>;
    fn set_bypass(&mut self, bypass: bool);
    fn is_bypassed(&self) -> bool;
    /// Update sample rate for effects that depend on it
    fn set_sample_rate(&mut self, _sample_rate: f32) {}
}

#[derive(Debug, Clone)]
pub struct EffectParam {
    pub name: String,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub unit: String,
}

impl EffectParam {
    pub fn new(name: &str, value: f32, min: f32, max: f32, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            min,
            max,
            unit: unit.to_string(),
        }
    }
}

/// Chain of audio effects processed in order; bypassed effects are skipped entirely
#[derive(Debug, Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn AudioEffect>>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot index of the added effect
    pub fn add(&mut self, effect: Box<dyn AudioEffect>) -> usize {
        self.effects.push(effect);
        self.effects.len() - 1
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        for effect in &mut self.effects {
            if !effect.is_bypassed() {
                effect.process(samples);
            }
        }
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Box<dyn AudioEffect>> {
        self.effects.get_mut(slot)
    }

    pub fn get(&self, slot: usize) -> Option<&dyn AudioEffect> {
        self.effects.get(slot).map(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for effect in &mut self.effects {
            effect.set_sample_rate(sample_rate);
        }
    }
}
