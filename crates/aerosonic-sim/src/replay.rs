//! Plays a flight trace through the controller and software channels

use std::path::Path;

use aerosonic_core::{Regime, RegimeTransition, SoundscapeConfig};
use aerosonic_services::{SoftwareChannelSource, SoundChannel, SoundscapeController};
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, info};

use crate::error::Result;
use crate::trace::{FlightTrace, TraceEvent};

#[derive(Debug, Clone, Copy)]
pub struct ReplaySettings {
    pub sample_rate: u32,
    /// Frames per second of the trace
    pub fps: u32,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self { sample_rate: 44_100, fps: 50 }
    }
}

impl ReplaySettings {
    pub fn samples_per_frame(&self) -> usize {
        (self.sample_rate / self.fps.max(1)).max(1) as usize
    }
}

#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub frames: usize,
    pub transitions: Vec<RegimeTransition>,
    pub final_regime: Regime,
    /// Mono mix of every channel
    pub samples: Vec<f32>,
}

pub fn replay(trace: &FlightTrace, config: SoundscapeConfig, settings: ReplaySettings) -> ReplaySummary {
    let mut controller = SoundscapeController::new(config);
    let (tx, rx) = crossbeam_channel::unbounded();
    controller.mixer_mut().forward_to(tx);

    let mut vehicle = SoftwareChannelSource::new(settings.sample_rate as f32);
    for profile in &trace.channels {
        vehicle.add(*profile);
    }

    let block_len = settings.samples_per_frame();
    let mut block = vec![0.0; block_len];
    let mut samples = Vec::with_capacity(block_len * trace.frames.len());

    for (index, frame) in trace.frames.iter().enumerate() {
        for event in &frame.events {
            apply_event(*event, &mut controller, &mut vehicle);
        }
        controller.on_fixed_update(frame);
        let report = controller.update(frame, &mut vehicle);
        debug!(frame = index, regime = %report.regime, channels = report.channels, "Frame");

        vehicle.render_mix(&mut block);
        samples.extend_from_slice(&block);
    }

    let transitions: Vec<RegimeTransition> = rx.try_iter().collect();
    info!(
        "Replayed {} frames, {} regime changes, ending in {}",
        trace.frames.len(),
        transitions.len(),
        controller.regime()
    );
    ReplaySummary {
        frames: trace.frames.len(),
        transitions,
        final_regime: controller.regime(),
        samples,
    }
}

fn apply_event(event: TraceEvent, controller: &mut SoundscapeController, vehicle: &mut SoftwareChannelSource) {
    match event {
        TraceEvent::Pause => controller.on_pause(),
        TraceEvent::Unpause => controller.on_unpause(),
        TraceEvent::WorldLoaded => controller.on_world_loaded(),
        TraceEvent::SceneChange => controller.on_scene_change(),
        TraceEvent::AddChannel(profile) => {
            vehicle.add(profile);
        }
        TraceEvent::RemoveChannel(index) => {
            if let Some(id) = vehicle.channels().get(index).map(|c| c.id()) {
                vehicle.remove(id);
            }
        }
    }
}

pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for sample in samples {
        writer.write_sample(sample.clamp(-1.0, 1.0))?;
    }
    writer.finalize()?;
    info!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}
