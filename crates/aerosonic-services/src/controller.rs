//! Frame driver: classify the frame, then mix it into every channel

use aerosonic_core::{
    AeroFxSettings, Classification, EffectKnobSet, FrameTelemetry, Regime, RegimeTransition,
    SoundscapeClassifier, SoundscapeConfig, TelemetryProvider,
};
use tracing::{debug, info};

use crate::host::ChannelSource;
use crate::mixer::EffectMixer;
use crate::registry::{ChannelRegistry, RefreshOutcome};

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub regime: Regime,
    pub transition: Option<RegimeTransition>,
    /// `None` on paused frames
    pub knobs: Option<EffectKnobSet>,
    pub aero_fx: AeroFxSettings,
    pub channels: usize,
}

/// Owns the regime state and drives classifier, registry and mixer once per frame
#[derive(Debug)]
pub struct SoundscapeController {
    classifier: SoundscapeClassifier,
    mixer: EffectMixer,
    registry: ChannelRegistry,
    current: Regime,
    last: Regime,
    paused: bool,
    aero_fx: AeroFxSettings,
    last_classification: Option<Classification>,
}

impl Default for SoundscapeController {
    fn default() -> Self {
        Self::new(SoundscapeConfig::default())
    }
}

impl SoundscapeController {
    pub fn new(config: SoundscapeConfig) -> Self {
        Self {
            classifier: SoundscapeClassifier::new(config),
            mixer: EffectMixer::new(),
            registry: ChannelRegistry::new(),
            current: Regime::Unknown,
            last: Regime::Unknown,
            paused: false,
            aero_fx: AeroFxSettings::disabled(),
            last_classification: None,
        }
    }

    pub fn config(&self) -> &SoundscapeConfig {
        self.classifier.config()
    }

    pub fn set_config(&mut self, config: SoundscapeConfig) {
        self.classifier.set_config(config);
    }

    pub fn regime(&self) -> Regime {
        self.current
    }

    pub fn last_regime(&self) -> Regime {
        self.last
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn aero_fx(&self) -> AeroFxSettings {
        self.aero_fx
    }

    pub fn last_classification(&self) -> Option<&Classification> {
        self.last_classification.as_ref()
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn mixer_mut(&mut self) -> &mut EffectMixer {
        &mut self.mixer
    }

    /// Physics tick. Counts toward the load gate and keeps the visual effects current,
    /// paused or not.
    pub fn on_fixed_update(&mut self, telemetry: &dyn TelemetryProvider) {
        self.registry.gate_mut().advance();
        self.update_aero_fx(&FrameTelemetry::capture(telemetry));
    }

    /// Host signal that the vehicle is fully loaded
    pub fn on_world_loaded(&mut self) {
        self.registry.gate_mut().open();
    }

    /// Scene change: drop every channel and wait for the next load
    pub fn on_scene_change(&mut self) {
        self.registry.clear();
        self.last_classification = None;
    }

    /// Silence every channel and hold until `on_unpause`
    pub fn on_pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.last = self.current;
        self.current = Regime::Paused;
        self.mixer.apply(self.last, self.current, &EffectKnobSet::all_off(), &mut self.registry);
    }

    /// The next frame classifies from scratch; the pre-pause regime is not restored
    pub fn on_unpause(&mut self) {
        if self.paused {
            info!("Resuming soundscape");
        }
        self.paused = false;
    }

    /// Run one frame
    pub fn update(&mut self, telemetry: &dyn TelemetryProvider, source: &mut dyn ChannelSource) -> FrameReport {
        if self.paused {
            return FrameReport {
                regime: self.current,
                transition: None,
                knobs: None,
                aero_fx: self.aero_fx,
                channels: self.registry.len(),
            };
        }

        let frame = FrameTelemetry::capture(telemetry);
        self.update_aero_fx(&frame);

        let RefreshOutcome { pruned, rescanned, added } = self.registry.refresh(source);
        if rescanned || pruned > 0 {
            debug!("Registry refresh: {} pruned, {} added", pruned, added);
        }

        let classification = self.classifier.classify(&frame);
        self.last = self.current;
        self.current = classification.regime;
        let transition = self.mixer.apply(self.last, self.current, &classification.knobs, &mut self.registry);
        self.last_classification = Some(classification);

        FrameReport {
            regime: self.current,
            transition,
            knobs: Some(classification.knobs),
            aero_fx: self.aero_fx,
            channels: self.registry.len(),
        }
    }

    fn update_aero_fx(&mut self, frame: &FrameTelemetry) {
        self.aero_fx = AeroFxSettings::evaluate(
            frame.state.mach_number,
            frame.state.surface_speed,
            self.classifier.config(),
        );
    }
}
