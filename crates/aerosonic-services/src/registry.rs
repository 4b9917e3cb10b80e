//! Channel registry: the vehicle's sound channels and their filters

use std::collections::{HashMap, HashSet};

use aerosonic_core::{Knob, KnobUpdate};
use tracing::{debug, info};

use crate::host::{ChannelId, ChannelSource, FilterHandle, FilterKind, SoundChannel};

/// Load cycles to wait after scene entry before trusting the structure count
pub const REQUIRED_LOAD_CYCLES: u8 = 2;

/// Holds rescans back until the host has finished loading the vehicle.
///
/// The first physics tick fires before the vehicle is loaded, so the gate
/// opens on the second one, or as soon as the host says the world is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadGate {
    cycles: u8,
    forced: bool,
}

impl LoadGate {
    /// Count one completed load cycle (physics tick)
    pub fn advance(&mut self) {
        if self.cycles < REQUIRED_LOAD_CYCLES {
            self.cycles += 1;
        }
    }

    /// Explicit "world fully loaded" signal
    pub fn open(&mut self) {
        self.forced = true;
    }

    pub fn is_open(&self) -> bool {
        self.forced || self.cycles >= REQUIRED_LOAD_CYCLES
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One registered channel with the filters created for it
#[derive(Debug)]
pub struct ChannelStrip {
    channel: Box<dyn SoundChannel>,
    lowpass: Box<dyn FilterHandle>,
    distortion: Box<dyn FilterHandle>,
    reverb: Box<dyn FilterHandle>,
}

impl ChannelStrip {
    /// Creates the channel's filters. Only the registry does this, once per channel.
    fn attach(mut channel: Box<dyn SoundChannel>) -> Self {
        let lowpass = channel.attach_filter(FilterKind::LowPass);
        let distortion = channel.attach_filter(FilterKind::Distortion);
        let reverb = channel.attach_filter(FilterKind::Reverb);
        Self { channel, lowpass, distortion, reverb }
    }

    pub fn id(&self) -> ChannelId {
        self.channel.id()
    }

    pub fn is_alive(&self) -> bool {
        self.channel.is_alive()
    }

    #[cfg(test)]
    fn filter(&self, kind: FilterKind) -> &dyn FilterHandle {
        match kind {
            FilterKind::LowPass => self.lowpass.as_ref(),
            FilterKind::Distortion => self.distortion.as_ref(),
            FilterKind::Reverb => self.reverb.as_ref(),
        }
    }

    /// Write every knob present in `update`; `Off` disables rather than zeroes
    pub fn apply(&mut self, update: &KnobUpdate) {
        if let Some(volume) = update.volume {
            self.channel.set_volume(volume.value().unwrap_or(0.0));
        }
        if let Some(knob) = update.lowpass_hz {
            set_filter(self.lowpass.as_mut(), knob);
        }
        if let Some(knob) = update.distortion {
            set_filter(self.distortion.as_mut(), knob);
        }
        if let Some(knob) = update.reverb {
            set_filter(self.reverb.as_mut(), knob);
        }
    }
}

fn set_filter(filter: &mut dyn FilterHandle, knob: Knob) {
    match knob {
        Knob::Off => filter.set_enabled(false),
        Knob::Set(value) => {
            filter.set_enabled(true);
            filter.set_value(value);
        }
    }
}

/// Result of a registry refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub pruned: usize,
    pub rescanned: bool,
    pub added: usize,
}

/// Ordered set of the vehicle's sound channels
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    strips: Vec<ChannelStrip>,
    last_structure_count: usize,
    gate: LoadGate,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> &LoadGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut LoadGate {
        &mut self.gate
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    pub fn strips(&self) -> &[ChannelStrip] {
        &self.strips
    }

    pub fn strips_mut(&mut self) -> &mut [ChannelStrip] {
        &mut self.strips
    }

    pub fn ids(&self) -> Vec<ChannelId> {
        self.strips.iter().map(ChannelStrip::id).collect()
    }

    /// Drop dead channels, then rescan if the vehicle's structure changed or nothing is registered
    pub fn refresh(&mut self, source: &mut dyn ChannelSource) -> RefreshOutcome {
        let before = self.strips.len();
        self.strips.retain(ChannelStrip::is_alive);
        let mut outcome = RefreshOutcome {
            pruned: before - self.strips.len(),
            ..Default::default()
        };
        if outcome.pruned > 0 {
            debug!("Pruned {} dead channels", outcome.pruned);
        }

        if !self.gate.is_open() {
            return outcome;
        }

        let count = source.structure_count();
        if count != self.last_structure_count || self.strips.is_empty() {
            outcome.added = self.rescan(source);
            outcome.rescanned = true;
            self.last_structure_count = count;
        }
        outcome
    }

    /// Rebuild the list from the host, keeping the strips of channels seen before.
    /// Returns how many channels were new.
    fn rescan(&mut self, source: &mut dyn ChannelSource) -> usize {
        let mut known: HashMap<ChannelId, ChannelStrip> =
            self.strips.drain(..).map(|strip| (strip.id(), strip)).collect();
        let mut seen = HashSet::new();
        let mut added = 0;

        for channel in source.enumerate_channels() {
            let id = channel.id();
            if !channel.is_alive() || !seen.insert(id) {
                continue;
            }
            match known.remove(&id) {
                Some(strip) => self.strips.push(strip),
                None => {
                    self.strips.push(ChannelStrip::attach(channel));
                    added += 1;
                }
            }
        }

        let gone = known.len();
        info!(
            "Channel registry rebuilt: {} channels ({} new, {} gone)",
            self.strips.len(),
            added,
            gone
        );
        added
    }

    /// Forget every channel and close the gate, for a scene change
    pub fn clear(&mut self) {
        self.strips.clear();
        self.last_structure_count = 0;
        self.gate.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeVehicle;

    fn open_registry() -> ChannelRegistry {
        let mut registry = ChannelRegistry::new();
        registry.gate_mut().open();
        registry
    }

    #[test]
    fn test_gate_needs_two_cycles() {
        let mut gate = LoadGate::default();
        assert!(!gate.is_open());
        gate.advance();
        assert!(!gate.is_open());
        gate.advance();
        assert!(gate.is_open());
        gate.reset();
        gate.open();
        assert!(gate.is_open());
    }

    #[test]
    fn test_no_scan_before_world_loaded() {
        let mut vehicle = FakeVehicle::with_channels(3);
        let mut registry = ChannelRegistry::new();

        let outcome = registry.refresh(&mut vehicle);
        assert!(!outcome.rescanned);
        assert!(registry.is_empty());
        assert_eq!(vehicle.scans, 0);

        registry.gate_mut().advance();
        registry.gate_mut().advance();
        let outcome = registry.refresh(&mut vehicle);
        assert!(outcome.rescanned);
        assert_eq!(outcome.added, 3);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_no_rescan_while_structure_unchanged() {
        let mut vehicle = FakeVehicle::with_channels(2);
        let mut registry = open_registry();
        registry.refresh(&mut vehicle);
        registry.refresh(&mut vehicle);
        registry.refresh(&mut vehicle);
        assert_eq!(vehicle.scans, 1);
    }

    #[test]
    fn test_filters_created_once_per_channel() {
        let mut vehicle = FakeVehicle::with_channels(2);
        let mut registry = open_registry();
        registry.refresh(&mut vehicle);

        // Structural change: a new part appears
        vehicle.add(7);
        let outcome = registry.refresh(&mut vehicle);
        assert!(outcome.rescanned);
        assert_eq!(outcome.added, 1);
        assert_eq!(registry.ids(), vec![ChannelId(0), ChannelId(1), ChannelId(7)]);

        for id in [0, 1, 7] {
            assert_eq!(vehicle.log(id).attach_calls, 3, "channel {id}");
        }
    }

    #[test]
    fn test_dead_channels_pruned() {
        let mut vehicle = FakeVehicle::with_channels(3);
        let mut registry = open_registry();
        registry.refresh(&mut vehicle);

        vehicle.destroy(1);
        let outcome = registry.refresh(&mut vehicle);
        assert_eq!(outcome.pruned, 1);
        assert_eq!(registry.ids(), vec![ChannelId(0), ChannelId(2)]);
    }

    #[test]
    fn test_empty_registry_rescans_every_time() {
        let mut vehicle = FakeVehicle::default();
        let mut registry = open_registry();
        registry.refresh(&mut vehicle);
        registry.refresh(&mut vehicle);
        assert_eq!(vehicle.scans, 2);
    }

    #[test]
    fn test_apply_off_disables_filter() {
        let mut vehicle = FakeVehicle::with_channels(1);
        let mut registry = open_registry();
        registry.refresh(&mut vehicle);

        let strip = &mut registry.strips_mut()[0];
        strip.apply(&KnobUpdate {
            volume: Some(Knob::Set(0.8)),
            lowpass_hz: Some(Knob::Set(2500.0)),
            distortion: Some(Knob::Off),
            reverb: None,
        });
        assert!(strip.filter(FilterKind::LowPass).is_enabled());
        assert!(!strip.filter(FilterKind::Distortion).is_enabled());

        let log = vehicle.log(0);
        assert_eq!(log.volume, Some(0.8));
        assert_eq!(log.filter(FilterKind::LowPass).value, 2500.0);
        assert!(!log.filters.contains_key(&FilterKind::Reverb));

        registry.strips_mut()[0].apply(&KnobUpdate { volume: Some(Knob::Off), ..Default::default() });
        assert_eq!(vehicle.log(0).volume, Some(0.0));
    }
}
