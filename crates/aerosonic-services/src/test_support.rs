//! In-memory host fakes shared by the unit tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use aerosonic_core::{TelemetryProvider, ViewMode};

use crate::host::{ChannelId, ChannelSource, FilterHandle, FilterKind, SoundChannel};

/// What the fake host audio object currently looks like
#[derive(Debug, Default, Clone)]
pub struct ChannelLog {
    pub alive: bool,
    pub volume: Option<f32>,
    pub volume_writes: usize,
    pub filters: HashMap<FilterKind, FilterLog>,
    pub attach_calls: usize,
}

impl ChannelLog {
    pub fn filter(&self, kind: FilterKind) -> FilterLog {
        self.filters.get(&kind).copied().unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FilterLog {
    pub enabled: bool,
    pub value: f32,
}

pub type Shared = Rc<RefCell<ChannelLog>>;

#[derive(Debug)]
pub struct FakeChannel {
    pub id: ChannelId,
    pub log: Shared,
}

#[derive(Debug)]
pub struct FakeFilter {
    kind: FilterKind,
    log: Shared,
}

impl FilterHandle for FakeFilter {
    fn set_enabled(&mut self, enabled: bool) {
        self.log.borrow_mut().filters.entry(self.kind).or_default().enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.log.borrow().filters.get(&self.kind).is_some_and(|f| f.enabled)
    }

    fn set_value(&mut self, value: f32) {
        self.log.borrow_mut().filters.entry(self.kind).or_default().value = value;
    }
}

impl SoundChannel for FakeChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.log.borrow().alive
    }

    fn set_volume(&mut self, volume: f32) {
        let mut log = self.log.borrow_mut();
        log.volume = Some(volume);
        log.volume_writes += 1;
    }

    fn attach_filter(&mut self, kind: FilterKind) -> Box<dyn FilterHandle> {
        self.log.borrow_mut().attach_calls += 1;
        Box::new(FakeFilter { kind, log: self.log.clone() })
    }
}

/// Host vehicle with a mutable list of channels
#[derive(Debug, Default)]
pub struct FakeVehicle {
    pub parts: usize,
    pub channels: Vec<(ChannelId, Shared)>,
    pub scans: usize,
}

impl FakeVehicle {
    pub fn with_channels(n: u64) -> Self {
        let mut vehicle = Self::default();
        for i in 0..n {
            vehicle.add(i);
        }
        vehicle
    }

    pub fn add(&mut self, id: u64) -> Shared {
        let log = Rc::new(RefCell::new(ChannelLog { alive: true, ..Default::default() }));
        self.channels.push((ChannelId(id), log.clone()));
        self.parts += 1;
        log
    }

    pub fn destroy(&mut self, id: u64) {
        if let Some(pos) = self.channels.iter().position(|(cid, _)| *cid == ChannelId(id)) {
            let (_, log) = self.channels.remove(pos);
            log.borrow_mut().alive = false;
            self.parts -= 1;
        }
    }

    pub fn log(&self, id: u64) -> ChannelLog {
        self.channels
            .iter()
            .find(|(cid, _)| *cid == ChannelId(id))
            .map(|(_, log)| log.borrow().clone())
            .unwrap_or_default()
    }
}

impl ChannelSource for FakeVehicle {
    fn structure_count(&self) -> usize {
        self.parts
    }

    fn enumerate_channels(&mut self) -> Vec<Box<dyn SoundChannel>> {
        self.scans += 1;
        self.channels
            .iter()
            .map(|(id, log)| Box::new(FakeChannel { id: *id, log: log.clone() }) as Box<dyn SoundChannel>)
            .collect()
    }
}

/// Fixed telemetry for one frame
#[derive(Debug, Clone, Copy)]
pub struct FakeTelemetry {
    pub density: f32,
    pub mach: f32,
    pub angle: f32,
    pub speed: f32,
    pub view: ViewMode,
}

impl FakeTelemetry {
    pub fn new(density: f32, mach: f32, angle: f32) -> Self {
        Self { density, mach, angle, speed: mach * 340.0, view: ViewMode::External }
    }

    pub fn interior() -> Self {
        Self { view: ViewMode::Iva, ..Self::new(1.2, 0.3, 0.0) }
    }
}

impl TelemetryProvider for FakeTelemetry {
    fn density(&self) -> f32 { self.density }
    fn surface_speed(&self) -> f32 { self.speed }
    fn camera_angle_deg(&self) -> f32 { self.angle }
    fn view_mode(&self) -> ViewMode { self.view }
    fn mach_number(&self) -> f32 { self.mach }
}
