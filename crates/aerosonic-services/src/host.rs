//! Interfaces the host's audio side implements

use std::fmt::{self, Debug};

/// Stable identity of a sound-emitting object on the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Filters attached to every channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    LowPass,
    Distortion,
    Reverb,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::LowPass, FilterKind::Distortion, FilterKind::Reverb];
}

/// Host filter attached to one channel.
///
/// A disabled filter must not touch the signal at all.
pub trait FilterHandle: Debug {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    /// Cutoff in Hz for the low-pass, [0, 1] level for distortion and reverb
    fn set_value(&mut self, value: f32);
}

/// A sound-emitting object on the vehicle
pub trait SoundChannel: Debug {
    fn id(&self) -> ChannelId;
    /// False once the underlying audio object is gone
    fn is_alive(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    /// Attach a filter of the given kind. Called once per kind per channel.
    fn attach_filter(&mut self, kind: FilterKind) -> Box<dyn FilterHandle>;
}

/// The host's list of sound-emitting objects
pub trait ChannelSource {
    /// Cheap structural-change signal, such as the vehicle's part count
    fn structure_count(&self) -> usize;
    fn enumerate_channels(&mut self) -> Vec<Box<dyn SoundChannel>>;
}
