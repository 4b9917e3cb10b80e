//! Effect mixer: writes the frame's knob values to every channel

use std::fmt;

use aerosonic_core::{EffectKnobSet, KnobUpdate, Regime, RegimeTransition};
use crossbeam_channel::Sender;
use tracing::info;

use crate::registry::ChannelRegistry;

type Observer = Box<dyn FnMut(RegimeTransition)>;

/// Applies knob sets to the registry and announces regime changes.
///
/// Knobs are written on every frame, changed or not, so a filter toggled by
/// someone else is put back on the next frame. Announcements happen once per
/// change of regime.
#[derive(Default)]
pub struct EffectMixer {
    observers: Vec<Observer>,
    transitions: u64,
}

impl fmt::Debug for EffectMixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectMixer")
            .field("observers", &self.observers.len())
            .field("transitions", &self.transitions)
            .finish()
    }
}

impl EffectMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` on every regime change
    pub fn on_regime_changed(&mut self, callback: impl FnMut(RegimeTransition) + 'static) {
        self.observers.push(Box::new(callback));
    }

    /// Send every regime change down a channel. A disconnected receiver is ignored.
    pub fn forward_to(&mut self, sender: Sender<RegimeTransition>) {
        self.on_regime_changed(move |transition| {
            let _ = sender.send(transition);
        });
    }

    /// Number of regime changes announced so far
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Apply `knobs` to every live channel. Returns the transition if `current` differs from `last`.
    pub fn apply(
        &mut self,
        last: Regime,
        current: Regime,
        knobs: &EffectKnobSet,
        registry: &mut ChannelRegistry,
    ) -> Option<RegimeTransition> {
        let transition = RegimeTransition::between(last, current);
        if let Some(transition) = transition {
            self.announce(transition);
        }

        let update = KnobUpdate::from(*knobs);
        for strip in registry.strips_mut() {
            // Dead channels are left for the registry to prune
            if !strip.is_alive() {
                continue;
            }
            strip.apply(&update);
        }
        transition
    }

    fn announce(&mut self, transition: RegimeTransition) {
        self.transitions += 1;
        info!("Switching to {} (from {})", transition.to, transition.from);
        for observer in &mut self.observers {
            observer(transition);
        }
    }
}
