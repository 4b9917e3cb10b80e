//! Discrete acoustic regimes and transitions between them

use std::fmt;

use serde::{Deserialize, Serialize};

/// Acoustic classification of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Regime {
    #[default]
    Unknown,
    /// Camera inside the vehicle (IVA, internal or map view)
    Interior,
    /// No atmosphere around the vehicle
    Vacuum,
    /// Subsonic flight in a dense atmosphere
    NormalFlight,
    /// Undisturbed air ahead of the shock cone
    BeforeShockwave,
    /// Rising edge of the shock cone
    PositiveSlope,
    /// Falling edge of the shock cone
    NegativeSlope,
    /// Inside the shock cone
    AfterShockwave,
    /// Host simulation is paused
    Paused,
}

impl Regime {
    pub const ALL: [Regime; 9] = [
        Regime::Unknown,
        Regime::Interior,
        Regime::Vacuum,
        Regime::NormalFlight,
        Regime::BeforeShockwave,
        Regime::PositiveSlope,
        Regime::NegativeSlope,
        Regime::AfterShockwave,
        Regime::Paused,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Interior => "Interior",
            Self::Vacuum => "Vacuum",
            Self::NormalFlight => "Normal Atmospheric Flight",
            Self::BeforeShockwave => "Before Shock",
            Self::PositiveSlope => "Rising Edge",
            Self::NegativeSlope => "Falling Edge",
            Self::AfterShockwave => "After Shock",
            Self::Paused => "Paused",
        }
    }

    /// One of the four angular bands around the shock cone
    pub fn is_shock_band(&self) -> bool {
        matches!(
            self,
            Self::BeforeShockwave | Self::PositiveSlope | Self::NegativeSlope | Self::AfterShockwave
        )
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A change of regime between two consecutive frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTransition {
    pub from: Regime,
    pub to: Regime,
}

impl RegimeTransition {
    /// `None` when the regime did not change
    pub fn between(last: Regime, current: Regime) -> Option<Self> {
        (last != current).then_some(Self { from: last, to: current })
    }
}
