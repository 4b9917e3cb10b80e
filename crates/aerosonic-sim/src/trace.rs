//! Recorded flight traces: the telemetry a host would feed the controller, one frame at a time

use std::path::Path;

use aerosonic_core::{camera_angle_deg, TelemetryProvider, ViewMode};
use aerosonic_services::SoundProfile;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightTrace {
    /// Sound channels on the vehicle at the start of the trace
    #[serde(default = "default_channels")]
    pub channels: Vec<SoundProfile>,
    pub frames: Vec<TraceFrame>,
}

fn default_channels() -> Vec<SoundProfile> {
    vec![SoundProfile::Engine { frequency_hz: 90.0 }, SoundProfile::Airflow]
}

impl FlightTrace {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }
}

impl std::str::FromStr for FlightTrace {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let trace: FlightTrace = serde_json::from_str(s)?;
        if trace.frames.is_empty() {
            return Err(SimError::EmptyTrace);
        }
        Ok(trace)
    }
}

/// Positions used to derive the camera angle instead of giving it directly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraGeometry {
    pub surface_velocity: [f32; 3],
    pub vessel_position: [f32; 3],
    pub camera_position: [f32; 3],
}

/// Something that happens to the host before a frame is processed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEvent {
    Pause,
    Unpause,
    WorldLoaded,
    SceneChange,
    AddChannel(SoundProfile),
    /// Index into the vehicle's current channel list
    RemoveChannel(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub density: f32,
    #[serde(default)]
    pub surface_speed: f32,
    /// Overrides the Mach number derived from speed and temperature
    #[serde(default)]
    pub mach: Option<f32>,
    #[serde(default = "default_temperature")]
    pub external_temperature_c: f32,
    #[serde(default)]
    pub camera_angle_deg: f32,
    #[serde(default)]
    pub camera: Option<CameraGeometry>,
    #[serde(default)]
    pub view: ViewMode,
    #[serde(default = "default_ship_volume")]
    pub ship_volume: f32,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

fn default_temperature() -> f32 {
    15.0
}

fn default_ship_volume() -> f32 {
    1.0
}

impl TelemetryProvider for TraceFrame {
    fn density(&self) -> f32 {
        self.density
    }

    fn surface_speed(&self) -> f32 {
        self.surface_speed
    }

    fn camera_angle_deg(&self) -> f32 {
        match self.camera {
            Some(geometry) => camera_angle_deg(
                Vec3::from_array(geometry.surface_velocity),
                Vec3::from_array(geometry.vessel_position),
                Vec3::from_array(geometry.camera_position),
            ),
            None => self.camera_angle_deg,
        }
    }

    fn view_mode(&self) -> ViewMode {
        self.view
    }

    fn external_temperature_c(&self) -> f32 {
        self.external_temperature_c
    }

    fn mach_number(&self) -> f32 {
        match self.mach {
            Some(mach) => mach,
            None => aerosonic_core::mach_from_temperature(self.surface_speed, self.external_temperature_c),
        }
    }

    fn ship_volume(&self) -> f32 {
        self.ship_volume
    }
}
