//! Per-frame flight telemetry snapshot and the host interface that produces it

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Ratio of specific heats for dry air
const AIR_GAMMA: f32 = 1.4;
/// Specific gas constant for dry air, J/(kg K)
const AIR_GAS_CONSTANT: f32 = 287.0;
const CELSIUS_TO_KELVIN: f32 = 273.15;

/// Active camera mode reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Internal,
    Iva,
    Map,
    #[default]
    External,
    Flight,
}

impl ViewMode {
    /// Views where the listener sits inside the vehicle
    pub fn is_interior(&self) -> bool {
        matches!(self, Self::Internal | Self::Iva | Self::Map)
    }
}

/// Physical state around the vehicle for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalState {
    /// Atmospheric density, kg/m^3
    pub density: f32,
    pub mach_number: f32,
    /// Angle between the velocity vector and the vehicle-from-camera vector
    pub camera_angle_deg: f32,
    /// Surface speed, m/s
    pub surface_speed: f32,
}

impl PhysicalState {
    /// Build a state with every field forced into its valid range.
    ///
    /// NaN density or speed reads as 0; the camera angle is clamped to [0, 180].
    pub fn new(density: f32, mach_number: f32, camera_angle_deg: f32, surface_speed: f32) -> Self {
        let non_negative = |v: f32| if v.is_nan() { 0.0 } else { v.max(0.0) };
        let angle = if camera_angle_deg.is_nan() { 0.0 } else { camera_angle_deg.clamp(0.0, 180.0) };
        Self {
            density: non_negative(density),
            mach_number: non_negative(mach_number),
            camera_angle_deg: angle,
            surface_speed: non_negative(surface_speed),
        }
    }
}

/// Everything the classifier reads, copied out of the host once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTelemetry {
    pub view_mode: ViewMode,
    pub state: PhysicalState,
    /// Host master volume for vehicle sounds
    pub ship_volume: f32,
}

impl Default for FrameTelemetry {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::External,
            state: PhysicalState::default(),
            ship_volume: 1.0,
        }
    }
}

impl FrameTelemetry {
    pub fn new(view_mode: ViewMode, state: PhysicalState) -> Self {
        Self {
            view_mode,
            state,
            ..Default::default()
        }
    }

    pub fn with_ship_volume(mut self, ship_volume: f32) -> Self {
        self.ship_volume = if ship_volume.is_nan() { 0.0 } else { ship_volume.clamp(0.0, 1.0) };
        self
    }

    /// Snapshot the host's current values
    pub fn capture(provider: &dyn TelemetryProvider) -> Self {
        let state = PhysicalState::new(
            provider.density(),
            provider.mach_number(),
            provider.camera_angle_deg(),
            provider.surface_speed(),
        );
        Self::new(provider.view_mode(), state).with_ship_volume(provider.ship_volume())
    }
}

/// Read-only view of the host simulation.
///
/// Only queried at the top of a frame; nothing holds on to the provider.
pub trait TelemetryProvider {
    /// Atmospheric density around the vehicle, kg/m^3
    fn density(&self) -> f32;
    /// Vehicle speed relative to the surface, m/s
    fn surface_speed(&self) -> f32;
    fn camera_angle_deg(&self) -> f32;
    fn view_mode(&self) -> ViewMode;

    /// Outside air temperature, Celsius
    fn external_temperature_c(&self) -> f32 {
        15.0
    }

    /// Override when the host has its own aerodynamics model
    fn mach_number(&self) -> f32 {
        mach_from_temperature(self.surface_speed(), self.external_temperature_c())
    }

    fn ship_volume(&self) -> f32 {
        1.0
    }
}

/// Ideal-gas speed of sound for dry air, m/s
pub fn speed_of_sound(temperature_c: f32) -> f32 {
    let kelvin = (temperature_c + CELSIUS_TO_KELVIN).max(0.0);
    (AIR_GAMMA * kelvin * AIR_GAS_CONSTANT).sqrt()
}

pub fn mach_from_temperature(surface_speed: f32, temperature_c: f32) -> f32 {
    let sos = speed_of_sound(temperature_c);
    if sos <= 0.0 {
        return 0.0;
    }
    surface_speed.abs() / sos
}

/// Angle in degrees between the surface velocity and the vector from the camera to the vessel.
///
/// Returns 0 when either vector has no length.
pub fn camera_angle_deg(surface_velocity: Vec3, vessel_position: Vec3, camera_position: Vec3) -> f32 {
    let heading = surface_velocity.normalize_or_zero();
    let line_of_sight = (vessel_position - camera_position).normalize_or_zero();
    if heading == Vec3::ZERO || line_of_sight == Vec3::ZERO {
        return 0.0;
    }
    heading.dot(line_of_sight).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_speed_of_sound() {
        // 340.3 m/s at 15 C
        assert!(approx(speed_of_sound(15.0), 340.3, 0.5));
        assert!(approx(speed_of_sound(0.0), 331.3, 0.5));
    }

    #[test]
    fn test_mach_from_temperature() {
        let sos = speed_of_sound(15.0);
        assert!(approx(mach_from_temperature(sos * 2.0, 15.0), 2.0, 1e-4));
        assert_eq!(mach_from_temperature(0.0, 15.0), 0.0);
    }

    #[test]
    fn test_camera_angle() {
        let vessel = Vec3::ZERO;
        // Camera behind the vessel looking along the velocity
        let behind = camera_angle_deg(Vec3::X * 300.0, vessel, Vec3::new(-10.0, 0.0, 0.0));
        assert!(approx(behind, 0.0, 1e-3));
        // Camera ahead looking back
        let ahead = camera_angle_deg(Vec3::X * 300.0, vessel, Vec3::new(10.0, 0.0, 0.0));
        assert!(approx(ahead, 180.0, 1e-3));
        let side = camera_angle_deg(Vec3::X, vessel, Vec3::new(0.0, 10.0, 0.0));
        assert!(approx(side, 90.0, 1e-3));
        assert_eq!(camera_angle_deg(Vec3::ZERO, vessel, Vec3::Y), 0.0);
    }

    #[test]
    fn test_physical_state_clamps() {
        let state = PhysicalState::new(-1.0, f32::NAN, 200.0, -5.0);
        assert_eq!(state.density, 0.0);
        assert_eq!(state.mach_number, 0.0);
        assert_eq!(state.camera_angle_deg, 180.0);
        assert_eq!(state.surface_speed, 0.0);
    }

    #[test]
    fn test_interior_views() {
        assert!(ViewMode::Internal.is_interior());
        assert!(ViewMode::Iva.is_interior());
        assert!(ViewMode::Map.is_interior());
        assert!(!ViewMode::External.is_interior());
        assert!(!ViewMode::Flight.is_interior());
    }

    struct Parked;

    impl TelemetryProvider for Parked {
        fn density(&self) -> f32 { 1.225 }
        fn surface_speed(&self) -> f32 { 0.0 }
        fn camera_angle_deg(&self) -> f32 { 45.0 }
        fn view_mode(&self) -> ViewMode { ViewMode::Flight }
    }

    #[test]
    fn test_capture_uses_fallback_mach() {
        let frame = FrameTelemetry::capture(&Parked);
        assert_eq!(frame.state.mach_number, 0.0);
        assert_eq!(frame.ship_volume, 1.0);
        assert_eq!(frame.view_mode, ViewMode::Flight);
    }
}
