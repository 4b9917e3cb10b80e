//! Shock cone geometry as seen from the camera
//!
//! Angles are measured between the vehicle velocity and the line from the
//! camera to the vehicle. The cone has a rising edge (outside the Mach
//! angle) and a falling edge (inside it). The rising edge shrinks to nothing
//! once the shock is fully formed at Mach 1.

use serde::{Deserialize, Serialize};

use crate::regime::Regime;

/// Base width of the falling edge, degrees
const SLOPE_BASE_WIDTH_DEG: f32 = 5.0;
/// Extra falling-edge width at Mach 1, degrees
const SLOPE_MACH_WIDTH_DEG: f32 = 15.0;

/// Half-angle of the Mach cone in degrees; 90 below Mach 1
pub fn mach_angle_deg(mach_number: f32) -> f32 {
    if mach_number < 1.0 {
        return 90.0;
    }
    (1.0 / mach_number).asin().to_degrees()
}

/// How fully formed the shock is, in [0, 1]. Ramps linearly through the transonic range.
pub fn shock_strength(mach_number: f32, lower_mach_threshold: f32) -> f32 {
    if mach_number >= 1.0 {
        return 1.0;
    }
    let span = 1.0 - lower_mach_threshold;
    if span <= 0.0 {
        return 0.0;
    }
    ((mach_number - lower_mach_threshold) / span).clamp(0.0, 1.0)
}

/// Cone edges for one Mach number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShockGeometry {
    pub mach_angle_deg: f32,
    pub shock_strength: f32,
    pub negative_slope_width_deg: f32,
    pub positive_slope_width_deg: f32,
    pub negative_edge_deg: f32,
    pub positive_edge_deg: f32,
}

/// Where the camera sits relative to the cone, with the position inside its band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShockBand {
    Before,
    /// `progress` runs 0 at the outer edge to 1 at the Mach angle
    PositiveSlope { progress: f32 },
    /// `progress` runs 0 at the inner edge to 1 at the Mach angle
    NegativeSlope { progress: f32 },
    After,
}

impl ShockBand {
    pub fn regime(&self) -> Regime {
        match self {
            Self::Before => Regime::BeforeShockwave,
            Self::PositiveSlope { .. } => Regime::PositiveSlope,
            Self::NegativeSlope { .. } => Regime::NegativeSlope,
            Self::After => Regime::AfterShockwave,
        }
    }
}

impl ShockGeometry {
    pub fn new(mach_number: f32, lower_mach_threshold: f32) -> Self {
        let mach_angle = mach_angle_deg(mach_number);
        let strength = shock_strength(mach_number, lower_mach_threshold);
        let negative_width = SLOPE_BASE_WIDTH_DEG + SLOPE_MACH_WIDTH_DEG / mach_number.max(f32::EPSILON);
        let positive_width = negative_width * (1.0 - strength);

        Self {
            mach_angle_deg: mach_angle,
            shock_strength: strength,
            negative_slope_width_deg: negative_width,
            positive_slope_width_deg: positive_width,
            negative_edge_deg: mach_angle - negative_width,
            positive_edge_deg: (mach_angle + positive_width).max(0.0),
        }
    }

    /// Every angle lands in exactly one band. Edge values belong to the slopes.
    pub fn band(&self, camera_angle_deg: f32) -> ShockBand {
        if camera_angle_deg > self.positive_edge_deg {
            return ShockBand::Before;
        }
        if camera_angle_deg < self.negative_edge_deg {
            return ShockBand::After;
        }
        if camera_angle_deg > self.mach_angle_deg {
            // Width is non-zero here: an empty rising edge leaves no angle above the Mach angle
            let progress = (self.positive_edge_deg - camera_angle_deg) / self.positive_slope_width_deg;
            ShockBand::PositiveSlope { progress: progress.clamp(0.0, 1.0) }
        } else {
            let progress = (camera_angle_deg - self.negative_edge_deg) / self.negative_slope_width_deg;
            ShockBand::NegativeSlope { progress: progress.clamp(0.0, 1.0) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_mach_angle() {
        assert_eq!(mach_angle_deg(0.9), 90.0);
        assert!(approx(mach_angle_deg(1.0), 90.0, 1e-3));
        assert!(approx(mach_angle_deg(2.0), 30.0, 1e-3));
        assert!(approx(mach_angle_deg(1.41421), 45.0, 1e-2));

        let mut last = mach_angle_deg(1.0);
        for i in 1..100 {
            let angle = mach_angle_deg(1.0 + i as f32 * 0.1);
            assert!(angle < last);
            last = angle;
        }
    }

    #[test]
    fn test_shock_strength() {
        assert_eq!(shock_strength(0.80, 0.80), 0.0);
        assert_eq!(shock_strength(1.0, 0.80), 1.0);
        assert_eq!(shock_strength(3.0, 0.80), 1.0);
        assert!(approx(shock_strength(0.9, 0.80), 0.5, 1e-5));

        let mut last = 0.0;
        for i in 1..20 {
            let s = shock_strength(0.80 + i as f32 * 0.01, 0.80);
            assert!(s > last);
            last = s;
        }
    }

    #[test]
    fn test_geometry_at_mach_two() {
        let g = ShockGeometry::new(2.0, 0.80);
        assert!(approx(g.mach_angle_deg, 30.0, 1e-3));
        assert!(approx(g.negative_slope_width_deg, 12.5, 1e-5));
        assert_eq!(g.positive_slope_width_deg, 0.0);
        assert!(approx(g.negative_edge_deg, 17.5, 1e-3));
        assert!(approx(g.positive_edge_deg, 30.0, 1e-3));
    }

    #[test]
    fn test_positive_edge_never_negative() {
        // At high Mach the inner edge goes below zero; the outer edge stays put
        let g = ShockGeometry::new(25.0, 0.80);
        assert!(g.negative_edge_deg < 0.0);
        assert!(g.positive_edge_deg >= 0.0);
        assert_eq!(g.band(0.0).regime(), Regime::NegativeSlope);
    }

    #[test]
    fn test_edges_are_ordered() {
        for mach in [0.80_f32, 0.85, 0.95, 0.999, 1.0, 1.2, 2.0, 5.0, 30.0] {
            let g = ShockGeometry::new(mach, 0.80);
            assert!(g.negative_edge_deg <= g.mach_angle_deg, "mach {mach}");
            assert!(g.mach_angle_deg <= g.positive_edge_deg, "mach {mach}");
        }
    }

    #[test]
    fn test_bands_never_step_back_as_angle_grows() {
        let rank = |regime: Regime| match regime {
            Regime::AfterShockwave => 0,
            Regime::NegativeSlope => 1,
            Regime::PositiveSlope => 2,
            Regime::BeforeShockwave => 3,
            other => panic!("unexpected regime {other}"),
        };
        for mach in [0.85_f32, 1.0, 2.0, 30.0] {
            let g = ShockGeometry::new(mach, 0.80);
            let mut last = 0;
            for tenth in 0..=1800 {
                let current = rank(g.band(tenth as f32 / 10.0).regime());
                assert!(current >= last, "mach {mach} angle {}", tenth as f32 / 10.0);
                last = current;
            }
            assert_eq!(last, 3, "mach {mach}");
        }
    }

    #[test]
    fn test_transonic_bands() {
        // Mach 0.85: cone at 90, falling edge near 67.4, rising edge near 107.0
        let g = ShockGeometry::new(0.85, 0.80);
        assert_eq!(g.band(120.0).regime(), Regime::BeforeShockwave);
        assert_eq!(g.band(107.5).regime(), Regime::BeforeShockwave);
        assert_eq!(g.band(106.5).regime(), Regime::PositiveSlope);
        assert_eq!(g.band(100.0).regime(), Regime::PositiveSlope);
        assert_eq!(g.band(80.0).regime(), Regime::NegativeSlope);
        assert_eq!(g.band(68.0).regime(), Regime::NegativeSlope);
        assert_eq!(g.band(67.0).regime(), Regime::AfterShockwave);
        assert_eq!(g.band(30.0).regime(), Regime::AfterShockwave);
    }

    #[test]
    fn test_supersonic_bands() {
        // Mach 3: cone near 19.5 with no rising edge, falling edge near 9.5
        let g = ShockGeometry::new(3.0, 0.80);
        assert_eq!(g.band(90.0).regime(), Regime::BeforeShockwave);
        assert_eq!(g.band(20.0).regime(), Regime::BeforeShockwave);
        assert_eq!(g.band(19.0).regime(), Regime::NegativeSlope);
        assert_eq!(g.band(15.0).regime(), Regime::NegativeSlope);
        assert_eq!(g.band(10.0).regime(), Regime::NegativeSlope);
        assert_eq!(g.band(5.0).regime(), Regime::AfterShockwave);
    }

    #[test]
    fn test_edges_belong_to_slopes() {
        let g = ShockGeometry::new(0.9, 0.80);
        assert_eq!(g.band(g.positive_edge_deg).regime(), Regime::PositiveSlope);
        assert_eq!(g.band(g.negative_edge_deg).regime(), Regime::NegativeSlope);
        assert_eq!(g.band(g.mach_angle_deg).regime(), Regime::NegativeSlope);
    }

    #[test]
    fn test_slope_progress() {
        let g = ShockGeometry::new(0.9, 0.80);
        match g.band(g.positive_edge_deg) {
            ShockBand::PositiveSlope { progress } => assert!(approx(progress, 0.0, 1e-5)),
            other => panic!("unexpected band {other:?}"),
        }
        match g.band(g.negative_edge_deg) {
            ShockBand::NegativeSlope { progress } => assert!(approx(progress, 0.0, 1e-5)),
            other => panic!("unexpected band {other:?}"),
        }
        match g.band(g.mach_angle_deg) {
            ShockBand::NegativeSlope { progress } => assert!(approx(progress, 1.0, 1e-5)),
            other => panic!("unexpected band {other:?}"),
        }
    }
}
