use crate::driver::AnimationState;
use crate::layout::{Arrangement, LayoutKind, RenderFrame, RenderItem};
use crate::photo::PhotoItem;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895; // (1 + sqrt 5) / 2
pub const MIN_OPACITY: f64 = 0.1;
pub const MIN_SCALE: f64 = 0.6;
pub const SCALE_RANGE: f64 = 0.4;

/// Photos spread over a slowly spinning globe.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SphereLayout {
    pub radius: f64,
    pub photo_size: f64,
    /// Radians per tick.
    pub step: f64,
    /// Radians per pixel of drag.
    pub sensitivity: f64,
}

impl Default for SphereLayout {
    fn default() -> Self {
        Self {
            radius: 280.0,
            photo_size: 50.0,
            step: 0.002,
            sensitivity: 0.005,
        }
    }
}

/// Position on the unit sphere, `theta` around the vertical axis, `phi` from the pole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpherePoint {
    pub theta: f64,
    pub phi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthCue {
    pub opacity: f64,
    pub scale: f64,
    pub z_order: i32,
}

impl SphereLayout {
    /// Fibonacci sphere: consecutive points are a golden angle apart, latitudes evenly spaced.
    pub fn point(index: usize, count: usize) -> SpherePoint {
        let i = index as f64;
        SpherePoint {
            theta: 2.0 * PI * i / GOLDEN_RATIO,
            phi: (1.0 - 2.0 * (i + 0.5) / count as f64).acos(),
        }
    }

    pub fn distribute(count: usize) -> Vec<SpherePoint> {
        (0..count).map(|i| Self::point(i, count)).collect()
    }

    pub fn project(&self, point: SpherePoint, rotation: f64) -> Projected {
        let r = self.radius;
        let (sin_phi, cos_phi) = point.phi.sin_cos();
        let (sin_t, cos_t) = (point.theta + rotation).sin_cos();
        Projected {
            x: r * sin_phi * cos_t,
            y: r * cos_phi,
            z: r * sin_phi * sin_t,
        }
    }

    /// Nearer means brighter, larger and drawn later. All three are monotonic in depth.
    pub fn depth_cue(&self, depth: f64) -> DepthCue {
        let r = self.radius;
        let opacity = ((depth + r) / (2.0 * r).max(f64::EPSILON)).clamp(MIN_OPACITY, 1.0);
        DepthCue {
            opacity,
            scale: MIN_SCALE + SCALE_RANGE * opacity,
            z_order: (depth + r).round() as i32,
        }
    }
}

impl Arrangement for SphereLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Sphere
    }

    fn step(&self) -> f64 {
        self.step
    }

    fn advance(&self, state: &mut AnimationState, _count: usize) {
        state.primary += self.step;
    }

    fn compute_frame(&self, items: &[PhotoItem], state: &AnimationState) -> RenderFrame {
        let count = items.len();
        let rotation = state.primary + state.manual_offset;

        let items = items
            .iter()
            .map(|item| {
                let p = self.project(Self::point(item.index, count), rotation);
                let cue = self.depth_cue(p.z);
                RenderItem {
                    index: item.index,
                    source: item.source.clone(),
                    x: p.x,
                    y: p.y,
                    z: Some(p.z),
                    scale: cue.scale,
                    opacity: cue.opacity,
                    z_order: cue.z_order,
                }
            })
            .collect();

        RenderFrame {
            kind: LayoutKind::Sphere,
            anchor_x: 0.0,
            anchor_y: 0.0,
            items,
        }
    }

    fn drag_sensitivity(&self) -> Option<f64> {
        Some(self.sensitivity)
    }

    fn tile_size(&self) -> f64 {
        self.photo_size
    }
}
