use crate::driver::AnimationState;
use crate::layout::{Arrangement, LayoutKind, RenderFrame, RenderItem};
use crate::photo::PhotoItem;
use serde::{Deserialize, Serialize};

/// Frames below this opacity are dropped from the output.
pub const VISIBILITY_FLOOR: f64 = 0.1;
pub const MIN_SCALE: f64 = 0.6;
pub const MIN_OPACITY: f64 = 0.3;

/// Photos flowing along a horizontal track that bulges at the center.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RibbonLayout {
    pub item_size: f64,
    pub gap: f64,
    /// Track coordinate drawn at the middle of the viewport.
    pub center_x: f64,
    /// Vertical displacement at the center. Negative lifts toward the top.
    pub curve_amplitude: f64,
    /// Track units per tick.
    pub step: f64,
}

impl Default for RibbonLayout {
    fn default() -> Self {
        Self {
            item_size: 120.0,
            gap: 24.0,
            center_x: 480.0,
            curve_amplitude: -48.0,
            step: 1.5,
        }
    }
}

/// Scroll offset folded into one period, plus how many periods were folded away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wrapped {
    pub offset: f64,
    pub laps: i64,
}

impl RibbonLayout {
    pub fn spacing(&self) -> f64 {
        self.item_size + self.gap
    }

    pub fn period(&self, count: usize) -> f64 {
        count as f64 * self.spacing()
    }

    /// Resting track position of each slot, before any scrolling.
    pub fn distribute(&self, count: usize) -> Vec<f64> {
        (0..count).map(|i| i as f64 * self.spacing()).collect()
    }

    pub fn wrap_offset(&self, raw: f64, count: usize) -> Wrapped {
        let period = self.period(count);
        if period <= 0.0 {
            return Wrapped {
                offset: 0.0,
                laps: 0,
            };
        }
        Wrapped {
            offset: raw.rem_euclid(period),
            laps: (raw / period).floor() as i64,
        }
    }

    /// Track position of slot `index`, kept within `[-item_size, period + item_size]`.
    pub fn track_x(&self, index: usize, offset: f64, count: usize) -> f64 {
        let period = self.period(count);
        let offset = self.wrap_offset(offset, count).offset;
        let x = index as f64 * self.spacing() - offset;

        if x < -self.item_size {
            x + period
        } else if x > period + self.item_size {
            x - period
        } else {
            x
        }
    }

    /// Normalized distance from the center of the track, `0` at the center and `1` at the edges.
    pub fn distance_from_center(&self, x: f64) -> f64 {
        if self.center_x <= 0.0 {
            return 1.0;
        }
        ((x - self.center_x).abs() / self.center_x).clamp(0.0, 1.0)
    }

    fn item_at(&self, item: &PhotoItem, offset: f64, count: usize) -> RenderItem {
        let x = self.track_x(item.index, offset, count);
        let d = self.distance_from_center(x);
        let bulge = 1.0 - d * d;

        RenderItem {
            index: item.index,
            source: item.source.clone(),
            x,
            y: self.curve_amplitude * bulge,
            z: None,
            scale: MIN_SCALE + 0.6 * bulge,
            opacity: MIN_OPACITY + 0.7 * (1.0 - d),
            z_order: (100.0 * (1.0 - d)).round() as i32,
        }
    }
}

impl Arrangement for RibbonLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Ribbon
    }

    fn step(&self) -> f64 {
        self.step
    }

    fn advance(&self, state: &mut AnimationState, count: usize) {
        let wrapped = self.wrap_offset(state.primary + self.step, count);
        if wrapped.laps != 0 {
            log::trace!("Ribbon wrapped after offset {:.1}", state.primary);
        }
        state.primary = wrapped.offset;
    }

    fn compute_frame(&self, items: &[PhotoItem], state: &AnimationState) -> RenderFrame {
        let count = items.len();

        let items = items
            .iter()
            .map(|item| self.item_at(item, state.primary, count))
            .filter(|item| item.opacity >= VISIBILITY_FLOOR)
            .collect();

        RenderFrame {
            kind: LayoutKind::Ribbon,
            anchor_x: self.center_x,
            anchor_y: 0.0,
            items,
        }
    }

    fn tile_size(&self) -> f64 {
        self.item_size
    }
}
