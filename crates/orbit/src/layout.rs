use crate::driver::AnimationState;
use crate::photo::{PhotoItem, SourceRef};
use crate::ribbon::RibbonLayout;
use crate::sphere::SphereLayout;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    #[strum(to_string = "sphere", serialize = "globe")]
    Sphere,
    #[strum(to_string = "ribbon", serialize = "carousel")]
    Ribbon,
}

/// Where and how to paint one photo for the current tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub index: usize,
    pub source: SourceRef,
    pub x: f64,
    pub y: f64,
    /// Depth along the viewing axis, only meaningful for the sphere.
    pub z: Option<f64>,
    pub scale: f64,
    pub opacity: f64,
    pub z_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub kind: LayoutKind,
    /// Layout-space point that maps onto the center of the viewport.
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub items: Vec<RenderItem>,
}

impl RenderFrame {
    pub fn empty(kind: LayoutKind) -> Self {
        Self {
            kind,
            anchor_x: 0.0,
            anchor_y: 0.0,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items back to front. Ties keep index order.
    pub fn painter_order(&self) -> Vec<&RenderItem> {
        let mut ordered: Vec<&RenderItem> = self.items.iter().collect();
        ordered.sort_by_key(|item| item.z_order);
        ordered
    }
}

/// A strategy that turns `(index, primary parameter)` into screen placement.
pub trait Arrangement {
    fn kind(&self) -> LayoutKind;

    /// Per-tick advance of the primary parameter.
    fn step(&self) -> f64;

    fn advance(&self, state: &mut AnimationState, count: usize);

    fn compute_frame(&self, items: &[PhotoItem], state: &AnimationState) -> RenderFrame;

    /// Radians per pixel of horizontal drag, `None` when dragging is not supported.
    fn drag_sensitivity(&self) -> Option<f64> {
        None
    }

    /// Size of an unscaled tile in pixels.
    fn tile_size(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Sphere(SphereLayout),
    Ribbon(RibbonLayout),
}

impl Default for Layout {
    fn default() -> Self {
        Self::Sphere(SphereLayout::default())
    }
}

impl Layout {
    pub fn from_kind(kind: LayoutKind, sphere: &SphereLayout, ribbon: &RibbonLayout) -> Self {
        match kind {
            LayoutKind::Sphere => Self::Sphere(sphere.clone()),
            LayoutKind::Ribbon => Self::Ribbon(ribbon.clone()),
        }
    }

    fn inner(&self) -> &dyn Arrangement {
        match self {
            Self::Sphere(s) => s,
            Self::Ribbon(r) => r,
        }
    }
}

impl Arrangement for Layout {
    fn kind(&self) -> LayoutKind {
        self.inner().kind()
    }

    fn step(&self) -> f64 {
        self.inner().step()
    }

    fn advance(&self, state: &mut AnimationState, count: usize) {
        self.inner().advance(state, count)
    }

    fn compute_frame(&self, items: &[PhotoItem], state: &AnimationState) -> RenderFrame {
        self.inner().compute_frame(items, state)
    }

    fn drag_sensitivity(&self) -> Option<f64> {
        self.inner().drag_sensitivity()
    }

    fn tile_size(&self) -> f64 {
        self.inner().tile_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_kind_parsing() {
        let cases = vec![
            ("sphere", LayoutKind::Sphere),
            ("Sphere", LayoutKind::Sphere),
            ("GLOBE", LayoutKind::Sphere),
            ("ribbon", LayoutKind::Ribbon),
            ("Carousel", LayoutKind::Ribbon),
        ];

        for (input, expected) in cases {
            assert_eq!(input.parse::<LayoutKind>().unwrap(), expected);
        }
        assert!("cube".parse::<LayoutKind>().is_err());
    }

    #[test]
    fn test_layout_kind_deserialization() {
        let kind: LayoutKind = serde_json::from_str("\"globe\"").unwrap();
        assert_eq!(kind, LayoutKind::Sphere);
        assert_eq!(serde_json::to_string(&LayoutKind::Ribbon).unwrap(), "\"ribbon\"");
    }

    #[test]
    fn test_painter_order_is_back_to_front() {
        let item = |index, z_order| RenderItem {
            index,
            source: SourceRef::from("x"),
            x: 0.0,
            y: 0.0,
            z: None,
            scale: 1.0,
            opacity: 1.0,
            z_order,
        };
        let frame = RenderFrame {
            kind: LayoutKind::Ribbon,
            anchor_x: 0.0,
            anchor_y: 0.0,
            items: vec![item(0, 40), item(1, 10), item(2, 40), item(3, 0)],
        };

        let order: Vec<usize> = frame.painter_order().iter().map(|i| i.index).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_layout_dispatch() {
        let layout = Layout::from_kind(
            LayoutKind::Ribbon,
            &SphereLayout::default(),
            &RibbonLayout::default(),
        );
        assert_eq!(layout.kind(), LayoutKind::Ribbon);
        assert!(layout.drag_sensitivity().is_none());
        assert!(Layout::default().drag_sensitivity().is_some());
    }
}
