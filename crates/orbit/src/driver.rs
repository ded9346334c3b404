use crate::layout::{Arrangement, Layout, LayoutKind, RenderFrame};
use crate::photo::{PhotoCount, PhotoItem, SourceRef, distribute};
use strum::Display as StrumDisplay;

/// Scalars every frame is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    /// Rotation in radians (sphere) or scroll offset (ribbon).
    pub primary: f64,
    /// User drag contribution, added to `primary` by the sphere only.
    pub manual_offset: f64,
    pub dragging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum DriverState {
    Inactive,
    Coasting,
    Dragging,
}

/// Permission to run ticks for one activation. Deactivating invalidates every
/// ticket handed out before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Activation {
    /// The driver just became active. The host should schedule ticks with
    /// this ticket and announce readiness.
    Started(FrameTicket),
    /// Already active, the existing schedule keeps running.
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct AnimationDriver {
    layout: Layout,
    count: PhotoCount,
    photos: Vec<SourceRef>,
    items: Vec<PhotoItem>,
    state: AnimationState,
    phase: DriverState,
    generation: u64,
    last_pointer_x: Option<f64>,
}

impl AnimationDriver {
    pub fn new(layout: Layout, count: PhotoCount) -> Self {
        Self {
            layout,
            count,
            photos: Vec::new(),
            items: Vec::new(),
            state: AnimationState::default(),
            phase: DriverState::Inactive,
            generation: 0,
            last_pointer_x: None,
        }
    }

    pub fn phase(&self) -> DriverState {
        self.phase
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn kind(&self) -> LayoutKind {
        self.layout.kind()
    }

    pub fn is_active(&self) -> bool {
        self.phase != DriverState::Inactive
    }

    /// Starts or stops the animation. A different photo list re-derives the
    /// arrangement from scratch.
    pub fn activate(&mut self, photos: &[SourceRef], active: bool) -> Activation {
        if self.photos != photos {
            self.photos = photos.to_vec();
            self.rebuild();
        }

        if !active {
            self.stop();
            return Activation::Stopped;
        }

        if self.is_active() {
            return Activation::Running;
        }

        self.generation += 1;
        self.phase = DriverState::Coasting;
        log::debug!(
            "{} layout active with {} photos (generation {})",
            self.layout.kind(),
            self.items.len(),
            self.generation
        );
        Activation::Started(FrameTicket {
            generation: self.generation,
        })
    }

    /// Stops without touching the photo list.
    pub fn stop(&mut self) {
        if self.is_active() {
            log::debug!("{} layout inactive", self.layout.kind());
        }
        // invalidates outstanding tickets
        self.generation += 1;
        self.phase = DriverState::Inactive;
        self.state.dragging = false;
        self.last_pointer_x = None;
    }

    pub fn set_layout(&mut self, layout: Layout) {
        if self.layout != layout {
            self.pointer_up();
            self.layout = layout;
            self.rebuild();
        }
    }

    pub fn set_count(&mut self, count: PhotoCount) {
        if self.count != count {
            self.count = count;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.items = distribute(&self.photos, self.count);
        self.state = AnimationState {
            dragging: self.phase == DriverState::Dragging,
            ..Default::default()
        };
    }

    /// Runs one frame. `None` means the ticket is stale and the host must stop scheduling.
    pub fn tick(&mut self, ticket: FrameTicket) -> Option<RenderFrame> {
        if ticket.generation != self.generation || !self.is_active() {
            return None;
        }

        if self.phase == DriverState::Coasting {
            self.layout.advance(&mut self.state, self.items.len());
        }

        let frame = self.layout.compute_frame(&self.items, &self.state);
        log::trace!(
            "frame: primary={:.4} items={}",
            self.state.primary,
            frame.items.len()
        );
        Some(frame)
    }

    /// Frame for the current state without advancing it.
    pub fn snapshot(&self) -> RenderFrame {
        self.layout.compute_frame(&self.items, &self.state)
    }

    pub fn pointer_down(&mut self, x: f64) {
        if self.phase != DriverState::Coasting || self.layout.drag_sensitivity().is_none() {
            return;
        }
        self.phase = DriverState::Dragging;
        self.state.dragging = true;
        self.last_pointer_x = Some(x);
    }

    pub fn pointer_move(&mut self, x: f64) {
        let Some(sensitivity) = self.layout.drag_sensitivity() else {
            return;
        };
        if self.phase != DriverState::Dragging {
            return;
        }
        if let Some(last) = self.last_pointer_x.replace(x) {
            self.state.manual_offset += (x - last) * sensitivity;
        }
    }

    /// Ends a drag. Also used when the pointer leaves the surface.
    pub fn pointer_up(&mut self) {
        if self.phase == DriverState::Dragging {
            self.phase = DriverState::Coasting;
        }
        self.state.dragging = false;
        self.last_pointer_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ribbon::RibbonLayout;
    use crate::sphere::{GOLDEN_RATIO, SphereLayout};
    use std::f64::consts::PI;

    fn refs(names: &[&str]) -> Vec<SourceRef> {
        names.iter().copied().map(SourceRef::from).collect()
    }

    fn started(activation: Activation) -> FrameTicket {
        match activation {
            Activation::Started(ticket) => ticket,
            other => panic!("expected start, got {other:?}"),
        }
    }

    #[test]
    fn test_starts_inactive() {
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        assert_eq!(driver.phase(), DriverState::Inactive);
        assert!(driver.snapshot().is_empty());
        driver.pointer_down(5.0);
        assert_eq!(driver.phase(), DriverState::Inactive);
    }

    #[test]
    fn test_ready_only_once_per_activation() {
        let photos = refs(&["a", "b"]);
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);

        let first = started(driver.activate(&photos, true));
        assert_eq!(driver.activate(&photos, true), Activation::Running);
        assert_eq!(driver.activate(&photos, false), Activation::Stopped);

        let second = started(driver.activate(&photos, true));
        assert_ne!(first, second);
    }

    #[test]
    fn test_deactivation_invalidates_ticket() {
        let photos = refs(&["a", "b", "c"]);
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        let ticket = started(driver.activate(&photos, true));

        assert!(driver.tick(ticket).is_some());
        let _ = driver.activate(&photos, false);
        assert!(driver.tick(ticket).is_none());

        // an old ticket stays dead after reactivation
        let fresh = started(driver.activate(&photos, true));
        assert!(driver.tick(ticket).is_none());
        assert!(driver.tick(fresh).is_some());
    }

    #[test]
    fn test_ticks_are_sequential() {
        let photos = refs(&["a"]);
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Fixed(4));
        let ticket = started(driver.activate(&photos, true));

        for _ in 0..10 {
            let frame = driver.tick(ticket).unwrap();
            assert_eq!(frame.items.len(), 4);
        }
        assert!((driver.state().primary - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_drag_accumulates_and_freezes_rotation() {
        let photos = refs(&["a", "b", "c"]);
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        let ticket = started(driver.activate(&photos, true));
        let _ = driver.tick(ticket);
        let frozen = driver.state().primary;

        driver.pointer_down(100.0);
        assert_eq!(driver.phase(), DriverState::Dragging);
        for x in [110.0, 105.0, 125.0] {
            driver.pointer_move(x);
            let _ = driver.tick(ticket);
            assert_eq!(driver.state().primary, frozen);
        }
        assert!((driver.state().manual_offset - 0.125).abs() < 1e-12);
        assert!(driver.state().dragging);

        driver.pointer_up();
        assert_eq!(driver.phase(), DriverState::Coasting);
        let _ = driver.tick(ticket);
        assert!(driver.state().primary > frozen);
        assert!((driver.state().manual_offset - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_moves_without_drag_are_ignored() {
        let photos = refs(&["a"]);
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        let _ = driver.activate(&photos, true);
        driver.pointer_move(40.0);
        driver.pointer_move(80.0);
        assert_eq!(driver.state().manual_offset, 0.0);
    }

    #[test]
    fn test_ribbon_ignores_drag() {
        let photos = refs(&["a", "b"]);
        let layout = Layout::Ribbon(RibbonLayout::default());
        let mut driver = AnimationDriver::new(layout, PhotoCount::Auto);
        let ticket = started(driver.activate(&photos, true));

        driver.pointer_down(0.0);
        driver.pointer_move(50.0);
        assert_eq!(driver.phase(), DriverState::Coasting);
        assert_eq!(driver.state().manual_offset, 0.0);
        assert!(driver.tick(ticket).is_some());
        assert_eq!(driver.state().primary, 1.5);
    }

    #[test]
    fn test_ribbon_wraps_during_ticks() {
        let photos = refs(&["a", "b"]);
        let ribbon = RibbonLayout {
            item_size: 80.0,
            gap: 20.0,
            step: 50.0,
            ..Default::default()
        };
        let mut driver = AnimationDriver::new(Layout::Ribbon(ribbon), PhotoCount::Auto);
        let ticket = started(driver.activate(&photos, true));

        for _ in 0..5 {
            let _ = driver.tick(ticket);
        }
        assert_eq!(driver.state().primary, 50.0);
    }

    #[test]
    fn test_layout_switch_ends_drag() {
        let photos = refs(&["a", "b"]);
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        let ticket = started(driver.activate(&photos, true));
        driver.pointer_down(0.0);

        driver.set_layout(Layout::Ribbon(RibbonLayout::default()));
        assert_eq!(driver.phase(), DriverState::Coasting);
        assert_eq!(driver.kind(), LayoutKind::Ribbon);
        assert!(driver.tick(ticket).is_some());
        assert_eq!(driver.state().primary, 1.5);
    }

    #[test]
    fn test_deactivate_ends_drag() {
        let photos = refs(&["a"]);
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        let _ = driver.activate(&photos, true);
        driver.pointer_down(0.0);
        let _ = driver.activate(&photos, false);

        assert_eq!(driver.phase(), DriverState::Inactive);
        assert!(!driver.state().dragging);
    }

    #[test]
    fn test_new_photos_reset_positions() {
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        let ticket = started(driver.activate(&refs(&["a", "b"]), true));
        let _ = driver.tick(ticket);
        assert!(driver.state().primary > 0.0);

        assert_eq!(driver.activate(&refs(&["a", "b", "c"]), true), Activation::Running);
        assert_eq!(driver.items().len(), 3);
        assert_eq!(driver.state().primary, 0.0);

        let frame = driver.snapshot();
        let thetas: Vec<f64> = (0..3).map(|i| SphereLayout::point(i, 3).theta).collect();
        assert_eq!(thetas[1], 2.0 * PI / GOLDEN_RATIO);
        assert_eq!(frame.items[0].source.as_str(), "a");
        assert_eq!(frame.items[2].source.as_str(), "c");
    }

    #[test]
    fn test_empty_photos_produce_empty_frames() {
        let mut driver = AnimationDriver::new(Layout::default(), PhotoCount::Fixed(10));
        let ticket = started(driver.activate(&[], true));
        assert!(driver.tick(ticket).unwrap().is_empty());
    }
}
