use crate::config::Config;
use crate::gui::reel::ImageStore;
use orbit::ribbon::RibbonLayout;
use orbit::sphere::SphereLayout;
use orbit::{Activation, AnimationDriver, FrameTicket, Layout, LayoutKind, RenderFrame, SourceRef};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything the window needs to animate and paint the photos.
pub struct Reel {
    pub driver: AnimationDriver,
    pub photos: Vec<SourceRef>,
    pub frame: RenderFrame,
    pub images: ImageStore,
    sphere: SphereLayout,
    ribbon: RibbonLayout,
    drag_origin: Option<f64>,
}

impl Reel {
    pub fn new(config: &Config, images: ImageStore) -> Self {
        let driver = AnimationDriver::new(config.layout(), config.count());
        let frame = RenderFrame::empty(driver.kind());
        Self {
            driver,
            photos: config.resolve_photos(),
            frame,
            images,
            sphere: config.sphere.clone(),
            ribbon: config.ribbon.clone(),
            drag_origin: None,
        }
    }

    pub fn kind(&self) -> LayoutKind {
        self.driver.kind()
    }

    pub fn activate(&mut self, active: bool) -> Activation {
        let activation = self.driver.activate(&self.photos, active);
        self.frame = self.driver.snapshot();
        activation
    }

    /// Advances one frame. `false` once the ticket went stale.
    pub fn tick(&mut self, ticket: FrameTicket) -> bool {
        match self.driver.tick(ticket) {
            Some(frame) => {
                self.frame = frame;
                true
            }
            None => false,
        }
    }

    pub fn set_layout(&mut self, kind: LayoutKind) {
        self.driver
            .set_layout(Layout::from_kind(kind, &self.sphere, &self.ribbon));
        self.frame = self.driver.snapshot();
    }

    /// Start of a drag gesture at widget x.
    pub fn drag_begin(&mut self, x: f64) {
        self.drag_origin = Some(x);
        self.driver.pointer_down(x);
    }

    /// Gesture updates report the offset from where the drag began.
    pub fn drag_update(&mut self, offset_x: f64) {
        if let Some(origin) = self.drag_origin {
            self.driver.pointer_move(origin + offset_x);
        }
    }

    /// Release, cancel or pointer leave.
    pub fn drag_end(&mut self) {
        self.drag_origin = None;
        self.driver.pointer_up();
    }

    /// Picks up new settings. A running animation keeps running.
    pub fn apply_config(&mut self, config: &Config) {
        self.sphere = config.sphere.clone();
        self.ribbon = config.ribbon.clone();
        self.photos = config.resolve_photos();
        self.images.retain(&self.photos);

        self.driver.set_count(config.count());
        self.driver.set_layout(config.layout());
        if self.driver.is_active() {
            let _ = self.driver.activate(&self.photos, true);
        }
        self.frame = self.driver.snapshot();
    }

    /// Pixel position of a layout-space point inside a widget of the given size.
    pub fn to_screen(&self, x: f64, y: f64, width: f64, height: f64) -> Point {
        Point::new(
            width / 2.0 + x - self.frame.anchor_x,
            height / 2.0 + y - self.frame.anchor_y,
        )
    }
}
