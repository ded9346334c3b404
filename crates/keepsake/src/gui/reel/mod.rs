pub mod images;
pub mod model;
pub mod view;

pub use images::ImageStore;
pub use model::{Point, Reel};
pub use view::draw;

pub const IMAGE_SIZE: i32 = 256;
pub const TILE_CORNER_RADIUS: f64 = 8.0;
pub const TILE_BORDER_WIDTH: f64 = 2.0;
pub const TILE_BORDER_ALPHA: f64 = 0.2; // white/20 border
pub const GLOW_FACTOR: f64 = 1.1; // glow radius relative to the globe
pub const CAPTION: &str = "Drag to explore your memories";
pub const CAPTION_MARGIN: f64 = 32.0;
