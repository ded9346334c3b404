pub mod clock;
pub mod control;
pub mod driver;
pub mod layout;
pub mod macros;
pub mod photo;
pub mod ribbon;
pub mod sphere;

pub use driver::{Activation, AnimationDriver, AnimationState, DriverState, FrameTicket};
pub use layout::{Arrangement, Layout, LayoutKind, RenderFrame, RenderItem};
pub use photo::{PHOTO_CAP, PhotoCount, PhotoItem, SourceRef};
