pub mod app;
pub mod reel;
pub mod theme;
pub mod window;
