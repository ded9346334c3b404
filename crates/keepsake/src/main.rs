use keepsake::config;
use keepsake::gui::app::AppModel;
use keepsake::gui::reel::{ImageStore, Reel};
use keepsake::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();
    let (image_tx, image_rx) = async_channel::unbounded();
    let reel = Reel::new(&config, ImageStore::new(image_tx));

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx.clone(), image_rx);

    let app = RelmApp::new("org.keepsake.reel");

    app.run::<AppModel>((reel, rx));
}
