use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

/// Full-screen transparent overlay above regular windows.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    if !gtk4_layer_shell::is_supported() {
        log::warn!("Layer shell not supported, falling back to a regular window");
        window.fullscreen();
        return;
    }

    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("keepsake"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::OnDemand);
}
