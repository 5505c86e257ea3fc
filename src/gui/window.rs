use crate::config::Appearance;
use crate::gui::menu::model::MenuGeometry;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};

/// Pins the window to the bottom-right corner above other surfaces. Without
/// layer-shell support it stays an ordinary undecorated window.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    if !gtk4_layer_shell::is_supported() {
        log::info!("Layer shell unavailable, running as a regular window");
        return;
    }
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("glasspath"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Bottom, Edge::Right] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::None);
}

pub fn apply_size(window: &gtk::ApplicationWindow, appearance: &Appearance) {
    let extent = MenuGeometry::required_extent(appearance.padding, appearance.button_size);
    let side = extent.ceil() as i32;
    window.set_default_size(side, side);
    window.set_size_request(side, side);
}
