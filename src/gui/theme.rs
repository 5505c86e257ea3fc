use crate::config::Appearance;
use crate::gui::menu::GLASS_RIM_ALPHA;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub trigger: Srgba<f64>,
    pub satellite: Srgba<f64>,
    pub trigger_glyph: Srgba<f64>,
    pub satellite_glyph: Srgba<f64>,
    pub rim: Srgba<f64>,
}

impl ThemeColors {
    /// Tints come from the config, the remaining colours follow the GTK theme.
    pub fn from_context(context: &gtk::StyleContext, appearance: &Appearance) -> Self {
        Self {
            trigger: appearance.trigger_tint.color(),
            satellite: appearance.satellite_tint.color(),
            trigger_glyph: appearance.glyph_color.color(),
            satellite_glyph: Self::lookup_color(
                context,
                "accent_color",
                Srgba::new(0.0, 0.48, 1.0, 1.0),
                None,
            ),
            rim: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(1.0, 1.0, 1.0, GLASS_RIM_ALPHA),
                Some(GLASS_RIM_ALPHA),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.glasspath-window, .glasspath-canvas {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
