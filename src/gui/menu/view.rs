use super::animation::MenuAnimator;
use super::model::{ButtonKind, GlassId, MenuGeometry, Point};
use super::{GLASS_HIGHLIGHT_ALPHA, GLASS_RIM_WIDTH, ICON_FILL, ICON_SIZE};
use crate::gui::theme::ThemeColors;
use crate::sys::icon;
use cairo::{Context, LinearGradient};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::collections::HashMap;
use std::f64::consts::PI;
use strum::IntoEnumIterator;

/// Theme icons for the satellites. Kinds without one fall back to a letter.
#[derive(Default)]
pub struct MenuIcons {
    pixbufs: HashMap<ButtonKind, Pixbuf>,
}

impl MenuIcons {
    pub fn load() -> Self {
        let pixbufs = ButtonKind::iter()
            .filter_map(|kind| {
                let path = icon::find_icon_path(&kind.icon_token())?;
                match Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true) {
                    Ok(pixbuf) => Some((kind, pixbuf)),
                    Err(e) => {
                        log::error!("Failed to load icon {}: {}", path.display(), e);
                        None
                    }
                }
            })
            .collect();
        Self { pixbufs }
    }

    pub fn get(&self, kind: ButtonKind) -> Option<&Pixbuf> {
        self.pixbufs.get(&kind)
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// A tinted disc with a soft top highlight and a thin rim.
fn draw_glass(
    cr: &Context,
    center: Point,
    radius: f64,
    tint: Srgba<f64>,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    cr.new_sub_path();
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    set_source(cr, tint);
    cr.fill_preserve()?;

    let highlight = LinearGradient::new(center.x, center.y - radius, center.x, center.y);
    highlight.add_color_stop_rgba(0.0, 1.0, 1.0, 1.0, GLASS_HIGHLIGHT_ALPHA);
    highlight.add_color_stop_rgba(1.0, 1.0, 1.0, 1.0, 0.0);
    cr.set_source(&highlight)?;
    cr.fill_preserve()?;

    set_source(cr, colors.rim);
    cr.set_line_width(GLASS_RIM_WIDTH);
    cr.stroke()
}

struct SatelliteRenderer<'a> {
    kind: ButtonKind,
    center: Point,
    radius: f64,
    opacity: f64,
    icon: Option<&'a Pixbuf>,
}

impl<'a> SatelliteRenderer<'a> {
    fn new(
        kind: ButtonKind,
        geometry: &MenuGeometry,
        animator: &MenuAnimator,
        icons: &'a MenuIcons,
    ) -> Self {
        let id = kind.glass_id();
        Self {
            kind,
            center: geometry.satellite_center(animator.offset(&id)),
            radius: geometry.button_radius(),
            opacity: animator.opacity(&id),
            icon: icons.get(kind),
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        draw_glass(cr, self.center, self.radius, colors.satellite, colors)?;
        if self.opacity <= 0.0 {
            return Ok(());
        }

        // content fades as a whole so icon and text share one alpha
        cr.push_group();
        match self.icon {
            Some(pixbuf) => self.draw_icon(cr, pixbuf)?,
            None => self.draw_letter(cr, colors)?,
        }
        cr.pop_group_to_source()?;
        cr.paint_with_alpha(self.opacity)
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let edge = pixbuf.width().max(pixbuf.height()).max(1) as f64;
        let icon_scale = (self.radius * 2.0 * ICON_FILL) / edge;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        cr.save()?;
        cr.translate(self.center.x - iw / 2.0, self.center.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_letter(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let label = self.kind.label();
        let letter: String = label.chars().take(1).collect();

        set_source(cr, colors.satellite_glyph);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(self.radius * 0.8);
        let ext = cr.text_extents(&letter)?;
        cr.move_to(
            self.center.x - ext.width() / 2.0 - ext.x_bearing(),
            self.center.y - ext.height() / 2.0 - ext.y_bearing(),
        );
        cr.show_text(&letter)
    }
}

/// Bulleted-list glyph, turned by the trigger's animated angle.
fn draw_trigger_glyph(
    cr: &Context,
    center: Point,
    radius: f64,
    turn_deg: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let spacing = radius * 0.3;
    let (bullet_x, bar_start, bar_end) = (-radius * 0.36, -radius * 0.18, radius * 0.4);

    cr.save()?;
    cr.translate(center.x, center.y);
    cr.rotate(turn_deg.to_radians());
    set_source(cr, colors.trigger_glyph);
    cr.set_line_width((radius * 0.1).max(1.0));
    cr.set_line_cap(cairo::LineCap::Round);

    for row in [-1.0, 0.0, 1.0] {
        let y = row * spacing;
        cr.new_sub_path();
        cr.arc(bullet_x, y, radius * 0.06, 0.0, 2.0 * PI);
        cr.fill()?;
        cr.move_to(bar_start, y);
        cr.line_to(bar_end, y);
        cr.stroke()?;
    }
    cr.restore()
}

/// Draws the whole menu. Every glass element goes into one group so
/// overlapping discs blend before reaching the surface.
pub fn draw(
    cr: &Context,
    geometry: &MenuGeometry,
    animator: &MenuAnimator,
    icons: &MenuIcons,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    cr.push_group();

    for kind in ButtonKind::iter() {
        SatelliteRenderer::new(kind, geometry, animator, icons).draw(cr, colors)?;
    }

    let trigger = geometry.trigger_center();
    let radius = geometry.button_radius();
    draw_glass(cr, trigger, radius, colors.trigger, colors)?;
    draw_trigger_glyph(cr, trigger, radius, animator.turn_deg(&GlassId::trigger()), colors)?;

    cr.pop_group_to_source()?;
    cr.paint()
}
