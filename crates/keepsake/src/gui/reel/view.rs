use super::model::{Point, Reel};
use super::{
    CAPTION, CAPTION_MARGIN, GLOW_FACTOR, TILE_BORDER_ALPHA, TILE_BORDER_WIDTH,
    TILE_CORNER_RADIUS,
};
use crate::gui::theme::ThemeColors;
use cairo::{Context, RadialGradient};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use orbit::sphere::SphereLayout;
use orbit::{Arrangement, LayoutKind, RenderItem};
use std::f64::consts::PI;

struct TileRenderer<'a> {
    item: &'a RenderItem,
    center: Point,
    size: f64,
    pixbuf: Option<&'a Pixbuf>,
}

impl<'a> TileRenderer<'a> {
    fn new(item: &'a RenderItem, center: Point, base_size: f64, pixbuf: Option<&'a Pixbuf>) -> Self {
        Self {
            item,
            center,
            size: base_size * item.scale,
            pixbuf,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        cr.save()?;
        self.tile_path(cr);
        cr.clip();
        self.draw_content(cr, colors)?;
        cr.restore()?;
        self.draw_border(cr)
    }

    fn tile_path(&self, cr: &Context) {
        let half = self.size / 2.0;
        let (x, y) = (self.center.x - half, self.center.y - half);
        let r = TILE_CORNER_RADIUS.min(half);

        cr.new_sub_path();
        cr.arc(x + self.size - r, y + r, r, -PI / 2.0, 0.0);
        cr.arc(x + self.size - r, y + self.size - r, r, 0.0, PI / 2.0);
        cr.arc(x + r, y + self.size - r, r, PI / 2.0, PI);
        cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
        cr.close_path();
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        match self.pixbuf {
            Some(pixbuf) => self.draw_photo(cr, pixbuf),
            None => {
                let (r, g, b, a) = colors.placeholder.into_components();
                cr.set_source_rgba(r, g, b, a * self.item.opacity);
                cr.paint()
            }
        }
    }

    fn draw_photo(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        // cover: fill the tile, crop the longer side
        let (w, h) = (pixbuf.width() as f64, pixbuf.height() as f64);
        let scale = self.size / w.min(h).max(1.0);
        let (ix, iy) = (
            self.center.x - w * scale / 2.0,
            self.center.y - h * scale / 2.0,
        );

        cr.translate(ix, iy);
        cr.scale(scale, scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint_with_alpha(self.item.opacity)
    }

    fn draw_border(&self, cr: &Context) -> Result<(), cairo::Error> {
        cr.set_source_rgba(1.0, 1.0, 1.0, TILE_BORDER_ALPHA * self.item.opacity);
        cr.set_line_width(TILE_BORDER_WIDTH * self.item.scale);
        self.tile_path(cr);
        cr.stroke()
    }
}

pub fn draw(
    cr: &Context,
    reel: &mut Reel,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let tile_size = reel.driver.layout().tile_size();
    let frame = reel.frame.clone();

    if let orbit::Layout::Sphere(sphere) = reel.driver.layout() {
        draw_glow(cr, reel.to_screen(0.0, 0.0, width, height), sphere, colors)?;
    }

    for item in frame.painter_order() {
        let center = reel.to_screen(item.x, item.y, width, height);
        let pixbuf = reel.images.get(&item.source);
        TileRenderer::new(item, center, tile_size, pixbuf).draw(cr, colors)?;
    }

    if frame.kind == LayoutKind::Sphere && !frame.is_empty() {
        draw_caption(cr, width, height)?;
    }
    Ok(())
}

fn draw_glow(
    cr: &Context,
    center: Point,
    sphere: &SphereLayout,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let radius = sphere.radius * GLOW_FACTOR;
    let (r, g, b, a) = colors.glow.into_components();

    let gradient = RadialGradient::new(center.x, center.y, 0.0, center.x, center.y, radius);
    gradient.add_color_stop_rgba(0.0, r, g, b, a);
    gradient.add_color_stop_rgba(0.7, r, g, b, 0.0);

    cr.set_source(&gradient)?;
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

fn draw_caption(cr: &Context, width: f64, height: f64) -> Result<(), cairo::Error> {
    cr.set_source_rgba(1.0, 1.0, 1.0, 0.6);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(14.0);
    if let Ok(ext) = cr.text_extents(CAPTION) {
        cr.move_to((width - ext.width()) / 2.0, height - CAPTION_MARGIN);
        cr.show_text(CAPTION)?;
    }
    Ok(())
}
