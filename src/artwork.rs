//! Artwork thumbnails drawn with half-block cells

use ratatui::{buffer::Buffer, layout::Rect, style::Color};
use serde::{Deserialize, Serialize};

/// Longest edge, in pixels, kept after decoding.
pub const ARTWORK_MAX_EDGE: u32 = 48;

const UPPER_HALF: &str = "\u{2580}";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA.
    pub pixels: Vec<[u8; 4]>,
}

impl Artwork {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Terminal cells needed to show the thumbnail inside `max_cols` x `max_rows`.
    /// Each cell covers one pixel column and two pixel rows.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if self.width == 0 || self.height == 0 || max_cols == 0 || max_rows == 0 {
            return (0, 0);
        }
        let scale_x = max_cols as f32 / self.width as f32;
        let scale_y = (max_rows as f32 * 2.0) / self.height as f32;
        let scale = scale_x.min(scale_y);
        let cols = ((self.width as f32 * scale).floor() as u16).clamp(1, max_cols);
        let rows = ((self.height as f32 * scale / 2.0).floor() as u16).clamp(1, max_rows);
        (cols, rows)
    }

    /// Paint the thumbnail centred in `area`. Transparent pixels keep the cell background.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let (cols, rows) = self.fit(area.width, area.height);
        if cols == 0 || rows == 0 {
            return;
        }
        let left = area.x + (area.width - cols) / 2;
        let top = area.y + (area.height - rows) / 2;
        for row in 0..rows {
            for col in 0..cols {
                let upper = self.sample(col, row * 2, cols, rows * 2);
                let lower = self.sample(col, row * 2 + 1, cols, rows * 2);
                if upper.is_none() && lower.is_none() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((left + col, top + row)) {
                    cell.set_symbol(UPPER_HALF);
                    if let Some(color) = upper {
                        cell.set_fg(color);
                    }
                    match lower {
                        Some(color) => cell.set_bg(color),
                        None => cell.set_bg(Color::Reset),
                    };
                    if upper.is_none() {
                        cell.set_fg(Color::Reset);
                    }
                }
            }
        }
    }

    fn sample(&self, x: u16, y: u16, out_w: u16, out_h: u16) -> Option<Color> {
        let src_x = (x as u32 * self.width) / out_w.max(1) as u32;
        let src_y = (y as u32 * self.height) / out_h.max(1) as u32;
        let [r, g, b, a] = self.pixel(src_x, src_y)?;
        if a < 128 {
            return None;
        }
        Some(Color::Rgb(r, g, b))
    }
}

pub fn decode_artwork(bytes: &[u8]) -> Result<Artwork, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let thumb = image
        .thumbnail(ARTWORK_MAX_EDGE, ARTWORK_MAX_EDGE)
        .to_rgba8();
    let (width, height) = thumb.dimensions();
    if width == 0 || height == 0 {
        return Err("artwork has no pixels".to_string());
    }
    let pixels = thumb.pixels().map(|pixel| pixel.0).collect();
    Ok(Artwork {
        width,
        height,
        pixels,
    })
}
