//! Built-in 5x7 dot-matrix font, usable without any platform text stack.

use super::{GlyphSurface, LuminanceBitmap, TextLayout};

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
/// Horizontal advance in dots (glyph plus one dot of spacing).
const ADVANCE: u32 = GLYPH_COLS + 1;

/// Rows top to bottom, bit 4 is the leftmost column.
fn glyph_rows(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        // Space and anything unknown occupy a blank cell.
        _ => [0x00; 7],
    }
}

/// Dot-matrix text renderer: every lit dot becomes a `font_px / 7` square.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapFontSurface;

impl BitmapFontSurface {
    /// Width in pixels of one rendered line.
    pub fn line_width(line: &str, font_px: f32) -> f32 {
        let dots = line.chars().count() as u32 * ADVANCE;
        dots.saturating_sub(1) as f32 * font_px / GLYPH_ROWS as f32
    }
}

impl GlyphSurface for BitmapFontSurface {
    fn rasterize(&mut self, layout: &TextLayout) -> Option<LuminanceBitmap> {
        let mut bitmap = LuminanceBitmap::new(layout.canvas_width, layout.canvas_height);
        let dot = layout.font_px / GLYPH_ROWS as f32;
        let line_advance = layout.font_px * layout.line_height;
        let lines = layout.labels.len();
        let block_height = lines.saturating_sub(1) as f32 * line_advance + layout.font_px;
        let top = layout.canvas_height as f32 * 0.5 - block_height * 0.5;

        for (line_idx, line) in layout.labels.iter().enumerate() {
            let left =
                layout.canvas_width as f32 * 0.5 - Self::line_width(line, layout.font_px) * 0.5;
            let line_top = top + line_idx as f32 * line_advance;
            for (char_idx, c) in line.chars().enumerate() {
                let rows = glyph_rows(c);
                let cell_left = left + (char_idx as u32 * ADVANCE) as f32 * dot;
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_COLS {
                        if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                            continue;
                        }
                        let x0 = cell_left + col as f32 * dot;
                        let y0 = line_top + row as f32 * dot;
                        bitmap.fill_rect(
                            x0.round() as i64,
                            y0.round() as i64,
                            (x0 + dot).round() as i64,
                            (y0 + dot).round() as i64,
                            255,
                        );
                    }
                }
            }
        }
        Some(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(bitmap: &LuminanceBitmap) -> usize {
        bitmap.pixels.iter().filter(|&&p| p > 0).count()
    }

    #[test]
    fn test_single_dot_glyph_area() {
        // '.' lights a 2x2 block of dots; at 7px font each dot is 1px.
        let layout = TextLayout {
            labels: vec![".".to_string()],
            canvas_width: 32,
            canvas_height: 32,
            font_px: 7.0,
            ..TextLayout::default()
        };
        let bitmap = BitmapFontSurface.rasterize(&layout).unwrap();
        assert_eq!(lit(&bitmap), 4);
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        let upper = TextLayout {
            labels: vec!["HI".to_string()],
            canvas_width: 64,
            canvas_height: 32,
            font_px: 14.0,
            ..TextLayout::default()
        };
        let lower = TextLayout {
            labels: vec!["hi".to_string()],
            ..upper.clone()
        };
        assert_eq!(
            BitmapFontSurface.rasterize(&upper),
            BitmapFontSurface.rasterize(&lower)
        );
    }

    #[test]
    fn test_blank_label_renders_nothing() {
        let layout = TextLayout {
            labels: vec!["   ".to_string()],
            ..TextLayout::default()
        };
        let bitmap = BitmapFontSurface.rasterize(&layout).unwrap();
        assert_eq!(lit(&bitmap), 0);
    }

    #[test]
    fn test_text_is_horizontally_centered() {
        let layout = TextLayout {
            labels: vec!["HOH".to_string()],
            canvas_width: 200,
            canvas_height: 40,
            font_px: 14.0,
            ..TextLayout::default()
        };
        let bitmap = BitmapFontSurface.rasterize(&layout).unwrap();
        let mut min_x = u32::MAX;
        let mut max_x = 0;
        for y in 0..bitmap.height {
            for x in 0..bitmap.width {
                if bitmap.get(x, y) > 0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                }
            }
        }
        let left_margin = min_x as i64;
        let right_margin = (bitmap.width - 1 - max_x) as i64;
        assert!(
            (left_margin - right_margin).abs() <= 1,
            "margins {} vs {}",
            left_margin,
            right_margin
        );
    }
}
