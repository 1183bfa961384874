// Built-in 5×7 bitmap font, baked into the sprite atlas at startup.
//
// Lowercase letters render as uppercase; characters without a glyph render
// as '?'.

use image::{Rgba, RgbaImage};

/// Glyph cell size in the font sheet (5×7 glyph plus one pixel of spacing).
pub const CELL_W: u32 = 6;
pub const CELL_H: u32 = 8;
/// Glyphs per row in the font sheet.
const SHEET_COLS: u32 = 16;

/// Each row is five bits wide; bit 4 is the leftmost pixel.
const GLYPHS: &[(char, [u8; 7])] = &[
    (' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('?', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100]),
    ('!', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    (':', [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000]),
    ('/', [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
];

/// Frame index of `ch` in the font sheet.
pub fn glyph_index(ch: char) -> u32 {
    let ch = ch.to_ascii_uppercase();
    GLYPHS
        .iter()
        .position(|&(c, _)| c == ch)
        .or_else(|| GLYPHS.iter().position(|&(c, _)| c == '?'))
        .unwrap_or(0) as u32
}

/// Width in pixels of `text` drawn at `size` (the height of one line).
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * CELL_W as f32 * (size / CELL_H as f32)
}

/// Rasterize every glyph into a white-on-transparent sprite sheet.
pub fn build_font_image() -> RgbaImage {
    let rows = (GLYPHS.len() as u32).div_ceil(SHEET_COLS);
    let mut img = RgbaImage::new(SHEET_COLS * CELL_W, rows * CELL_H);
    for (i, (_, bits)) in GLYPHS.iter().enumerate() {
        let ox = (i as u32 % SHEET_COLS) * CELL_W;
        let oy = (i as u32 / SHEET_COLS) * CELL_H;
        for (y, row) in bits.iter().enumerate() {
            for x in 0..5u32 {
                if row & (0b10000 >> x) != 0 {
                    img.put_pixel(ox + x, oy + y as u32, Rgba([255, 255, 255, 255]));
                }
            }
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_maps_to_uppercase() {
        assert_eq!(glyph_index('a'), glyph_index('A'));
    }

    #[test]
    fn unknown_char_maps_to_question_mark() {
        assert_eq!(glyph_index('#'), glyph_index('?'));
    }

    #[test]
    fn sheet_has_room_for_every_glyph() {
        let img = build_font_image();
        assert_eq!(img.width(), SHEET_COLS * CELL_W);
        assert!(img.height() / CELL_H * SHEET_COLS >= GLYPHS.len() as u32);
    }

    #[test]
    fn glyph_pixels_land_in_their_cell() {
        let img = build_font_image();
        let idx = glyph_index('T');
        let ox = (idx % SHEET_COLS) * CELL_W;
        let oy = (idx / SHEET_COLS) * CELL_H;
        // Top bar of the T is fully lit, the spacing column is empty.
        for x in 0..5 {
            assert_eq!(img.get_pixel(ox + x, oy).0[3], 255);
        }
        assert_eq!(img.get_pixel(ox + 5, oy).0[3], 0);
    }

    #[test]
    fn text_width_scales_with_size() {
        assert_eq!(text_width("AB", 8.0), 12.0);
        assert_eq!(text_width("AB", 16.0), 24.0);
    }
}
