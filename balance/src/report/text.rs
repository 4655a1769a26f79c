//! 5x7 bitmap glyphs for the labels of the return plot.
use image::{Rgb, RgbImage};

const GLYPH_WIDTH: i64 = 5;
const GLYPH_HEIGHT: i64 = 7;
const ADVANCE: i64 = GLYPH_WIDTH + 1;

/// Rows of a glyph, top to bottom; bit 4 is the leftmost column.
fn glyph(c: char) -> [u8; 7] {
    match c {
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        '-' => [0x00, 0x00, 0x00, 0x1f, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x0c],
        'A' => [0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11],
        'I' => [0x0e, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0e],
        'R' => [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11],
        'a' => [0x00, 0x00, 0x0e, 0x01, 0x0f, 0x11, 0x0f],
        'e' => [0x00, 0x00, 0x0e, 0x11, 0x1f, 0x10, 0x0e],
        'g' => [0x00, 0x0f, 0x11, 0x11, 0x0f, 0x01, 0x0e],
        'i' => [0x04, 0x00, 0x0c, 0x04, 0x04, 0x04, 0x0e],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'o' => [0x00, 0x00, 0x0e, 0x11, 0x11, 0x11, 0x0e],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        's' => [0x00, 0x00, 0x0e, 0x10, 0x0e, 0x01, 0x1e],
        't' => [0x08, 0x08, 0x1c, 0x08, 0x08, 0x09, 0x06],
        'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0d],
        'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0a, 0x04],
        _ => [0; 7],
    }
}

/// Width in pixels of `text` drawn horizontally, or its height drawn vertically.
pub(super) fn text_width(text: &str) -> i64 {
    match text.chars().count() as i64 {
        0 => 0,
        n => n * ADVANCE - 1,
    }
}

pub(super) const TEXT_HEIGHT: i64 = GLYPH_HEIGHT;

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if (0..img.width() as i64).contains(&x) && (0..img.height() as i64).contains(&y) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn for_each_pixel(text: &str, mut f: impl FnMut(i64, i64, i64)) {
    for (i, c) in text.chars().enumerate() {
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) != 0 {
                    f(i as i64, col, row as i64);
                }
            }
        }
    }
}

/// Draws `text` left to right with its top-left corner at `(x, y)`.
pub(super) fn draw_text(img: &mut RgbImage, (x, y): (i64, i64), text: &str, color: Rgb<u8>) {
    for_each_pixel(text, |i, col, row| {
        put(img, x + i * ADVANCE + col, y + row, color)
    });
}

/// Draws `text` bottom to top, rotated counterclockwise, with the bottom-left
/// corner of the first glyph at `(x, y)`.
pub(super) fn draw_text_vertical(
    img: &mut RgbImage,
    (x, y): (i64, i64),
    text: &str,
    color: Rgb<u8>,
) {
    for_each_pixel(text, |i, col, row| {
        put(img, x + row, y - i * ADVANCE - col, color)
    });
}

/// Formats a tick value, without decimals when it is integral.
pub(super) fn format_tick(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(img: &RgbImage, color: Rgb<u8>) -> usize {
        img.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("1"), 5);
        assert_eq!(text_width("250"), 17);
    }

    #[test]
    fn test_draw_text() {
        let black = Rgb([0, 0, 0]);
        let mut img = RgbImage::from_pixel(20, 10, Rgb([255, 255, 255]));
        draw_text(&mut img, (1, 1), "I-", black);

        // 'I' has 3 + 5 + 3 pixels, '-' has 5.
        assert_eq!(count(&img, black), 16);
        assert_eq!(*img.get_pixel(3, 2), black);
        assert_eq!(*img.get_pixel(7, 4), black);
        assert_eq!(*img.get_pixel(7, 3), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_draw_text_vertical() {
        let black = Rgb([0, 0, 0]);
        let mut img = RgbImage::from_pixel(10, 20, Rgb([255, 255, 255]));
        draw_text_vertical(&mut img, (1, 18), "-", black);

        // The bar of '-' is on row 3 of the glyph, which becomes column 1 + 3.
        assert_eq!(count(&img, black), 5);
        for y in 14..=18 {
            assert_eq!(*img.get_pixel(4, y), black);
        }
    }

    #[test]
    fn test_clipped_text() {
        let black = Rgb([0, 0, 0]);
        let mut img = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        draw_text(&mut img, (-2, -2), "Average Return", black);
        assert!(count(&img, black) > 0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(250.0), "250");
        assert_eq!(format_tick(-12.5), "-12.5");
        assert_eq!(format_tick(0.0), "0");
    }
}
