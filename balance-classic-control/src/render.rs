//! Rasteriser for cart-pole frames.
use crate::{
    cartpole::{LENGTH, X_THRESHOLD},
    CartPoleState,
};
use image::{Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TRACK: Rgb<u8> = Rgb([0, 0, 0]);
const CART: Rgb<u8> = Rgb([0, 0, 0]);
const POLE: Rgb<u8> = Rgb([202, 152, 101]);
const AXLE: Rgb<u8> = Rgb([129, 132, 203]);

/// Reference width; sizes of the cart and the pole are given for it.
const REFERENCE_WIDTH: f64 = 600.0;

fn fill_rect(frame: &mut RgbImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
    let (w, h) = (frame.width() as i64, frame.height() as i64);
    let xs = (x0.min(x1).floor() as i64).max(0)..(x0.max(x1).ceil() as i64).min(w);
    let ys = (y0.min(y1).floor() as i64).max(0)..(y0.max(y1).ceil() as i64).min(h);
    for y in ys {
        for x in xs.clone() {
            frame.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn fill_disc(frame: &mut RgbImage, cx: f64, cy: f64, r: f64, color: Rgb<u8>) {
    let (w, h) = (frame.width() as i64, frame.height() as i64);
    let ys = ((cy - r).floor() as i64).max(0)..((cy + r).ceil() as i64 + 1).min(h);
    for y in ys {
        let xs = ((cx - r).floor() as i64).max(0)..((cx + r).ceil() as i64 + 1).min(w);
        for x in xs {
            let (dx, dy) = (x as f64 - cx, y as f64 - cy);
            if dx * dx + dy * dy <= r * r {
                frame.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

fn thick_line(frame: &mut RgbImage, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb<u8>) {
    let len = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
    let n = len.ceil().max(1.0) as usize;
    for i in 0..=n {
        let t = i as f64 / n as f64;
        let x = from.0 + t * (to.0 - from.0);
        let y = from.1 + t * (to.1 - from.1);
        fill_disc(frame, x, y, width / 2.0, color);
    }
}

/// Draws the track, the cart and the pole into `frame`.
pub(crate) fn draw(state: &CartPoleState, frame: &mut RgbImage) {
    let width = frame.width() as f64;
    let height = frame.height() as f64;
    let unit = width / REFERENCE_WIDTH;
    let world_width = X_THRESHOLD * 2.0;
    let scale = width / world_width;

    let pole_width = 10.0 * unit;
    let pole_len = scale * (2.0 * LENGTH);
    let cart_width = 50.0 * unit;
    let cart_height = 30.0 * unit;
    // Image rows grow downward.
    let track_y = height * 0.75;

    for pixel in frame.pixels_mut() {
        *pixel = BACKGROUND;
    }

    fill_rect(frame, 0.0, track_y, width, track_y + unit.max(1.0), TRACK);

    let cart_x = state.x * scale + width / 2.0;
    fill_rect(
        frame,
        cart_x - cart_width / 2.0,
        track_y - cart_height / 2.0,
        cart_x + cart_width / 2.0,
        track_y + cart_height / 2.0,
        CART,
    );

    let axle = (cart_x, track_y - cart_height / 4.0);
    let tip = (
        axle.0 + pole_len * state.theta.sin(),
        axle.1 - pole_len * state.theta.cos(),
    );
    thick_line(frame, axle, tip, pole_width, POLE);
    fill_disc(frame, axle.0, axle.1, pole_width / 2.0, AXLE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_upright() {
        let mut frame = RgbImage::new(600, 400);
        draw(&CartPoleState::default(), &mut frame);
        assert_eq!(*frame.get_pixel(5, 5), BACKGROUND);
        // Cart body, below the axle.
        assert_eq!(*frame.get_pixel(300 - 20, 300 + 10), CART);
        // Pole, halfway up.
        assert_eq!(*frame.get_pixel(300, 292 - 60), POLE);
        assert_eq!(*frame.get_pixel(300, 292), AXLE);
    }

    #[test]
    fn test_draw_follows_cart() {
        let mut frame = RgbImage::new(300, 200);
        let state = CartPoleState {
            x: 1.2,
            ..Default::default()
        };
        draw(&state, &mut frame);
        // x = 1.2 is a quarter of the track right of the center.
        assert_eq!(*frame.get_pixel(225 - 8, 150 + 5), CART);
        assert_eq!(*frame.get_pixel(75, 150 + 5), BACKGROUND);
    }
}
