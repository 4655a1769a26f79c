//! Return plot and policy video.
mod text;

use crate::display::HeadlessDisplay;
use anyhow::{bail, Result};
use balance_classic_control::CartPoleEnv;
use balance_core::{Env, Policy, ReturnSeries};
use image::{
    buffer::ConvertBuffer, codecs::gif::GifEncoder, Delay, Frame, Rgb, RgbImage, RgbaImage,
};
use log::info;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use text::{draw_text, draw_text_vertical, format_tick, text_width, TEXT_HEIGHT};

const PLOT_WIDTH: u32 = 640;
const PLOT_HEIGHT: u32 = 480;
const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 50;
const N_GRID_LINES: u32 = 5;
const X_LABEL: &str = "Iterations";
const Y_LABEL: &str = "Average Return";

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const LINE: Rgb<u8> = Rgb([31, 119, 180]);

/// Environments that can draw their current state.
pub trait Render: Env {
    /// Draws the current state into `frame`.
    fn render(&self, frame: &mut RgbImage);
}

impl Render for CartPoleEnv {
    fn render(&self, frame: &mut RgbImage) {
        CartPoleEnv::render(self, frame);
    }
}

#[derive(Serialize)]
struct ReturnRow {
    iteration: usize,
    average_return: f32,
}

/// Writes the series as a CSV file with the header `iteration,average_return`.
pub fn write_returns_csv(series: &ReturnSeries, path: impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for &(iteration, average_return) in series.iter() {
        wtr.serialize(ReturnRow {
            iteration,
            average_return,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn draw_segment(img: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let n = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
    for i in 0..=n {
        let x = x0 + (x1 - x0) * i / n;
        let y = y0 + (y1 - y0) * i / n;
        if (0..w).contains(&x) && (0..h).contains(&y) {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn fill_square(img: &mut RgbImage, (cx, cy): (i64, i64), half: i64, color: Rgb<u8>) {
    for y in cy - half..=cy + half {
        draw_segment(img, (cx - half, y), (cx + half, y), color);
    }
}

/// Plots the average returns against the iteration as a PNG image.
///
/// The y-axis spans from `min(0, lowest return)` to `y_max`; returns above
/// `y_max` are drawn at the top edge. The axes are labelled `Iterations` and
/// `Average Return`, with a value at each grid line. A CSV file with the same
/// stem is written next to the image.
pub fn plot_returns(series: &ReturnSeries, path: impl AsRef<Path>, y_max: f32) -> Result<()> {
    let path = path.as_ref();
    if series.is_empty() {
        bail!("Return series is empty");
    }
    let y_min = series.returns().into_iter().fold(0f32, f32::min);
    if y_max <= y_min {
        bail!(
            "y_max ({}) must be larger than the lowest return ({})",
            y_max,
            y_min
        );
    }
    let x_max = series.iterations().into_iter().max().unwrap_or(0).max(1) as f32;

    let mut img = RgbImage::from_pixel(PLOT_WIDTH, PLOT_HEIGHT, BACKGROUND);
    let (left, right) = (MARGIN_LEFT as i64, (PLOT_WIDTH - MARGIN_RIGHT) as i64);
    let (top, bottom) = (MARGIN_TOP as i64, (PLOT_HEIGHT - MARGIN_BOTTOM) as i64);
    let to_pixel = |iteration: usize, v: f32| {
        let v = v.clamp(y_min, y_max);
        let x = left as f32 + (iteration as f32 / x_max) * (right - left) as f32;
        let y = bottom as f32 - (v - y_min) / (y_max - y_min) * (bottom - top) as f32;
        (x.round() as i64, y.round() as i64)
    };

    let n = N_GRID_LINES as i64;
    for i in 0..=n {
        let y = bottom - (bottom - top) * i / n;
        draw_segment(&mut img, (left, y), (right, y), GRID);
        draw_segment(&mut img, (left - 5, y), (left, y), AXIS);
        let label = format_tick(y_min + (y_max - y_min) * i as f32 / n as f32);
        let pos = (left - 8 - text_width(&label), y - TEXT_HEIGHT / 2);
        draw_text(&mut img, pos, &label, AXIS);

        let x = left + (right - left) * i / n;
        draw_segment(&mut img, (x, bottom), (x, bottom + 5), AXIS);
        let label = format_tick((x_max * i as f32 / n as f32).round());
        draw_text(&mut img, (x - text_width(&label) / 2, bottom + 9), &label, AXIS);
    }
    draw_segment(&mut img, (left, top), (left, bottom), AXIS);
    draw_segment(&mut img, (left, bottom), (right, bottom), AXIS);

    let x_label = ((left + right - text_width(X_LABEL)) / 2, bottom + 30);
    draw_text(&mut img, x_label, X_LABEL, AXIS);
    let y_label = (8, (top + bottom + text_width(Y_LABEL)) / 2);
    draw_text_vertical(&mut img, y_label, Y_LABEL, AXIS);

    let points: Vec<(i64, i64)> = series.iter().map(|&(it, v)| to_pixel(it, v)).collect();
    for pair in points.windows(2) {
        for dy in -1..=1 {
            let (p0, p1) = ((pair[0].0, pair[0].1 + dy), (pair[1].0, pair[1].1 + dy));
            draw_segment(&mut img, p0, p1, LINE);
        }
    }
    for &p in points.iter() {
        fill_square(&mut img, p, 2, LINE);
    }

    img.save(path)?;
    write_returns_csv(series, path.with_extension("csv"))?;
    info!("Saved return plot to {:?}", path);
    Ok(())
}

fn capture<E: Render>(env: &E, display: &mut HeadlessDisplay) -> RgbaImage {
    env.render(display.frame_mut());
    display.capture().convert()
}

/// Draws the current state and appends it to the GIF.
fn encode_frame<E: Render, W: Write>(
    encoder: &mut GifEncoder<W>,
    env: &E,
    display: &mut HeadlessDisplay,
    delay: Delay,
) -> Result<()> {
    encoder.encode_frame(Frame::from_parts(capture(env, display), 0, 0, delay))?;
    Ok(())
}

/// Records `n_episodes` episodes of `policy` as an animated GIF.
///
/// The `ix`-th episode starts from [`Env::reset_with_index`] with `ix`. Every
/// step is drawn into the frame buffer of `display`, including the initial
/// state. Frames are encoded as they are drawn. Returns the number of frames.
pub fn create_policy_eval_video<E, P>(
    env: &mut E,
    policy: &mut P,
    display: &mut HeadlessDisplay,
    path: impl AsRef<Path>,
    n_episodes: usize,
    fps: u32,
) -> Result<usize>
where
    E: Render,
    P: Policy<E>,
{
    if n_episodes == 0 || fps == 0 {
        bail!("Video needs at least one episode and a positive frame rate");
    }
    let delay = Delay::from_numer_denom_ms(1000, fps);
    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = GifEncoder::new(file);
    let mut n_frames = 0;

    for ix in 0..n_episodes {
        let mut obs = env.reset_with_index(ix)?;
        encode_frame(&mut encoder, env, display, delay)?;
        n_frames += 1;

        loop {
            let act = policy.sample(&obs)?;
            let (step, _) = env.step(&act)?;
            encode_frame(&mut encoder, env, display, delay)?;
            n_frames += 1;
            if step.is_done() {
                break;
            }
            obs = step.obs;
        }
    }
    drop(encoder);
    info!("Saved {} frames to {:?}", n_frames, path.as_ref());
    Ok(n_frames)
}
