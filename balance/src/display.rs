//! Off-screen display used for rendering.
use anyhow::{bail, Result};
use image::RgbImage;
use log::info;

/// An off-screen frame buffer held for the duration of a run.
///
/// Environments draw into [`HeadlessDisplay::frame_mut`] and frames are read
/// back with [`HeadlessDisplay::capture`]. The buffer is released when the
/// display is dropped, on every exit path of the run.
pub struct HeadlessDisplay {
    frame: RgbImage,
}

impl HeadlessDisplay {
    /// Acquires a display of the given size.
    pub fn start(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("Display size must be positive, got {}x{}", width, height);
        }
        info!("Started headless display ({}x{})", width, height);
        Ok(Self {
            frame: RgbImage::new(width, height),
        })
    }

    /// Width and height of the display.
    pub fn size(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    /// Frame buffer to draw into.
    pub fn frame_mut(&mut self) -> &mut RgbImage {
        &mut self.frame
    }

    /// Copy of the current contents of the frame buffer.
    pub fn capture(&self) -> RgbImage {
        self.frame.clone()
    }
}

impl Drop for HeadlessDisplay {
    fn drop(&mut self) {
        let (width, height) = self.frame.dimensions();
        info!("Stopped headless display ({}x{})", width, height);
    }
}
