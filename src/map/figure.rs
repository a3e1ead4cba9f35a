use image::{ImageError, ImageFormat, ImageResult, Rgba, RgbaImage};
use imageproc::drawing::Blend;
use std::fs;
use std::path::Path;

/// An owned, rendered map canvas.
///
/// Each render produces a fresh figure; dropping it releases the pixels.
/// Drawing goes through [`Blend`], so translucent colors composite over
/// whatever layers are already there.
pub struct Figure {
    canvas: Blend<RgbaImage>,
    highlighted: usize,
}

impl Figure {
    /// New figure filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            canvas: Blend(RgbaImage::from_pixel(width, height, background)),
            highlighted: 0,
        }
    }

    pub(crate) fn set_highlighted(&mut self, shapes: usize) {
        self.highlighted = shapes;
    }

    /// Number of boundary shapes drawn in the highlight layer
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn canvas_mut(&mut self) -> &mut Blend<RgbaImage> {
        &mut self.canvas
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas.0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.0.dimensions()
    }

    /// Write the figure as PNG.
    ///
    /// Encodes next to `path` and renames into place, so a failed write
    /// leaves no file under the final name.
    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        let partial = path.with_extension("part");
        let saved = self
            .canvas
            .0
            .save_with_format(&partial, ImageFormat::Png)
            .and_then(|()| fs::rename(&partial, path).map_err(ImageError::IoError));
        if saved.is_err() {
            let _ = fs::remove_file(&partial);
        }
        saved
    }
}
