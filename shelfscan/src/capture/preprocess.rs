//! Frame preprocessing before OCR
//!
//! Grayscale uses the plain channel mean `(r + g + b) / 3` rounded to the
//! nearest integer, written back to all three channels. Alpha is kept.

use crate::models::RawCapture;
use image::RgbaImage;
use shelfscan_common::config::CaptureConfig;

#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    grayscale: bool,
}

impl Preprocessor {
    pub fn new(grayscale: bool) -> Self {
        Self { grayscale }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.grayscale)
    }

    pub fn is_enabled(&self) -> bool {
        self.grayscale
    }

    pub fn apply(&self, mut capture: RawCapture) -> RawCapture {
        if self.grayscale {
            to_grayscale(capture.image_mut());
        }
        capture
    }
}

pub fn to_grayscale(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let avg = ((r as u16 + g as u16 + b as u16) as f32 / 3.0).round() as u8;
        pixel.0[0] = avg;
        pixel.0[1] = avg;
        pixel.0[2] = avg;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_grayscale_uses_channel_mean() {
        let mut image = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 31, 128]));
        to_grayscale(&mut image);
        // (10 + 20 + 31) / 3 = 20.33
        assert_eq!(image.get_pixel(0, 0).0, [20, 20, 20, 128]);

        let mut image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 254, 255]));
        to_grayscale(&mut image);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_disabled_preprocessor_leaves_pixels() {
        let capture = RawCapture::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();
        let out = Preprocessor::new(false).apply(capture);
        assert_eq!(out.pixels(), &[1, 2, 3, 4]);

        let capture = RawCapture::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();
        let out = Preprocessor::new(true).apply(capture);
        assert_eq!(out.pixels(), &[2, 2, 2, 4]);
    }
}
