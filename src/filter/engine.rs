/// Filter processing backend
///
/// The session only knows the `FilterEngine` trait. `CpuEngine` is the
/// built-in implementation; tests substitute recording engines.

use image::RgbaImage;

use super::ops;
use super::params::FilterConfig;

/// Turns a source image and a bound configuration into an output image
pub trait FilterEngine {
    /// Returns `None` when the filter yields no output for these inputs
    fn apply(&self, source: &RgbaImage, config: &FilterConfig) -> Option<RgbaImage>;
}

/// CPU implementation of every filter kind
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuEngine;

impl CpuEngine {
    pub fn new() -> Self {
        Self
    }
}

impl FilterEngine for CpuEngine {
    fn apply(&self, source: &RgbaImage, config: &FilterConfig) -> Option<RgbaImage> {
        if source.width() == 0 || source.height() == 0 || !config.is_finite() {
            return None;
        }

        match *config {
            FilterConfig::BumpDistortion { center, radius, scale } => {
                ops::bump_distortion(source, center, radius, scale)
            }
            FilterConfig::GaussianBlur { radius } => ops::gaussian_blur(source, radius),
            FilterConfig::Pixellate { center, scale } => ops::pixellate(source, center, scale),
            FilterConfig::SepiaTone { intensity } => ops::sepia_tone(source, intensity),
            FilterConfig::TwirlDistortion { center, radius, angle } => {
                ops::twirl_distortion(source, center, radius, angle)
            }
            FilterConfig::UnsharpMask { radius, intensity } => {
                ops::unsharp_mask(source, radius, intensity)
            }
            FilterConfig::Vignette { radius, intensity } => ops::vignette(source, radius, intensity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterKind, Intensity};
    use image::Rgba;

    #[test]
    fn test_every_kind_renders() {
        let img = RgbaImage::from_fn(48, 32, |x, y| Rgba([(x * 5) as u8, (y * 7) as u8, 90, 255]));
        for kind in FilterKind::ALL {
            let config = FilterConfig::bind(kind, Intensity::new(0.2), img.width(), img.height());
            let out = CpuEngine::new().apply(&img, &config);
            let out = out.unwrap_or_else(|| panic!("{} produced nothing", kind.name()));
            assert_eq!(out.dimensions(), img.dimensions());
        }
    }

    #[test]
    fn test_empty_image_yields_nothing() {
        let img = RgbaImage::new(0, 0);
        let config = FilterConfig::bind(FilterKind::SepiaTone, Intensity::MAX, 0, 0);
        assert!(CpuEngine::new().apply(&img, &config).is_none());
    }

    #[test]
    fn test_non_finite_parameters_yield_nothing() {
        let img = RgbaImage::new(4, 4);
        let config = FilterConfig::GaussianBlur { radius: f32::NAN };
        assert!(CpuEngine::new().apply(&img, &config).is_none());
    }
}
