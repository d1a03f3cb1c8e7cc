/// Slider-to-parameter binding
///
/// A single intensity value in [0, 1] drives every filter. Each kind takes
/// only the parameters it accepts, computed from the same table:
/// - intensity: the slider value
/// - radius: slider × 200
/// - scale: slider × 10
/// - center: the image midpoint

use cgmath::Point2;
use serde::{Deserialize, Serialize};

use super::kind::{FilterKind, ParamKey};

/// Radius per unit of slider travel
pub const RADIUS_FACTOR: f32 = 200.0;
/// Scale per unit of slider travel
pub const SCALE_FACTOR: f32 = 10.0;
/// Rotation of the twirl distortion, in radians
pub const TWIRL_ANGLE: f32 = std::f32::consts::PI;

/// Normalized slider value, always within [0, 1]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd)]
#[serde(from = "f32", into = "f32")]
pub struct Intensity(f32);

impl Intensity {
    pub const MIN: Intensity = Intensity(0.0);
    pub const MAX: Intensity = Intensity(1.0);

    /// Clamp any input into range; NaN becomes 0
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Intensity(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn radius(self) -> f32 {
        self.0 * RADIUS_FACTOR
    }

    pub fn scale(self) -> f32 {
        self.0 * SCALE_FACTOR
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Intensity(0.5)
    }
}

impl From<f32> for Intensity {
    fn from(value: f32) -> Self {
        Intensity::new(value)
    }
}

impl From<Intensity> for f32 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

/// A bound parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Point(Point2<f32>),
}

/// A filter together with exactly the parameters its kind accepts
///
/// Building a variant is the only way to set parameters, so a kind can never
/// receive a key it does not declare.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterConfig {
    BumpDistortion { center: Point2<f32>, radius: f32, scale: f32 },
    GaussianBlur { radius: f32 },
    Pixellate { center: Point2<f32>, scale: f32 },
    SepiaTone { intensity: f32 },
    TwirlDistortion { center: Point2<f32>, radius: f32, angle: f32 },
    UnsharpMask { radius: f32, intensity: f32 },
    Vignette { radius: f32, intensity: f32 },
}

impl FilterConfig {
    /// Apply the parameter table for `kind` to an image of `width` × `height`
    pub fn bind(kind: FilterKind, intensity: Intensity, width: u32, height: u32) -> Self {
        let center = Point2::new(width as f32 * 0.5, height as f32 * 0.5);

        let config = match kind {
            FilterKind::BumpDistortion => FilterConfig::BumpDistortion {
                center,
                radius: intensity.radius(),
                scale: intensity.scale(),
            },
            FilterKind::GaussianBlur => FilterConfig::GaussianBlur {
                radius: intensity.radius(),
            },
            FilterKind::Pixellate => FilterConfig::Pixellate {
                center,
                scale: intensity.scale(),
            },
            FilterKind::SepiaTone => FilterConfig::SepiaTone {
                intensity: intensity.value(),
            },
            FilterKind::TwirlDistortion => FilterConfig::TwirlDistortion {
                center,
                radius: intensity.radius(),
                angle: TWIRL_ANGLE,
            },
            FilterKind::UnsharpMask => FilterConfig::UnsharpMask {
                radius: intensity.radius(),
                intensity: intensity.value(),
            },
            FilterKind::Vignette => FilterConfig::Vignette {
                radius: intensity.radius(),
                intensity: intensity.value(),
            },
        };

        debug_assert!(
            config.matches_capabilities(),
            "{} bound parameters outside its capability table",
            kind.name()
        );
        config
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterConfig::BumpDistortion { .. } => FilterKind::BumpDistortion,
            FilterConfig::GaussianBlur { .. } => FilterKind::GaussianBlur,
            FilterConfig::Pixellate { .. } => FilterKind::Pixellate,
            FilterConfig::SepiaTone { .. } => FilterKind::SepiaTone,
            FilterConfig::TwirlDistortion { .. } => FilterKind::TwirlDistortion,
            FilterConfig::UnsharpMask { .. } => FilterKind::UnsharpMask,
            FilterConfig::Vignette { .. } => FilterKind::Vignette,
        }
    }

    /// The slider-driven parameters bound in this configuration
    ///
    /// The twirl angle is a fixed constant, not a slider parameter, and is
    /// not listed.
    pub fn parameters(&self) -> Vec<(ParamKey, ParamValue)> {
        use ParamValue::{Point, Scalar};

        match *self {
            FilterConfig::BumpDistortion { center, radius, scale } => vec![
                (ParamKey::Radius, Scalar(radius)),
                (ParamKey::Scale, Scalar(scale)),
                (ParamKey::Center, Point(center)),
            ],
            FilterConfig::GaussianBlur { radius } => vec![(ParamKey::Radius, Scalar(radius))],
            FilterConfig::Pixellate { center, scale } => vec![
                (ParamKey::Scale, Scalar(scale)),
                (ParamKey::Center, Point(center)),
            ],
            FilterConfig::SepiaTone { intensity } => {
                vec![(ParamKey::Intensity, Scalar(intensity))]
            }
            FilterConfig::TwirlDistortion { center, radius, .. } => vec![
                (ParamKey::Radius, Scalar(radius)),
                (ParamKey::Center, Point(center)),
            ],
            FilterConfig::UnsharpMask { radius, intensity } => vec![
                (ParamKey::Intensity, Scalar(intensity)),
                (ParamKey::Radius, Scalar(radius)),
            ],
            FilterConfig::Vignette { radius, intensity } => vec![
                (ParamKey::Intensity, Scalar(intensity)),
                (ParamKey::Radius, Scalar(radius)),
            ],
        }
    }

    pub fn get(&self, key: ParamKey) -> Option<ParamValue> {
        self.parameters()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// True when the bound keys are exactly the keys the kind accepts
    pub fn matches_capabilities(&self) -> bool {
        let kind = self.kind();
        let bound = self.parameters();
        bound.len() == kind.accepted().len()
            && bound.iter().all(|(key, _)| kind.accepts(*key))
            && kind.accepted().iter().all(|key| self.get(*key).is_some())
    }

    /// True when every bound value is finite
    pub fn is_finite(&self) -> bool {
        self.parameters().iter().all(|(_, value)| match value {
            ParamValue::Scalar(v) => v.is_finite(),
            ParamValue::Point(p) => p.x.is_finite() && p.y.is_finite(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_clamps() {
        assert_eq!(Intensity::new(-0.3).value(), 0.0);
        assert_eq!(Intensity::new(1.7).value(), 1.0);
        assert_eq!(Intensity::new(f32::NAN).value(), 0.0);
        assert_eq!(Intensity::new(0.25).value(), 0.25);
    }

    #[test]
    fn test_bound_keys_match_capabilities() {
        for kind in FilterKind::ALL {
            for v in [0.0, 0.25, 0.5, 1.0] {
                let config = FilterConfig::bind(kind, Intensity::new(v), 640, 480);
                let mut keys: Vec<_> = config.parameters().iter().map(|(k, _)| *k).collect();
                let mut expected = kind.accepted().to_vec();
                keys.sort_by_key(|k| k.name());
                expected.sort_by_key(|k| k.name());
                assert_eq!(keys, expected, "{}", kind.name());
                assert_eq!(config.kind(), kind);
            }
        }
    }

    #[test]
    fn test_values_follow_table() {
        let v = Intensity::new(0.3);
        for kind in FilterKind::ALL {
            let config = FilterConfig::bind(kind, v, 640, 480);
            for (key, value) in config.parameters() {
                let expected = match key {
                    ParamKey::Intensity => ParamValue::Scalar(0.3),
                    ParamKey::Radius => ParamValue::Scalar(0.3 * 200.0),
                    ParamKey::Scale => ParamValue::Scalar(0.3 * 10.0),
                    ParamKey::Center => ParamValue::Point(Point2::new(320.0, 240.0)),
                };
                assert_eq!(value, expected, "{} {}", kind.name(), key.name());
            }
        }
    }

    #[test]
    fn test_sepia_then_blur_example() {
        let v = Intensity::new(0.5);

        let sepia = FilterConfig::bind(FilterKind::SepiaTone, v, 100, 80);
        assert_eq!(sepia, FilterConfig::SepiaTone { intensity: 0.5 });

        let blur = FilterConfig::bind(FilterKind::GaussianBlur, v, 100, 80);
        assert_eq!(blur, FilterConfig::GaussianBlur { radius: 100.0 });
        assert_eq!(blur.get(ParamKey::Intensity), None);
    }

    #[test]
    fn test_twirl_angle_is_fixed() {
        for v in [0.0, 1.0] {
            match FilterConfig::bind(FilterKind::TwirlDistortion, Intensity::new(v), 10, 10) {
                FilterConfig::TwirlDistortion { angle, .. } => assert_eq!(angle, TWIRL_ANGLE),
                other => panic!("unexpected config {:?}", other),
            }
        }
    }

    #[test]
    fn test_every_binding_matches_capabilities() {
        for kind in FilterKind::ALL {
            let config = FilterConfig::bind(kind, Intensity::new(0.6), 32, 32);
            assert!(config.matches_capabilities(), "{}", kind.name());
        }
    }

    #[test]
    fn test_non_finite_detection() {
        let config = FilterConfig::GaussianBlur { radius: f32::INFINITY };
        assert!(!config.is_finite());
        assert!(FilterConfig::bind(FilterKind::Vignette, Intensity::MAX, 1, 1).is_finite());
    }
}
