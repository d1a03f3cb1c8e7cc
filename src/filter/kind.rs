/// Filter kinds and their parameter capabilities
///
/// Each kind accepts a fixed subset of the four slider-driven parameters.
/// The table lives here instead of being discovered from a filter instance
/// at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four parameters the intensity slider can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Intensity,
    Radius,
    Scale,
    Center,
}

impl ParamKey {
    pub fn name(self) -> &'static str {
        match self {
            ParamKey::Intensity => "intensity",
            ParamKey::Radius => "radius",
            ParamKey::Scale => "scale",
            ParamKey::Center => "center",
        }
    }
}

/// The fixed set of filters offered by the chooser
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    BumpDistortion,
    GaussianBlur,
    Pixellate,
    SepiaTone,
    TwirlDistortion,
    UnsharpMask,
    Vignette,
}

impl FilterKind {
    /// Every kind, in the order the chooser lists them
    pub const ALL: [FilterKind; 7] = [
        FilterKind::BumpDistortion,
        FilterKind::GaussianBlur,
        FilterKind::Pixellate,
        FilterKind::SepiaTone,
        FilterKind::TwirlDistortion,
        FilterKind::UnsharpMask,
        FilterKind::Vignette,
    ];

    /// Stable kebab-case identifier (settings file, saved file names)
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::BumpDistortion => "bump-distortion",
            FilterKind::GaussianBlur => "gaussian-blur",
            FilterKind::Pixellate => "pixellate",
            FilterKind::SepiaTone => "sepia-tone",
            FilterKind::TwirlDistortion => "twirl-distortion",
            FilterKind::UnsharpMask => "unsharp-mask",
            FilterKind::Vignette => "vignette",
        }
    }

    /// Human-readable label for buttons
    pub fn title(self) -> &'static str {
        match self {
            FilterKind::BumpDistortion => "Bump Distortion",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::TwirlDistortion => "Twirl Distortion",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
        }
    }

    /// Parameters this kind accepts
    pub fn accepted(self) -> &'static [ParamKey] {
        use ParamKey::*;

        match self {
            FilterKind::BumpDistortion => &[Radius, Scale, Center],
            FilterKind::GaussianBlur => &[Radius],
            FilterKind::Pixellate => &[Scale, Center],
            FilterKind::SepiaTone => &[Intensity],
            FilterKind::TwirlDistortion => &[Radius, Center],
            FilterKind::UnsharpMask => &[Intensity, Radius],
            FilterKind::Vignette => &[Intensity, Radius],
        }
    }

    pub fn accepts(self, key: ParamKey) -> bool {
        self.accepted().contains(&key)
    }
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::SepiaTone
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error returned when a string names no known filter
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_accepts_something() {
        for kind in FilterKind::ALL {
            assert!(!kind.accepted().is_empty(), "{} accepts nothing", kind.name());
        }
    }

    #[test]
    fn test_capability_table() {
        assert!(FilterKind::SepiaTone.accepts(ParamKey::Intensity));
        assert!(!FilterKind::SepiaTone.accepts(ParamKey::Radius));

        assert!(FilterKind::GaussianBlur.accepts(ParamKey::Radius));
        assert!(!FilterKind::GaussianBlur.accepts(ParamKey::Intensity));

        assert!(FilterKind::Pixellate.accepts(ParamKey::Center));
        assert!(FilterKind::Pixellate.accepts(ParamKey::Scale));
        assert!(!FilterKind::Pixellate.accepts(ParamKey::Radius));

        assert_eq!(FilterKind::BumpDistortion.accepted().len(), 3);
    }

    #[test]
    fn test_parse_names() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.name().parse::<FilterKind>(), Ok(kind));
        }
        assert!("CISepiaTone".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&FilterKind::TwirlDistortion).unwrap();
        assert_eq!(json, "\"twirl-distortion\"");
    }
}
