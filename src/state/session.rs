/// Filter session: the (source image, filter kind, intensity) triple
///
/// Every change to an input recomputes the output through the engine. When
/// the engine yields nothing, the previous output is kept so the display
/// never regresses.

use image::RgbaImage;

use crate::filter::{CpuEngine, FilterConfig, FilterEngine, FilterKind, Intensity};

/// An output image with the filter and intensity that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub image: RgbaImage,
    pub filter: FilterKind,
    pub intensity: Intensity,
}

#[derive(Debug)]
pub struct FilterSession<E = CpuEngine> {
    engine: E,
    source: Option<RgbaImage>,
    filter: FilterKind,
    intensity: Intensity,
    output: Option<Snapshot>,
}

impl FilterSession<CpuEngine> {
    pub fn new(filter: FilterKind, intensity: Intensity) -> Self {
        Self::with_engine(CpuEngine::new(), filter, intensity)
    }
}

impl<E: FilterEngine> FilterSession<E> {
    pub fn with_engine(engine: E, filter: FilterKind, intensity: Intensity) -> Self {
        Self {
            engine,
            source: None,
            filter,
            intensity,
            output: None,
        }
    }

    /// Replace the source image and recompute with the current filter
    pub fn load_image(&mut self, image: RgbaImage) {
        log::info!("Loaded {}x{} source image", image.width(), image.height());
        self.source = Some(image);
        self.recompute();
    }

    /// Switch filters; ignored until an image has been loaded
    ///
    /// Returns whether the selection took effect.
    pub fn select_filter(&mut self, kind: FilterKind) -> bool {
        if self.source.is_none() {
            log::debug!("Ignoring {} selection: no image loaded", kind.name());
            return false;
        }
        self.filter = kind;
        self.recompute();
        true
    }

    /// Store the slider value (clamped) and recompute
    pub fn set_intensity(&mut self, value: f32) {
        self.intensity = Intensity::new(value);
        self.recompute();
    }

    /// The configuration the engine would receive right now
    pub fn config(&self) -> Option<FilterConfig> {
        let source = self.source.as_ref()?;
        Some(FilterConfig::bind(
            self.filter,
            self.intensity,
            source.width(),
            source.height(),
        ))
    }

    /// Derive the output for the current triple
    pub fn render(&self) -> Option<RgbaImage> {
        let source = self.source.as_ref()?;
        let config = self.config()?;
        log::debug!(
            "Rendering {} with [{}]",
            config.kind().name(),
            config
                .parameters()
                .iter()
                .map(|(key, _)| key.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.engine.apply(source, &config)
    }

    fn recompute(&mut self) {
        if self.source.is_none() {
            return;
        }
        match self.render() {
            Some(image) => {
                self.output = Some(Snapshot {
                    image,
                    filter: self.filter,
                    intensity: self.intensity,
                })
            }
            None => log::debug!(
                "{} produced no output at intensity {:.2}, keeping previous image",
                self.filter.name(),
                self.intensity.value()
            ),
        }
    }

    /// The displayed output, labelled with the settings that rendered it
    ///
    /// After a failed render the filter and intensity here can lag behind
    /// the session's current ones.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.output.clone()
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn source(&self) -> Option<&RgbaImage> {
        self.source.as_ref()
    }

    pub fn output(&self) -> Option<&RgbaImage> {
        self.output.as_ref().map(|snapshot| &snapshot.image)
    }
}
