/// Import transition for the image view
///
/// Idle → Picking → FadingOut → ImageSwapped → FadingIn → Idle
///
/// The new picture is handed over exactly once, between the two fades,
/// while the view is fully transparent.

use image::RgbaImage;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// File dialog open or picture decoding
    Picking,
    FadingOut { started: Instant, pending: RgbaImage },
    /// The picture has been handed to the session; waiting for the fade-in
    ImageSwapped,
    FadingIn { started: Instant },
}

#[derive(Debug, Clone)]
pub struct Transition {
    phase: Phase,
    fade: Duration,
    alpha: f32,
}

impl Transition {
    pub fn new(fade: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            fade,
            alpha: 1.0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Opacity of the image view
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// True while ticks are needed
    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            Phase::FadingOut { .. } | Phase::ImageSwapped | Phase::FadingIn { .. }
        )
    }

    /// Start an import; only possible from Idle
    pub fn begin_picking(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Picking;
        true
    }

    /// Dialog dismissed or decode failed
    pub fn cancel_picking(&mut self) {
        if self.phase == Phase::Picking {
            self.phase = Phase::Idle;
        }
    }

    /// A decoded picture arrived; start fading the current one out
    pub fn picked(&mut self, image: RgbaImage, now: Instant) {
        if self.phase != Phase::Picking {
            log::debug!("Dropping picked image: no import in progress");
            return;
        }
        self.phase = Phase::FadingOut {
            started: now,
            pending: image,
        };
    }

    /// Advance the animation
    ///
    /// Returns the picked image once the fade-out has finished; the caller
    /// loads it into the session.
    pub fn tick(&mut self, now: Instant) -> Option<RgbaImage> {
        match &self.phase {
            Phase::FadingOut { started, .. } => {
                let t = self.progress(*started, now);
                self.alpha = 1.0 - t;
                if t < 1.0 {
                    return None;
                }
                let previous = std::mem::replace(&mut self.phase, Phase::ImageSwapped);
                match previous {
                    Phase::FadingOut { pending, .. } => Some(pending),
                    _ => None,
                }
            }
            Phase::ImageSwapped => {
                self.alpha = 0.0;
                self.phase = Phase::FadingIn { started: now };
                None
            }
            Phase::FadingIn { started } => {
                let t = self.progress(*started, now);
                self.alpha = t;
                if t >= 1.0 {
                    self.phase = Phase::Idle;
                }
                None
            }
            Phase::Idle | Phase::Picking => {
                self.alpha = 1.0;
                None
            }
        }
    }

    fn progress(&self, started: Instant, now: Instant) -> f32 {
        if self.fade.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f32() / self.fade.as_secs_f32()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: Duration = Duration::from_millis(500);

    fn picture() -> RgbaImage {
        RgbaImage::new(2, 2)
    }

    #[test]
    fn test_full_sequence() {
        let start = Instant::now();
        let mut t = Transition::new(FADE);

        assert!(t.begin_picking());
        assert_eq!(t.phase(), &Phase::Picking);

        t.picked(picture(), start);
        assert!(t.is_animating());

        assert!(t.tick(start + Duration::from_millis(250)).is_none());
        assert!((t.alpha() - 0.5).abs() < 1e-3);

        let swapped = t.tick(start + FADE);
        assert_eq!(swapped, Some(picture()));
        assert_eq!(t.phase(), &Phase::ImageSwapped);
        assert_eq!(t.alpha(), 0.0);

        let fade_in = start + FADE + Duration::from_millis(16);
        assert!(t.tick(fade_in).is_none());
        assert!(matches!(t.phase(), Phase::FadingIn { .. }));

        assert!(t.tick(fade_in + FADE).is_none());
        assert_eq!(t.phase(), &Phase::Idle);
        assert_eq!(t.alpha(), 1.0);
        assert!(!t.is_animating());
    }

    #[test]
    fn test_image_handed_over_once() {
        let start = Instant::now();
        let mut t = Transition::new(FADE);
        t.begin_picking();
        t.picked(picture(), start);

        let handed: usize = (0..100)
            .map(|i| t.tick(start + Duration::from_millis(i * 20)))
            .filter(Option::is_some)
            .count();
        assert_eq!(handed, 1);
    }

    #[test]
    fn test_cannot_begin_twice() {
        let mut t = Transition::new(FADE);
        assert!(t.begin_picking());
        assert!(!t.begin_picking());

        t.cancel_picking();
        assert_eq!(t.phase(), &Phase::Idle);
        assert!(t.begin_picking());
    }

    #[test]
    fn test_picked_without_picking_is_ignored() {
        let mut t = Transition::new(FADE);
        t.picked(picture(), Instant::now());
        assert_eq!(t.phase(), &Phase::Idle);
    }

    #[test]
    fn test_zero_fade_swaps_on_first_tick() {
        let now = Instant::now();
        let mut t = Transition::new(Duration::ZERO);
        t.begin_picking();
        t.picked(picture(), now);
        assert!(t.tick(now).is_some());
    }
}
