use alloc::sync::Arc;

use carousel::{Carousel, CarouselOptions, SelectionChange, StepDirection};

use crate::{Easing, Tween};

/// What one [`Controller::tick`] produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// The scroll offset to render, after any wrap correction.
    pub offset: f32,
    /// Set on the frame where the settle animation finished.
    pub settled: Option<SelectionChange>,
}

/// A framework-neutral host for a [`Carousel`].
///
/// It plays the scroll surface's role: it owns the offset, applies the carousel's wrap
/// corrections, tweens toward release and forced-move targets, and reports the settle when a
/// tween completes. Adapters drive it by calling:
/// - `on_viewport_size` on layout
/// - `on_drag_start` / `on_drag` / `on_release` for gestures
/// - `tick(now_ms)` each frame/timer tick
#[derive(Clone, Debug)]
pub struct Controller {
    carousel: Carousel,
    offset: f32,
    tween: Option<Tween>,
    duration_ms: u64,
    easing: Easing,
}

impl Controller {
    pub fn new(options: CarouselOptions) -> Self {
        Self::from_carousel(Carousel::new(options))
    }

    pub fn from_carousel(carousel: Carousel) -> Self {
        let offset = carousel.offset();
        Self {
            carousel,
            offset,
            tween: None,
            duration_ms: 250,
            easing: Easing::default(),
        }
    }

    /// Sets the duration and curve used for settle animations.
    pub fn with_animation(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.duration_ms = duration_ms;
        self.easing = easing;
        self
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }

    pub fn into_carousel(self) -> Carousel {
        self.carousel
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    pub fn set_items<L: Into<Arc<str>>>(&mut self, labels: impl IntoIterator<Item = L>) {
        self.cancel_animation();
        self.carousel.set_items(labels);
    }

    /// Call this on every layout pass. The first one after items are loaded jumps to the
    /// default item.
    pub fn on_viewport_size(&mut self, width: f32) {
        if let Some(offset) = self.carousel.layout(width) {
            self.offset = offset;
        }
    }

    /// Touch down: stops any settle animation where it is.
    pub fn on_drag_start(&mut self) {
        self.cancel_animation();
        self.carousel.begin_drag();
    }

    /// Call this when the user drags the content to `offset`.
    pub fn on_drag(&mut self, offset: f32) {
        self.apply_offset(offset);
    }

    /// Touch up with a horizontal velocity. Starts the settle animation and returns its target.
    pub fn on_release(&mut self, velocity_x: f32, now_ms: u64) -> Option<f32> {
        let target = self.carousel.request_release_target(velocity_x)?;
        self.start_tween(target, now_ms);
        Some(target)
    }

    pub fn force_select(&mut self, logical: usize, now_ms: u64) -> Option<f32> {
        let target = self.carousel.force_select(logical)?;
        self.start_tween(target, now_ms);
        Some(target)
    }

    pub fn step(&mut self, direction: StepDirection, now_ms: u64) -> Option<f32> {
        let target = self.carousel.step(direction)?;
        self.start_tween(target, now_ms);
        Some(target)
    }

    /// A tap at `x` in viewport coordinates.
    pub fn tap(&mut self, x: f32, now_ms: u64) -> Option<f32> {
        let target = self.carousel.on_item_tapped(self.offset + x)?;
        self.start_tween(target, now_ms);
        Some(target)
    }

    /// Advances the settle animation.
    ///
    /// Returns `None` when nothing is animating.
    pub fn tick(&mut self, now_ms: u64) -> Option<Frame> {
        let tween = self.tween?;
        self.apply_offset(tween.sample(now_ms));

        let mut settled = None;
        if tween.is_done(now_ms) {
            self.tween = None;
            settled = self.carousel.notify_settled();
        }
        Some(Frame {
            offset: self.offset,
            settled,
        })
    }

    fn start_tween(&mut self, to: f32, now_ms: u64) {
        self.tween = Some(Tween::new(
            self.offset,
            to,
            now_ms,
            self.duration_ms,
            self.easing,
        ));
    }

    fn apply_offset(&mut self, offset: f32) {
        self.offset = offset;
        if let Some(corrected) = self.carousel.report_offset_changed(offset) {
            // The corrective write is ours; it is not reported back.
            self.offset = corrected;
            if let Some(tween) = &mut self.tween {
                tween.shift(corrected - offset);
            }
        }
    }
}
