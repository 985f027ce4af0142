use alloc::sync::Arc;

use crate::CarouselError;

/// Host-supplied text measurement: returns the slot width for a label.
///
/// This must be a pure function of the label (and whatever font the host uses); results are
/// cached per label.
pub type MeasureWidth = Arc<dyn Fn(&str) -> f32 + Send + Sync>;

/// Fired with the newly selected logical index.
pub type OnSelectionChanged = Arc<dyn Fn(usize) + Send + Sync>;

/// Empirically tuned constants used by the release target resolver.
///
/// The defaults reproduce the classic picker feel: gentle releases travel `velocity * 300`,
/// flicks faster than `2.2` switch to `velocity * 200`, and the fallback excursion is capped at
/// a sixth of the content width.
///
/// With `feature = "serde"`, missing fields deserialize to their defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReleaseTuning {
    /// Velocity multiplier below the flick threshold.
    pub gentle_scale: f32,
    /// Velocity multiplier above the flick threshold.
    pub flick_scale: f32,
    /// Absolute velocity above which a release counts as a flick (exclusive).
    pub flick_threshold: f32,
    /// `max_velocity = content_width / max_velocity_divisor`.
    pub max_velocity_divisor: f32,
}

impl Default for ReleaseTuning {
    fn default() -> Self {
        Self {
            gentle_scale: 300.0,
            flick_scale: 200.0,
            flick_threshold: 2.2,
            max_velocity_divisor: 6.0,
        }
    }
}

impl ReleaseTuning {
    pub fn is_flick(&self, velocity_x: f32) -> bool {
        velocity_x > self.flick_threshold || velocity_x < -self.flick_threshold
    }

    /// Converts a raw release velocity into a distance in content units.
    pub fn scale_velocity(&self, velocity_x: f32) -> f32 {
        if self.is_flick(velocity_x) {
            velocity_x * self.flick_scale
        } else {
            velocity_x * self.gentle_scale
        }
    }

    pub fn max_velocity(&self, content_width: f32) -> f32 {
        content_width / self.max_velocity_divisor
    }

    pub fn validate(&self) -> Result<(), CarouselError> {
        let fields = [
            ("gentle_scale", self.gentle_scale),
            ("flick_scale", self.flick_scale),
            ("flick_threshold", self.flick_threshold),
            ("max_velocity_divisor", self.max_velocity_divisor),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(CarouselError::InvalidTuning { field, value });
            }
        }
        Ok(())
    }
}

/// Configuration for [`crate::Carousel`].
///
/// Cheap to clone: callbacks are stored in `Arc`s.
#[derive(Clone)]
pub struct CarouselOptions {
    pub measure_width: MeasureWidth,
    pub on_selection_changed: Option<OnSelectionChanged>,
    pub tuning: ReleaseTuning,
    /// Logical index selected (silently) on the first layout pass after items are loaded.
    pub default_index: usize,
}

impl CarouselOptions {
    pub fn new(measure_width: impl Fn(&str) -> f32 + Send + Sync + 'static) -> Self {
        Self {
            measure_width: Arc::new(measure_width),
            on_selection_changed: None,
            tuning: ReleaseTuning::default(),
            default_index: 0,
        }
    }

    /// Options where every label gets the same slot width (e.g. a third of the viewport).
    pub fn uniform(width: f32) -> Self {
        Self::new(move |_| width)
    }

    pub fn with_measure_width(
        mut self,
        measure_width: impl Fn(&str) -> f32 + Send + Sync + 'static,
    ) -> Self {
        self.measure_width = Arc::new(measure_width);
        self
    }

    pub fn with_on_selection_changed(
        mut self,
        on_selection_changed: Option<impl Fn(usize) + Send + Sync + 'static>,
    ) -> Self {
        self.on_selection_changed =
            on_selection_changed.map(|f| Arc::new(f) as OnSelectionChanged);
        self
    }

    pub fn with_tuning(mut self, tuning: ReleaseTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_default_index(mut self, default_index: usize) -> Self {
        self.default_index = default_index;
        self
    }
}

impl core::fmt::Debug for CarouselOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CarouselOptions")
            .field("tuning", &self.tuning)
            .field("default_index", &self.default_index)
            .field(
                "on_selection_changed",
                &self.on_selection_changed.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}
