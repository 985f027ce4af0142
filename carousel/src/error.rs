use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum CarouselError {
    /// A tuning constant is not a finite, strictly positive number.
    #[error("release tuning `{field}` must be finite and positive (got {value})")]
    InvalidTuning { field: &'static str, value: f32 },

    /// A physical slot index outside `0..3N`.
    #[error("physical slot {index} is out of range (slot count {len})")]
    SlotOutOfRange { index: usize, len: usize },
}
