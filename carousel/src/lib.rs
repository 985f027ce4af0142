//! A headless circular (infinite-wrap) item selector engine.
//!
//! For host-side utilities (a simulated scroll surface with tweened settling), see the
//! `carousel-adapter` crate.
//!
//! A short list of labeled items scrolls as if it were an endless loop and always snaps to
//! exactly one selected item. The illusion is built from a flat buffer holding three copies of
//! the items; whenever the viewport drifts into the first or last copy, the engine advises the
//! host to jump back by one copy's width, which is invisible to the user.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - a text measurement function for item labels
//! - the viewport width and every scroll offset change
//! - drag release velocities and a "scrolling stopped" notification
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod buffer;
mod carousel;
mod error;
mod key;
mod normalize;
mod options;
mod resolve;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use buffer::SlotBuffer;
pub use carousel::Carousel;
pub use error::CarouselError;
pub use normalize::normalize_offset;
pub use options::{CarouselOptions, MeasureWidth, OnSelectionChanged, ReleaseTuning};
pub use resolve::resolve_release_target;
pub use state::CarouselState;
pub use types::{
    Item, Phase, PhysicalSlot, ReleaseTarget, SEGMENT_COUNT, Segment, SelectionChange,
    StepDirection,
};
