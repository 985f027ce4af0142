use alloc::sync::Arc;

/// Number of back-to-back copies of the item list held by the slot buffer.
pub const SEGMENT_COUNT: usize = 3;

/// A logical item: an immutable label plus its position in the loaded list.
///
/// Cloning is cheap; all physical copies of an item share the same label allocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    index: usize,
    label: Arc<str>,
}

impl Item {
    pub fn new(index: usize, label: impl Into<Arc<str>>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn label_arc(&self) -> &Arc<str> {
        &self.label
    }
}

/// Which copy of the item list a physical slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    Prev,
    Mid,
    Next,
}

impl Segment {
    pub(crate) fn from_ordinal(ordinal: usize) -> Self {
        match ordinal {
            0 => Self::Prev,
            1 => Self::Mid,
            _ => Self::Next,
        }
    }
}

/// One of the `3 * N` laid-out positions in the slot buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicalSlot {
    pub(crate) index: usize,
    pub(crate) item: Item,
    pub(crate) origin: f32,
    pub(crate) width: f32,
    pub(crate) marked: bool,
}

impl PhysicalSlot {
    /// Physical index in `0..3N`.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn logical_index(&self) -> usize {
        self.item.index
    }

    /// Left edge in content coordinates.
    pub fn origin(&self) -> f32 {
        self.origin
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Right edge in content coordinates (exclusive).
    pub fn end(&self) -> f32 {
        self.origin + self.width
    }

    pub fn center(&self) -> f32 {
        self.origin + self.width / 2.0
    }

    /// Whether this slot is drawn as the selected item. All three mirrors of the selected
    /// logical item carry the mark.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Half-open containment: `origin <= x < end`.
    pub fn contains(&self, x: f32) -> bool {
        self.origin <= x && x < self.end()
    }
}

/// Lifecycle of a carousel instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// No items loaded.
    Uninitialized,
    /// Items loaded, no default selection resolved yet.
    Loaded,
    /// At rest on the given logical index.
    Settled(usize),
    /// The user is dragging the viewport.
    Dragging,
    /// A release or forced move was handed to the host; waiting for its settle report.
    Settling,
}

/// Direction for button-driven advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepDirection {
    Forward,
    Backward,
}

/// The outcome of a release: where the host must animate to and which slot ends up centered.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReleaseTarget {
    pub offset: f32,
    pub physical_index: usize,
}

/// Result of committing a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionChange {
    pub logical_index: usize,
    pub physical_index: usize,
    pub previous_logical_index: Option<usize>,
    /// Whether the selection listener was invoked for this settle.
    pub notified: bool,
}
