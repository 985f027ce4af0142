/// A lightweight, serializable snapshot of a carousel's geometry and selection.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarouselState {
    pub content_width: f32,
    /// The shared slot width when every item measured the same, `None` otherwise.
    pub item_width: Option<f32>,
    pub visible_width: f32,
    pub current_offset: f32,
    pub selected_logical_index: Option<usize>,
    pub selected_physical_index: Option<usize>,
    pub pending_release_target_offset: Option<f32>,
}
