use crate::SEGMENT_COUNT;

/// Computes the offset correction that keeps the viewport inside the MID segment.
///
/// - Offsets at or past `2 * segment` are pulled back one segment.
/// - Offsets whose viewport ends at or before `segment` are pushed forward one segment.
/// - Anything else is already in MID and returns `None`.
///
/// Non-positive geometry and corrections that would not land on a positive offset also return
/// `None`. This runs on every reported scroll offset, so it stays O(1) and allocation-free.
pub fn normalize_offset(reported_offset: f32, viewport_width: f32, content_width: f32) -> Option<f32> {
    if !(viewport_width > 0.0 && content_width > 0.0) || !reported_offset.is_finite() {
        return None;
    }

    let segment = content_width / SEGMENT_COUNT as f32;
    let corrected = if reported_offset >= segment * 2.0 {
        reported_offset - segment
    } else if reported_offset + viewport_width <= segment {
        reported_offset + segment
    } else {
        return None;
    };

    (corrected > 0.0).then_some(corrected)
}
