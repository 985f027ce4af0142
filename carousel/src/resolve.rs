use crate::{ReleaseTarget, ReleaseTuning, SEGMENT_COUNT, SlotBuffer};

/// Picks the slot a released drag settles on and the offset that centers it.
///
/// `prior_pending_target` is the final offset of a release that has not settled yet. When the
/// user re-touches mid-flight, the new velocity is relative to where the viewport is *going*,
/// not where it is, so the distance still to travel is carried over.
///
/// Returns `None` for an empty buffer or non-positive geometry.
pub fn resolve_release_target(
    buffer: &SlotBuffer,
    tuning: &ReleaseTuning,
    velocity_x: f32,
    current_offset: f32,
    viewport_width: f32,
    prior_pending_target: Option<f32>,
) -> Option<ReleaseTarget> {
    let content_width = buffer.total_width();
    if buffer.is_empty() || !(viewport_width > 0.0 && content_width > 0.0) {
        return None;
    }
    if !current_offset.is_finite() {
        return None;
    }
    let velocity_x = if velocity_x.is_finite() {
        velocity_x
    } else {
        cwarn!(velocity_x, "non-finite release velocity treated as 0");
        0.0
    };

    let mut scaled = tuning.scale_velocity(velocity_x);
    let mut target_x = viewport_width / 2.0 + scaled;

    match prior_pending_target.filter(|t| t.is_finite()) {
        Some(prior) => {
            target_x += prior - current_offset;
            if scaled == 0.0 {
                // Stopped between items mid-flight: snap where we are.
                target_x = current_offset;
            }
        }
        None => target_x += current_offset,
    }

    // Only the fallback below sees the clamped value.
    let max_velocity = tuning.max_velocity(content_width);
    if scaled >= max_velocity {
        scaled = max_velocity;
    } else if scaled <= -max_velocity {
        scaled = -max_velocity;
    }

    if target_x > content_width || target_x < 0.0 {
        target_x = content_width / SEGMENT_COUNT as f32 + scaled;
    }

    let physical_index = buffer.nearest_slot(target_x)?;
    let slot = buffer.slot(physical_index)?;
    let offset = slot.center() - viewport_width / 2.0;

    cdebug!(
        velocity_x,
        scaled,
        target_x,
        physical_index,
        offset,
        continued = prior_pending_target.is_some(),
        "resolve_release_target"
    );

    Some(ReleaseTarget {
        offset,
        physical_index,
    })
}
