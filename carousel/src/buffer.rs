use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::WidthCache;
use crate::{Item, PhysicalSlot, SEGMENT_COUNT, Segment};

/// The triplicated slot layout backing the infinite-wrap illusion.
///
/// `N` logical items are laid out three times back to back (PREV, MID, NEXT), left to right,
/// with no gap. Physical index `p` maps to logical index `p % N` and segment `p / N`.
#[derive(Clone, Debug, Default)]
pub struct SlotBuffer {
    items: Vec<Item>,
    slots: Vec<PhysicalSlot>,
    total_width: f32,
}

impl SlotBuffer {
    /// Builds the buffer from labels, measuring each label exactly once.
    pub fn build<L: Into<Arc<str>>>(
        labels: impl IntoIterator<Item = L>,
        measure_width: &dyn Fn(&str) -> f32,
    ) -> Self {
        let items = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Item::new(i, label))
            .collect();
        Self::build_cached(items, &mut WidthCache::new(), measure_width)
    }

    pub(crate) fn build_cached(
        items: Vec<Item>,
        cache: &mut WidthCache,
        measure_width: &dyn Fn(&str) -> f32,
    ) -> Self {
        let n = items.len();
        let widths: Vec<f32> = items
            .iter()
            .map(|item| measure_cached(item, cache, measure_width))
            .collect();

        let mut slots = Vec::with_capacity(n.saturating_mul(SEGMENT_COUNT));
        let mut x = 0.0f32;
        for segment in 0..SEGMENT_COUNT {
            for (item, &width) in items.iter().zip(&widths) {
                slots.push(PhysicalSlot {
                    index: segment * n + item.index(),
                    item: item.clone(),
                    origin: x,
                    width,
                    marked: false,
                });
                x += width;
            }
        }

        cdebug!(items = n, slots = slots.len(), total_width = x, "SlotBuffer::build");
        Self {
            items,
            slots,
            total_width: x,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn slots(&self) -> &[PhysicalSlot] {
        &self.slots
    }

    pub fn slot(&self, physical_index: usize) -> Option<&PhysicalSlot> {
        self.slots.get(physical_index)
    }

    /// Number of logical items (`N`).
    pub fn logical_len(&self) -> usize {
        self.items.len()
    }

    /// Number of physical slots (`3 * N`).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    pub fn segment_width(&self) -> f32 {
        self.total_width / SEGMENT_COUNT as f32
    }

    pub fn logical_of(&self, physical_index: usize) -> Option<usize> {
        (physical_index < self.len()).then(|| physical_index % self.logical_len())
    }

    pub fn segment_of(&self, physical_index: usize) -> Option<Segment> {
        (physical_index < self.len())
            .then(|| Segment::from_ordinal(physical_index / self.logical_len()))
    }

    /// The three physical indexes sharing `physical_index`'s logical item, in PREV/MID/NEXT
    /// order (the input itself included).
    pub fn mirrors(&self, physical_index: usize) -> Option<[usize; SEGMENT_COUNT]> {
        let logical = self.logical_of(physical_index)?;
        Some(self.mirrors_of_logical(logical))
    }

    fn mirrors_of_logical(&self, logical: usize) -> [usize; SEGMENT_COUNT] {
        let n = self.logical_len();
        [logical, logical + n, logical + 2 * n]
    }

    /// The slot whose frame contains `x` (half-open), if any.
    pub fn slot_at(&self, x: f32) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }
        let after = self.slots.partition_point(|s| s.origin <= x);
        let index = after.checked_sub(1)?;
        self.slots[index].contains(x).then_some(index)
    }

    /// Like [`Self::slot_at`], but falls back to the closest slot when `x` lies outside the
    /// laid-out range.
    ///
    /// Slots are contiguous over `[0, total_width)`, so a miss can only happen past either end;
    /// an outward unit-step scan from there always lands on the first (or last) non-empty slot,
    /// and never reaches both sides at once.
    pub fn nearest_slot(&self, x: f32) -> Option<usize> {
        if let Some(index) = self.slot_at(x) {
            return Some(index);
        }
        if x.is_nan() {
            return None;
        }
        if x < 0.0 {
            self.slots.iter().position(|s| s.width > 0.0)
        } else {
            self.slots.iter().rposition(|s| s.width > 0.0)
        }
    }

    /// Of the three copies of `logical`, the one whose center is closest to `x`.
    /// Ties resolve to the leftmost copy.
    pub fn nearest_mirror(&self, logical: usize, x: f32) -> Option<usize> {
        if logical >= self.logical_len() {
            return None;
        }
        let mut best: Option<(usize, f32)> = None;
        for index in self.mirrors_of_logical(logical) {
            let mut distance = self.slots[index].center() - x;
            if distance < 0.0 {
                distance = -distance;
            }
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Sets or clears the mark on all three copies of `logical`.
    pub(crate) fn set_marked(&mut self, logical: usize, marked: bool) {
        if logical >= self.logical_len() {
            return;
        }
        for index in self.mirrors_of_logical(logical) {
            self.slots[index].marked = marked;
        }
    }
}

fn measure_cached(item: &Item, cache: &mut WidthCache, measure_width: &dyn Fn(&str) -> f32) -> f32 {
    if let Some(&width) = cache.get(item.label()) {
        return width;
    }
    let measured = measure_width(item.label());
    let width = if measured.is_finite() && measured >= 0.0 {
        measured
    } else {
        cwarn!(
            index = item.index(),
            measured,
            "measure_width returned an invalid width; using 0"
        );
        0.0
    };
    cache.insert(Arc::clone(item.label_arc()), width);
    width
}
