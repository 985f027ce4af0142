use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::WidthCache;
use crate::{
    CarouselError, CarouselOptions, CarouselState, Item, OnSelectionChanged, Phase, PhysicalSlot,
    ReleaseTarget, ReleaseTuning, SelectionChange, SlotBuffer, StepDirection, normalize_offset,
    resolve_release_target,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingSettle {
    logical: usize,
    forced: bool,
}

/// A headless circular item selector.
///
/// The carousel never owns the scroll position. The host reports offsets, applies the
/// corrections and targets it gets back, and reports when the viewport comes to rest:
///
/// - [`Self::layout`] after the viewport is sized (resolves the default selection silently)
/// - [`Self::report_offset_changed`] on every scroll offset change
/// - [`Self::begin_drag`] / [`Self::request_release_target`] around a drag gesture
/// - [`Self::notify_settled`] once the viewport stops at the requested offset
///
/// Programmatic moves ([`Self::force_select`], [`Self::step`], [`Self::on_item_tapped`]) return
/// the offset to move to and settle through the same `notify_settled` path.
#[derive(Clone, Debug)]
pub struct Carousel {
    options: CarouselOptions,
    buffer: SlotBuffer,
    widths: WidthCache,

    viewport_width: f32,
    offset: f32,
    phase: Phase,

    selected_logical: Option<usize>,
    selected_physical: Option<usize>,
    pending_release_target: Option<f32>,
    pending_settle: Option<PendingSettle>,
}

impl Carousel {
    pub fn new(options: CarouselOptions) -> Self {
        debug_assert!(
            options.tuning.validate().is_ok(),
            "invalid release tuning: {:?}",
            options.tuning
        );
        Self {
            options,
            buffer: SlotBuffer::default(),
            widths: WidthCache::new(),
            viewport_width: 0.0,
            offset: 0.0,
            phase: Phase::Uninitialized,
            selected_logical: None,
            selected_physical: None,
            pending_release_target: None,
            pending_settle: None,
        }
    }

    /// Like [`Self::new`], but rejects invalid tuning constants.
    pub fn try_new(options: CarouselOptions) -> Result<Self, CarouselError> {
        options.tuning.validate()?;
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    pub fn set_tuning(&mut self, tuning: ReleaseTuning) -> Result<(), CarouselError> {
        tuning.validate()?;
        self.options.tuning = tuning;
        Ok(())
    }

    pub fn set_on_selection_changed(
        &mut self,
        on_selection_changed: Option<impl Fn(usize) + Send + Sync + 'static>,
    ) {
        self.options.on_selection_changed =
            on_selection_changed.map(|f| Arc::new(f) as OnSelectionChanged);
    }

    /// Replaces the item list.
    ///
    /// Rebuilds all slots and clears the selection; the next [`Self::layout`] resolves the
    /// default index again. Labels measured before are served from the width cache.
    pub fn set_items<L: Into<Arc<str>>>(&mut self, labels: impl IntoIterator<Item = L>) {
        let items: Vec<Item> = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Item::new(i, label))
            .collect();
        self.buffer =
            SlotBuffer::build_cached(items, &mut self.widths, &*self.options.measure_width);

        self.selected_logical = None;
        self.selected_physical = None;
        self.pending_release_target = None;
        self.pending_settle = None;
        self.phase = if self.buffer.is_empty() {
            Phase::Uninitialized
        } else {
            Phase::Loaded
        };
        cdebug!(
            count = self.buffer.logical_len(),
            content_width = self.buffer.total_width(),
            "Carousel::set_items"
        );
    }

    /// Drops all cached label widths and re-measures the current items.
    ///
    /// The current selection is kept. Returns the offset that re-centers it under the new
    /// layout, if there is one.
    pub fn reset_measurements(&mut self) -> Option<f32> {
        self.widths.clear();
        let items = self.buffer.items().to_vec();
        self.buffer =
            SlotBuffer::build_cached(items, &mut self.widths, &*self.options.measure_width);
        if let Some(logical) = self.selected_logical {
            self.buffer.set_marked(logical, true);
        }
        let offset = self.centering_offset(self.selected_physical?)?;
        self.offset = offset;
        Some(offset)
    }

    /// Number of logical items.
    pub fn len(&self) -> usize {
        self.buffer.logical_len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        self.buffer.items()
    }

    pub fn slots(&self) -> &[PhysicalSlot] {
        self.buffer.slots()
    }

    pub fn slot(&self, physical_index: usize) -> Option<&PhysicalSlot> {
        self.buffer.slot(physical_index)
    }

    pub fn buffer(&self) -> &SlotBuffer {
        &self.buffer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// The last offset reported by the host (after any correction it was told to apply).
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn content_width(&self) -> f32 {
        self.buffer.total_width()
    }

    pub fn segment_width(&self) -> f32 {
        self.buffer.segment_width()
    }

    /// Largest excursion the release fallback may add, derived from the content width.
    pub fn max_velocity(&self) -> f32 {
        self.options.tuning.max_velocity(self.content_width())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_logical
    }

    pub fn selected_physical_index(&self) -> Option<usize> {
        self.selected_physical
    }

    pub fn pending_release_target(&self) -> Option<f32> {
        self.pending_release_target
    }

    /// The physical slot under the viewport center at the current offset.
    pub fn centered_physical_index(&self) -> Option<usize> {
        if !self.has_geometry() {
            return None;
        }
        self.buffer.nearest_slot(self.viewport_center())
    }

    /// The logical item under the viewport center at the current offset.
    pub fn centered_index(&self) -> Option<usize> {
        self.buffer.logical_of(self.centered_physical_index()?)
    }

    /// The offset that centers `physical_index` in the viewport.
    pub fn centering_offset(&self, physical_index: usize) -> Option<f32> {
        let slot = self.buffer.slot(physical_index)?;
        Some(slot.center() - self.viewport_width / 2.0)
    }

    pub fn state(&self) -> CarouselState {
        let mut widths = self.buffer.slots().iter().map(PhysicalSlot::width);
        let item_width = widths
            .next()
            .filter(|&first| widths.all(|w| w == first));
        CarouselState {
            content_width: self.content_width(),
            item_width,
            visible_width: self.viewport_width,
            current_offset: self.offset,
            selected_logical_index: self.selected_logical,
            selected_physical_index: self.selected_physical,
            pending_release_target_offset: self.pending_release_target,
        }
    }

    /// Applies a viewport size from the host's layout pass.
    ///
    /// On the first pass with valid geometry after items are loaded, the default index is
    /// selected without notifying the listener. Returns the offset the host must jump to
    /// (without animation) in that case.
    pub fn layout(&mut self, viewport_width: f32) -> Option<f32> {
        self.viewport_width = if viewport_width.is_finite() && viewport_width > 0.0 {
            viewport_width
        } else {
            0.0
        };
        if !self.has_geometry() || self.selected_logical.is_some() {
            return None;
        }

        let mut index = self.options.default_index;
        if index >= self.len() {
            cwarn!(
                default_index = index,
                count = self.len(),
                "default index out of range; using 0"
            );
            index = 0;
        }
        self.select(index)
    }

    /// Host callback for every scroll offset change.
    ///
    /// Returns the corrected offset when the viewport drifted into the PREV or NEXT segment. The
    /// host must apply it immediately, without animation, and without feeding the corrective
    /// write back into this method.
    pub fn report_offset_changed(&mut self, offset: f32) -> Option<f32> {
        if !offset.is_finite() {
            cwarn!(offset, "ignoring non-finite scroll offset");
            return None;
        }
        let Some(corrected) =
            normalize_offset(offset, self.viewport_width, self.buffer.total_width())
        else {
            self.offset = offset;
            return None;
        };

        // Keep an in-flight target in the same frame as the rewritten offset.
        let delta = corrected - offset;
        if let Some(target) = &mut self.pending_release_target {
            *target += delta;
        }
        ctrace!(offset, corrected, "report_offset_changed: wrapped");
        self.offset = corrected;
        Some(corrected)
    }

    pub fn begin_drag(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        ctrace!(offset = self.offset, "begin_drag");
        self.phase = Phase::Dragging;
    }

    /// Resolves where a released drag should come to rest.
    ///
    /// The result is remembered as the pending target until the next settle, so a second
    /// release before then continues from it.
    pub fn resolve_release(&mut self, velocity_x: f32) -> Option<ReleaseTarget> {
        let target = resolve_release_target(
            &self.buffer,
            &self.options.tuning,
            velocity_x,
            self.offset,
            self.viewport_width,
            self.pending_release_target,
        )?;
        let logical = self.buffer.logical_of(target.physical_index)?;

        self.pending_release_target = Some(target.offset);
        self.pending_settle = Some(PendingSettle {
            logical,
            forced: false,
        });
        self.phase = Phase::Settling;
        Some(target)
    }

    /// Same as [`Self::resolve_release`], returning only the offset the host must animate to.
    pub fn request_release_target(&mut self, velocity_x: f32) -> Option<f32> {
        self.resolve_release(velocity_x).map(|t| t.offset)
    }

    /// Host callback once the viewport has stopped moving.
    ///
    /// Commits the pending target's item (or, with nothing pending, whatever is centered). The
    /// listener fires when the selection changed or the move was forced.
    pub fn notify_settled(&mut self) -> Option<SelectionChange> {
        if self.buffer.is_empty() {
            return None;
        }
        let (physical, forced) = match self.pending_settle.take() {
            Some(pending) => (
                self.buffer
                    .nearest_mirror(pending.logical, self.viewport_center())?,
                pending.forced,
            ),
            None => (self.centered_physical_index()?, false),
        };
        let changed = self.buffer.logical_of(physical) != self.selected_logical;
        Some(self.commit(physical, forced || changed))
    }

    /// Selects `logical` by its MID copy without notifying the listener.
    ///
    /// No-op when out of range, already selected, or before the viewport has a size. Returns
    /// the offset the host must jump to.
    pub fn select(&mut self, logical: usize) -> Option<f32> {
        if logical >= self.len() || self.selected_logical == Some(logical) || !self.has_geometry()
        {
            return None;
        }
        let physical = logical + self.len();
        let offset = self.centering_offset(physical)?;
        self.offset = offset;
        self.commit(physical, false);
        Some(offset)
    }

    /// Moves to `logical` even if it is already selected, using whichever copy is closest to
    /// the viewport center.
    ///
    /// Returns the offset the host must move to; the listener fires on the following
    /// [`Self::notify_settled`].
    pub fn force_select(&mut self, logical: usize) -> Option<f32> {
        if logical >= self.len() || !self.has_geometry() {
            return None;
        }
        let physical = self
            .buffer
            .nearest_mirror(logical, self.viewport_center())?;
        self.force_physical(physical)
    }

    /// Advances to the neighbor of the centered slot (button-driven, no drag).
    pub fn step(&mut self, direction: StepDirection) -> Option<f32> {
        let centered = self.centered_physical_index()?;
        let physical = match direction {
            StepDirection::Forward => centered + 1,
            StepDirection::Backward => centered.checked_sub(1)?,
        };
        if physical >= self.buffer.len() {
            return None;
        }
        self.force_physical(physical)
    }

    /// Host callback for a tap at `location_x` in content coordinates.
    ///
    /// Taps that do not land on a slot are ignored.
    pub fn on_item_tapped(&mut self, location_x: f32) -> Option<f32> {
        if !self.has_geometry() {
            return None;
        }
        let physical = self.buffer.slot_at(location_x)?;
        self.force_physical(physical)
    }

    /// Commits `physical_index` as the selection and notifies the listener.
    ///
    /// # Panics
    ///
    /// Panics if `physical_index` is outside `0..3N`.
    pub fn settle(&mut self, physical_index: usize) -> SelectionChange {
        match self.try_settle(physical_index, true) {
            Ok(change) => change,
            Err(err) => panic!("{err}"),
        }
    }

    /// Commits `physical_index` as the selection without notifying the listener.
    ///
    /// # Panics
    ///
    /// Panics if `physical_index` is outside `0..3N`.
    pub fn settle_silently(&mut self, physical_index: usize) -> SelectionChange {
        match self.try_settle(physical_index, false) {
            Ok(change) => change,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_settle(
        &mut self,
        physical_index: usize,
        notify: bool,
    ) -> Result<SelectionChange, CarouselError> {
        if physical_index >= self.buffer.len() {
            cwarn!(
                physical_index,
                len = self.buffer.len(),
                "settle: slot out of range"
            );
            return Err(CarouselError::SlotOutOfRange {
                index: physical_index,
                len: self.buffer.len(),
            });
        }
        Ok(self.commit(physical_index, notify))
    }

    fn force_physical(&mut self, physical: usize) -> Option<f32> {
        let logical = self.buffer.logical_of(physical)?;
        let offset = self.centering_offset(physical)?;
        self.pending_release_target = Some(offset);
        self.pending_settle = Some(PendingSettle {
            logical,
            forced: true,
        });
        self.phase = Phase::Settling;
        cdebug!(physical, logical, offset, "force selection");
        Some(offset)
    }

    fn commit(&mut self, physical: usize, notify: bool) -> SelectionChange {
        let logical = physical % self.buffer.logical_len();
        let previous = self.selected_logical;
        if let Some(prev) = previous {
            self.buffer.set_marked(prev, false);
        }
        self.buffer.set_marked(logical, true);

        self.selected_logical = Some(logical);
        self.selected_physical = Some(physical);
        self.pending_release_target = None;
        self.pending_settle = None;
        self.phase = Phase::Settled(logical);

        if notify {
            if let Some(cb) = &self.options.on_selection_changed {
                cb(logical);
            }
        }
        cdebug!(logical, physical, notify, "selection committed");

        SelectionChange {
            logical_index: logical,
            physical_index: physical,
            previous_logical_index: previous,
            notified: notify,
        }
    }

    fn has_geometry(&self) -> bool {
        self.viewport_width > 0.0 && self.buffer.total_width() > 0.0
    }

    fn viewport_center(&self) -> f32 {
        self.offset + self.viewport_width / 2.0
    }
}
