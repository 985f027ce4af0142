use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::format;
use std::string::String;
use std::vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }

    fn gen_range_f32(&mut self, start: f32, end: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        start + (end - start) * unit
    }
}

fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("item-{i}")).collect()
}

/// `n` items of width 20 in a 60-wide viewport (three visible), laid out and settled on 0.
fn laid_out(n: usize) -> Carousel {
    let mut c = Carousel::new(CarouselOptions::uniform(20.0));
    c.set_items(labels(n));
    c.layout(60.0);
    c
}

#[derive(Clone, Default)]
struct Listener {
    calls: Arc<AtomicUsize>,
    last: Arc<AtomicUsize>,
}

impl Listener {
    fn options(&self, width: f32) -> CarouselOptions {
        let calls = Arc::clone(&self.calls);
        let last = Arc::clone(&self.last);
        CarouselOptions::uniform(width).with_on_selection_changed(Some(move |i: usize| {
            calls.fetch_add(1, Ordering::SeqCst);
            last.store(i, Ordering::SeqCst);
        }))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last(&self) -> usize {
        self.last.load(Ordering::SeqCst)
    }
}

fn assert_close(actual: f32, expected: f32) {
    let diff = actual - expected;
    assert!(
        diff < 1e-3 && diff > -1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn buffer_lays_out_three_contiguous_copies() {
    let b = SlotBuffer::build(labels(5), &|_| 20.0);
    assert_eq!(b.logical_len(), 5);
    assert_eq!(b.len(), 15);
    assert_eq!(b.total_width(), 300.0);
    assert_eq!(b.segment_width(), 100.0);

    for (p, slot) in b.slots().iter().enumerate() {
        assert_eq!(slot.index(), p);
        assert_eq!(slot.logical_index(), p % 5);
        assert_eq!(slot.origin(), 20.0 * p as f32);
        assert_eq!(slot.width(), 20.0);
        assert!(!slot.is_marked());
    }

    assert_eq!(b.segment_of(0), Some(Segment::Prev));
    assert_eq!(b.segment_of(7), Some(Segment::Mid));
    assert_eq!(b.segment_of(14), Some(Segment::Next));
    assert_eq!(b.segment_of(15), None);
    assert_eq!(b.mirrors(7), Some([2, 7, 12]));
    assert_eq!(b.mirrors(15), None);
}

#[test]
fn mirrors_share_the_same_label_allocation() {
    let b = SlotBuffer::build(["a", "b"], &|_| 10.0);
    let first = b.slot(0).unwrap().item().label_arc();
    let mid = b.slot(2).unwrap().item().label_arc();
    let next = b.slot(4).unwrap().item().label_arc();
    assert!(Arc::ptr_eq(first, mid));
    assert!(Arc::ptr_eq(first, next));
}

#[test]
fn heterogeneous_widths_accumulate_origins() {
    let b = SlotBuffer::build(["a", "bbb"], &|s: &str| s.len() as f32 * 10.0);
    let origins: Vec<f32> = b.slots().iter().map(|s| s.origin()).collect();
    assert_eq!(origins, vec![0.0, 10.0, 40.0, 50.0, 80.0, 90.0]);
    assert_eq!(b.total_width(), 120.0);

    let mut c = Carousel::new(CarouselOptions::new(|s: &str| s.len() as f32 * 10.0));
    c.set_items(["a", "bbb"]);
    assert_eq!(c.state().item_width, None);
}

#[test]
fn invalid_measurements_become_zero_width() {
    let b = SlotBuffer::build(["ok", "nan", "neg"], &|s: &str| match s {
        "ok" => 10.0,
        "nan" => f32::NAN,
        _ => -4.0,
    });
    assert_eq!(b.total_width(), 30.0);
    assert_eq!(b.slot(1).unwrap().width(), 0.0);
    // Zero-width slots are never hit; the next real slot owns the shared origin.
    assert_eq!(b.slot_at(10.0), Some(3));
}

#[test]
fn slot_lookup_is_half_open_and_falls_back_to_edges() {
    let b = SlotBuffer::build(labels(5), &|_| 20.0);
    assert_eq!(b.slot_at(0.0), Some(0));
    assert_eq!(b.slot_at(19.99), Some(0));
    assert_eq!(b.slot_at(100.0), Some(5));
    assert_eq!(b.slot_at(300.0), None);
    assert_eq!(b.slot_at(-0.5), None);

    assert_eq!(b.nearest_slot(300.0), Some(14));
    assert_eq!(b.nearest_slot(1e9), Some(14));
    assert_eq!(b.nearest_slot(-5.0), Some(0));
    assert_eq!(b.nearest_slot(f32::NAN), None);
}

#[test]
fn labels_are_measured_once_and_cached_across_reloads() {
    let measured = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&measured);
    let mut c = Carousel::new(CarouselOptions::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        20.0
    }));

    c.set_items(labels(5));
    assert_eq!(measured.load(Ordering::SeqCst), 5);

    c.set_items(labels(5));
    assert_eq!(measured.load(Ordering::SeqCst), 5);

    c.set_items(labels(6));
    assert_eq!(measured.load(Ordering::SeqCst), 6);

    c.reset_measurements();
    assert_eq!(measured.load(Ordering::SeqCst), 12);
}

#[test]
fn empty_list_answers_no_selection() {
    let mut c = Carousel::new(CarouselOptions::uniform(20.0));
    c.set_items(Vec::<String>::new());
    assert!(c.is_empty());
    assert_eq!(c.phase(), Phase::Uninitialized);
    assert_eq!(c.layout(60.0), None);
    assert_eq!(c.report_offset_changed(10.0), None);
    assert_eq!(c.request_release_target(1.0), None);
    assert_eq!(c.notify_settled(), None);
    assert_eq!(c.force_select(0), None);
    assert_eq!(c.on_item_tapped(5.0), None);
    assert_eq!(c.selected_index(), None);
    assert_eq!(c.centered_index(), None);
}

#[test]
fn normalizer_wraps_into_the_middle_segment() {
    assert_eq!(normalize_offset(205.0, 50.0, 300.0), Some(105.0));
    assert_eq!(normalize_offset(200.0, 50.0, 300.0), Some(100.0));
    assert_eq!(normalize_offset(10.0, 60.0, 300.0), Some(110.0));
    assert_eq!(normalize_offset(40.0, 60.0, 300.0), Some(140.0));
    assert_eq!(normalize_offset(150.0, 50.0, 300.0), None);
    assert_eq!(normalize_offset(41.0, 60.0, 300.0), None);
}

#[test]
fn normalizer_rejects_uninitialized_geometry() {
    assert_eq!(normalize_offset(250.0, 0.0, 300.0), None);
    assert_eq!(normalize_offset(250.0, 50.0, 0.0), None);
    assert_eq!(normalize_offset(250.0, -1.0, 300.0), None);
    assert_eq!(normalize_offset(f32::NAN, 50.0, 300.0), None);
    // Overscrolled far enough that the push would not land on a positive offset.
    assert_eq!(normalize_offset(-150.0, 50.0, 300.0), None);
}

#[test]
fn offsets_inside_mid_are_never_corrected() {
    let mut c = laid_out(5);
    let mut rng = Lcg::new(7);
    for _ in 0..500 {
        // MID for a 60-wide viewport: 40 < offset < 200.
        let offset = rng.gen_range_f32(40.5, 199.5);
        assert_eq!(c.report_offset_changed(offset), None, "offset={offset}");
        assert_eq!(c.offset(), offset);
    }
}

#[test]
fn first_layout_selects_default_silently() {
    let listener = Listener::default();
    let mut c = Carousel::new(listener.options(20.0));
    c.set_items(labels(5));
    assert_eq!(c.phase(), Phase::Loaded);
    assert_eq!(c.layout(0.0), None);
    assert_eq!(c.selected_index(), None);

    // MID copy of item 0 is slot 5 (100..120), centered in a 60-wide viewport.
    assert_eq!(c.layout(60.0), Some(80.0));
    assert_eq!(c.selected_index(), Some(0));
    assert_eq!(c.selected_physical_index(), Some(5));
    assert_eq!(c.phase(), Phase::Settled(0));
    assert_eq!(listener.calls(), 0);

    // Later layout passes leave the selection alone.
    assert_eq!(c.layout(60.0), None);
    assert_eq!(c.centered_physical_index(), Some(5));
}

#[test]
fn default_index_option_is_respected_and_clamped() {
    let mut c = Carousel::new(CarouselOptions::uniform(20.0).with_default_index(2));
    c.set_items(labels(5));
    assert_eq!(c.layout(60.0), Some(120.0));
    assert_eq!(c.selected_index(), Some(2));

    let mut c = Carousel::new(CarouselOptions::uniform(20.0).with_default_index(9));
    c.set_items(labels(5));
    c.layout(60.0);
    assert_eq!(c.selected_index(), Some(0));
}

#[test]
fn release_resolves_and_settles_with_notification() {
    let listener = Listener::default();
    let mut c = Carousel::new(listener.options(20.0));
    c.set_items(labels(5));
    c.layout(60.0);

    c.begin_drag();
    assert_eq!(c.phase(), Phase::Dragging);

    // scaled = 75, target = 30 + 75 + 80 = 185 → slot 9 (180..200).
    let target = c.resolve_release(0.25).unwrap();
    assert_eq!(target.physical_index, 9);
    assert_eq!(target.offset, 160.0);
    assert_eq!(c.pending_release_target(), Some(160.0));
    assert_eq!(c.phase(), Phase::Settling);

    assert_eq!(c.report_offset_changed(160.0), None);
    let change = c.notify_settled().unwrap();
    assert_eq!(change.logical_index, 4);
    assert_eq!(change.physical_index, 9);
    assert_eq!(change.previous_logical_index, Some(0));
    assert!(change.notified);
    assert_eq!(listener.calls(), 1);
    assert_eq!(listener.last(), 4);
    assert_eq!(c.pending_release_target(), None);
    assert_eq!(c.phase(), Phase::Settled(4));
}

#[test]
fn rapid_second_release_continues_from_pending_target() {
    let mut c = laid_out(5);
    assert_eq!(c.request_release_target(0.25), Some(160.0));

    // Re-touched mid-flight at 120: target = 30 + 75 + (160 - 120) = 145 → slot 7.
    c.report_offset_changed(120.0);
    let target = c.resolve_release(0.25).unwrap();
    assert_eq!(target.physical_index, 7);
    assert_eq!(target.offset, 120.0);
    assert_eq!(c.pending_release_target(), Some(120.0));
}

#[test]
fn zero_velocity_release_mid_flight_snaps_in_place() {
    let mut c = laid_out(5);
    c.request_release_target(0.25);
    c.report_offset_changed(120.0);

    // target collapses to the current offset (120) → slot 6 (120..140).
    let target = c.resolve_release(0.0).unwrap();
    assert_eq!(target.physical_index, 6);
    assert_eq!(target.offset, 100.0);
}

#[test]
fn flick_threshold_switches_to_the_steeper_scale() {
    let tuning = ReleaseTuning::default();
    assert!(!tuning.is_flick(2.2));
    assert!(tuning.is_flick(2.3));
    assert!(tuning.is_flick(-3.0));
    assert_close(tuning.scale_velocity(3.0), 600.0);
    assert_close(tuning.scale_velocity(-3.0), -600.0);
    assert_close(tuning.scale_velocity(2.0), 600.0);
    assert_close(tuning.scale_velocity(2.2), 660.0);

    // 50 items: content 3000, settled at offset 980.
    let resolve = |v: f32| laid_out(50).resolve_release(v).unwrap();

    // 3.0 uses ×200 (600), not ×300 (900 → slot 95).
    let flick = resolve(3.0);
    assert_eq!(flick.physical_index, 80);
    assert_eq!(flick.offset, 1580.0);

    // Crossing the threshold shortens the excursion: 2.2 → 660, 2.3 → 460.
    let gentle = resolve(2.2);
    let steep = resolve(2.3);
    assert_eq!(gentle.physical_index, 83);
    assert_eq!(steep.physical_index, 73);
    assert!(steep.offset < gentle.offset - 100.0);
}

#[test]
fn fallback_target_uses_clamped_velocity() {
    let mut c = Carousel::new(CarouselOptions::uniform(40.0));
    c.set_items(labels(5));
    assert_eq!(c.layout(120.0), Some(160.0));
    assert_eq!(c.content_width(), 600.0);
    assert_eq!(c.max_velocity(), 100.0);

    // 5.0 → 1000, target 1220 is past the content: fallback 200 + 100 → slot 7.
    let target = c.resolve_release(5.0).unwrap();
    assert_eq!(target.physical_index, 7);
    assert_eq!(target.offset, 240.0);

    let mut c = Carousel::new(CarouselOptions::uniform(40.0));
    c.set_items(labels(5));
    c.layout(120.0);
    // -5.0 → -1000, target -780: fallback 200 - 100 → slot 2.
    let target = c.resolve_release(-5.0).unwrap();
    assert_eq!(target.physical_index, 2);
    assert_eq!(target.offset, 40.0);
}

#[test]
fn resolver_short_circuits_on_bad_geometry() {
    let b = SlotBuffer::build(labels(5), &|_| 20.0);
    let tuning = ReleaseTuning::default();
    assert_eq!(resolve_release_target(&b, &tuning, 1.0, 80.0, 0.0, None), None);

    let empty = SlotBuffer::default();
    assert_eq!(resolve_release_target(&empty, &tuning, 1.0, 0.0, 60.0, None), None);

    // Non-finite velocity is treated as a still release.
    let t = resolve_release_target(&b, &tuning, f32::INFINITY, 80.0, 60.0, None).unwrap();
    assert_eq!(t.physical_index, 5);
}

#[test]
fn settle_keeps_mirror_marks_in_sync() {
    let mut c = laid_out(5);
    let mut rng = Lcg::new(42);
    for _ in 0..100 {
        let p = rng.gen_range_usize(0, 15);
        let change = c.settle_silently(p);
        assert_eq!(change.logical_index, p % 5);
        assert_eq!(c.selected_index(), Some(p % 5));
        assert_eq!(c.selected_physical_index(), Some(p));
        for slot in c.slots() {
            assert_eq!(slot.is_marked(), slot.logical_index() == p % 5, "p={p}");
        }
    }
}

#[test]
fn settle_notifies_and_silent_settle_does_not() {
    let listener = Listener::default();
    let mut c = Carousel::new(listener.options(20.0));
    c.set_items(labels(5));
    c.layout(60.0);

    let change = c.settle(12);
    assert!(change.notified);
    assert_eq!(listener.calls(), 1);
    assert_eq!(listener.last(), 2);

    let change = c.settle_silently(3);
    assert!(!change.notified);
    assert_eq!(listener.calls(), 1);
    assert_eq!(c.selected_index(), Some(3));
}

#[test]
fn try_settle_reports_out_of_range() {
    let mut c = laid_out(5);
    assert_eq!(
        c.try_settle(15, true),
        Err(CarouselError::SlotOutOfRange { index: 15, len: 15 })
    );
    assert_eq!(c.selected_index(), Some(0));
}

#[test]
#[should_panic(expected = "out of range")]
fn settle_out_of_range_is_fatal() {
    let mut c = laid_out(5);
    c.settle(15);
}

#[test]
fn force_select_then_settle_selects_every_index() {
    for n in 1..=8usize {
        for i in 0..n {
            let listener = Listener::default();
            let mut c = Carousel::new(listener.options(20.0));
            c.set_items(labels(n));
            c.layout(60.0);

            let offset = c.force_select(i).unwrap();
            if let Some(corrected) = c.report_offset_changed(offset) {
                c.report_offset_changed(corrected);
            }
            let change = c.notify_settled().unwrap();
            assert_eq!(change.logical_index, i, "n={n}");
            assert_eq!(c.selected_index(), Some(i), "n={n}");
            assert!(change.notified);
            assert_eq!(listener.calls(), 1);
        }
    }
}

#[test]
fn force_select_bypasses_the_already_selected_guard() {
    let listener = Listener::default();
    let mut c = Carousel::new(listener.options(20.0));
    c.set_items(labels(5));
    c.layout(60.0);

    assert_eq!(c.select(0), None);
    assert_eq!(c.force_select(0), Some(80.0));
    let change = c.notify_settled().unwrap();
    assert_eq!(change.logical_index, 0);
    assert!(change.notified);
    assert_eq!(listener.calls(), 1);

    assert_eq!(c.force_select(5), None);
}

#[test]
fn force_select_picks_the_mirror_nearest_the_viewport() {
    let mut c = laid_out(5);
    // Center at 110: copies of 4 are centered at 90, 190, 290.
    assert_eq!(c.force_select(4), Some(60.0));
    c.notify_settled();
    assert_eq!(c.selected_physical_index(), Some(4));
}

#[test]
fn settling_without_pending_commits_the_centered_item() {
    let listener = Listener::default();
    let mut c = Carousel::new(listener.options(20.0));
    c.set_items(labels(5));
    c.layout(60.0);

    c.begin_drag();
    c.report_offset_changed(100.0);
    let change = c.notify_settled().unwrap();
    assert_eq!(change.logical_index, 1);
    assert!(change.notified);

    let change = c.notify_settled().unwrap();
    assert_eq!(change.logical_index, 1);
    assert!(!change.notified);
    assert_eq!(listener.calls(), 1);
}

#[test]
fn step_moves_to_neighbors_of_the_centered_slot() {
    let mut c = laid_out(5);

    assert_eq!(c.step(StepDirection::Forward), Some(100.0));
    assert_eq!(c.notify_settled().unwrap().logical_index, 1);

    c.report_offset_changed(100.0);
    assert_eq!(c.step(StepDirection::Backward), Some(80.0));
    assert_eq!(c.notify_settled().unwrap().logical_index, 0);
}

#[test]
fn tap_forces_selection_of_the_tapped_slot() {
    let listener = Listener::default();
    let mut c = Carousel::new(listener.options(20.0));
    c.set_items(labels(5));
    c.layout(60.0);

    assert_eq!(c.on_item_tapped(145.0), Some(120.0));
    let change = c.notify_settled().unwrap();
    assert_eq!(change.logical_index, 2);
    assert_eq!(change.physical_index, 7);
    assert_eq!(listener.calls(), 1);

    assert_eq!(c.on_item_tapped(500.0), None);
    assert_eq!(c.on_item_tapped(-1.0), None);
}

#[test]
fn wrap_correction_shifts_the_pending_target() {
    let mut c = laid_out(5);
    // scaled = 150, target = 260 → slot 13, final offset 240.
    assert_eq!(c.request_release_target(0.5), Some(240.0));

    assert_eq!(c.report_offset_changed(210.0), Some(110.0));
    assert_eq!(c.offset(), 110.0);
    assert_eq!(c.pending_release_target(), Some(140.0));

    let change = c.notify_settled().unwrap();
    assert_eq!(change.logical_index, 3);
    assert_eq!(change.physical_index, 8);
}

#[test]
fn reloading_items_resets_selection() {
    let listener = Listener::default();
    let mut c = Carousel::new(listener.options(20.0));
    c.set_items(labels(5));
    c.layout(60.0);
    c.settle(7);
    assert_eq!(listener.calls(), 1);

    c.set_items(labels(4));
    assert_eq!(c.phase(), Phase::Loaded);
    assert_eq!(c.selected_index(), None);
    assert_eq!(c.selected_physical_index(), None);
    assert!(c.slots().iter().all(|s| !s.is_marked()));

    assert_eq!(c.layout(60.0), Some(60.0));
    assert_eq!(c.selected_index(), Some(0));
    assert_eq!(listener.calls(), 1);
}

#[test]
fn reset_measurements_recenters_the_selection() {
    let wide = Arc::new(AtomicUsize::new(0));
    let flag = Arc::clone(&wide);
    let mut c = Carousel::new(CarouselOptions::new(move |_| {
        if flag.load(Ordering::SeqCst) == 0 { 20.0 } else { 40.0 }
    }));
    c.set_items(labels(5));
    c.layout(60.0);

    wide.store(1, Ordering::SeqCst);
    // Slot 5 becomes 200..240.
    assert_eq!(c.reset_measurements(), Some(190.0));
    assert_eq!(c.content_width(), 600.0);
    assert!(c.slot(0).unwrap().is_marked());
}

#[test]
fn state_snapshot_reflects_geometry_and_selection() {
    let mut c = laid_out(5);
    assert_eq!(
        c.state(),
        CarouselState {
            content_width: 300.0,
            item_width: Some(20.0),
            visible_width: 60.0,
            current_offset: 80.0,
            selected_logical_index: Some(0),
            selected_physical_index: Some(5),
            pending_release_target_offset: None,
        }
    );

    c.request_release_target(0.25);
    assert_eq!(c.state().pending_release_target_offset, Some(160.0));
}

#[test]
fn tuning_validation_rejects_non_positive_values() {
    let bad = ReleaseTuning {
        max_velocity_divisor: 0.0,
        ..ReleaseTuning::default()
    };
    assert_eq!(
        bad.validate(),
        Err(CarouselError::InvalidTuning {
            field: "max_velocity_divisor",
            value: 0.0
        })
    );
    assert!(Carousel::try_new(CarouselOptions::uniform(20.0).with_tuning(bad)).is_err());

    let mut c = laid_out(3);
    let nan = ReleaseTuning {
        gentle_scale: f32::NAN,
        ..ReleaseTuning::default()
    };
    assert!(c.set_tuning(nan).is_err());
    assert_eq!(c.options().tuning, ReleaseTuning::default());
}

#[cfg(feature = "serde")]
#[test]
fn tuning_deserializes_with_defaults() {
    let tuning: ReleaseTuning = serde_json::from_str(r#"{ "flick_threshold": 3.0 }"#).unwrap();
    assert_eq!(tuning.flick_threshold, 3.0);
    assert_eq!(tuning.gentle_scale, 300.0);
    assert_eq!(tuning.flick_scale, 200.0);
    assert_eq!(tuning.max_velocity_divisor, 6.0);
}
