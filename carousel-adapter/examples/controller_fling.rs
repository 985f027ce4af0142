use carousel::CarouselOptions;
use carousel_adapter::{Controller, Easing};

fn main() {
    let mut c = Controller::new(
        CarouselOptions::uniform(40.0)
            .with_on_selection_changed(Some(|i: usize| println!("selected index {i}"))),
    )
    .with_animation(240, Easing::EaseOutCubic);

    c.set_items(["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    c.on_viewport_size(120.0);

    c.on_drag_start();
    c.on_drag(c.offset() + 30.0);
    let target = c.on_release(2.6, 0);
    println!("fling target={target:?}");

    // Simulate a 60fps tick.
    let mut now_ms = 0u64;
    while c.is_animating() {
        now_ms += 16;
        if let Some(frame) = c.tick(now_ms) {
            println!("t={now_ms}ms offset={:.1}", frame.offset);
            if let Some(settled) = frame.settled {
                println!("settled on {}", settled.logical_index);
            }
        }
    }
}
