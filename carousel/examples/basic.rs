use carousel::{Carousel, CarouselOptions, StepDirection};

fn main() {
    // Labels are measured by the host; here 8px per character plus padding.
    let opts = CarouselOptions::new(|label: &str| label.len() as f32 * 8.0 + 24.0)
        .with_on_selection_changed(Some(|i: usize| println!("selected index {i}")));

    let mut c = Carousel::new(opts);
    c.set_items(["Breakfast", "Lunch", "Dinner", "Snack"]);

    // First layout: jump (without animation) to the default item.
    let mut offset = c.layout(180.0).unwrap_or(0.0);
    println!(
        "content_width={} segment_width={} offset={offset}",
        c.content_width(),
        c.segment_width()
    );

    // A drag: the host reports every offset and applies any wrap correction.
    c.begin_drag();
    for _ in 0..20 {
        offset -= 12.0;
        if let Some(corrected) = c.report_offset_changed(offset) {
            println!("wrapped {offset} -> {corrected}");
            offset = corrected;
        }
    }

    // Release: the host animates to the target, then reports the settle.
    if let Some(target) = c.request_release_target(-1.4) {
        println!("release target={target}");
        offset = c.report_offset_changed(target).unwrap_or(target);
        let change = c.notify_settled();
        println!("settled={change:?} offset={offset}");
    }

    // Button-driven advance.
    if let Some(target) = c.step(StepDirection::Forward) {
        c.report_offset_changed(target);
        c.notify_settled();
    }
    println!("state={:?}", c.state());
}
