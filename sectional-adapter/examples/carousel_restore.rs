// Example: drive an infinite, center-snapping strip through the adapter
// controller: defer its configuration, record scrolls, restore its page.
use std::sync::Arc;

use sectional::{Composition, Insets, LayoutProvider, Point, Rows, Size, Snap, Style, Update};
use sectional_adapter::{Controller, Liveness, snap_target};

fn main() {
    let provider = LayoutProvider::new().with_style(|_section: &&str, _width| {
        Some(Style::horizontal(
            Insets::ZERO,
            10.0,
            Rows::Infinite {
                snap: Snap::Centered,
            },
            |_item: &u32| Some(Size::new(120.0, 80.0)),
        ))
    });
    let mut composition = Composition::with_provider(provider);
    composition.set_width(320.0);
    composition.batch([Update::SetSections {
        sections: vec!["banners"],
        items: Some(Arc::new(|_| Some(vec![1, 2, 3, 4, 5]))),
    }]);

    let mut controller = Controller::from_composition(composition);

    // The outer widget wraps the strip in one opaque row and configures the
    // inner widget on the next tick — unless the cell got recycled first.
    let cell = Liveness::new();
    controller.defer_configure(&cell, || println!("configuring inner grid"));
    println!("drained {} task(s)", controller.drain_deferred());

    println!("fresh restore: {:?}", controller.restore(&"banners"));

    // The user flings; the host proposes an offset and we snap to center.
    let candidates = [520.0, 650.0, 780.0];
    let target = snap_target(&candidates, 600.0, 1.0, 320.0, 120.0);
    println!("snap target: {target}");

    // The inner widget reports where it settled.
    let initial = controller.composition().carousel().initial_index(5);
    controller.record_scroll(&"banners", Point::new(target, 0.0), Some(initial + 2));
    println!("page: {:?}", controller.composition().page_in(&"banners"));
    println!("restore after scroll: {:?}", controller.restore(&"banners"));
}
