use std::sync::{Arc, Mutex};

use sectional::{
    Composition, Dimension, Insets, LayoutProvider, Point, Rows, Size, Snap, Style, Update,
};

use crate::{Controller, DeferQueue, Liveness, Restore, best_candidate, snap_target};

fn strip_composition(rows: Rows) -> Composition<&'static str, u32> {
    let mut comp = Composition::with_provider(LayoutProvider::new().with_style(
        move |section: &&'static str, _width| match *section {
            "strip" => Some(Style::horizontal(Insets::ZERO, 4.0, rows, |item| {
                Some(Size::new(80.0, *item as f32))
            })),
            _ => Some(Style::vertical(|_| Some(Dimension::Absolute(20.0)))),
        },
    ));
    comp.set_width(320.0);
    comp.batch([Update::SetSections {
        sections: vec!["strip", "list"],
        items: Some(Arc::new(|section| match *section {
            "strip" => Some(vec![1, 2, 3]),
            "list" => Some(vec![4, 5]),
            _ => None,
        })),
    }]);
    comp
}

#[test]
fn defer_queue_runs_in_fifo_order() {
    let mut queue = DeferQueue::new();
    let owner = Liveness::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..3 {
        let order = Arc::clone(&order);
        queue.push(&owner, move || order.lock().unwrap().push(i));
    }
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.drain(), 3);
    assert!(queue.is_empty());
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn defer_queue_skips_tasks_whose_owner_died() {
    let mut queue = DeferQueue::new();
    let kept = Liveness::new();
    let recycled = Liveness::new();
    let ran = Arc::new(Mutex::new(Vec::new()));

    for (label, owner) in [("kept", &kept), ("recycled", &recycled)] {
        let ran = Arc::clone(&ran);
        queue.push(owner, move || ran.lock().unwrap().push(label));
    }
    drop(recycled);

    assert_eq!(queue.drain(), 1);
    assert_eq!(*ran.lock().unwrap(), vec!["kept"]);
}

#[test]
fn defer_queue_drains_later_pushes_on_later_drains() {
    let mut queue = DeferQueue::new();
    let owner = Liveness::new();
    let hits = Arc::new(Mutex::new(0));

    let count = Arc::clone(&hits);
    queue.push(&owner, move || *count.lock().unwrap() += 1);
    assert_eq!(queue.drain(), 1);
    assert_eq!(queue.drain(), 0);

    let count = Arc::clone(&hits);
    queue.push(&owner, move || *count.lock().unwrap() += 1);
    assert_eq!(queue.drain(), 1);
    assert_eq!(*hits.lock().unwrap(), 2);
}

#[test]
fn best_candidate_follows_the_fling_direction() {
    let candidates = [0.0, 100.0, 200.0, 300.0];

    // Forward fling: nearest candidate to the right.
    assert_eq!(best_candidate(&candidates, 120.0, 1.0), Some(200.0));
    // Backward fling: nearest candidate to the left.
    assert_eq!(best_candidate(&candidates, 120.0, -1.0), Some(100.0));
    // No velocity: nearest either way.
    assert_eq!(best_candidate(&candidates, 120.0, 0.0), Some(100.0));

    // Flung past the last cell: fall back to the outermost candidate.
    assert_eq!(best_candidate(&candidates, 350.0, 1.0), Some(300.0));
    assert_eq!(best_candidate(&candidates, -50.0, -1.0), Some(0.0));

    assert_eq!(best_candidate(&[], 10.0, 1.0), None);
}

#[test]
fn snap_target_centers_the_item_in_the_viewport() {
    let candidates = [0.0, 100.0, 200.0];
    // Best candidate 200, viewport 320, item 80: padding (320-80)/2 = 120.
    assert_eq!(snap_target(&candidates, 150.0, 1.0, 320.0, 80.0), 80.0);
    // Item wider than the viewport: no negative padding.
    assert_eq!(snap_target(&candidates, 150.0, 1.0, 60.0, 80.0), 200.0);
    // No candidates: keep the proposal.
    assert_eq!(snap_target(&[], 150.0, 1.0, 320.0, 80.0), 150.0);
}

#[test]
fn restore_centers_a_fresh_infinite_strip() {
    let comp = strip_composition(Rows::Infinite {
        snap: Snap::Automatic,
    });
    let mut controller = Controller::from_composition(comp);

    let initial = controller.composition().carousel().initial_index(3);
    assert_eq!(
        controller.restore(&"strip"),
        Restore::CenterVirtual {
            virtual_index: initial
        }
    );

    controller
        .composition_mut()
        .save_offset(&"strip", Point::new(64.0, 0.0));
    assert_eq!(
        controller.restore(&"strip"),
        Restore::Offset(Point::new(64.0, 0.0))
    );
}

#[test]
fn restore_folds_the_saved_page_for_centered_strips() {
    let comp = strip_composition(Rows::Infinite {
        snap: Snap::Centered,
    });
    let mut controller = Controller::from_composition(comp);

    let initial = controller.composition().carousel().initial_index(3);
    assert_eq!(
        controller.restore(&"strip"),
        Restore::CenterVirtual {
            virtual_index: initial
        }
    );

    controller.record_scroll(&"strip", Point::new(12.0, 0.0), Some(initial + 7));
    assert_eq!(controller.composition().page_in(&"strip"), Some(1));
    assert_eq!(
        controller.restore(&"strip"),
        Restore::CenterVirtual {
            virtual_index: initial + 1
        }
    );
}

#[test]
fn restore_for_finite_strips_uses_saved_state_only() {
    let comp = strip_composition(Rows::Finite {
        rows: 1,
        snap: Snap::Automatic,
    });
    let mut controller = Controller::from_composition(comp);
    assert_eq!(controller.restore(&"strip"), Restore::None);
    assert_eq!(controller.restore(&"list"), Restore::None);

    controller.record_scroll(&"strip", Point::new(40.0, 0.0), None);
    assert_eq!(
        controller.restore(&"strip"),
        Restore::Offset(Point::new(40.0, 0.0))
    );

    let comp = strip_composition(Rows::Finite {
        rows: 1,
        snap: Snap::Centered,
    });
    let mut controller = Controller::from_composition(comp);
    controller.composition_mut().save_page(&"strip", 2);
    assert_eq!(controller.restore(&"strip"), Restore::CenterItem { index: 2 });
}

#[test]
fn selection_mirrors_across_every_virtual_copy() {
    let comp = strip_composition(Rows::Infinite {
        snap: Snap::Centered,
    });
    let mut controller = Controller::from_composition(comp);

    let indices = controller.selection_mirror_indices(&2);
    let multiplier = controller.composition().carousel().multiplier();
    assert_eq!(indices.len(), multiplier);
    assert_eq!(indices[0], 1);
    assert!(indices.iter().all(|index| index % 3 == 1));

    // Plain sections mirror to the item's own index only.
    assert_eq!(controller.selection_mirror_indices(&5), vec![1]);
    // Unknown items mirror to nothing.
    assert_eq!(controller.selection_mirror_indices(&99), Vec::<usize>::new());
}
