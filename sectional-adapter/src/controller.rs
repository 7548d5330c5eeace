use sectional::{Composition, ItemId, Point, Rows, SectionId, Snap, Style};

use crate::{DeferQueue, Liveness};

/// How the host should restore an embedded strip that just came back on
/// screen (fresh cell, or a cell re-wrapped after recycling).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Restore {
    /// Nothing to restore; leave the widget where it is.
    None,
    /// Set the saved content offset verbatim.
    Offset(Point),
    /// Center the given virtual index (infinite strips).
    CenterVirtual { virtual_index: usize },
    /// Center the given real item index (finite strips).
    CenterItem { index: usize },
}

/// A framework-neutral controller wrapping a [`Composition`] with the
/// adapter workflows most hosts need: viewport width events, deferred
/// inner-grid configuration, scroll/page recording, and strip restoring.
///
/// This type holds no UI objects. Adapters drive it by calling:
/// - `on_viewport_width` when the outer widget resizes
/// - `defer_configure` + `drain_deferred` around the "configure the inner
///   grid next tick" boundary
/// - `record_scroll` from the inner widget's scroll callback
pub struct Controller<S, I> {
    composition: Composition<S, I>,
    defer: DeferQueue,
}

impl<S: SectionId, I: ItemId> Controller<S, I> {
    pub fn new() -> Self {
        Self::from_composition(Composition::new())
    }

    pub fn from_composition(composition: Composition<S, I>) -> Self {
        Self {
            composition,
            defer: DeferQueue::new(),
        }
    }

    pub fn composition(&self) -> &Composition<S, I> {
        &self.composition
    }

    pub fn composition_mut(&mut self) -> &mut Composition<S, I> {
        &mut self.composition
    }

    pub fn into_composition(self) -> Composition<S, I> {
        self.composition
    }

    pub fn on_viewport_width(&mut self, width: f32) {
        self.composition.set_width(width);
    }

    /// Schedules inner-widget configuration for the next tick.
    ///
    /// The task is dropped unrun if `owner` (the hosting cell's liveness
    /// token) is gone by the time the host drains.
    pub fn defer_configure(&mut self, owner: &Liveness, task: impl FnOnce() + Send + 'static) {
        self.defer.push(owner, task);
    }

    /// Runs pending deferred configuration; call once per scheduling tick.
    pub fn drain_deferred(&mut self) -> usize {
        self.defer.drain()
    }

    /// Records an inner widget's scroll position, and — when the strip
    /// snaps to center — folds the centered virtual index into the
    /// persisted page.
    pub fn record_scroll(&mut self, section: &S, offset: Point, centered_virtual: Option<usize>) {
        self.composition.save_offset(section, offset);
        if let Some(virtual_index) = centered_virtual {
            let count = self.composition.item_count(section);
            let page = self.composition.carousel().page_of(virtual_index, count);
            self.composition.save_page(section, page);
        }
    }

    /// The indices the host must touch to mirror a selection change on
    /// `item` to every virtual copy: the congruent stride for infinite
    /// strips, just the item's own index otherwise.
    pub fn selection_mirror_indices(&mut self, item: &I) -> Vec<usize> {
        let Some(path) = self.composition.index_path_of(item) else {
            return Vec::new();
        };
        let Some(section) = self.composition.section_at(path.section).cloned() else {
            return Vec::new();
        };
        match self.composition.style_of_section(&section) {
            Some(Style::Horizontal { rows, .. }) if rows.is_infinite() => {
                let count = self.composition.item_count(&section);
                self.composition
                    .carousel()
                    .congruent_indices(path.item, count)
                    .collect()
            }
            _ => vec![path.item],
        }
    }

    /// What to do with an embedded strip that is about to be shown again.
    pub fn restore(&mut self, section: &S) -> Restore {
        let Some(Style::Horizontal { rows, .. }) = self.composition.style_of_section(section)
        else {
            return Restore::None;
        };
        let count = self.composition.item_count(section);
        let carousel = self.composition.carousel();
        match rows {
            Rows::Infinite { snap: Snap::Automatic } => {
                match self.composition.offset_in(section) {
                    Some(offset) => Restore::Offset(offset),
                    None => Restore::CenterVirtual {
                        virtual_index: carousel.initial_index(count),
                    },
                }
            }
            Rows::Infinite { snap: Snap::Centered } => {
                let page = self.composition.page_in(section).unwrap_or(0);
                Restore::CenterVirtual {
                    virtual_index: carousel.initial_index(count) + page,
                }
            }
            Rows::Finite { snap: Snap::Automatic, .. } => {
                match self.composition.offset_in(section) {
                    Some(offset) => Restore::Offset(offset),
                    None => Restore::None,
                }
            }
            Rows::Finite { snap: Snap::Centered, .. } => {
                match self.composition.page_in(section) {
                    Some(page) => Restore::CenterItem { index: page },
                    None => Restore::None,
                }
            }
        }
    }
}

impl<S: SectionId, I: ItemId> Default for Controller<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> core::fmt::Debug for Controller<S, I>
where
    S: SectionId + core::fmt::Debug,
    I: ItemId + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("composition", &self.composition)
            .field("defer", &self.defer)
            .finish()
    }
}
