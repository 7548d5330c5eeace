use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::key::{ItemId, SectionId};
use crate::{IndexPath, Point};

/// The current ordered section/item structure plus the interaction state
/// scoped to it: selected items, per-section scroll offsets, per-section
/// carousel pages.
///
/// Mutated only through [`Composition::batch`](crate::Composition::batch)
/// and the selection entry points; everything here is a read-only query.
pub struct Source<S, I> {
    pub(crate) sections: IndexSet<S>,
    /// Only non-empty entries are stored; an absent key means "no items".
    pub(crate) items: HashMap<S, IndexSet<I>>,
    pub(crate) selected: HashSet<I>,
    pub(crate) offsets: HashMap<S, Point>,
    pub(crate) pages: HashMap<S, usize>,
}

impl<S: SectionId, I: ItemId> Source<S, I> {
    pub(crate) fn new() -> Self {
        Self {
            sections: IndexSet::new(),
            items: HashMap::new(),
            selected: HashSet::new(),
            offsets: HashMap::new(),
            pages: HashMap::new(),
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn sections(&self) -> impl Iterator<Item = &S> + '_ {
        self.sections.iter()
    }

    pub fn section_at(&self, index: usize) -> Option<&S> {
        self.sections.get_index(index)
    }

    pub fn index_of_section(&self, section: &S) -> Option<usize> {
        self.sections.get_index_of(section)
    }

    pub fn contains_section(&self, section: &S) -> bool {
        self.sections.contains(section)
    }

    pub fn item_count(&self, section: &S) -> usize {
        self.items.get(section).map_or(0, IndexSet::len)
    }

    pub fn items_of(&self, section: &S) -> impl Iterator<Item = &I> + '_ {
        self.items.get(section).into_iter().flatten()
    }

    pub fn item_at(&self, section: &S, index: usize) -> Option<&I> {
        self.items.get(section)?.get_index(index)
    }

    pub fn item_at_path(&self, path: IndexPath) -> Option<&I> {
        let section = self.section_at(path.section)?;
        self.item_at(section, path.item)
    }

    pub fn contains_item(&self, item: &I) -> bool {
        self.items.values().any(|items| items.contains(item))
    }

    /// The section currently owning `item`. Identities are unique across
    /// sections, so at most one section matches.
    pub fn section_of_item(&self, item: &I) -> Option<&S> {
        self.sections
            .iter()
            .find(|section| self.items.get(*section).is_some_and(|items| items.contains(item)))
    }

    pub fn index_path_of(&self, item: &I) -> Option<IndexPath> {
        let section = self.section_of_item(item)?;
        let section_index = self.sections.get_index_of(section)?;
        let item_index = self.items.get(section)?.get_index_of(item)?;
        Some(IndexPath::new(section_index, item_index))
    }

    /// Whether the row at `path` gets a separator below it: every row but
    /// the last.
    pub fn separatable(&self, path: IndexPath) -> bool {
        let Some(section) = self.section_at(path.section) else {
            return false;
        };
        let count = self.item_count(section);
        path.item + 1 < count
    }

    // Selection.

    pub fn is_selected(&self, item: &I) -> bool {
        self.selected.contains(item)
    }

    pub fn selected(&self) -> impl Iterator<Item = &I> + '_ {
        self.selected.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub(crate) fn set_selected(&mut self, item: &I, selected: bool) {
        if selected {
            self.selected.insert(item.clone());
        } else {
            self.selected.remove(item);
        }
    }

    pub(crate) fn select_all(&mut self) {
        for items in self.items.values() {
            for item in items {
                self.selected.insert(item.clone());
            }
        }
    }

    pub(crate) fn deselect_all(&mut self) {
        self.selected.clear();
    }

    // Saved scroll offsets of embedded strips.

    pub fn offset_in(&self, section: &S) -> Option<Point> {
        self.offsets.get(section).copied()
    }

    pub(crate) fn save_offset(&mut self, section: &S, offset: Point) {
        self.offsets.insert(section.clone(), offset);
    }

    // Carousel pages (center-snap position, folded to a real index).

    pub fn page_in(&self, section: &S) -> Option<usize> {
        self.pages.get(section).copied()
    }

    pub(crate) fn save_page(&mut self, section: &S, page: usize) {
        self.pages.insert(section.clone(), page);
    }

    /// Drops selection entries for every item of `section`.
    pub(crate) fn purge_selection_in(&mut self, section: &S) {
        if let Some(items) = self.items.get(section) {
            for item in items {
                self.selected.remove(item);
            }
        }
    }

    /// Drops all per-section interaction state for `section`.
    pub(crate) fn purge_section_state(&mut self, section: &S) {
        self.purge_selection_in(section);
        self.offsets.remove(section);
        self.pages.remove(section);
    }
}

impl<S: SectionId, I: ItemId> Default for Source<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> core::fmt::Debug for Source<S, I>
where
    S: core::fmt::Debug,
    I: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Source")
            .field("sections", &self.sections)
            .field("items", &self.items)
            .field("selected", &self.selected)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}
