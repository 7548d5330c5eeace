use indexmap::IndexSet;

use crate::carousel::Carousel;
use crate::key::{ItemId, SectionId};
use crate::layout::Layout;
use crate::source::Source;
use crate::style::{Behaviour, LayoutProvider, Style};
use crate::update::{Delta, ItemChanges, ItemsFn, Update};
use crate::{GridFit, IndexPath, Insets, Point, RowHeight, Size};

/// Owns the snapshot, the layout engine and the interaction state for one
/// composed list, and funnels every mutation through itself.
///
/// Single-threaded by design: the host drives it from its UI thread, and
/// nothing here locks. Widgets and adapters only query; the sole writers
/// are [`Composition::batch`], the selection entry points, and the
/// measurement reports.
pub struct Composition<S, I> {
    source: Source<S, I>,
    layout: Layout<S, I>,
    behaviour: Behaviour<S>,
    carousel: Carousel,
    width: f32,
}

impl<S: SectionId, I: ItemId> Composition<S, I> {
    pub fn new() -> Self {
        Self {
            source: Source::new(),
            layout: Layout::new(),
            behaviour: Behaviour::new(),
            carousel: Carousel::default(),
            width: 0.0,
        }
    }

    pub fn with_provider(provider: LayoutProvider<S, I>) -> Self {
        let mut composition = Self::new();
        composition.set_layout_provider(Some(provider));
        composition
    }

    // Wiring.

    pub fn set_layout_provider(&mut self, provider: Option<LayoutProvider<S, I>>) {
        self.layout.set_provider(provider);
    }

    pub fn set_behaviour(&mut self, behaviour: Behaviour<S>) {
        self.behaviour = behaviour;
    }

    pub fn set_carousel(&mut self, carousel: Carousel) {
        self.carousel = carousel;
    }

    pub fn carousel(&self) -> Carousel {
        self.carousel
    }

    /// Updates the available layout width reported by the host viewport.
    ///
    /// Width participates in every cache key, so old entries simply stop
    /// matching; only the style memo (keyed by section alone) needs an
    /// explicit flush.
    pub fn set_width(&mut self, width: f32) {
        if self.width == width {
            return;
        }
        sdebug!(width, "set_width");
        self.width = width;
        self.layout.invalidate_styles();
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Read access to the snapshot and interaction state.
    pub fn source(&self) -> &Source<S, I> {
        &self.source
    }

    /// Read access to the layout engine (and through it, the cache).
    pub fn layout(&self) -> &Layout<S, I> {
        &self.layout
    }

    // Structure queries, in the outer widget's addressing scheme.

    pub fn section_count(&self) -> usize {
        self.source.section_count()
    }

    pub fn section_at(&self, index: usize) -> Option<&S> {
        self.source.section_at(index)
    }

    pub fn index_of_section(&self, section: &S) -> Option<usize> {
        self.source.index_of_section(section)
    }

    pub fn items_of(&self, section: &S) -> impl Iterator<Item = &I> + '_ {
        self.source.items_of(section)
    }

    pub fn item_count(&self, section: &S) -> usize {
        self.source.item_count(section)
    }

    pub fn index_path_of(&self, item: &I) -> Option<IndexPath> {
        self.source.index_path_of(item)
    }

    pub fn section_of_item(&self, item: &I) -> Option<&S> {
        self.source.section_of_item(item)
    }

    /// Rows the outer list shows for the section at `index`: one per item
    /// for vertical sections, a single wrapper row for everything else.
    pub fn row_count(&mut self, index: usize) -> usize {
        let Some(section) = self.source.section_at(index) else {
            return 0;
        };
        let section = section.clone();
        match self.layout.style(&section, self.width) {
            Some(Style::Vertical { .. }) => self.source.item_count(&section),
            _ => 1,
        }
    }

    /// Rows the *inner* widget of a grid/horizontal section shows; the
    /// virtual multiplication for infinite strips happens here.
    pub fn virtual_row_count(&mut self, section: &S) -> usize {
        let count = self.source.item_count(section);
        match self.layout.style(section, self.width) {
            Some(Style::Horizontal { rows, .. }) if rows.is_infinite() => {
                self.carousel.virtual_count(count)
            }
            _ => count,
        }
    }

    /// Resolves a (possibly virtual) inner index back to the item.
    pub fn item_at_virtual(&mut self, section: &S, virtual_index: usize) -> Option<&I> {
        let real = self
            .carousel
            .real_index(virtual_index, self.source.item_count(section));
        self.source.item_at(section, real)
    }

    // Geometry, delegated to the layout engine at the current width.

    pub fn style_of_section(&mut self, section: &S) -> Option<Style<I>> {
        self.layout.style(section, self.width)
    }

    pub fn height_of_section(&mut self, section: &S) -> f32 {
        self.layout
            .height_of_section(&self.source, self.width, section)
    }

    pub fn height_of_item(&mut self, item: &I, section: &S) -> RowHeight {
        self.layout.height_of_item(self.width, item, section)
    }

    pub fn row_height(&mut self, path: IndexPath) -> RowHeight {
        self.layout.row_height(&self.source, self.width, path)
    }

    pub fn size_of_item(&mut self, item: &I, section: &S) -> Size {
        self.layout.size_of_item(self.width, item, section)
    }

    pub fn spacing_of_section(&mut self, section: &S) -> f32 {
        self.layout
            .spacing_of_section(&self.source, self.width, section)
    }

    pub fn indent_of_section(&mut self, section: &S) -> f32 {
        self.layout
            .indent_of_section(&self.source, self.width, section)
    }

    pub fn insets_of_section(&mut self, section: &S) -> Insets {
        self.layout.insets_of_section(section, self.width)
    }

    pub fn grid_fit_of_section(&mut self, section: &S) -> GridFit {
        self.layout.grid_fit(&self.source, self.width, section)
    }

    pub fn header_of_section(&mut self, section: &S) -> RowHeight {
        self.layout
            .header_of_section(&self.source, self.width, section)
    }

    pub fn footer_of_section(&mut self, section: &S) -> RowHeight {
        self.layout
            .footer_of_section(&self.source, self.width, section)
    }

    // Measurement feedback from the host.

    pub fn report_measured(&mut self, height: f32, item: &I, section: &S) {
        self.layout
            .report_measured(height, item, section, self.width);
    }

    pub fn report_measured_header(&mut self, height: f32, section: &S) {
        self.layout
            .report_measured_header(&self.source, height, section, self.width);
    }

    pub fn report_measured_footer(&mut self, height: f32, section: &S) {
        self.layout
            .report_measured_footer(&self.source, height, section, self.width);
    }

    pub fn mark_visible(&mut self, section: &S, visible: bool) {
        self.layout.mark_visible(section, visible);
    }

    // Cache invalidation outside a structural batch (e.g. a single cell's
    // content changed in place).

    pub fn invalidate_item(&mut self, item: &I, section: &S) {
        self.layout.invalidate_item(item, section);
    }

    pub fn invalidate_section(&mut self, section: &S) {
        self.layout.invalidate_section(section);
    }

    pub fn invalidate_all(&mut self) {
        self.layout.invalidate_all();
    }

    // Selection.

    pub fn is_selected(&self, item: &I) -> bool {
        self.source.is_selected(item)
    }

    /// Selects an item, honoring the section's multiselection behaviour:
    /// with multiselection off, other selected items of the same section
    /// are deselected first. No-op for items not in the snapshot.
    pub fn select(&mut self, item: &I) {
        let Some(section) = self.source.section_of_item(item).cloned() else {
            return;
        };
        if self.source.is_selected(item) {
            return;
        }
        if !self.behaviour.multiselection(&section) {
            let others: Vec<I> = self
                .source
                .items_of(&section)
                .filter(|other| self.source.is_selected(*other))
                .cloned()
                .collect();
            for other in &others {
                self.source.set_selected(other, false);
            }
        }
        self.source.set_selected(item, true);
    }

    pub fn deselect(&mut self, item: &I) {
        self.source.set_selected(item, false);
    }

    pub fn select_all(&mut self) {
        self.source.select_all();
    }

    pub fn deselect_all(&mut self) {
        self.source.deselect_all();
    }

    // Scroll offset and page persistence for embedded strips.

    pub fn save_offset(&mut self, section: &S, offset: Point) {
        if !self.source.contains_section(section) {
            return;
        }
        self.source.save_offset(section, offset);
    }

    pub fn offset_in(&self, section: &S) -> Option<Point> {
        self.source.offset_in(section)
    }

    pub fn save_page(&mut self, section: &S, page: usize) {
        if !self.source.contains_section(section) {
            return;
        }
        self.source.save_page(section, page);
    }

    pub fn page_in(&self, section: &S) -> Option<usize> {
        self.source.page_in(section)
    }

    // Batched structural mutation.

    /// Applies the operations strictly in order; each one computes its
    /// delta against the state as mutated by the operations before it.
    /// Returns one delta per operation, for the host to apply inside its
    /// own begin/end-update brackets.
    pub fn batch(&mut self, updates: impl IntoIterator<Item = Update<S, I>>) -> Vec<Delta> {
        updates.into_iter().map(|update| self.apply(update)).collect()
    }

    fn apply(&mut self, update: Update<S, I>) -> Delta {
        match update {
            Update::SetSections { sections, items } => self.set_sections(sections, items),
            Update::AppendSections { sections, items } => self.append_sections(sections, items),
            Update::AddSections { sections, at, items } => self.add_sections(sections, at, items),
            Update::DeleteSections { sections } => self.delete_sections(sections),
            Update::ReloadSections { sections } => self.reload_sections(sections),
            Update::SetItems { items, section } => self.set_items(items, section),
            Update::AppendItems { items, section } => self.append_items(items, section),
            Update::RefreshSections { sections } => self.refresh_sections(sections),
        }
    }

    /// Hard reset: the new section set is assumed unrelated to the old one.
    fn set_sections(&mut self, sections: Vec<S>, items: Option<ItemsFn<S, I>>) -> Delta {
        sdebug!(
            old = self.source.sections.len(),
            new = sections.len(),
            "set_sections"
        );
        self.layout.invalidate_all();
        self.source.selected.clear();
        self.source.offsets.clear();
        self.source.pages.clear();

        let deleted: Vec<usize> = (0..self.source.sections.len()).collect();
        self.source.sections = sections.into_iter().collect();
        self.source.items.clear();
        let inserted: Vec<usize> = (0..self.source.sections.len()).collect();

        if let Some(items_fn) = items {
            let sections: Vec<S> = self.source.sections.iter().cloned().collect();
            for section in sections {
                self.store_items_for(&section, &items_fn);
            }
        }

        Delta {
            deleted_sections: deleted,
            inserted_sections: inserted,
            ..Delta::default()
        }
    }

    fn append_sections(&mut self, sections: Vec<S>, items: Option<ItemsFn<S, I>>) -> Delta {
        let mut inserted = Vec::new();
        for section in sections {
            if self.source.sections.insert(section.clone()) {
                inserted.push(self.source.sections.len() - 1);
                if let Some(items_fn) = &items {
                    self.store_items_for(&section, items_fn);
                }
            }
        }
        Delta {
            inserted_sections: inserted,
            ..Delta::default()
        }
    }

    fn add_sections(&mut self, sections: Vec<S>, at: usize, items: Option<ItemsFn<S, I>>) -> Delta {
        if sections.is_empty() {
            return Delta::default();
        }
        let at = at.min(self.source.sections.len());
        let mut rebuilt: IndexSet<S> =
            IndexSet::with_capacity(self.source.sections.len() + sections.len());
        for section in self.source.sections.iter().take(at) {
            rebuilt.insert(section.clone());
        }
        let mut inserted = Vec::new();
        let mut fresh = Vec::new();
        for section in sections {
            if rebuilt.insert(section.clone()) {
                inserted.push(rebuilt.len() - 1);
                fresh.push(section);
            }
        }
        for section in self.source.sections.iter().skip(at) {
            rebuilt.insert(section.clone());
        }
        self.source.sections = rebuilt;
        if let Some(items_fn) = &items {
            for section in &fresh {
                self.store_items_for(section, items_fn);
            }
        }
        Delta {
            inserted_sections: inserted,
            ..Delta::default()
        }
    }

    /// Removes by identity, not position: indices are resolved against the
    /// current (intra-batch) state before anything moves. Unknown
    /// identities are ignored.
    fn delete_sections(&mut self, sections: Vec<S>) -> Delta {
        let mut deleted = Vec::new();
        for section in &sections {
            let Some(index) = self.source.sections.get_index_of(section) else {
                swarn!("delete_sections: identity not in snapshot, skipping");
                continue;
            };
            deleted.push(index);
            self.layout.invalidate_section(section);
            self.source.purge_section_state(section);
        }
        deleted.sort_unstable();
        deleted.dedup();
        for section in &sections {
            self.source.sections.shift_remove(section);
            self.source.items.remove(section);
        }
        Delta {
            deleted_sections: deleted,
            ..Delta::default()
        }
    }

    fn reload_sections(&mut self, sections: Vec<S>) -> Delta {
        let mut reloaded = Vec::new();
        for section in &sections {
            self.layout.invalidate_section(section);
            if let Some(index) = self.source.sections.get_index_of(section) {
                reloaded.push(index);
            }
        }
        reloaded.sort_unstable();
        reloaded.dedup();
        Delta {
            reloaded_sections: reloaded,
            ..Delta::default()
        }
    }

    fn set_items(&mut self, items: Vec<I>, section: S) -> Delta {
        self.layout.invalidate_section(&section);
        let Some(section_index) = self.source.index_of_section(&section) else {
            return Delta::default();
        };
        let Some(style) = self.layout.style(&section, self.width) else {
            return Delta::default();
        };

        let new: IndexSet<I> = items.into_iter().collect();
        let old_count = self.source.item_count(&section);

        // Purge selection of items that do not survive the replacement.
        let orphaned: Vec<I> = self
            .source
            .items_of(&section)
            .filter(|item| !new.contains(*item) && self.source.is_selected(*item))
            .cloned()
            .collect();
        for item in &orphaned {
            self.source.selected.remove(item);
        }

        let new_count = new.len();
        if new.is_empty() {
            self.source.items.remove(&section);
        } else {
            self.source.items.insert(section.clone(), new);
        }
        if self.source.page_in(&section).is_some_and(|page| page >= new_count) {
            self.source.pages.remove(&section);
        }

        let items = if style.is_embedded() {
            ItemChanges::Embedded {
                section: section_index,
                deleted: (0..old_count).collect(),
                inserted: (0..new_count).collect(),
            }
        } else {
            ItemChanges::Outer {
                deleted: (0..old_count)
                    .map(|item| IndexPath::new(section_index, item))
                    .collect(),
                inserted: (0..new_count)
                    .map(|item| IndexPath::new(section_index, item))
                    .collect(),
            }
        };
        Delta {
            items: Some(items),
            ..Delta::default()
        }
    }

    fn append_items(&mut self, items: Vec<I>, section: S) -> Delta {
        self.layout.invalidate_section(&section);
        if items.is_empty() {
            return Delta::default();
        }
        let Some(section_index) = self.source.index_of_section(&section) else {
            return Delta::default();
        };

        let set = self.source.items.entry(section.clone()).or_default();
        let start = set.len();
        for item in items {
            set.insert(item);
        }
        let end = set.len();
        if end == start {
            if start == 0 {
                self.source.items.remove(&section);
            }
            return Delta::default();
        }

        let items = match self.layout.style(&section, self.width) {
            Some(style) if style.is_embedded() => Some(ItemChanges::Embedded {
                section: section_index,
                deleted: Vec::new(),
                inserted: (start..end).collect(),
            }),
            Some(_) => Some(ItemChanges::Outer {
                deleted: Vec::new(),
                inserted: (start..end)
                    .map(|item| IndexPath::new(section_index, item))
                    .collect(),
            }),
            None => None,
        };
        Delta {
            items,
            ..Delta::default()
        }
    }

    fn refresh_sections(&mut self, sections: Vec<S>) -> Delta {
        for section in &sections {
            self.layout.invalidate_section(section);
        }
        Delta::refresh()
    }

    fn store_items_for(&mut self, section: &S, items_fn: &ItemsFn<S, I>) {
        if let Some(list) = items_fn(section) {
            if !list.is_empty() {
                self.source
                    .items
                    .insert(section.clone(), list.into_iter().collect());
            }
        }
    }
}

impl<S: SectionId, I: ItemId> Default for Composition<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> core::fmt::Debug for Composition<S, I>
where
    S: SectionId + core::fmt::Debug,
    I: ItemId + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Composition")
            .field("source", &self.source)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}
