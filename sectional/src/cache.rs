use std::collections::{HashMap, HashSet};

use crate::key::{ItemId, SectionId};
use crate::style::Style;
use crate::{GridFit, Size};

fn width_bits(width: f32) -> u32 {
    // Canonicalize so -0.0 and 0.0 share a key; NaN widths (a host bug)
    // collapse to a single key instead of never hitting.
    if width == 0.0 {
        0.0f32.to_bits()
    } else if width.is_nan() {
        f32::NAN.to_bits()
    } else {
        width.to_bits()
    }
}

/// Cache key for section-level entries.
///
/// A changed width or item count must miss, never reuse: both are part of
/// the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectionKey {
    width: u32,
    count: usize,
}

impl SectionKey {
    pub fn new(width: f32, count: usize) -> Self {
        Self {
            width: width_bits(width),
            count,
        }
    }
}

/// Cache key for item-level entries. Item count is irrelevant at item
/// granularity; only the width participates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemKey {
    width: u32,
}

impl ItemKey {
    pub fn new(width: f32) -> Self {
        Self {
            width: width_bits(width),
        }
    }
}

#[derive(Default)]
struct SectionFields {
    height: HashMap<SectionKey, f32>,
    inter_item: HashMap<SectionKey, f32>,
    inter_line: HashMap<SectionKey, f32>,
    columns: HashMap<SectionKey, usize>,
    grid_fit: HashMap<SectionKey, GridFit>,
    header: HashMap<SectionKey, f32>,
    footer: HashMap<SectionKey, f32>,
}

#[derive(Default)]
struct ItemFields {
    size: HashMap<ItemKey, Size>,
    width: HashMap<ItemKey, f32>,
    height: HashMap<ItemKey, f32>,
}

/// Memoized geometry, keyed by the parameters that invalidate it.
///
/// Every operation is an O(1) amortized hash lookup; missing keys return
/// `None`. Invalidating a section removes *all* kinds of entries scoped to
/// it, including every nested item entry: cache keys are partitioned by
/// item count, so any structural change to a section makes all of its old
/// keys unreachable anyway.
pub struct Cache<S, I> {
    sections: HashMap<S, SectionFields>,
    items: HashMap<S, HashMap<I, ItemFields>>,
    visible: HashSet<S>,
    styles: HashMap<S, Style<I>>,
}

impl<S: SectionId, I: ItemId> Cache<S, I> {
    pub(crate) fn new() -> Self {
        Self {
            sections: HashMap::new(),
            items: HashMap::new(),
            visible: HashSet::new(),
            styles: HashMap::new(),
        }
    }

    // Section entries.

    pub fn height(&self, section: &S, key: SectionKey) -> Option<f32> {
        self.sections.get(section)?.height.get(&key).copied()
    }

    pub(crate) fn store_height(&mut self, section: &S, key: SectionKey, height: f32) {
        self.section_fields(section).height.insert(key, height);
    }

    pub fn inter_item(&self, section: &S, key: SectionKey) -> Option<f32> {
        self.sections.get(section)?.inter_item.get(&key).copied()
    }

    pub(crate) fn store_inter_item(&mut self, section: &S, key: SectionKey, spacing: f32) {
        self.section_fields(section).inter_item.insert(key, spacing);
    }

    pub fn inter_line(&self, section: &S, key: SectionKey) -> Option<f32> {
        self.sections.get(section)?.inter_line.get(&key).copied()
    }

    pub(crate) fn store_inter_line(&mut self, section: &S, key: SectionKey, spacing: f32) {
        self.section_fields(section).inter_line.insert(key, spacing);
    }

    pub fn columns(&self, section: &S, key: SectionKey) -> Option<usize> {
        self.sections.get(section)?.columns.get(&key).copied()
    }

    pub(crate) fn store_columns(&mut self, section: &S, key: SectionKey, columns: usize) {
        self.section_fields(section).columns.insert(key, columns);
    }

    pub fn grid_fit(&self, section: &S, key: SectionKey) -> Option<GridFit> {
        self.sections.get(section)?.grid_fit.get(&key).copied()
    }

    pub(crate) fn store_grid_fit(&mut self, section: &S, key: SectionKey, fit: GridFit) {
        self.section_fields(section).grid_fit.insert(key, fit);
    }

    pub fn header(&self, section: &S, key: SectionKey) -> Option<f32> {
        self.sections.get(section)?.header.get(&key).copied()
    }

    pub(crate) fn store_header(&mut self, section: &S, key: SectionKey, height: f32) {
        self.section_fields(section).header.insert(key, height);
    }

    pub fn footer(&self, section: &S, key: SectionKey) -> Option<f32> {
        self.sections.get(section)?.footer.get(&key).copied()
    }

    pub(crate) fn store_footer(&mut self, section: &S, key: SectionKey, height: f32) {
        self.section_fields(section).footer.insert(key, height);
    }

    // Visibility flag and memoized style.

    pub fn is_visible(&self, section: &S) -> bool {
        self.visible.contains(section)
    }

    pub(crate) fn store_visible(&mut self, section: &S) {
        self.visible.insert(section.clone());
    }

    pub(crate) fn remove_visible(&mut self, section: &S) {
        self.visible.remove(section);
    }

    pub fn style(&self, section: &S) -> Option<&Style<I>> {
        self.styles.get(section)
    }

    pub(crate) fn store_style(&mut self, section: &S, style: Style<I>) {
        self.styles.insert(section.clone(), style);
    }

    // Item entries.

    pub fn item_size(&self, section: &S, item: &I, key: ItemKey) -> Option<Size> {
        self.items.get(section)?.get(item)?.size.get(&key).copied()
    }

    pub(crate) fn store_item_size(&mut self, section: &S, item: &I, key: ItemKey, size: Size) {
        self.item_fields(section, item).size.insert(key, size);
    }

    pub fn item_width(&self, section: &S, item: &I, key: ItemKey) -> Option<f32> {
        self.items.get(section)?.get(item)?.width.get(&key).copied()
    }

    pub(crate) fn store_item_width(&mut self, section: &S, item: &I, key: ItemKey, width: f32) {
        self.item_fields(section, item).width.insert(key, width);
    }

    pub fn item_height(&self, section: &S, item: &I, key: ItemKey) -> Option<f32> {
        self.items.get(section)?.get(item)?.height.get(&key).copied()
    }

    pub(crate) fn store_item_height(&mut self, section: &S, item: &I, key: ItemKey, height: f32) {
        self.item_fields(section, item).height.insert(key, height);
    }

    // Removal.

    pub fn remove_item(&mut self, section: &S, item: &I) {
        if let Some(items) = self.items.get_mut(section) {
            items.remove(item);
        }
    }

    pub fn remove_items<'a>(&mut self, section: &S, items: impl IntoIterator<Item = &'a I>)
    where
        I: 'a,
    {
        if let Some(fields) = self.items.get_mut(section) {
            for item in items {
                fields.remove(item);
            }
        }
    }

    /// Removes every kind of entry scoped to `section`, item entries
    /// included.
    pub fn remove_section(&mut self, section: &S) {
        self.sections.remove(section);
        self.items.remove(section);
        self.visible.remove(section);
        self.styles.remove(section);
    }

    pub fn remove_sections<'a>(&mut self, sections: impl IntoIterator<Item = &'a S>)
    where
        S: 'a,
    {
        for section in sections {
            self.remove_section(section);
        }
    }

    pub fn clear(&mut self) {
        self.sections.clear();
        self.items.clear();
        self.visible.clear();
        self.styles.clear();
    }

    pub(crate) fn clear_styles(&mut self) {
        self.styles.clear();
    }

    fn section_fields(&mut self, section: &S) -> &mut SectionFields {
        self.sections.entry(section.clone()).or_default()
    }

    fn item_fields(&mut self, section: &S, item: &I) -> &mut ItemFields {
        self.items
            .entry(section.clone())
            .or_default()
            .entry(item.clone())
            .or_default()
    }
}

impl<S: SectionId, I: ItemId> Default for Cache<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SectionId + core::fmt::Debug, I: ItemId> core::fmt::Debug for Cache<S, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cache")
            .field("sections", &self.sections.len())
            .field("items", &self.items.len())
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}
