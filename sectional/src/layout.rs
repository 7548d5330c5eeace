use crate::cache::{Cache, ItemKey, SectionKey};
use crate::key::{ItemId, SectionId};
use crate::source::Source;
use crate::style::{LayoutProvider, Style};
use crate::{Dimension, GridFit, IndexPath, Insets, RowHeight, Size};

/// The layout engine: turns `(section style, item set, available width)`
/// into concrete geometry, memoizing through the [`Cache`].
///
/// All queries are total functions: a missing style, an absent item, or a
/// dangling index mid-mutation degrades to zero-valued geometry instead of
/// failing, so the host can always render a transient state.
///
/// Queries take `&mut self` because they may fill the cache; the cache is
/// only ever written here and through the measurement reports.
pub struct Layout<S, I> {
    provider: Option<LayoutProvider<S, I>>,
    cache: Cache<S, I>,
}

impl<S: SectionId, I: ItemId> Layout<S, I> {
    pub(crate) fn new() -> Self {
        Self {
            provider: None,
            cache: Cache::new(),
        }
    }

    pub fn provider(&self) -> Option<&LayoutProvider<S, I>> {
        self.provider.as_ref()
    }

    pub(crate) fn set_provider(&mut self, provider: Option<LayoutProvider<S, I>>) {
        self.provider = provider;
        // Memoized styles came from the old resolver.
        self.cache.clear();
    }

    /// Resolves the section's style, memoizing the answer so the resolver
    /// is not re-queried on every geometry call. Invalidation clears the
    /// memo.
    pub fn style(&mut self, section: &S, width: f32) -> Option<Style<I>> {
        if let Some(style) = self.cache.style(section) {
            return Some(style.clone());
        }
        let style = self.provider.as_ref()?.style.as_ref()?(section, width)?;
        self.cache.store_style(section, style.clone());
        Some(style)
    }

    /// Header height rule resolved to a per-row answer.
    ///
    /// `Automatic` yields a cached measured height when one was reported,
    /// otherwise the self-sizing sentinel.
    pub fn header_of_section(&mut self, source: &Source<S, I>, width: f32, section: &S) -> RowHeight {
        self.boundary_of_section(source, width, section, true)
    }

    pub fn footer_of_section(&mut self, source: &Source<S, I>, width: f32, section: &S) -> RowHeight {
        self.boundary_of_section(source, width, section, false)
    }

    fn boundary_of_section(
        &mut self,
        source: &Source<S, I>,
        width: f32,
        section: &S,
        header: bool,
    ) -> RowHeight {
        let rule = self.provider.as_ref().and_then(|provider| {
            let f = if header {
                provider.header.as_ref()
            } else {
                provider.footer.as_ref()
            };
            f.and_then(|f| f(section, width))
        });
        match rule {
            Some(Dimension::Absolute(height)) => RowHeight::Fixed(height),
            Some(Dimension::Automatic) => {
                let key = SectionKey::new(width, source.item_count(section));
                let cached = if header {
                    self.cache.header(section, key)
                } else {
                    self.cache.footer(section, key)
                };
                match cached {
                    Some(height) => RowHeight::Fixed(height),
                    None => RowHeight::SelfSizing,
                }
            }
            Some(Dimension::Zero) | None => RowHeight::Fixed(0.0),
        }
    }

    /// Total height of a section, per its style.
    pub fn height_of_section(&mut self, source: &Source<S, I>, width: f32, section: &S) -> f32 {
        let Some(style) = self.style(section, width) else {
            return 0.0;
        };
        match style {
            Style::Vertical { .. } => {
                // Not cached under (width, count): measured row heights can
                // change without either key component moving.
                let count = source.item_count(section);
                let mut total = 0.0;
                for index in 0..count {
                    let Some(item) = source.item_at(section, index) else {
                        continue;
                    };
                    let item = item.clone();
                    total += self
                        .row_height_vertical(width, &item, section, index, count)
                        .or_zero();
                }
                total
            }
            Style::Horizontal {
                insets,
                spacing,
                rows,
                size,
            } => {
                let key = SectionKey::new(width, source.item_count(section));
                if let Some(cached) = self.cache.height(section, key) {
                    return cached;
                }
                let heights: Vec<f32> = source
                    .items_of(section)
                    .map(|item| size(item).map_or(0.0, |size| size.height))
                    .collect();
                let height = horizontal_height(&heights, insets, spacing, rows.count());
                self.cache.store_height(section, key, height);
                height
            }
            Style::Grid { .. } => self.grid_fit(source, width, section).height,
            Style::Custom { height } => height,
        }
    }

    /// The grid auto-fit result for a section, computed on first demand and
    /// cached under the `(width, item count)` key.
    pub fn grid_fit(&mut self, source: &Source<S, I>, width: f32, section: &S) -> GridFit {
        let Some(Style::Grid { insets, mode, size }) = self.style(section, width) else {
            return GridFit::ZERO;
        };
        let count = source.item_count(section);
        let key = SectionKey::new(width, count);
        if let Some(cached) = self.cache.grid_fit(section, key) {
            return cached;
        }

        // The engine only samples the first item: grid cells are assumed
        // identically sized.
        let sample = source.item_at(section, 0).and_then(|item| size(item));
        let fit = grid_fit(width, insets, mode.min_spacing(), mode.fixed_indent(), sample, count);
        strace!(
            columns = fit.columns,
            height = fit.height,
            count,
            "grid auto-fit"
        );
        self.cache.store_grid_fit(section, key, fit);
        self.cache.store_height(section, key, fit.height);
        self.cache.store_inter_item(section, key, fit.inter_item);
        self.cache.store_inter_line(section, key, fit.inter_line);
        self.cache.store_columns(section, key, fit.columns);
        fit
    }

    /// Bare item height, before any separator allowance.
    pub fn height_of_item(&mut self, width: f32, item: &I, section: &S) -> RowHeight {
        let Some(style) = self.style(section, width) else {
            return RowHeight::Fixed(0.0);
        };
        match style {
            Style::Horizontal { size, .. } | Style::Grid { size, .. } => {
                RowHeight::Fixed(size(item).map_or(0.0, |size| size.height))
            }
            Style::Vertical { height, .. } => match height(item) {
                Some(Dimension::Automatic) => {
                    let key = ItemKey::new(width);
                    match self.cache.item_height(section, item, key) {
                        Some(cached) => RowHeight::Fixed(cached),
                        None => RowHeight::SelfSizing,
                    }
                }
                Some(Dimension::Absolute(height)) => RowHeight::Fixed(height),
                Some(Dimension::Zero) | None => RowHeight::Fixed(0.0),
            },
            Style::Custom { .. } => RowHeight::Fixed(0.0),
        }
    }

    /// The answer to the outer widget's "height of the row at `path`".
    ///
    /// Grid/horizontal sections occupy a single opaque outer row, so their
    /// row height is the whole section height. Vertical rows carry their
    /// separator allowance.
    pub fn row_height(&mut self, source: &Source<S, I>, width: f32, path: IndexPath) -> RowHeight {
        let Some(section) = source.section_at(path.section) else {
            return RowHeight::Fixed(0.0);
        };
        let section = section.clone();
        let Some(style) = self.style(&section, width) else {
            return RowHeight::Fixed(0.0);
        };
        match style {
            Style::Grid { .. } | Style::Horizontal { .. } => {
                RowHeight::Fixed(self.height_of_section(source, width, &section))
            }
            Style::Vertical { .. } => {
                let count = source.item_count(&section);
                let Some(item) = source.item_at(&section, path.item) else {
                    return RowHeight::Fixed(0.0);
                };
                let item = item.clone();
                self.row_height_vertical(width, &item, &section, path.item, count)
            }
            Style::Custom { height } => RowHeight::Fixed(height),
        }
    }

    /// One vertical row: bare item height plus the separator allowance that
    /// applies to this position. The allowance is added whether or not the
    /// automatic height has resolved yet, so the aggregate section sum and
    /// the live per-row path always agree.
    fn row_height_vertical(
        &mut self,
        width: f32,
        item: &I,
        section: &S,
        index: usize,
        count: usize,
    ) -> RowHeight {
        let allowance = match self.style(section, width) {
            Some(Style::Vertical {
                separator: Some(separator),
                ..
            }) if index + 1 < count || separator.trailing => separator.height,
            _ => 0.0,
        };
        match self.height_of_item(width, item, section) {
            RowHeight::Fixed(height) => RowHeight::Fixed(height + allowance),
            RowHeight::SelfSizing => RowHeight::SelfSizing,
        }
    }

    /// Item size for the embedded inner widget (grid/horizontal) or the
    /// outer row (vertical/custom).
    pub fn size_of_item(&mut self, width: f32, item: &I, section: &S) -> Size {
        match self.style(section, width) {
            Some(Style::Horizontal { size, .. }) | Some(Style::Grid { size, .. }) => {
                size(item).unwrap_or(Size::ZERO)
            }
            _ => Size::new(width, self.height_of_item(width, item, section).or_zero()),
        }
    }

    /// Spacing between items on one line of the embedded widget.
    pub fn spacing_of_section(&mut self, source: &Source<S, I>, width: f32, section: &S) -> f32 {
        match self.style(section, width) {
            Some(Style::Horizontal { spacing, .. }) => spacing,
            Some(Style::Grid { .. }) => self.grid_fit(source, width, section).inter_item,
            _ => 0.0,
        }
    }

    /// Spacing between lines of the embedded widget.
    pub fn indent_of_section(&mut self, source: &Source<S, I>, width: f32, section: &S) -> f32 {
        match self.style(section, width) {
            Some(Style::Horizontal { spacing, .. }) => spacing,
            Some(Style::Grid { .. }) => self.grid_fit(source, width, section).inter_line,
            _ => 0.0,
        }
    }

    pub fn insets_of_section(&mut self, section: &S, width: f32) -> Insets {
        match self.style(section, width) {
            Some(Style::Horizontal { insets, .. }) | Some(Style::Grid { insets, .. }) => insets,
            _ => Insets::ZERO,
        }
    }

    // Measurement feedback.

    /// Records a host-measured row height.
    ///
    /// First write wins per `(item, width)` key: repeated re-measurement
    /// passes at the same width must not overwrite an already recorded
    /// value, which would oscillate the layout.
    pub fn report_measured(&mut self, height: f32, item: &I, section: &S, width: f32) {
        let key = ItemKey::new(width);
        if self.cache.item_height(section, item, key).is_some() {
            return;
        }
        strace!(height, "report_measured");
        self.cache.store_item_height(section, item, key, height);
        self.cache
            .store_item_size(section, item, key, Size::new(width, height));
        self.cache.store_item_width(section, item, key, width);
    }

    pub fn report_measured_header(
        &mut self,
        source: &Source<S, I>,
        height: f32,
        section: &S,
        width: f32,
    ) {
        let key = SectionKey::new(width, source.item_count(section));
        if self.cache.header(section, key).is_none() {
            self.cache.store_header(section, key, height);
        }
    }

    pub fn report_measured_footer(
        &mut self,
        source: &Source<S, I>,
        height: f32,
        section: &S,
        width: f32,
    ) {
        let key = SectionKey::new(width, source.item_count(section));
        if self.cache.footer(section, key).is_none() {
            self.cache.store_footer(section, key, height);
        }
    }

    // Visibility bookkeeping for the host's appearance callbacks.

    pub fn mark_visible(&mut self, section: &S, visible: bool) {
        if visible {
            self.cache.store_visible(section);
        } else {
            self.cache.remove_visible(section);
        }
    }

    pub fn is_visible(&self, section: &S) -> bool {
        self.cache.is_visible(section)
    }

    // Invalidation.

    pub fn invalidate_item(&mut self, item: &I, section: &S) {
        self.cache.remove_item(section, item);
    }

    pub fn invalidate_items<'a>(&mut self, items: impl IntoIterator<Item = &'a I>, section: &S)
    where
        I: 'a,
    {
        self.cache.remove_items(section, items);
    }

    pub fn invalidate_section(&mut self, section: &S) {
        self.cache.remove_section(section);
    }

    pub fn invalidate_sections<'a>(&mut self, sections: impl IntoIterator<Item = &'a S>)
    where
        S: 'a,
    {
        self.cache.remove_sections(sections);
    }

    pub fn invalidate_all(&mut self) {
        sdebug!("invalidate_all");
        self.cache.clear();
    }

    /// Flushes memoized styles only; called when the available width moves,
    /// since the memo is keyed by section alone.
    pub(crate) fn invalidate_styles(&mut self) {
        self.cache.clear_styles();
    }

    /// Read access to the measurement cache.
    pub fn cache(&self) -> &Cache<S, I> {
        &self.cache
    }
}

/// Horizontal strip height: insets plus the tallest column, where a column
/// is a contiguous chunk of `rows` items from the flat order (the last
/// chunk may be shorter), its items stacked with `spacing` between them.
fn horizontal_height(heights: &[f32], insets: Insets, spacing: f32, rows: usize) -> f32 {
    let inset = insets.vertical();
    match rows {
        1 => {
            let max = heights.iter().copied().fold(None, f32_max);
            inset + max.unwrap_or(0.0)
        }
        rows if rows >= 2 => {
            let max = heights
                .chunks(rows)
                .map(|chunk| chunk.iter().sum::<f32>() + spacing * (rows - 1) as f32)
                .fold(None, f32_max);
            inset + max.unwrap_or(0.0)
        }
        _ => inset,
    }
}

fn f32_max(best: Option<f32>, next: f32) -> Option<f32> {
    match best {
        Some(best) if best >= next => Some(best),
        _ => Some(next),
    }
}

/// The grid auto-fit search.
///
/// Geometry is decided from a single sampled item size. Nothing fitting,
/// an absent sample, or a zero width all degrade to [`GridFit::ZERO`].
fn grid_fit(
    width: f32,
    insets: Insets,
    min_spacing: f32,
    fixed_indent: Option<f32>,
    sample: Option<Size>,
    count: usize,
) -> GridFit {
    let Some(sample) = sample else {
        return GridFit::ZERO;
    };
    if width <= 0.0 || count == 0 {
        return GridFit::ZERO;
    }
    let item_width = sample.width;
    let item_height = sample.height;
    let fit = width - insets.horizontal();
    if fit <= item_width {
        return GridFit::ZERO;
    }

    // Single row at the minimum spacing when everything fits naively.
    if item_width * count as f32 + min_spacing * (count as f32 - 1.0) <= fit {
        return GridFit {
            height: insets.top + item_height + insets.bottom,
            inter_item: min_spacing,
            inter_line: 0.0,
            columns: 1,
        };
    }

    // Grow the column count while the adapted spacing stays legal; the
    // first violation backs off by one.
    let mut columns = 0usize;
    let mut adapted = min_spacing;
    while columns < count {
        columns += 1;
        let trial = (fit - columns as f32 * item_width) / ((columns as f32) - 1.0).max(1.0);
        if trial >= min_spacing {
            adapted = trial;
        } else {
            columns -= 1;
            break;
        }
    }

    let indent = fixed_indent.unwrap_or(adapted);
    let height = if columns > 1 {
        let rows = (count as f32 / columns as f32).ceil();
        let indents = (indent * (rows - 1.0)).max(0.0);
        item_height * rows + indents + insets.top + insets.bottom
    } else {
        item_height + insets.top + insets.bottom
    };

    GridFit {
        height,
        inter_item: adapted,
        inter_line: indent,
        columns,
    }
}

#[cfg(test)]
pub(crate) fn grid_fit_for_test(
    width: f32,
    insets: Insets,
    min_spacing: f32,
    fixed_indent: Option<f32>,
    sample: Option<Size>,
    count: usize,
) -> GridFit {
    grid_fit(width, insets, min_spacing, fixed_indent, sample, count)
}
