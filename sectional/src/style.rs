use std::sync::Arc;

use crate::{Dimension, Insets, Size};

/// Maps an item to its rendered size, or `None` to skip it (zero size).
pub type SizeFn<I> = Arc<dyn Fn(&I) -> Option<Size> + Send + Sync>;

/// Maps an item to its row height rule, or `None` to skip it (zero height).
pub type HeightRule<I> = Arc<dyn Fn(&I) -> Option<Dimension> + Send + Sync>;

/// A separator drawn below vertical rows.
///
/// The allowance is part of row geometry: every non-last row's reported
/// height includes `height`. `trailing` extends the allowance to the last
/// row as well.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Separator {
    pub height: f32,
    pub trailing: bool,
}

impl Separator {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            trailing: false,
        }
    }

    pub fn trailing(height: f32) -> Self {
        Self {
            height,
            trailing: true,
        }
    }
}

/// How grid items are fitted into the available width.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitMode {
    /// Fit as many equal-width columns as possible while keeping at least
    /// `min_spacing` between items. `indent` overrides the line spacing:
    /// `Automatic` reuses the adapted inter-item spacing.
    Automatic {
        min_spacing: f32,
        indent: Dimension,
    },
}

impl FitMode {
    pub(crate) fn min_spacing(&self) -> f32 {
        match self {
            Self::Automatic { min_spacing, .. } => *min_spacing,
        }
    }

    /// The fixed line spacing, when the mode requests one.
    pub(crate) fn fixed_indent(&self) -> Option<f32> {
        match self {
            Self::Automatic { indent, .. } => match indent {
                Dimension::Absolute(indent) => Some(*indent),
                Dimension::Zero => Some(0.0),
                Dimension::Automatic => None,
            },
        }
    }
}

/// How a horizontal strip settles after a drag ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Snap {
    /// Free scrolling; the saved offset is restored verbatim.
    Automatic,
    /// Decelerate onto the item nearest the viewport center.
    Centered,
}

/// Row arrangement of a horizontal strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rows {
    Finite { rows: usize, snap: Snap },
    /// A single row over a virtually multiplied index space, so the strip
    /// appears endless in both directions.
    Infinite { snap: Snap },
}

impl Rows {
    /// Number of stacked rows used for height computation.
    pub fn count(&self) -> usize {
        match self {
            Self::Finite { rows, .. } => *rows,
            Self::Infinite { .. } => 1,
        }
    }

    pub fn snap(&self) -> Snap {
        match self {
            Self::Finite { snap, .. } | Self::Infinite { snap } => *snap,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite { .. })
    }
}

/// The layout style of one section.
///
/// Each measuring variant carries a pure size function for its items; the
/// engine pattern-matches on the variant and never sees concrete views.
#[derive(Clone)]
pub enum Style<I> {
    /// Items stack top-to-bottom, one outer row per item.
    Vertical {
        height: HeightRule<I>,
        separator: Option<Separator>,
    },
    /// Items auto-fit into equal-width columns inside one opaque outer row.
    Grid {
        insets: Insets,
        mode: FitMode,
        size: SizeFn<I>,
    },
    /// A horizontally scrolling strip inside one opaque outer row.
    Horizontal {
        insets: Insets,
        spacing: f32,
        rows: Rows,
        size: SizeFn<I>,
    },
    /// A caller-fixed row height; no measurement, no cache.
    Custom { height: f32 },
}

impl<I> Style<I> {
    pub fn vertical(height: impl Fn(&I) -> Option<Dimension> + Send + Sync + 'static) -> Self {
        Self::Vertical {
            height: Arc::new(height),
            separator: None,
        }
    }

    pub fn vertical_separated(
        height: impl Fn(&I) -> Option<Dimension> + Send + Sync + 'static,
        separator: Separator,
    ) -> Self {
        Self::Vertical {
            height: Arc::new(height),
            separator: Some(separator),
        }
    }

    pub fn grid(
        insets: Insets,
        mode: FitMode,
        size: impl Fn(&I) -> Option<Size> + Send + Sync + 'static,
    ) -> Self {
        Self::Grid {
            insets,
            mode,
            size: Arc::new(size),
        }
    }

    pub fn horizontal(
        insets: Insets,
        spacing: f32,
        rows: Rows,
        size: impl Fn(&I) -> Option<Size> + Send + Sync + 'static,
    ) -> Self {
        Self::Horizontal {
            insets,
            spacing,
            rows,
            size: Arc::new(size),
        }
    }

    pub fn custom(height: f32) -> Self {
        Self::Custom { height }
    }

    /// Whether items of this style live in an embedded inner widget rather
    /// than as rows of the outer list.
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Grid { .. } | Self::Horizontal { .. })
    }
}

impl<I> core::fmt::Debug for Style<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Vertical { separator, .. } => f
                .debug_struct("Vertical")
                .field("separator", separator)
                .finish_non_exhaustive(),
            Self::Grid { insets, mode, .. } => f
                .debug_struct("Grid")
                .field("insets", insets)
                .field("mode", mode)
                .finish_non_exhaustive(),
            Self::Horizontal {
                insets,
                spacing,
                rows,
                ..
            } => f
                .debug_struct("Horizontal")
                .field("insets", insets)
                .field("spacing", spacing)
                .field("rows", rows)
                .finish_non_exhaustive(),
            Self::Custom { height } => f.debug_struct("Custom").field("height", height).finish(),
        }
    }
}

/// Resolves a section to its style for the given available width.
pub type StyleFn<S, I> = Arc<dyn Fn(&S, f32) -> Option<Style<I>> + Send + Sync>;

/// Resolves a section's header or footer rule for the given available width.
pub type BoundaryFn<S> = Arc<dyn Fn(&S, f32) -> Option<Dimension> + Send + Sync>;

/// Caller-supplied resolvers the layout engine pulls from.
///
/// Cheap to clone: all closures are stored in `Arc`s.
pub struct LayoutProvider<S, I> {
    pub style: Option<StyleFn<S, I>>,
    pub header: Option<BoundaryFn<S>>,
    pub footer: Option<BoundaryFn<S>>,
}

impl<S, I> LayoutProvider<S, I> {
    pub fn new() -> Self {
        Self {
            style: None,
            header: None,
            footer: None,
        }
    }

    pub fn with_style(
        mut self,
        style: impl Fn(&S, f32) -> Option<Style<I>> + Send + Sync + 'static,
    ) -> Self {
        self.style = Some(Arc::new(style));
        self
    }

    pub fn with_header(
        mut self,
        header: impl Fn(&S, f32) -> Option<Dimension> + Send + Sync + 'static,
    ) -> Self {
        self.header = Some(Arc::new(header));
        self
    }

    pub fn with_footer(
        mut self,
        footer: impl Fn(&S, f32) -> Option<Dimension> + Send + Sync + 'static,
    ) -> Self {
        self.footer = Some(Arc::new(footer));
        self
    }
}

impl<S, I> Default for LayoutProvider<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> Clone for LayoutProvider<S, I> {
    fn clone(&self) -> Self {
        Self {
            style: self.style.clone(),
            header: self.header.clone(),
            footer: self.footer.clone(),
        }
    }
}

impl<S, I> core::fmt::Debug for LayoutProvider<S, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutProvider")
            .field("style", &self.style.as_ref().map(|_| ".."))
            .field("header", &self.header.as_ref().map(|_| ".."))
            .field("footer", &self.footer.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Per-section interaction parameters.
pub struct Behaviour<S> {
    pub multiselection: Option<Arc<dyn Fn(&S) -> bool + Send + Sync>>,
}

impl<S> Behaviour<S> {
    pub fn new() -> Self {
        Self {
            multiselection: None,
        }
    }

    pub fn with_multiselection(
        mut self,
        multiselection: impl Fn(&S) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.multiselection = Some(Arc::new(multiselection));
        self
    }

    /// Defaults to single selection per section.
    pub fn multiselection(&self, section: &S) -> bool {
        match &self.multiselection {
            Some(f) => f(section),
            None => false,
        }
    }
}

impl<S> Default for Behaviour<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Behaviour<S> {
    fn clone(&self) -> Self {
        Self {
            multiselection: self.multiselection.clone(),
        }
    }
}

impl<S> core::fmt::Debug for Behaviour<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Behaviour")
            .field("multiselection", &self.multiselection.as_ref().map(|_| ".."))
            .finish()
    }
}
