//! A headless composition engine for paginated, sectioned lists and grids.
//!
//! `sectional` sits between a declarative section/item model and the host
//! toolkit's virtualized scroll views. It owns the hard parts — geometry
//! for three structurally different layout modes, a measurement cache
//! keyed by exactly the parameters that invalidate it, minimal index-set
//! diffs for arbitrary mutation batches, and the modulo-folded virtual
//! index space behind "infinite" horizontal strips — while the toolkit
//! keeps drawing and cell recycling.
//!
//! It is UI-agnostic. A widget layer is expected to provide:
//! - the current viewport width
//! - style/size resolvers (pure functions from your ids to geometry rules)
//! - measured heights reported back after rows actually render
//!
//! For adapter-level utilities (deferred configuration, carousel
//! restoring, center-snap targeting), see the `sectional-adapter` crate.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod cache;
mod carousel;
mod compose;
mod key;
mod layout;
mod source;
mod style;
mod types;
mod update;


pub use cache::{Cache, ItemKey as ItemCacheKey, SectionKey as SectionCacheKey};
pub use carousel::{Carousel, DEFAULT_MULTIPLIER};
pub use compose::Composition;
pub use key::{ItemId, SectionId};
pub use layout::Layout;
pub use source::Source;
pub use style::{
    Behaviour, BoundaryFn, FitMode, HeightRule, LayoutProvider, Rows, Separator, SizeFn, Snap,
    Style, StyleFn,
};
pub use types::{Dimension, GridFit, IndexPath, Insets, Point, RowHeight, Size};
pub use update::{Delta, ItemChanges, ItemsFn, Update};
