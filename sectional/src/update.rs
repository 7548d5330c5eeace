use std::sync::Arc;

use crate::IndexPath;

/// Produces the items of a freshly inserted section, or `None` for an
/// empty one.
pub type ItemsFn<S, I> = Arc<dyn Fn(&S) -> Option<Vec<I>> + Send + Sync>;

/// One structural operation on the snapshot.
///
/// Operations are applied as an ordered batch; each one sees the state as
/// mutated by all operations before it in the same batch.
pub enum Update<S, I> {
    /// Replaces the whole section list. This is a hard reset, not a diff:
    /// caches, selection, offsets and pages are all cleared.
    SetSections {
        sections: Vec<S>,
        items: Option<ItemsFn<S, I>>,
    },
    /// Inserts sections at the tail.
    AppendSections {
        sections: Vec<S>,
        items: Option<ItemsFn<S, I>>,
    },
    /// Inserts sections at an arbitrary position, shifting what follows.
    AddSections {
        sections: Vec<S>,
        at: usize,
        items: Option<ItemsFn<S, I>>,
    },
    /// Removes sections by identity; unknown identities are ignored.
    DeleteSections { sections: Vec<S> },
    /// Reloads sections in place: cache is invalidated, ordering and
    /// contents are untouched.
    ReloadSections { sections: Vec<S> },
    /// Replaces a section's item list.
    SetItems { items: Vec<I>, section: S },
    /// Appends items to a section's item list.
    AppendItems { items: Vec<I>, section: S },
    /// Invalidates cache for sections without any reload instruction; the
    /// host just re-runs its layout pass.
    RefreshSections { sections: Vec<S> },
}

impl<S: Clone, I: Clone> Clone for Update<S, I> {
    fn clone(&self) -> Self {
        match self {
            Self::SetSections { sections, items } => Self::SetSections {
                sections: sections.clone(),
                items: items.clone(),
            },
            Self::AppendSections { sections, items } => Self::AppendSections {
                sections: sections.clone(),
                items: items.clone(),
            },
            Self::AddSections { sections, at, items } => Self::AddSections {
                sections: sections.clone(),
                at: *at,
                items: items.clone(),
            },
            Self::DeleteSections { sections } => Self::DeleteSections {
                sections: sections.clone(),
            },
            Self::ReloadSections { sections } => Self::ReloadSections {
                sections: sections.clone(),
            },
            Self::SetItems { items, section } => Self::SetItems {
                items: items.clone(),
                section: section.clone(),
            },
            Self::AppendItems { items, section } => Self::AppendItems {
                items: items.clone(),
                section: section.clone(),
            },
            Self::RefreshSections { sections } => Self::RefreshSections {
                sections: sections.clone(),
            },
        }
    }
}

impl<S: core::fmt::Debug, I> core::fmt::Debug for Update<S, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SetSections { sections, .. } => {
                f.debug_struct("SetSections").field("sections", sections).finish_non_exhaustive()
            }
            Self::AppendSections { sections, .. } => f
                .debug_struct("AppendSections")
                .field("sections", sections)
                .finish_non_exhaustive(),
            Self::AddSections { sections, at, .. } => f
                .debug_struct("AddSections")
                .field("sections", sections)
                .field("at", at)
                .finish_non_exhaustive(),
            Self::DeleteSections { sections } => {
                f.debug_struct("DeleteSections").field("sections", sections).finish()
            }
            Self::ReloadSections { sections } => {
                f.debug_struct("ReloadSections").field("sections", sections).finish()
            }
            Self::SetItems { section, .. } => {
                f.debug_struct("SetItems").field("section", section).finish_non_exhaustive()
            }
            Self::AppendItems { section, .. } => {
                f.debug_struct("AppendItems").field("section", section).finish_non_exhaustive()
            }
            Self::RefreshSections { sections } => {
                f.debug_struct("RefreshSections").field("sections", sections).finish()
            }
        }
    }
}

/// Item-level changes of one operation, in the addressing scheme the outer
/// widget understands.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemChanges {
    /// Vertical sections: items are rows of the outer list.
    Outer {
        deleted: Vec<IndexPath>,
        inserted: Vec<IndexPath>,
    },
    /// Grid/horizontal sections occupy a single opaque outer row; item
    /// changes go to the inner widget embedded in that row.
    Embedded {
        section: usize,
        deleted: Vec<usize>,
        inserted: Vec<usize>,
    },
}

/// The minimal per-widget instruction set for one operation.
///
/// The host applies each delta inside its own begin/end-update bracket, in
/// batch order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    pub deleted_sections: Vec<usize>,
    pub inserted_sections: Vec<usize>,
    pub reloaded_sections: Vec<usize>,
    pub items: Option<ItemChanges>,
    /// Set for refresh-only operations: nothing structural changed, but the
    /// host should re-run its layout pass.
    pub refreshed: bool,
}

impl Delta {
    pub(crate) fn refresh() -> Self {
        Self {
            refreshed: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deleted_sections.is_empty()
            && self.inserted_sections.is_empty()
            && self.reloaded_sections.is_empty()
            && self.items.is_none()
            && !self.refreshed
    }
}
