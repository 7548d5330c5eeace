use core::hash::Hash;

/// Requirements for a section identity.
///
/// Identities are opaque to the engine: any hashable, clonable value works
/// (ints, strings, enums, your own id types).
pub trait SectionId: Hash + Eq + Clone {}
impl<S: Hash + Eq + Clone> SectionId for S {}

/// Requirements for an item identity.
pub trait ItemId: Hash + Eq + Clone {}
impl<I: Hash + Eq + Clone> ItemId for I {}
