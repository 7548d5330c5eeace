/// Default virtual-index multiplier.
///
/// The infinite strip is an approximation: the widget is told it has
/// `multiplier * real_count` rows and starts centered, so a user would
/// have to page through `multiplier / 2` copies of the data set in one
/// direction to hit an edge. Raising it buys more headroom at the cost of
/// a larger virtual range for the host to address.
pub const DEFAULT_MULTIPLIER: usize = 1000;

/// Maps the unbounded virtual index space of an "infinite" horizontal
/// strip onto real item indices via modulo folding.
///
/// All operations clamp the modulus to `max(1, real_count)`, so a
/// transiently empty section never divides by zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Carousel {
    multiplier: usize,
}

impl Carousel {
    pub fn new(multiplier: usize) -> Self {
        Self {
            multiplier: multiplier.max(1),
        }
    }

    pub fn multiplier(&self) -> usize {
        self.multiplier
    }

    fn modulus(real_count: usize) -> usize {
        real_count.max(1)
    }

    /// How many rows the widget should believe it has.
    pub fn virtual_count(&self, real_count: usize) -> usize {
        self.multiplier * real_count
    }

    /// Folds a virtual index back to the real item index.
    pub fn real_index(&self, virtual_index: usize, real_count: usize) -> usize {
        virtual_index % Self::modulus(real_count)
    }

    /// The initial scroll position: mid-range, so both directions have the
    /// same headroom for the lifetime of a typical interaction.
    pub fn initial_index(&self, real_count: usize) -> usize {
        real_count * self.multiplier / 2
    }

    /// Every virtual index congruent to `real_index`, across the whole
    /// virtual range.
    ///
    /// Selection and focus changes on a real item must be mirrored to each
    /// of these that currently has a live recycled cell.
    pub fn congruent_indices(
        &self,
        real_index: usize,
        real_count: usize,
    ) -> impl Iterator<Item = usize> {
        let modulus = Self::modulus(real_count);
        let first = real_index % modulus;
        let end = if real_count == 0 {
            0
        } else {
            modulus * self.multiplier
        };
        (first..end).step_by(modulus)
    }

    /// The logical page for a center-snapped strip, given the virtual index
    /// of the item nearest the viewport center.
    pub fn page_of(&self, center_virtual_index: usize, real_count: usize) -> usize {
        self.real_index(center_virtual_index, real_count)
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(DEFAULT_MULTIPLIER)
    }
}
