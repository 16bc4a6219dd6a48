//! Validated item count.

/// A positive item count.
///
/// All index arithmetic in the layout is bounded by this value, so it is
/// validated once at the edge instead of re-checked everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemCount(usize);

impl ItemCount {
    /// Returns `None` for a non-positive count.
    pub fn new(value: usize) -> Option<Self> {
        if value >= 1 {
            Some(Self(value))
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.0
    }

    /// Largest valid item index.
    #[inline]
    pub fn last_index(&self) -> usize {
        self.0 - 1
    }
}
