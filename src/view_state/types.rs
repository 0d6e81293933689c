//! Core view-state newtypes

/// Height of a row in viewport units. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowHeight(u32);

/// Error returned when attempting to create a RowHeight of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("RowHeight must be >= 1 (got {0})")]
pub struct InvalidRowHeight(pub u32);

impl RowHeight {
    /// One unit: a single terminal line.
    pub const ONE: Self = Self(1);

    /// Smart constructor that validates height is >= 1.
    pub fn new(height: u32) -> Result<Self, InvalidRowHeight> {
        if height == 0 {
            Err(InvalidRowHeight(height))
        } else {
            Ok(Self(height))
        }
    }

    /// Get the raw u32 value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for RowHeight {
    fn default() -> Self {
        Self::ONE
    }
}

/// How row heights are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHeightMode {
    /// Every row has the same height.
    Fixed(RowHeight),
    /// Rows start at the estimate and are corrected once measured.
    Variable {
        /// Height assumed for rows that have not been rendered yet.
        estimate: RowHeight,
    },
}

impl RowHeightMode {
    /// Height used for rows whose real height is not known.
    pub fn estimate(&self) -> RowHeight {
        match self {
            RowHeightMode::Fixed(h) => *h,
            RowHeightMode::Variable { estimate } => *estimate,
        }
    }

    /// True for content-sized rows.
    pub fn is_variable(&self) -> bool {
        matches!(self, RowHeightMode::Variable { .. })
    }
}

impl Default for RowHeightMode {
    fn default() -> Self {
        Self::Fixed(RowHeight::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_height_rejects_zero() {
        assert_eq!(RowHeight::new(0), Err(InvalidRowHeight(0)));
    }

    #[test]
    fn row_height_accepts_positive() {
        assert_eq!(RowHeight::new(40).map(|h| h.get()), Ok(40));
    }

    #[test]
    fn default_mode_is_fixed_single_line() {
        assert_eq!(RowHeightMode::default(), RowHeightMode::Fixed(RowHeight::ONE));
        assert!(!RowHeightMode::default().is_variable());
    }

    #[test]
    fn estimate_returns_configured_height() {
        let mode = RowHeightMode::Variable {
            estimate: RowHeight::new(3).unwrap(),
        };
        assert_eq!(mode.estimate().get(), 3);
        assert!(mode.is_variable());
    }
}
