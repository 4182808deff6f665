//! Viewport Range Calculator
//!
//! Maps scroll geometry to the inclusive range of item indices that are or
//! may become visible.

use snafu::ensure;

use crate::error::{ConfigurationSnafu, Result};

/// Inclusive index range `[lower, upper]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexRange {
    pub lower: usize,
    pub upper: usize,
}

impl IndexRange {
    /// Create a range, swapping the bounds if they arrive reversed
    pub fn new(lower: usize, upper: usize) -> Self {
        if lower <= upper {
            Self { lower, upper }
        } else {
            Self {
                lower: upper,
                upper: lower,
            }
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.lower..=self.upper).contains(&index)
    }

    /// Iterate over every index in the range
    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.lower..=self.upper
    }
}

/// Check that a row height can be divided by
pub fn validate_item_height(item_height: f32) -> Result<()> {
    ensure!(
        item_height.is_finite() && item_height > 0.0,
        ConfigurationSnafu {
            message: format!("item_height must be a positive number, got {item_height}"),
        }
    );
    Ok(())
}

/// Compute the visible index range for the given scroll geometry
///
/// Negative or non-finite offsets and heights are treated as zero so that
/// `lower <= upper` holds for every input.
pub fn visible_range(
    scroll_offset: f32,
    viewport_height: f32,
    item_height: f32,
) -> Result<IndexRange> {
    validate_item_height(item_height)?;

    let scroll = sanitize(scroll_offset) as f64;
    let height = sanitize(viewport_height) as f64;
    let item = item_height as f64;

    let lower = (scroll / item).floor().max(0.0) as usize;
    let upper = ((scroll + height) / item).ceil().max(0.0) as usize;

    Ok(IndexRange::new(lower, upper.max(lower)))
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn first_screen_of_56px_rows() {
        let range = visible_range(0.0, 560.0, 56.0).expect("range");
        assert_eq!(range, IndexRange::new(0, 10));
        assert_eq!(range.iter().count(), 11);
    }

    #[test]
    fn scrolled_range_uses_floor_and_ceil() {
        let range = visible_range(100.0, 300.0, 56.0).expect("range");
        // 100 / 56 = 1.78, 400 / 56 = 7.14
        assert_eq!(range, IndexRange::new(1, 8));
    }

    #[test]
    fn negative_geometry_clamps_to_zero() {
        let range = visible_range(-250.0, -10.0, 20.0).expect("range");
        assert_eq!(range, IndexRange::new(0, 0));
    }

    #[test]
    fn non_positive_item_height_is_configuration_error() {
        for height in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = visible_range(0.0, 100.0, height).expect_err("should fail");
            assert!(matches!(err, Error::Configuration { .. }));
        }
    }

    #[test]
    fn bounds_are_ordered_for_many_inputs() {
        let offsets = [0.0, 0.5, 13.0, 999.9, 1.0e6];
        let heights = [0.0, 1.0, 55.9, 560.0, 4096.0];
        let items = [0.25, 1.0, 24.0, 56.0, 333.3];
        for &scroll in &offsets {
            for &viewport in &heights {
                for &item in &items {
                    let range = visible_range(scroll, viewport, item).expect("range");
                    assert!(range.lower <= range.upper, "{scroll} {viewport} {item}");
                }
            }
        }
    }
}
