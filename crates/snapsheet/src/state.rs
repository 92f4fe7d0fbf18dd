//! Immutable per-frame view of a sheet.

/// Tolerance for extent comparisons.
pub const EXTENT_EPSILON: f32 = 1e-3;

/// Snapshot broadcast to state listeners whenever anything in it changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetState {
    pub extent: f32,
    pub min_extent: f32,
    pub max_extent: f32,
    pub is_laid_out: bool,
    /// `extent` mapped onto `[min_extent, max_extent]`.
    pub progress: f32,
    pub is_expanded: bool,
    pub is_collapsed: bool,
    pub is_hidden: bool,
    pub is_shown: bool,
    pub scroll_offset: f32,
    pub max_scroll_extent: f32,
    pub is_at_top: bool,
    pub is_at_bottom: bool,
}

impl SheetState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        extent: f32,
        min_extent: f32,
        max_extent: f32,
        is_laid_out: bool,
        scroll_offset: f32,
        max_scroll_extent: f32,
        is_at_top: bool,
        is_at_bottom: bool,
    ) -> Self {
        let min_extent = if (max_extent - min_extent).abs() <= EXTENT_EPSILON {
            0.0
        } else {
            min_extent
        };
        let range = max_extent - min_extent;
        let progress = if is_laid_out && range > EXTENT_EPSILON {
            ((extent - min_extent) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let is_expanded = extent >= max_extent - EXTENT_EPSILON;
        // Both flags only hold together when there is no range to move in.
        let is_collapsed =
            extent <= min_extent + EXTENT_EPSILON && !(is_expanded && range > EXTENT_EPSILON);
        let is_hidden = extent <= EXTENT_EPSILON;

        Self {
            extent,
            min_extent,
            max_extent,
            is_laid_out,
            progress,
            is_expanded,
            is_collapsed,
            is_hidden,
            is_shown: !is_hidden,
            scroll_offset,
            max_scroll_extent,
            is_at_top,
            is_at_bottom,
        }
    }

    /// State of a sheet that has not been measured yet.
    pub fn unmeasured() -> Self {
        Self::new(0.0, 0.0, 1.0, false, 0.0, 0.0, true, true)
    }
}

impl Default for SheetState {
    fn default() -> Self {
        Self::unmeasured()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
