//! The sheet's extent and its resolved snap points.

use smallvec::SmallVec;

use crate::snap::{is_fixed, normalize, SheetGeometry, Snap, SnapSpec};
use crate::state::EXTENT_EPSILON;

/// How close to a fixed snap the sheet must rest to keep its pixel height
/// across an available-height change.
pub const FIXED_SNAP_TOLERANCE: f32 = 0.01;

/// A snap resolved to an extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub extent: f32,
    pub fixed: bool,
}

/// What a [`Extent::resync`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResyncOutcome {
    /// The geometry became measurable for the first time.
    pub first_layout: bool,
    /// The current extent was moved.
    pub extent_changed: bool,
}

/// Current extent plus the sorted snap list it moves between.
#[derive(Debug, Clone, PartialEq)]
pub struct Extent {
    current: f32,
    points: SmallVec<[SnapPoint; 4]>,
    geometry: SheetGeometry,
    is_dialog: bool,
}

impl Extent {
    /// Dialog sheets start hidden; inline sheets start at their initial snap.
    pub fn new(spec: &SnapSpec, geometry: SheetGeometry, is_dialog: bool) -> Self {
        let mut extent = Self {
            current: 0.0,
            points: resolve_points(spec, &geometry, is_dialog),
            geometry,
            is_dialog,
        };
        if !is_dialog {
            extent.current = extent.initial_extent(spec);
        }
        extent
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Clamps into `[0, 1]` and returns the stored value.
    pub fn set_current(&mut self, value: f32) -> f32 {
        if value.is_finite() {
            self.current = value.clamp(0.0, 1.0);
        }
        self.current
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    pub fn is_dialog(&self) -> bool {
        self.is_dialog
    }

    pub fn points(&self) -> &[SnapPoint] {
        &self.points
    }

    pub fn snappings(&self) -> SmallVec<[f32; 4]> {
        self.points.iter().map(|point| point.extent).collect()
    }

    pub fn min_extent(&self) -> f32 {
        let index = usize::from(self.is_dialog && self.points.len() > 1);
        self.points.get(index).map_or(0.0, |point| point.extent)
    }

    pub fn max_extent(&self) -> f32 {
        self.points.last().map_or(1.0, |point| point.extent)
    }

    /// Lowest extent the sheet may settle at: the dialog floor or `min_extent`.
    pub fn floor_extent(&self) -> f32 {
        self.points.first().map_or(0.0, |point| point.extent)
    }

    /// Pixel height of the sheet at `max_extent`.
    pub fn target_height(&self) -> f32 {
        self.geometry.extent_to_pixels(self.max_extent())
    }

    pub fn initial_extent(&self, spec: &SnapSpec) -> f32 {
        let (min, max) = (self.min_extent(), self.max_extent());
        spec.initial_snap()
            .map(|snap| normalize(snap, spec.positioning(), &self.geometry))
            .unwrap_or(min)
            .clamp(min.min(max), max)
    }

    pub fn nearest_snap(&self, value: f32) -> f32 {
        self.points
            .iter()
            .map(|point| point.extent)
            .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()))
            .unwrap_or(value)
    }

    fn resting_on_fixed_snap(&self) -> bool {
        self.points
            .iter()
            .any(|point| point.fixed && (point.extent - self.current).abs() <= FIXED_SNAP_TOLERANCE)
    }

    /// Re-resolves every snap against `geometry` and applies the constraint
    /// change policy to the current extent.
    pub fn resync(&mut self, spec: &SnapSpec, geometry: SheetGeometry) -> ResyncOutcome {
        let previous = self.geometry;
        let was_measured = previous.is_measured();
        let keep_pixels = was_measured && self.resting_on_fixed_snap();
        let before = self.current;

        self.geometry = geometry;
        self.points = resolve_points(spec, &geometry, self.is_dialog);

        let first_layout = !was_measured && geometry.is_measured();
        if first_layout {
            if !self.is_dialog {
                self.current = self.initial_extent(spec);
            }
        } else if was_measured
            && geometry.is_measured()
            && (previous.available_height - geometry.available_height).abs() > f32::EPSILON
            && self.current > EXTENT_EPSILON
            && keep_pixels
        {
            let rescaled = self.current * previous.available_height / geometry.available_height;
            self.current = rescaled.clamp(self.min_extent(), self.max_extent());
        }

        let max = self.max_extent();
        if self.current > max {
            self.current = max;
        }
        self.current = self.current.clamp(0.0, 1.0);

        let outcome = ResyncOutcome {
            first_layout,
            extent_changed: (self.current - before).abs() > EXTENT_EPSILON,
        };
        log::debug!(
            "resync: snaps={:?} extent {before:.3} -> {:.3} ({outcome:?})",
            self.snappings().as_slice(),
            self.current
        );
        outcome
    }
}

/// Normalizes, sorts and deduplicates the snaps. Dialog sheets always get
/// a `0.0` floor so they can be dismissed by dragging.
fn resolve_points(
    spec: &SnapSpec,
    geometry: &SheetGeometry,
    is_dialog: bool,
) -> SmallVec<[SnapPoint; 4]> {
    let positioning = spec.positioning();
    let mut points: SmallVec<[SnapPoint; 4]> = spec
        .snappings()
        .iter()
        .map(|snap: &Snap| SnapPoint {
            extent: normalize(*snap, positioning, geometry),
            fixed: is_fixed(*snap, positioning, geometry),
        })
        .collect();
    points.sort_by(|a, b| a.extent.total_cmp(&b.extent));

    let mut deduped: SmallVec<[SnapPoint; 4]> = SmallVec::with_capacity(points.len() + 1);
    for point in points {
        match deduped.last_mut() {
            Some(last) if (point.extent - last.extent).abs() <= EXTENT_EPSILON => {
                last.fixed |= point.fixed;
            }
            _ => deduped.push(point),
        }
    }

    let needs_floor = deduped
        .first()
        .map_or(true, |first| first.extent > EXTENT_EPSILON);
    if is_dialog && needs_floor {
        deduped.insert(
            0,
            SnapPoint {
                extent: 0.0,
                fixed: false,
            },
        );
    }
    deduped
}

#[cfg(test)]
#[path = "tests/extent_tests.rs"]
mod tests;
