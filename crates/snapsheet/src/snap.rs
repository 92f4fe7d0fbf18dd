//! Snap values and their conversion to extents.
//!
//! An *extent* is the fraction of the available height the sheet occupies:
//! `0.0` is hidden and `1.0` fills the available space. Hosts describe snap
//! points in whichever unit suits them ([`Positioning`]) and the sheet
//! resolves them against the measured [`SheetGeometry`] on every layout.

use smallvec::SmallVec;

use crate::error::SnapSpecError;

/// Unit in which plain [`Snap::Value`]s are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Positioning {
    /// Fraction of the available height.
    #[default]
    RelativeToAvailableSpace,
    /// Fraction of the sheet's own height (header, content and footer).
    RelativeToSheetHeight,
    /// Logical pixels from the bottom edge.
    PixelOffset,
}

/// One snap point as supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snap {
    Value(f32),
    /// Only the header is visible.
    Header,
    /// Only the footer is visible.
    Footer,
    /// Header and footer are visible, content is not.
    HeaderAndFooter,
    /// As tall as the sheet can get.
    Expanded,
}

impl Snap {
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Snap::Value(_))
    }

    fn needs_header(&self) -> bool {
        matches!(self, Snap::Header | Snap::HeaderAndFooter)
    }

    fn needs_footer(&self) -> bool {
        matches!(self, Snap::Footer | Snap::HeaderAndFooter)
    }
}

impl From<f32> for Snap {
    /// `f32::INFINITY` maps to [`Snap::Expanded`].
    fn from(value: f32) -> Self {
        if value == f32::INFINITY {
            Snap::Expanded
        } else {
            Snap::Value(value)
        }
    }
}

/// Host supplied snap configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapSpec {
    snappings: SmallVec<[Snap; 4]>,
    positioning: Positioning,
    initial_snap: Option<Snap>,
    snap: bool,
}

impl SnapSpec {
    pub fn new<I, S>(snappings: I, positioning: Positioning) -> Result<Self, SnapSpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Snap>,
    {
        let snappings: SmallVec<[Snap; 4]> = snappings.into_iter().map(Into::into).collect();
        if snappings.is_empty() {
            return Err(SnapSpecError::Empty);
        }
        for snap in &snappings {
            validate_value(*snap, positioning)?;
        }
        Ok(Self {
            snappings,
            positioning,
            initial_snap: None,
            snap: true,
        })
    }

    /// Sets the snap the sheet opens at. Defaults to the smallest snap.
    pub fn with_initial_snap(mut self, initial: impl Into<Snap>) -> Result<Self, SnapSpecError> {
        let initial = initial.into();
        validate_value(initial, self.positioning)?;
        if let (Snap::Value(value), Some((min, max))) = (initial, self.plain_range()) {
            if value < min || value > max {
                return Err(SnapSpecError::InitialOutOfRange {
                    initial: value,
                    min,
                    max,
                });
            }
        }
        self.initial_snap = Some(initial);
        Ok(self)
    }

    /// With snapping disabled the sheet rests wherever it is released.
    pub fn with_snap(mut self, enabled: bool) -> Self {
        self.snap = enabled;
        self
    }

    pub fn snappings(&self) -> &[Snap] {
        &self.snappings
    }

    pub fn positioning(&self) -> Positioning {
        self.positioning
    }

    pub fn initial_snap(&self) -> Option<Snap> {
        self.initial_snap
    }

    pub fn snaps_enabled(&self) -> bool {
        self.snap
    }

    /// Sentinels need the sheet part they refer to.
    pub(crate) fn validate_parts(
        &self,
        has_header: bool,
        has_footer: bool,
    ) -> Result<(), SnapSpecError> {
        let all = self.snappings.iter().chain(self.initial_snap.iter());
        for snap in all {
            if snap.needs_header() && !has_header {
                return Err(SnapSpecError::MissingHeader { snap: *snap });
            }
            if snap.needs_footer() && !has_footer {
                return Err(SnapSpecError::MissingFooter { snap: *snap });
            }
        }
        Ok(())
    }

    /// Range of the plain values when no sentinel is involved. Sentinels
    /// only resolve after layout, so mixed specs are checked then.
    fn plain_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for snap in &self.snappings {
            let Snap::Value(value) = *snap else {
                return None;
            };
            range = Some(match range {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
        range
    }
}

impl Default for SnapSpec {
    fn default() -> Self {
        Self {
            snappings: SmallVec::from_slice(&[Snap::Value(0.4), Snap::Value(1.0)]),
            positioning: Positioning::RelativeToAvailableSpace,
            initial_snap: None,
            snap: true,
        }
    }
}

fn validate_value(snap: Snap, positioning: Positioning) -> Result<(), SnapSpecError> {
    let Snap::Value(value) = snap else {
        return Ok(());
    };
    if !value.is_finite() {
        return Err(SnapSpecError::NotFinite { value });
    }
    match positioning {
        Positioning::PixelOffset if value < 0.0 => Err(SnapSpecError::NegativeOffset { value }),
        Positioning::PixelOffset => Ok(()),
        _ if !(0.0..=1.0).contains(&value) => Err(SnapSpecError::OutOfRange { value }),
        _ => Ok(()),
    }
}

/// Heights measured by the last layout pass, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SheetGeometry {
    pub available_height: f32,
    pub header_height: f32,
    pub child_height: f32,
    pub footer_height: f32,
    pub is_laid_out: bool,
    /// Content grows to fill whatever extent the sheet is dragged to.
    pub dynamic_size: bool,
}

impl SheetGeometry {
    pub fn sheet_height(&self) -> f32 {
        self.header_height + self.child_height + self.footer_height
    }

    /// Whether heights are usable for normalization.
    pub fn is_measured(&self) -> bool {
        self.is_laid_out && self.available_height > 0.0
    }

    /// Largest extent the sheet can reach.
    pub fn max_possible_extent(&self) -> f32 {
        if !self.is_measured() || self.dynamic_size {
            return 1.0;
        }
        finite_or_zero(self.sheet_height() / self.available_height).clamp(0.0, 1.0)
    }

    pub fn pixels_to_extent(&self, pixels: f32) -> f32 {
        if self.available_height > 0.0 {
            pixels / self.available_height
        } else {
            0.0
        }
    }

    pub fn extent_to_pixels(&self, extent: f32) -> f32 {
        extent * self.available_height
    }

    fn sheet_ratio(&self) -> f32 {
        finite_or_zero(self.sheet_height().min(self.available_height) / self.available_height)
    }
}

/// Resolves `snap` to an extent in `[0, 1]`.
///
/// Before the first layout there is nothing to resolve against: values are
/// clamped as they are, header and footer sentinels read as hidden and
/// [`Snap::Expanded`] as fully open.
pub fn normalize(snap: Snap, positioning: Positioning, geometry: &SheetGeometry) -> f32 {
    if !geometry.is_measured() {
        return match snap {
            Snap::Value(value) => finite_or_zero(value).clamp(0.0, 1.0),
            Snap::Header | Snap::Footer | Snap::HeaderAndFooter => 0.0,
            Snap::Expanded => 1.0,
        };
    }

    let available = geometry.available_height;
    let max_possible = geometry.max_possible_extent();
    let raw = match snap {
        Snap::Value(value) => match positioning {
            Positioning::RelativeToAvailableSpace => value,
            Positioning::RelativeToSheetHeight => value * geometry.sheet_ratio(),
            Positioning::PixelOffset => value / available,
        },
        Snap::Header => geometry.header_height / available,
        Snap::Footer => geometry.footer_height / available,
        Snap::HeaderAndFooter => (geometry.header_height + geometry.footer_height) / available,
        Snap::Expanded => max_possible,
    };
    finite_or_zero(raw).clamp(0.0, max_possible).clamp(0.0, 1.0)
}

/// Converts an extent back into the host's unit for `positioning`.
pub fn reverse_normalize(extent: f32, positioning: Positioning, geometry: &SheetGeometry) -> f32 {
    if !geometry.is_measured() {
        return extent;
    }
    match positioning {
        Positioning::RelativeToAvailableSpace => extent,
        Positioning::RelativeToSheetHeight => {
            let ratio = geometry.sheet_ratio();
            if ratio > 0.0 {
                extent / ratio
            } else {
                0.0
            }
        }
        Positioning::PixelOffset => extent * geometry.available_height,
    }
}

/// Snaps tied to pixel heights. A sheet resting on one of these keeps its
/// pixel height when the available height changes.
pub fn is_fixed(snap: Snap, positioning: Positioning, geometry: &SheetGeometry) -> bool {
    match snap {
        Snap::Value(_) => positioning != Positioning::RelativeToAvailableSpace,
        Snap::Header | Snap::Footer | Snap::HeaderAndFooter => true,
        Snap::Expanded => !geometry.dynamic_size,
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "tests/snap_tests.rs"]
mod tests;
