//! Sheet configuration.

use crate::error::SheetError;
use crate::fling::FlingConfig;
use crate::snap::SnapSpec;

/// Default base duration of settle and programmatic animations.
pub const DEFAULT_DURATION_MILLIS: u64 = 800;

/// How the sheet is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SheetMode {
    /// Embedded in a page; never goes below its smallest snap on its own.
    #[default]
    Inline,
    /// Modal: opens after first layout, gets a `0.0` snap and reports
    /// dismissal.
    Dialog,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    pub snap_spec: SnapSpec,
    pub duration_millis: u64,
    /// Whether the user may drag, tap or back-press the sheet away.
    pub dismissable: bool,
    pub mode: SheetMode,
    pub has_header: bool,
    pub has_footer: bool,
    pub dynamic_size: bool,
    pub fling: FlingConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            snap_spec: SnapSpec::default(),
            duration_millis: DEFAULT_DURATION_MILLIS,
            dismissable: true,
            mode: SheetMode::Inline,
            has_header: false,
            has_footer: false,
            dynamic_size: false,
            fling: FlingConfig::default(),
        }
    }
}

impl SheetConfig {
    pub fn new(snap_spec: SnapSpec) -> Self {
        Self {
            snap_spec,
            ..Self::default()
        }
    }

    /// Dialog configuration with `snap_spec`.
    pub fn dialog(snap_spec: SnapSpec) -> Self {
        Self::new(snap_spec).with_mode(SheetMode::Dialog)
    }

    pub fn with_snap_spec(mut self, snap_spec: SnapSpec) -> Self {
        self.snap_spec = snap_spec;
        self
    }

    pub fn with_duration_millis(mut self, millis: u64) -> Self {
        self.duration_millis = millis;
        self
    }

    pub fn with_dismissable(mut self, dismissable: bool) -> Self {
        self.dismissable = dismissable;
        self
    }

    pub fn with_mode(mut self, mode: SheetMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_footer(mut self, has_footer: bool) -> Self {
        self.has_footer = has_footer;
        self
    }

    pub fn with_dynamic_size(mut self, dynamic_size: bool) -> Self {
        self.dynamic_size = dynamic_size;
        self
    }

    pub fn with_fling(mut self, fling: FlingConfig) -> Self {
        self.fling = fling;
        self
    }

    pub fn is_dialog(&self) -> bool {
        self.mode == SheetMode::Dialog
    }

    pub fn validate(&self) -> Result<(), SheetError> {
        if self.duration_millis == 0 {
            return Err(SheetError::ZeroDuration);
        }
        self.snap_spec
            .validate_parts(self.has_header, self.has_footer)?;
        self.fling.validate()
    }
}
