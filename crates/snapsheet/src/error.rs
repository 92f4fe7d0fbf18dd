use thiserror::Error;

use crate::snap::Snap;

/// Rejected snap configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapSpecError {
    #[error("a snap spec needs at least one snap")]
    Empty,
    #[error("snap value {value} is not finite")]
    NotFinite { value: f32 },
    #[error("relative snap {value} is outside 0.0..=1.0")]
    OutOfRange { value: f32 },
    #[error("pixel snap {value} is negative")]
    NegativeOffset { value: f32 },
    #[error("initial snap {initial} lies outside the snap range {min}..={max}")]
    InitialOutOfRange { initial: f32, min: f32, max: f32 },
    #[error("snap {snap:?} needs a header but the sheet has none")]
    MissingHeader { snap: Snap },
    #[error("snap {snap:?} needs a footer but the sheet has none")]
    MissingFooter { snap: Snap },
}

/// Rejected sheet configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SheetError {
    #[error("invalid snap spec: {0}")]
    SnapSpec(#[from] SnapSpecError),
    #[error("base animation duration must be positive")]
    ZeroDuration,
    #[error("invalid fling configuration: {0}")]
    Fling(&'static str),
}
