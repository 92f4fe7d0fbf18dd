//! Vertical drag events and a slop-aware recogniser that produces them.
//!
//! Screen coordinates grow downward: a positive `delta_y` is the finger
//! moving toward the bottom of the screen.

use crate::gesture_constants::DRAG_THRESHOLD;

/// Where on the sheet a drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragOrigin {
    /// The scrollable body. Drags here may scroll the content.
    #[default]
    Content,
    /// Header, footer or grab handle. Drags here only move the sheet.
    Handle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub origin: DragOrigin,
    pub position_y: f32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub delta_y: f32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEnd {
    /// Release velocity in px/s as reported by the host. `None` lets the
    /// receiver estimate it from the updates it saw.
    pub velocity_y: Option<f32>,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start(DragStart),
    Update(DragUpdate),
    End(DragEnd),
    Cancel,
}

/// Raw pointer phase fed into [`DragGesture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    origin: DragOrigin,
    last_y: f32,
    travelled: f32,
    dragging: bool,
}

/// Turns raw pointer samples into [`DragEvent`]s once the pointer has moved
/// past [`DRAG_THRESHOLD`].
///
/// Movement inside the slop is swallowed so taps on sheet content stay taps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragGesture {
    press: Option<Press>,
    slop: Option<f32>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the touch slop.
    pub fn with_slop(mut self, slop: f32) -> Self {
        self.slop = Some(slop.max(0.0));
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.dragging)
    }

    pub fn reset(&mut self) {
        self.press = None;
    }

    /// Feeds one pointer sample. At most one drag event is produced per
    /// sample; the sample that crosses the slop yields `Start` and its
    /// movement is reported by the next `Move`.
    pub fn on_pointer(
        &mut self,
        phase: PointerPhase,
        y: f32,
        time_ms: u64,
        origin: DragOrigin,
    ) -> Option<DragEvent> {
        let slop = self.slop.unwrap_or(DRAG_THRESHOLD);
        match phase {
            PointerPhase::Down => {
                self.press = Some(Press {
                    origin,
                    last_y: y,
                    travelled: 0.0,
                    dragging: false,
                });
                None
            }
            PointerPhase::Move => {
                let press = self.press.as_mut()?;
                let delta_y = y - press.last_y;
                if !press.dragging {
                    press.travelled += delta_y.abs();
                    if press.travelled <= slop {
                        return None;
                    }
                    press.dragging = true;
                    // Anchor here so the slop distance is not replayed as motion.
                    press.last_y = y;
                    return Some(DragEvent::Start(DragStart {
                        origin: press.origin,
                        position_y: y,
                        time_ms,
                    }));
                }
                press.last_y = y;
                Some(DragEvent::Update(DragUpdate { delta_y, time_ms }))
            }
            PointerPhase::Up => {
                let press = self.press.take()?;
                press.dragging.then_some(DragEvent::End(DragEnd {
                    velocity_y: None,
                    time_ms,
                }))
            }
            PointerPhase::Cancel => {
                let press = self.press.take()?;
                press.dragging.then_some(DragEvent::Cancel)
            }
        }
    }
}
