//! Auto-scroll state machine.
//!
//! One event source drives it: "the scroll surface changed". An event either comes from the user
//! moving the view (`extent_changed == false`) or from new content growing the surface. Only user
//! scrolls may change `pinned`; content growth merely follows the tail while pinned.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{trace, warn};

use crate::palette::Severity;
use crate::record::LogRecord;
use crate::stream::LogStreamHandle;

/// Default slack when deciding whether the view sits at the bottom, in logical pixels. Zero means
/// only `offset == max_offset` counts; a larger value is opt-in through configuration.
pub const DEFAULT_BOTTOM_TOLERANCE: f32 = 0.0;

/// Prefix of the record synthesized when handling a scroll event fails.
pub const APPLICATION_ERROR_PREFIX: &str = "APPLICATION ERROR: ";

/// Snapshot carried by a scroll-changed event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollChanged {
    /// Whether the total content extent changed in this event.
    pub extent_changed: bool,
    pub offset: f32,
    pub max_offset: f32,
    pub extent: f32,
}

impl ScrollChanged {
    /// Event caused by the user moving the view.
    pub fn user_scroll(offset: f32, max_offset: f32, extent: f32) -> Self {
        Self {
            extent_changed: false,
            offset,
            max_offset,
            extent,
        }
    }

    /// Event caused by content growing or shrinking.
    pub fn content_changed(offset: f32, max_offset: f32, extent: f32) -> Self {
        Self {
            extent_changed: true,
            offset,
            max_offset,
            extent,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("scroll surface is not attached")]
    Detached,
    #[error("scroll surface rejected offset {offset}: {reason}")]
    Rejected { offset: f32, reason: String },
    #[error("scroll surface failed: {0}")]
    Other(String),
}

/// The scrollable region the controller reads from and commands.
pub trait ScrollSurface {
    fn offset(&self) -> Result<f32, SurfaceError>;
    fn max_offset(&self) -> Result<f32, SurfaceError>;
    fn scroll_to(&mut self, offset: f32) -> Result<(), SurfaceError>;
}

/// What the controller did with one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDecision {
    /// User scroll; `pinned` now reflects whether the view is at the bottom.
    UserScroll { pinned: bool },
    /// Content grew while pinned; the surface was told to scroll to `offset`.
    FollowTail { offset: f32 },
    /// Content grew while unpinned; the view stays where the user left it.
    Hold,
    /// Handling failed and an error record was appended to the stream.
    Failed,
}

/// Owned by the rendering surface and only touched on the UI thread.
#[derive(Debug)]
pub struct AutoScrollController {
    pinned: bool,
    tolerance: f32,
    report_to: LogStreamHandle,
}

impl AutoScrollController {
    /// Starts pinned. Failures are reported as error records through `report_to`.
    pub fn new(report_to: LogStreamHandle) -> Self {
        Self::with_tolerance(report_to, DEFAULT_BOTTOM_TOLERANCE)
    }

    pub fn with_tolerance(report_to: LogStreamHandle, tolerance: f32) -> Self {
        Self {
            pinned: true,
            tolerance: tolerance.max(0.0),
            report_to,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Handle one scroll-changed event. Never panics and never returns an error: anything that
    /// goes wrong becomes an error record in the stream.
    pub fn on_scroll_changed(
        &mut self,
        event: &ScrollChanged,
        surface: Option<&mut dyn ScrollSurface>,
    ) -> ScrollDecision {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(event, surface)));

        let detail = match outcome {
            Ok(Ok(decision)) => {
                trace!(?event, ?decision, pinned = self.pinned, "scroll event handled");
                return decision;
            }
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        warn!(error = %detail, ?event, "scroll handling failed");
        self.report_to.append(LogRecord::resolved(
            format!("{APPLICATION_ERROR_PREFIX}{detail}"),
            Severity::Error,
        ));
        ScrollDecision::Failed
    }

    fn evaluate(
        &mut self,
        event: &ScrollChanged,
        surface: Option<&mut dyn ScrollSurface>,
    ) -> Result<ScrollDecision, SurfaceError> {
        let surface = surface.ok_or(SurfaceError::Detached)?;

        if !event.extent_changed {
            let offset = surface.offset()?;
            let max_offset = surface.max_offset()?;
            self.pinned = (max_offset - offset).abs() <= self.tolerance;
            return Ok(ScrollDecision::UserScroll {
                pinned: self.pinned,
            });
        }

        if self.pinned {
            let target = surface.max_offset()?;
            surface.scroll_to(target)?;
            Ok(ScrollDecision::FollowTail { offset: target })
        } else {
            Ok(ScrollDecision::Hold)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic in scroll handler".to_string()
    }
}
