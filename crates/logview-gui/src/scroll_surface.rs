//! Adapter turning egui's per-frame scroll area output into scroll-changed events.
//!
//! egui has no scroll events; it re-lays out every frame. The surface remembers the previous
//! frame's geometry and reports a [`ScrollChanged`] only when something moved. Scroll commands are
//! held until the next frame, where they are fed to `ScrollArea::vertical_scroll_offset`.

use logview_core::{ScrollChanged, ScrollSurface, SurfaceError};

/// Geometry differences below this are layout noise, not changes.
const EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    offset: f32,
    extent: f32,
    viewport: f32,
}

impl Geometry {
    fn max_offset(&self) -> f32 {
        (self.extent - self.viewport).max(0.0)
    }
}

#[derive(Debug, Default)]
pub struct EguiScrollSurface {
    current: Option<Geometry>,
    pending: Option<f32>,
}

impl EguiScrollSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset commanded by the controller during the previous frame, if any.
    pub fn take_pending(&mut self) -> Option<f32> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record this frame's geometry. Returns an event when offset, extent or viewport changed.
    ///
    /// A viewport resize is reported as an extent change: it is layout, not the user scrolling.
    pub fn observe(&mut self, offset: f32, extent: f32, viewport: f32) -> Option<ScrollChanged> {
        let next = Geometry {
            offset,
            extent,
            viewport,
        };
        let previous = self.current.replace(next);

        let extent_changed = match previous {
            None => true,
            Some(prev) => {
                (prev.extent - extent).abs() > EPSILON || (prev.viewport - viewport).abs() > EPSILON
            }
        };
        let offset_changed = previous.is_some_and(|prev| (prev.offset - offset).abs() > EPSILON);

        if !extent_changed && !offset_changed {
            return None;
        }

        Some(ScrollChanged {
            extent_changed,
            offset,
            max_offset: next.max_offset(),
            extent,
        })
    }

    fn geometry(&self) -> Result<Geometry, SurfaceError> {
        self.current.ok_or(SurfaceError::Detached)
    }
}

impl ScrollSurface for EguiScrollSurface {
    fn offset(&self) -> Result<f32, SurfaceError> {
        Ok(self.geometry()?.offset)
    }

    fn max_offset(&self) -> Result<f32, SurfaceError> {
        Ok(self.geometry()?.max_offset())
    }

    fn scroll_to(&mut self, offset: f32) -> Result<(), SurfaceError> {
        if !offset.is_finite() {
            return Err(SurfaceError::Rejected {
                offset,
                reason: "offset is not finite".to_string(),
            });
        }
        let mut geometry = self.geometry()?;
        geometry.offset = offset.clamp(0.0, geometry.max_offset());
        self.current = Some(geometry);
        self.pending = Some(geometry.offset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_counts_as_content_change() {
        let mut surface = EguiScrollSurface::new();
        let event = surface.observe(0.0, 40.0, 100.0).expect("first frame event");
        assert!(event.extent_changed);
        assert_eq!(event.max_offset, 0.0);
    }

    #[test]
    fn unchanged_frames_are_silent() {
        let mut surface = EguiScrollSurface::new();
        surface.observe(0.0, 400.0, 100.0);
        assert_eq!(surface.observe(0.0, 400.0, 100.0), None);
    }

    #[test]
    fn offset_only_change_is_a_user_scroll() {
        let mut surface = EguiScrollSurface::new();
        surface.observe(300.0, 400.0, 100.0);
        let event = surface.observe(120.0, 400.0, 100.0).expect("scroll event");
        assert!(!event.extent_changed);
        assert_eq!(event.offset, 120.0);
        assert_eq!(event.max_offset, 300.0);
    }

    #[test]
    fn growth_is_a_content_change() {
        let mut surface = EguiScrollSurface::new();
        surface.observe(300.0, 400.0, 100.0);
        let event = surface.observe(300.0, 420.0, 100.0).expect("growth event");
        assert!(event.extent_changed);
        assert_eq!(event.max_offset, 320.0);
    }

    #[test]
    fn scroll_to_is_clamped_and_deferred() {
        let mut surface = EguiScrollSurface::new();
        surface.observe(0.0, 400.0, 100.0);

        surface.scroll_to(1_000.0).expect("scroll");
        assert_eq!(surface.offset(), Ok(300.0));
        assert_eq!(surface.take_pending(), Some(300.0));
        assert_eq!(surface.take_pending(), None);
    }

    #[test]
    fn commands_before_first_frame_fail() {
        let mut surface = EguiScrollSurface::new();
        assert_eq!(surface.scroll_to(10.0), Err(SurfaceError::Detached));
        assert_eq!(surface.max_offset(), Err(SurfaceError::Detached));
    }

    #[test]
    fn non_finite_offsets_are_rejected() {
        let mut surface = EguiScrollSurface::new();
        surface.observe(0.0, 400.0, 100.0);
        assert!(matches!(
            surface.scroll_to(f32::NAN),
            Err(SurfaceError::Rejected { .. })
        ));
    }
}
