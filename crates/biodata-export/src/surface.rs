//! The off-screen template surface and its single-holder lease.

use serde::{Deserialize, Serialize};

use crate::render::RenderedTemplate;

/// Progress of one PDF export attempt.
///
/// `Idle → Rendering → Rasterizing → {Paginating → Saved, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPhase {
    Idle,
    Rendering,
    Rasterizing,
    Paginating,
    Saved,
    Failed,
}

impl ExportPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, ExportPhase::Saved | ExportPhase::Failed)
    }

    pub fn can_advance_to(self, next: ExportPhase) -> bool {
        use ExportPhase::*;

        matches!(
            (self, next),
            (Rendering, Rasterizing)
                | (Rasterizing, Paginating)
                | (Paginating, Saved)
                | (Rendering | Rasterizing | Paginating, Failed)
        )
    }
}

/// Scratch surface the template is rendered into before rasterization.
///
/// Only a [`SurfaceLease`] can write to it, and taking a lease needs
/// `&mut self`, so at most one export holds the surface at a time.
#[derive(Debug)]
pub struct TemplateSurface {
    content: Option<RenderedTemplate>,
    visible: bool,
    phase: ExportPhase,
}

impl TemplateSurface {
    pub fn new() -> Self {
        Self {
            content: None,
            visible: false,
            phase: ExportPhase::Idle,
        }
    }

    /// Take the surface for one export attempt.
    pub fn acquire(&mut self) -> SurfaceLease<'_> {
        self.phase = ExportPhase::Rendering;
        tracing::debug!("template surface acquired");
        SurfaceLease { surface: self }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> Option<&RenderedTemplate> {
        self.content.as_ref()
    }

    /// Phase of the current or most recent export attempt.
    pub fn phase(&self) -> ExportPhase {
        self.phase
    }
}

impl Default for TemplateSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive hold on a [`TemplateSurface`].
///
/// Dropping the lease hides and clears the surface. An attempt that never
/// reached `Saved` is marked `Failed`, whatever path it left by.
#[derive(Debug)]
pub struct SurfaceLease<'a> {
    surface: &'a mut TemplateSurface,
}

impl SurfaceLease<'_> {
    /// Load rendered markup and make it visible for measurement.
    pub fn populate(&mut self, rendered: RenderedTemplate) -> &RenderedTemplate {
        self.surface.visible = true;
        self.surface.content.insert(rendered)
    }

    pub fn is_visible(&self) -> bool {
        self.surface.visible
    }

    pub fn phase(&self) -> ExportPhase {
        self.surface.phase
    }

    pub fn advance(&mut self, next: ExportPhase) {
        let current = self.surface.phase;
        debug_assert!(
            current.can_advance_to(next),
            "invalid export phase transition {current:?} -> {next:?}"
        );
        tracing::debug!(from = ?current, to = ?next, "export phase");
        self.surface.phase = next;
    }
}

impl Drop for SurfaceLease<'_> {
    fn drop(&mut self) {
        if !self.surface.phase.is_terminal() {
            self.surface.phase = ExportPhase::Failed;
        }
        self.surface.visible = false;
        self.surface.content = None;
        tracing::debug!(phase = ?self.surface.phase, "template surface released");
    }
}
