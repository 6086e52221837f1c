//! Viewport: simulation-space to screen-space camera transform
//!
//! Owns zoom, pan offset and the optional follow target, and converts body
//! positions (meters) into screen pixels. The y-axis sign flips in the
//! projection because screen-space y grows downward while simulation-space y
//! grows upward — a convention that must be preserved exactly.
//!
//! The follow target is an index into the session's body list, never a
//! reference, so catalog resets cannot leave it dangling.

use crate::simulation::states::{Body, NVec2};

/// Fixed meters-per-pixel scale: one pixel is 4 182 695 000 m at zoom 1.0.
pub const CONVERT: f64 = 1.0 / 4_182_695_000.0;

pub const ZOOM_MIN: f64 = 0.3;
pub const ZOOM_MAX: f64 = 5.0;

/// Default screen size used until the UI collaborator reports one.
pub const DEFAULT_SCREEN_SIZE: (f64, f64) = (800.0, 700.0);

/// A body's projected axis-aligned screen rectangle (top-left + size),
/// exposed read-only for hit testing and overlay rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ScreenRect {
    pub fn contains(&self, p: NVec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64, // clamped to [ZOOM_MIN, ZOOM_MAX]
    pan: NVec2, // camera offset in pixels
    follow: Option<usize>, // index into the session's body list
    half_w: f64,
    half_h: f64,
}

impl Viewport {
    pub fn new(screen_w: f64, screen_h: f64) -> Self {
        Self {
            zoom: 1.0,
            pan: NVec2::zeros(),
            follow: None,
            half_w: screen_w / 2.0,
            half_h: screen_h / 2.0,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> NVec2 {
        self.pan
    }

    pub fn follow_target(&self) -> Option<usize> {
        self.follow
    }

    /// Saturating zoom adjustment; out-of-range inputs clamp, never reject.
    pub fn adjust_zoom(&mut self, delta: f64) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Manual camera pan. Ignored while a follow target is set — follow
    /// recomputation overrides manual pan every frame anyway.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if self.follow.is_none() {
            self.pan.x += dx;
            self.pan.y += dy;
        }
    }

    pub fn set_pan(&mut self, pan: NVec2) {
        self.pan = pan;
    }

    pub fn set_follow_target(&mut self, index: Option<usize>) {
        self.follow = index;
    }

    /// Restore the home view: zoom 1.0, zero pan, no follow target.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = NVec2::zeros();
        self.follow = None;
    }

    /// Recompute the viewport center after a screen-size change. Projections
    /// are always derived from simulation-space truth, so nothing else needs
    /// patching; re-projecting with the new center is drift-free.
    pub fn on_resize(&mut self, screen_w: f64, screen_h: f64) {
        self.half_w = screen_w / 2.0;
        self.half_h = screen_h / 2.0;
    }

    /// Screen position of a body before the camera offset is applied.
    pub fn project_unpanned(&self, body: &Body) -> NVec2 {
        NVec2::new(
            self.half_w + body.x.x * CONVERT * self.zoom,
            self.half_h - body.x.y * CONVERT * self.zoom,
        )
    }

    /// Final screen position of a body (camera offset applied).
    pub fn project(&self, body: &Body) -> NVec2 {
        self.project_unpanned(body) - self.pan
    }

    /// Projected screen rectangle for hit testing and overlay rendering.
    /// The sprite size scales with zoom around the body's screen position.
    pub fn screen_rect(&self, body: &Body) -> ScreenRect {
        let size = body.display_radius * self.zoom;
        let center = self.project(body);
        ScreenRect {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            w: size,
            h: size,
        }
    }

    /// Hit-test a screen point against every body in stable order and set
    /// the follow target to the first hit. A miss on every body clears the
    /// target — clicking empty space always deselects.
    pub fn pick_body_at(&mut self, point: NVec2, bodies: &[Body]) -> Option<usize> {
        self.follow = bodies
            .iter()
            .position(|b| self.screen_rect(b).contains(point));
        self.follow
    }

    /// Per-frame follow recomputation: place the target's unpanned screen
    /// position at the viewport center. Runs every rendered frame, paused or
    /// not. Tolerates the target index no longer existing (catalog reset)
    /// by reverting to no target.
    pub fn update_follow(&mut self, bodies: &[Body]) {
        match self.follow.and_then(|i| bodies.get(i)) {
            Some(target) => {
                let unpanned = self.project_unpanned(target);
                self.pan = NVec2::new(unpanned.x - self.half_w, unpanned.y - self.half_h);
            }
            None => self.follow = None,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_SIZE.0, DEFAULT_SCREEN_SIZE.1)
    }
}
