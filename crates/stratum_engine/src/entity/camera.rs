//! 2D camera entity data and the per-frame view it resolves to

use crate::foundation::math::{rotate_vector, Rect, Vec2};

/// How the render resolution follows the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Render at the window size, tracking resizes
    #[default]
    Full,
    /// Render at a fixed resolution and scale it into the window
    Fixed,
}

/// How a fixed render resolution is fitted into the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Fill the window, ignoring aspect ratio
    #[default]
    Stretch,
    /// Largest aspect-preserving fit, centred
    Fit,
    /// Largest whole-number scale, centred
    PixelPerfect,
}

/// A camera's resolved view for one frame.
///
/// `screen = offset + zoom · R(rotation) · (world − target)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// World point shown at `offset`
    pub target: Vec2,
    /// Screen point the target maps to
    pub offset: Vec2,
    /// View rotation in degrees
    pub rotation_degrees: f32,
    /// Magnification
    pub zoom: f32,
    /// Render resolution in pixels
    pub viewport: Vec2,
}

impl CameraView {
    /// Identity view over a viewport of the given size
    pub fn identity(viewport: Vec2) -> Self {
        Self {
            target: Vec2::zeros(),
            offset: Vec2::zeros(),
            rotation_degrees: 0.0,
            zoom: 1.0,
            viewport,
        }
    }

    /// Map a world point to screen space
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + rotate_vector((world - self.target) * self.zoom, self.rotation_degrees.to_radians())
    }

    /// Map a screen point back into the world
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let zoom = if self.zoom == 0.0 { 1.0 } else { self.zoom };
        self.target + rotate_vector(screen - self.offset, -self.rotation_degrees.to_radians()) / zoom
    }

    /// Screen position of a world point mapped onto `[-1, 1]` per axis,
    /// clamped at the viewport edges
    pub fn normalized_screen_coords(&self, world: Vec2) -> Vec2 {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return Vec2::zeros();
        }
        let screen = self.world_to_screen(world).component_div(&self.viewport);
        screen.map(|axis| (axis * 2.0 - 1.0).clamp(-1.0, 1.0))
    }

    /// Screen-space bounding box of a world rectangle
    pub fn screen_bounds(&self, world: &Rect) -> Rect {
        let corners = world.corners().map(|corner| self.world_to_screen(corner));
        Rect::from_points(&corners).unwrap_or_default()
    }

    /// Whether a world rectangle lands inside the viewport, allowing
    /// `margin` screen pixels of slack on every side
    pub fn is_on_screen(&self, world: &Rect, margin: f32) -> bool {
        let viewport = Rect::from_position_size(Vec2::zeros(), self.viewport).expanded(margin);
        self.screen_bounds(world).intersects(&viewport)
    }
}

/// Camera entity data
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Screen offset added on top of the render centre
    pub offset: Vec2,
    /// Magnification
    pub zoom: f32,
    /// Resolution policy
    pub render_mode: RenderMode,
    /// Window fitting policy
    pub scale_mode: ScaleMode,
    render_resolution: Vec2,
    window_size: Vec2,
    view: CameraView,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera2D {
    /// Camera rendering at the window size
    pub fn new() -> Self {
        Self {
            offset: Vec2::zeros(),
            zoom: 1.0,
            render_mode: RenderMode::Full,
            scale_mode: ScaleMode::Stretch,
            render_resolution: Vec2::zeros(),
            window_size: Vec2::zeros(),
            view: CameraView::identity(Vec2::zeros()),
        }
    }

    /// Camera rendering at a fixed resolution, fitted with `scale_mode`
    pub fn fixed(resolution: Vec2, scale_mode: ScaleMode) -> Self {
        Self {
            render_mode: RenderMode::Fixed,
            scale_mode,
            render_resolution: resolution,
            ..Self::new()
        }
    }

    /// Builder for the zoom
    #[must_use]
    pub const fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Resolution the world is rendered at
    pub const fn render_resolution(&self) -> Vec2 {
        self.render_resolution
    }

    /// Switch to a fixed render resolution
    pub fn set_render_resolution(&mut self, resolution: Vec2) {
        self.render_mode = RenderMode::Fixed;
        self.render_resolution = resolution;
    }

    /// The view resolved during the last late update
    pub const fn view(&self) -> CameraView {
        self.view
    }

    /// Recompute the view for the camera entity's global pose
    pub fn resolve(&mut self, position: Vec2, rotation_degrees: f32) {
        self.view = CameraView {
            target: position,
            offset: self.offset + self.render_resolution * 0.5,
            rotation_degrees,
            zoom: self.zoom,
            viewport: self.render_resolution,
        };
    }

    /// Track a new window size
    pub fn on_window_resized(&mut self, window_size: Vec2) {
        self.window_size = window_size;
        if self.render_mode == RenderMode::Full || self.render_resolution == Vec2::zeros() {
            self.render_resolution = window_size;
        }
    }

    /// Where the rendered image lands inside the window
    pub fn destination_rect(&self) -> Rect {
        let window = self.window_size;
        let resolution = self.render_resolution;
        if resolution.x <= 0.0 || resolution.y <= 0.0 {
            return Rect::from_position_size(Vec2::zeros(), window);
        }

        let fit = (window.x / resolution.x).min(window.y / resolution.y);
        let scale = match self.scale_mode {
            ScaleMode::Stretch => return Rect::from_position_size(Vec2::zeros(), window),
            ScaleMode::Fit => fit,
            ScaleMode::PixelPerfect => fit.floor().max(1.0),
        };
        let size = resolution * scale;
        Rect::from_position_size((window - size) * 0.5, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_round_trip() {
        let view = CameraView {
            target: Vec2::new(50.0, 20.0),
            offset: Vec2::new(320.0, 180.0),
            rotation_degrees: 30.0,
            zoom: 2.0,
            viewport: Vec2::new(640.0, 360.0),
        };
        let world = Vec2::new(75.0, -10.0);
        let back = view.screen_to_world(view.world_to_screen(world));
        assert_relative_eq!(back.x, world.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, world.y, epsilon = 1e-3);
        assert_eq!(view.world_to_screen(view.target), view.offset);
    }

    #[test]
    fn test_resolve_centres_target() {
        let mut camera = Camera2D::fixed(Vec2::new(320.0, 180.0), ScaleMode::Fit);
        camera.resolve(Vec2::new(10.0, 10.0), 0.0);
        let view = camera.view();
        assert_eq!(view.world_to_screen(Vec2::new(10.0, 10.0)), Vec2::new(160.0, 90.0));
    }

    #[test]
    fn test_normalized_screen_coords_clamp() {
        let mut camera = Camera2D::fixed(Vec2::new(320.0, 180.0), ScaleMode::Fit);
        camera.resolve(Vec2::zeros(), 0.0);
        let view = camera.view();
        assert_eq!(view.normalized_screen_coords(Vec2::zeros()), Vec2::zeros());
        assert_eq!(view.normalized_screen_coords(Vec2::new(80.0, -45.0)), Vec2::new(0.5, -0.5));
        assert_eq!(view.normalized_screen_coords(Vec2::new(1000.0, 1000.0)), Vec2::new(1.0, 1.0));
        assert_eq!(CameraView::identity(Vec2::zeros()).normalized_screen_coords(Vec2::new(5.0, 5.0)), Vec2::zeros());
    }

    #[test]
    fn test_full_mode_tracks_window() {
        let mut camera = Camera2D::new();
        camera.on_window_resized(Vec2::new(800.0, 600.0));
        assert_eq!(camera.render_resolution(), Vec2::new(800.0, 600.0));

        let mut fixed = Camera2D::fixed(Vec2::new(320.0, 180.0), ScaleMode::Fit);
        fixed.on_window_resized(Vec2::new(800.0, 600.0));
        assert_eq!(fixed.render_resolution(), Vec2::new(320.0, 180.0));
    }

    #[test]
    fn test_destination_rect_modes() {
        let mut camera = Camera2D::fixed(Vec2::new(320.0, 180.0), ScaleMode::Fit);
        camera.on_window_resized(Vec2::new(800.0, 600.0));
        assert_eq!(camera.destination_rect(), Rect::new(0.0, 75.0, 800.0, 450.0));

        camera.scale_mode = ScaleMode::PixelPerfect;
        assert_eq!(camera.destination_rect(), Rect::new(80.0, 120.0, 640.0, 360.0));

        camera.scale_mode = ScaleMode::Stretch;
        assert_eq!(camera.destination_rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_on_screen_margin() {
        let view = CameraView::identity(Vec2::new(100.0, 100.0));
        let just_outside = Rect::new(110.0, 10.0, 5.0, 5.0);
        assert!(!view.is_on_screen(&just_outside, 0.0));
        assert!(view.is_on_screen(&just_outside, 20.0));
    }
}
