//! The control panel: one `progress` slider drawn with the overlay.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::ui::{Color, GuiComponent, Rect};

const PANEL_WIDTH: f32 = 240.0;
const PANEL_HEIGHT: f32 = 40.0;
const MARGIN: f32 = 12.0;
const TRACK_INSET: f32 = 14.0;
const TRACK_HEIGHT: f32 = 6.0;
const KNOB_SIZE: f32 = 14.0;

/// Values the panel writes and the frame driver reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Blend factor between the two rendered scenes.
    pub progress: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self { progress: 0.5 }
    }
}

/// A numeric range with a step size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slider {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Slider {
    /// The `progress` slider: 0 to 1 in steps of 0.01.
    pub fn progress() -> Self {
        Self {
            label: "progress",
            min: 0.0,
            max: 1.0,
            step: 0.01,
        }
    }

    /// Clamp `value` into range and round it to the nearest step.
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Position of `value` along the range, in `[0, 1]`.
    pub fn fraction(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Snapped value at `fraction` along the range.
    pub fn value_at(&self, fraction: f32) -> f32 {
        self.snap(self.min + fraction * (self.max - self.min))
    }
}

/// A pointer change the panel reacts to, in physical window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Pressed,
    Released,
}

impl PointerEvent {
    /// The left-button and cursor part of a window event, if any.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(Self::Moved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => Some(match state {
                ElementState::Pressed => Self::Pressed,
                ElementState::Released => Self::Released,
            }),
            WindowEvent::Focused(false) => Some(Self::Released),
            _ => None,
        }
    }
}

/// Immediate-mode panel anchored to the top-right corner of the window.
///
/// Sizes are in logical pixels and multiplied by the window scale factor,
/// so the panel keeps its apparent size on HiDPI displays.
#[derive(Clone, Debug)]
pub struct ControlPanel {
    rect: Rect,
    slider: Slider,
    scale: f32,
    viewport_width: f32,
    cursor: Vec2,
    visible: bool,
    dragging: bool,
    capturing: bool,
    was_down: bool,
}

impl ControlPanel {
    pub fn new(viewport_width: f32) -> Self {
        let mut panel = Self {
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            slider: Slider::progress(),
            scale: 1.0,
            viewport_width,
            cursor: Vec2::ZERO,
            visible: true,
            dragging: false,
            capturing: false,
            was_down: false,
        };
        panel.layout(viewport_width);
        panel
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.set_scale(scale);
        self
    }

    /// Follow a change of the window scale factor.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale > 0.0 { scale } else { 1.0 };
        self.layout(self.viewport_width);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Re-anchor to the top-right corner of a viewport `viewport_width` wide.
    pub fn layout(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
        let (width, margin) = (self.px(PANEL_WIDTH), self.px(MARGIN));
        self.rect = Rect::new(
            (viewport_width - width - margin).max(0.0),
            margin,
            width,
            self.px(PANEL_HEIGHT),
        );
    }

    fn px(&self, logical: f32) -> f32 {
        logical * self.scale
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the pointer currently belongs to the panel.
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
        self.dragging = false;
        self.capturing = false;
        log::debug!("control panel {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Write `value` through the slider's range and step.
    pub fn set_progress(&self, settings: &mut Settings, value: f32) {
        settings.progress = self.slider.snap(value);
    }

    fn track(&self) -> Rect {
        let (inset, height) = (self.px(TRACK_INSET), self.px(TRACK_HEIGHT));
        Rect::new(
            self.rect.x + inset,
            self.rect.y + (self.rect.height - height) / 2.0,
            self.rect.width - 2.0 * inset,
            height,
        )
    }

    /// Area that starts a drag: the track, grown to the knob's height.
    fn grab_area(&self) -> Rect {
        let track = self.track();
        let knob = self.px(KNOB_SIZE);
        let grow = (knob - track.height) / 2.0;
        Rect::new(track.x - grow, track.y - grow, track.width + 2.0 * grow, knob)
    }

    /// Apply one pointer state.
    ///
    /// Returns `true` while a press that started inside the panel is held,
    /// meaning the pointer belongs to the panel and not to the camera.
    pub fn pointer(&mut self, settings: &mut Settings, cursor: Vec2, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        self.cursor = cursor;

        if !self.visible || !down {
            self.dragging = false;
            self.capturing = false;
            return false;
        }

        if pressed {
            self.capturing = self.rect.contains(cursor.x, cursor.y);
            self.dragging = self.capturing && self.grab_area().contains(cursor.x, cursor.y);
        }

        if self.dragging {
            let track = self.track();
            let fraction = ((cursor.x - track.x) / track.width).clamp(0.0, 1.0);
            settings.progress = self.slider.value_at(fraction);
        }

        self.capturing
    }

    /// Apply a pointer event as it arrives, independent of frames.
    ///
    /// A press and release landing between two redraws still edits
    /// `settings`, and edits work while the sketch is stopped.
    pub fn handle_pointer(&mut self, settings: &mut Settings, event: PointerEvent) -> bool {
        let (cursor, down) = match event {
            PointerEvent::Moved(cursor) => (cursor, self.was_down),
            PointerEvent::Pressed => (self.cursor, true),
            PointerEvent::Released => (self.cursor, false),
        };
        self.pointer(settings, cursor, down)
    }

    /// Overlay components for the current state. Empty while hidden.
    pub fn components(&self, settings: &Settings) -> Vec<GuiComponent> {
        if !self.visible {
            return Vec::new();
        }

        let track = self.track();
        let knob = self.px(KNOB_SIZE);
        let fill_width = track.width * self.slider.fraction(settings.progress);
        let knob_x = track.x + fill_width - knob / 2.0;
        let knob_y = track.y + (track.height - knob) / 2.0;

        vec![
            GuiComponent::pane(self.rect),
            GuiComponent::quad(track, Color::TRACK),
            GuiComponent::quad(
                Rect::new(track.x, track.y, fill_width, track.height),
                Color::ACCENT,
            ),
            GuiComponent::quad(Rect::new(knob_x, knob_y, knob, knob), Color::WHITE),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn slider_clamps_and_snaps() {
        let slider = Slider::progress();
        assert_eq!(slider.snap(-0.3), 0.0);
        assert_eq!(slider.snap(1.7), 1.0);
        assert!(close(slider.snap(0.123), 0.12));
        assert!(close(slider.snap(0.456), 0.46));
        assert!(close(slider.snap(0.5), 0.5));
    }

    #[test]
    fn set_progress_goes_through_slider() {
        let panel = ControlPanel::new(800.0);
        let mut settings = Settings::default();
        assert_eq!(settings.progress, 0.5);

        panel.set_progress(&mut settings, 2.0);
        assert_eq!(settings.progress, 1.0);
        panel.set_progress(&mut settings, 0.333);
        assert!(close(settings.progress, 0.33));
    }

    #[test]
    fn layout_anchors_top_right() {
        let mut panel = ControlPanel::new(800.0);
        assert_eq!(panel.rect().right(), 800.0 - MARGIN);

        panel.layout(1200.0);
        assert_eq!(panel.rect().right(), 1200.0 - MARGIN);
        assert_eq!(panel.rect().y, MARGIN);
    }

    #[test]
    fn dragging_track_edits_progress() {
        let mut panel = ControlPanel::new(800.0);
        let mut settings = Settings::default();
        let track = panel.track();
        let mid_y = track.y + track.height / 2.0;

        assert!(panel.pointer(&mut settings, Vec2::new(track.x, mid_y), true));
        assert_eq!(settings.progress, 0.0);

        // Dragging past the end of the track clamps.
        assert!(panel.pointer(&mut settings, Vec2::new(track.right() + 50.0, mid_y), true));
        assert_eq!(settings.progress, 1.0);

        assert!(panel.pointer(
            &mut settings,
            Vec2::new(track.x + track.width * 0.25, mid_y + 200.0),
            true
        ));
        assert!(close(settings.progress, 0.25));

        assert!(!panel.pointer(&mut settings, Vec2::new(0.0, 0.0), false));
        assert!(close(settings.progress, 0.25));
    }

    #[test]
    fn press_outside_panel_is_not_captured() {
        let mut panel = ControlPanel::new(800.0);
        let mut settings = Settings::default();
        let track = panel.track();

        assert!(!panel.pointer(&mut settings, Vec2::new(10.0, 300.0), true));
        // Sliding onto the panel mid-drag does not steal the pointer.
        assert!(!panel.pointer(&mut settings, Vec2::new(track.x, track.y), true));
        assert_eq!(settings.progress, 0.5);
    }

    #[test]
    fn press_on_pane_away_from_track_captures_without_editing() {
        let mut panel = ControlPanel::new(800.0);
        let mut settings = Settings::default();
        let rect = panel.rect();

        assert!(panel.pointer(&mut settings, Vec2::new(rect.x + 2.0, rect.y + 2.0), true));
        assert_eq!(settings.progress, 0.5);
    }

    #[test]
    fn hidden_panel_draws_nothing_and_ignores_pointer() {
        let mut panel = ControlPanel::new(800.0);
        let mut settings = Settings::default();
        assert_eq!(panel.components(&settings).len(), 4);

        panel.toggle_visible();
        assert!(!panel.is_visible());
        assert!(panel.components(&settings).is_empty());

        let track = panel.track();
        assert!(!panel.pointer(&mut settings, Vec2::new(track.x, track.y), true));
        assert_eq!(settings.progress, 0.5);
    }

    #[test]
    fn fill_follows_progress() {
        let panel = ControlPanel::new(800.0);
        let settings = Settings { progress: 0.75 };
        let track = panel.track();

        let components = panel.components(&settings);
        match &components[2] {
            GuiComponent::Quad { rect, .. } => assert!(close(rect.width, track.width * 0.75)),
            other => panic!("expected fill quad, got {other:?}"),
        }
    }

    #[test]
    fn pointer_events_edit_progress_while_sketch_is_stopped() {
        use crate::config::SketchConfig;
        use crate::sketch::Sketch;

        let mut sketch = Sketch::new(&SketchConfig::default());
        sketch.pause();
        assert!(!sketch.is_running());

        let mut panel = ControlPanel::new(800.0);
        let track = panel.track();
        let mid_y = track.y + track.height / 2.0;

        panel.handle_pointer(
            sketch.settings_mut(),
            PointerEvent::Moved(Vec2::new(track.x + track.width * 0.75, mid_y)),
        );
        assert!(panel.handle_pointer(sketch.settings_mut(), PointerEvent::Pressed));
        assert!(close(sketch.settings().progress, 0.75));

        panel.handle_pointer(
            sketch.settings_mut(),
            PointerEvent::Moved(Vec2::new(track.x + track.width * 0.25, mid_y)),
        );
        assert!(close(sketch.settings().progress, 0.25));

        assert!(!panel.handle_pointer(sketch.settings_mut(), PointerEvent::Released));
        assert!(!panel.is_capturing());
        assert!(close(sketch.settings().progress, 0.25));
        assert_eq!(sketch.time(), 0.0);
    }

    #[test]
    fn click_between_frames_still_lands() {
        let mut panel = ControlPanel::new(800.0);
        let mut settings = Settings::default();
        let track = panel.track();

        panel.handle_pointer(
            &mut settings,
            PointerEvent::Moved(Vec2::new(track.right(), track.y + 1.0)),
        );
        panel.handle_pointer(&mut settings, PointerEvent::Pressed);
        panel.handle_pointer(&mut settings, PointerEvent::Released);
        assert_eq!(settings.progress, 1.0);

        // Moving with the button up does not drag.
        panel.handle_pointer(&mut settings, PointerEvent::Moved(Vec2::new(track.x, track.y + 1.0)));
        assert_eq!(settings.progress, 1.0);
    }

    #[test]
    fn scale_factor_grows_panel_and_hit_areas() {
        let mut panel = ControlPanel::new(1600.0).with_scale(2.0);
        let rect = panel.rect();
        assert_eq!(rect.width, 2.0 * PANEL_WIDTH);
        assert_eq!(rect.height, 2.0 * PANEL_HEIGHT);
        assert_eq!(rect.right(), 1600.0 - 2.0 * MARGIN);
        assert_eq!(rect.y, 2.0 * MARGIN);

        let track = panel.track();
        assert_eq!(track.height, 2.0 * TRACK_HEIGHT);
        assert_eq!(track.width, 2.0 * (PANEL_WIDTH - 2.0 * TRACK_INSET));

        // A point just above the unscaled track is still on the scaled grab area.
        let mut settings = Settings::default();
        let cursor = Vec2::new(track.x + track.width * 0.5, track.y - KNOB_SIZE / 2.0);
        assert!(panel.pointer(&mut settings, cursor, true));
        assert!(close(settings.progress, 0.5));
        panel.pointer(&mut settings, Vec2::new(track.right(), cursor.y), true);
        assert_eq!(settings.progress, 1.0);

        match &panel.components(&settings)[3] {
            GuiComponent::Quad { rect, .. } => assert_eq!(rect.width, 2.0 * KNOB_SIZE),
            other => panic!("expected knob quad, got {other:?}"),
        }

        panel.set_scale(1.0);
        assert_eq!(panel.rect().width, PANEL_WIDTH);
        assert_eq!(panel.rect().right(), 1600.0 - MARGIN);
    }
}
