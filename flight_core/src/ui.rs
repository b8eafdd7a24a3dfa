//! Windowing surface the host lends to modules during GUI passes.
//!
//! The core never renders anything itself. Each enabled module with a visible
//! window gets one [`UiSurface::window`] call per pass, with a stable id
//! derived from the host's base window id and the module's registration slot.

use std::fmt::Write as _;

/// Window position and size in host screen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WindowRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Persisted as a vector4 setting `(x, y, width, height)`.
    pub fn to_array(self) -> [f64; 4] {
        [
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.width),
            f64::from(self.height),
        ]
    }

    pub fn from_array(v: [f64; 4]) -> Self {
        Self::new(v[0] as f32, v[1] as f32, v[2] as f32, v[3] as f32)
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self::new(100.0, 100.0, 200.0, 120.0)
    }
}

pub trait UiSurface {
    /// Open a window; returns the rect after any user drag/resize.
    fn window(&mut self, id: u32, title: &str, rect: WindowRect) -> WindowRect;
    fn end_window(&mut self);
    fn label(&mut self, text: &str);
    /// True if the button was clicked this pass.
    fn button(&mut self, text: &str) -> bool;
}

/// Plain-text surface: records every widget as a line, never clicks.
///
/// Used by the simulation binary for periodic readouts and by tests.
#[derive(Debug, Default)]
pub struct TextSurface {
    pub lines: Vec<String>,
    /// Button captions that report a click on the next pass.
    pub pending_clicks: Vec<String>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self, caption: &str) {
        self.pending_clicks.push(caption.to_string());
    }

    pub fn take_text(&mut self) -> String {
        let mut out = String::new();
        for line in self.lines.drain(..) {
            let _ = writeln!(out, "{line}");
        }
        out
    }
}

impl UiSurface for TextSurface {
    fn window(&mut self, id: u32, title: &str, rect: WindowRect) -> WindowRect {
        self.lines.push(format!("[{id}] {title}"));
        rect
    }

    fn end_window(&mut self) {}

    fn label(&mut self, text: &str) {
        self.lines.push(format!("  {text}"));
    }

    fn button(&mut self, text: &str) -> bool {
        self.lines.push(format!("  <{text}>"));
        match self.pending_clicks.iter().position(|c| c == text) {
            Some(i) => {
                self.pending_clicks.remove(i);
                true
            }
            None => false,
        }
    }
}
