//! The 2D drawing backend boundary.
//!
//! The scene graph paints through the [`Canvas`] trait and never touches a
//! concrete raster surface itself. Implementations must provide
//! save/restore stack semantics with clip regions composing across nested
//! levels. [`RecordingCanvas`] logs every call as a [`CanvasOp`] so tests
//! can assert on the exact paint sequence without a real surface.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{CornerRadius, Rect};

/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// A 2D raster surface the render pass draws into.
///
/// Mirrors an immediate-mode canvas: transforms and clips are part of the
/// saved state, so `restore` undoes everything applied since the matching
/// `save`.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    /// Reset a region to fully transparent.
    fn clear_rect(&mut self, rect: Rect);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Rotate the current transform about the origin.
    fn rotate(&mut self, radians: f32);
    fn set_fill(&mut self, color: Color);
    /// Fill a plain rectangle with the current fill style.
    fn fill_rect(&mut self, rect: Rect);
    /// Fill a rounded rectangle with the current fill style.
    fn fill_round_rect(&mut self, rect: Rect, radius: CornerRadius);
    /// Intersect the current clip with a rounded rectangle.
    fn clip_round_rect(&mut self, rect: Rect, radius: CornerRadius);
    fn set_font(&mut self, font: &str);
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    Save,
    Restore,
    ClearRect(Rect),
    Translate { dx: f32, dy: f32 },
    Rotate { radians: f32 },
    SetFill(Color),
    FillRect(Rect),
    FillRoundRect { rect: Rect, radius: CornerRadius },
    ClipRoundRect { rect: Rect, radius: CornerRadius },
    SetFont(String),
}

/// A backend that records calls instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn take_ops(&mut self) -> Vec<CanvasOp> {
        std::mem::take(&mut self.ops)
    }

    /// Count ops matching a predicate, for terse test assertions.
    pub fn count(&self, predicate: impl Fn(&CanvasOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }
}

/// Cloneable handle to a shared [`RecordingCanvas`].
///
/// A Root owns its canvas; tests hand it a clone of this handle and keep
/// the other to inspect the recorded ops afterwards.
#[derive(Debug, Default, Clone)]
pub struct SharedRecordingCanvas(Rc<RefCell<RecordingCanvas>>);

impl SharedRecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<CanvasOp> {
        self.0.borrow().ops().to_vec()
    }

    pub fn clear_ops(&self) {
        self.0.borrow_mut().clear_ops();
    }

    pub fn count(&self, predicate: impl Fn(&CanvasOp) -> bool) -> usize {
        self.0.borrow().count(predicate)
    }
}

impl Canvas for SharedRecordingCanvas {
    fn save(&mut self) {
        self.0.borrow_mut().save();
    }

    fn restore(&mut self) {
        self.0.borrow_mut().restore();
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.0.borrow_mut().clear_rect(rect);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.0.borrow_mut().translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.0.borrow_mut().rotate(radians);
    }

    fn set_fill(&mut self, color: Color) {
        self.0.borrow_mut().set_fill(color);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.0.borrow_mut().fill_rect(rect);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: CornerRadius) {
        self.0.borrow_mut().fill_round_rect(rect, radius);
    }

    fn clip_round_rect(&mut self, rect: Rect, radius: CornerRadius) {
        self.0.borrow_mut().clip_round_rect(rect, radius);
    }

    fn set_font(&mut self, font: &str) {
        self.0.borrow_mut().set_font(font);
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.ops.push(CanvasOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(CanvasOp::Restore);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(CanvasOp::ClearRect(rect));
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(CanvasOp::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f32) {
        self.ops.push(CanvasOp::Rotate { radians });
    }

    fn set_fill(&mut self, color: Color) {
        self.ops.push(CanvasOp::SetFill(color));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(CanvasOp::FillRect(rect));
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: CornerRadius) {
        self.ops.push(CanvasOp::FillRoundRect { rect, radius });
    }

    fn clip_round_rect(&mut self, rect: Rect, radius: CornerRadius) {
        self.ops.push(CanvasOp::ClipRoundRect { rect, radius });
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(CanvasOp::SetFont(font.to_string()));
    }
}
