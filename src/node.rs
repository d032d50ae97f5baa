//! Scene-graph node state and the attribute system.
//!
//! A node is a box: geometry requests (position, dimensions, margin,
//! padding), paint state (fill, radius, overflow, transforms) and identity
//! (key, internal flag). Mutations flow through [`AttrPatch`], whose
//! properties are classified by the declared [`prop_traits`] table into
//! layout-affecting, animatable and cosmetic tiers — one table, not
//! parallel name lists, so new properties cannot silently drift.

use bitflags::bitflags;

use crate::backend::Color;
use crate::context::LocalContext;
use crate::geometry::{CornerRadius, Point};
use crate::layout::{Constraint, Size};
use crate::tree::NodeId;

/// A requested extent along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// No explicit request; resolves through the constraint envelope.
    #[default]
    Auto,
    /// Exact pixels.
    Px(f32),
    /// Consume the full available constraint ("fill remaining").
    Fill,
}

impl From<f32> for Dimension {
    fn from(px: f32) -> Self {
        Dimension::Px(px)
    }
}

/// Margin or padding, per edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// `[top, right, bottom, left]` — CSS-style 4-value shorthand.
impl From<[f32; 4]> for Edges {
    fn from(edges: [f32; 4]) -> Self {
        Self::new(edges[0], edges[1], edges[2], edges[3])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
}

/// Cursor hint surfaced to the host when the pointer rests on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Pointer,
    Text,
    Move,
    Grab,
    Grabbing,
    NotAllowed,
}

bitflags! {
    /// Behavioral traits of a mutable property.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PropTraits: u8 {
        /// Changing the property can change measured sizes.
        const LAYOUT = 0b01;
        /// The property is a number the interpolation engine can drive.
        const ANIMATABLE = 0b10;
    }
}

/// Every property reachable through [`AttrPatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKey {
    X,
    Y,
    Width,
    Height,
    Rotate,
    TranslateX,
    TranslateY,
    MinWidth,
    MaxWidth,
    MinHeight,
    MaxHeight,
    Margin,
    Padding,
    Radius,
    Overflow,
    Display,
    Background,
    Cursor,
    Key,
}

/// The declared property trait table.
pub const fn prop_traits(key: PropKey) -> PropTraits {
    match key {
        PropKey::Width | PropKey::Height => PropTraits::LAYOUT.union(PropTraits::ANIMATABLE),
        PropKey::X
        | PropKey::Y
        | PropKey::Rotate
        | PropKey::TranslateX
        | PropKey::TranslateY => PropTraits::ANIMATABLE,
        _ => PropTraits::empty(),
    }
}

/// One interpolated value handed back by the interpolation engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropSample {
    pub key: PropKey,
    pub value: f32,
}

/// A box in the retained scene graph.
///
/// Public fields are the node's requested state; resolved layout results,
/// tree links and the cached context snapshot are crate-internal and
/// maintained by the passes.
#[derive(Debug, Default)]
pub struct Node {
    pub key: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub margin: Edges,
    pub padding: Edges,
    pub radius: CornerRadius,
    pub overflow: Overflow,
    pub display: Display,
    pub background: Option<Color>,
    pub translate_x: f32,
    pub translate_y: f32,
    /// Rotation in degrees, applied in place about the computed pivot.
    pub rotate: f32,
    /// Pivot-offset override; inherited by descendants when set.
    pub pivot_offset: Option<Point>,
    pub cursor: Option<CursorIcon>,
    /// Synthesized by a composite widget's rebuild; excluded from
    /// identity-based registries.
    pub internal: bool,
    /// Set by the scroll-region collaborator so context propagation can
    /// name this node as the scroll ancestor of its subtree.
    pub scroll_region: bool,
    /// Explicit hit-test eligibility, independent of listeners and cursor.
    pub quick_lookup: bool,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) mounted: bool,
    pub(crate) dirty: bool,
    pub(crate) has_listeners: bool,
    pub(crate) size: Option<Size>,
    /// Placement point received from the parent during the last render.
    pub(crate) placement: Point,
    pub(crate) ctx: LocalContext,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last context snapshot computed for this node.
    ///
    /// This is the explicit cached-read mode: callers that must not force
    /// recomputation (mid-layout readers) may observe a stale snapshot. It
    /// is refreshed just before every render and hit-test traversal and
    /// must not be trusted across that boundary otherwise.
    pub fn cached_context(&self) -> &LocalContext {
        &self.ctx
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Eligible for the Root's quick-lookup (hit-test) registry.
    pub(crate) fn wants_quick_lookup(&self) -> bool {
        self.has_listeners || self.cursor.is_some() || self.quick_lookup
    }

    /// The size this node asks for before children weigh in. `Auto`
    /// contributes nothing and is clamped up by the envelope's minimum.
    pub(crate) fn requested_size(&self, constraint: &Constraint) -> Size {
        let width = match self.width {
            Dimension::Px(width) => width,
            Dimension::Fill => constraint.max_width,
            Dimension::Auto => 0.0,
        };
        let height = match self.height {
            Dimension::Px(height) => height,
            Dimension::Fill => constraint.max_height,
            Dimension::Auto => 0.0,
        };
        Size::new(width, height)
    }

    /// Current value of an animatable numeric property. Width/height read
    /// the resolved size, matching what is on screen when a tween starts.
    pub(crate) fn numeric_value(&self, key: PropKey) -> Option<f32> {
        match key {
            PropKey::X => Some(self.x),
            PropKey::Y => Some(self.y),
            PropKey::Rotate => Some(self.rotate),
            PropKey::TranslateX => Some(self.translate_x),
            PropKey::TranslateY => Some(self.translate_y),
            PropKey::Width => self.size.map(|size| size.width),
            PropKey::Height => self.size.map(|size| size.height),
            _ => None,
        }
    }

    /// Direct assignment of an interpolated value, as the engine ticks.
    pub(crate) fn apply_sample(&mut self, sample: PropSample) {
        match sample.key {
            PropKey::X => self.x = sample.value,
            PropKey::Y => self.y = sample.value,
            PropKey::Rotate => self.rotate = sample.value,
            PropKey::TranslateX => self.translate_x = sample.value,
            PropKey::TranslateY => self.translate_y = sample.value,
            PropKey::Width => self.width = Dimension::Px(sample.value),
            PropKey::Height => self.height = Dimension::Px(sample.value),
            _ => {}
        }
    }

    // Builder-style setters for declarative construction.

    pub fn key_name(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn width(mut self, width: impl Into<Dimension>) -> Self {
        self.width = width.into();
        self
    }

    pub fn height(mut self, height: impl Into<Dimension>) -> Self {
        self.height = height.into();
        self
    }

    pub fn min_width_px(mut self, min_width: f32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn max_width_px(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn min_height_px(mut self, min_height: f32) -> Self {
        self.min_height = Some(min_height);
        self
    }

    pub fn max_height_px(mut self, max_height: f32) -> Self {
        self.max_height = Some(max_height);
        self
    }

    pub fn margin(mut self, margin: impl Into<Edges>) -> Self {
        self.margin = margin.into();
        self
    }

    pub fn padding(mut self, padding: impl Into<Edges>) -> Self {
        self.padding = padding.into();
        self
    }

    pub fn radius(mut self, radius: impl Into<CornerRadius>) -> Self {
        self.radius = radius.into();
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn pivot_offset(mut self, x: f32, y: f32) -> Self {
        self.pivot_offset = Some(Point::new(x, y));
        self
    }

    pub fn cursor(mut self, cursor: CursorIcon) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn scroll_region(mut self) -> Self {
        self.scroll_region = true;
        self
    }

    pub fn quick_lookup(mut self) -> Self {
        self.quick_lookup = true;
        self
    }
}

/// A partial update applied through `Root::set_attributes`.
///
/// Unset fields leave the node untouched. The patch reports which
/// properties it carries so the Root can classify the change through the
/// trait table.
#[derive(Debug, Clone, Default)]
pub struct AttrPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub rotate: Option<f32>,
    pub translate_x: Option<f32>,
    pub translate_y: Option<f32>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub margin: Option<Edges>,
    pub padding: Option<Edges>,
    pub radius: Option<CornerRadius>,
    pub overflow: Option<Overflow>,
    pub display: Option<Display>,
    pub background: Option<Color>,
    pub cursor: Option<CursorIcon>,
    pub key: Option<String>,
}

impl AttrPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// The properties this patch sets.
    pub fn keys(&self) -> Vec<PropKey> {
        let mut keys = Vec::new();
        if self.x.is_some() {
            keys.push(PropKey::X);
        }
        if self.y.is_some() {
            keys.push(PropKey::Y);
        }
        if self.width.is_some() {
            keys.push(PropKey::Width);
        }
        if self.height.is_some() {
            keys.push(PropKey::Height);
        }
        if self.rotate.is_some() {
            keys.push(PropKey::Rotate);
        }
        if self.translate_x.is_some() {
            keys.push(PropKey::TranslateX);
        }
        if self.translate_y.is_some() {
            keys.push(PropKey::TranslateY);
        }
        if self.min_width.is_some() {
            keys.push(PropKey::MinWidth);
        }
        if self.max_width.is_some() {
            keys.push(PropKey::MaxWidth);
        }
        if self.min_height.is_some() {
            keys.push(PropKey::MinHeight);
        }
        if self.max_height.is_some() {
            keys.push(PropKey::MaxHeight);
        }
        if self.margin.is_some() {
            keys.push(PropKey::Margin);
        }
        if self.padding.is_some() {
            keys.push(PropKey::Padding);
        }
        if self.radius.is_some() {
            keys.push(PropKey::Radius);
        }
        if self.overflow.is_some() {
            keys.push(PropKey::Overflow);
        }
        if self.display.is_some() {
            keys.push(PropKey::Display);
        }
        if self.background.is_some() {
            keys.push(PropKey::Background);
        }
        if self.cursor.is_some() {
            keys.push(PropKey::Cursor);
        }
        if self.key.is_some() {
            keys.push(PropKey::Key);
        }
        keys
    }

    /// Numeric target for an animatable property, when one is set. A
    /// width/height target that is not exact pixels (`Auto`, `Fill`) has
    /// no numeric form and applies directly instead of animating.
    pub(crate) fn numeric_target(&self, key: PropKey) -> Option<f32> {
        match key {
            PropKey::X => self.x,
            PropKey::Y => self.y,
            PropKey::Rotate => self.rotate,
            PropKey::TranslateX => self.translate_x,
            PropKey::TranslateY => self.translate_y,
            PropKey::Width => match self.width {
                Some(Dimension::Px(width)) => Some(width),
                _ => None,
            },
            PropKey::Height => match self.height {
                Some(Dimension::Px(height)) => Some(height),
                _ => None,
            },
            _ => None,
        }
    }

    /// Apply every non-animatable field directly. Animatable numerics are
    /// left to the interpolation path.
    pub(crate) fn apply_cosmetic(&self, node: &mut Node) {
        if let Some(min_width) = self.min_width {
            node.min_width = Some(min_width);
        }
        if let Some(max_width) = self.max_width {
            node.max_width = Some(max_width);
        }
        if let Some(min_height) = self.min_height {
            node.min_height = Some(min_height);
        }
        if let Some(max_height) = self.max_height {
            node.max_height = Some(max_height);
        }
        if let Some(margin) = self.margin {
            node.margin = margin;
        }
        if let Some(padding) = self.padding {
            node.padding = padding;
        }
        if let Some(radius) = self.radius {
            node.radius = radius;
        }
        if let Some(overflow) = self.overflow {
            node.overflow = overflow;
        }
        if let Some(display) = self.display {
            node.display = display;
        }
        if let Some(background) = self.background {
            node.background = Some(background);
        }
        if let Some(cursor) = self.cursor {
            node.cursor = Some(cursor);
        }
        if let Some(ref key) = self.key {
            node.key = Some(key.clone());
        }
    }

    // Builder-style setters, mirroring `Node`'s.

    pub fn x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn width(mut self, width: impl Into<Dimension>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<Dimension>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn translate_x(mut self, translate_x: f32) -> Self {
        self.translate_x = Some(translate_x);
        self
    }

    pub fn translate_y(mut self, translate_y: f32) -> Self {
        self.translate_y = Some(translate_y);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn radius(mut self, radius: impl Into<CornerRadius>) -> Self {
        self.radius = Some(radius.into());
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = Some(overflow);
        self
    }

    pub fn cursor(mut self, cursor: CursorIcon) -> Self {
        self.cursor = Some(cursor);
        self
    }
}
