//! paintbox — a retained-mode 2D scene graph.
//!
//! Nodes describe size constraints, margins, padding, transforms,
//! clipping and fills; a layout pass resolves concrete boxes top-down; a
//! render pass paints them through an abstract [`backend::Canvas`]; and an
//! incremental damage engine repaints only the regions a localized
//! mutation actually changed.
//!
//! The crate is single-threaded and cooperative: a host loop drives
//! [`root::Root::pump`] once per tick, which advances attribute
//! interpolations and runs the debounced damage pass.

pub mod animation;
pub mod backend;
pub mod context;
pub mod error;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod node;
pub mod root;
pub mod tree;

mod damage;
mod hit;
mod render;

pub mod prelude {
    pub use crate::animation::{FixedStepEngine, InterpolationEngine, Track, TweenHandle};
    pub use crate::backend::{Canvas, CanvasOp, Color, RecordingCanvas, SharedRecordingCanvas};
    pub use crate::context::LocalContext;
    pub use crate::error::SceneError;
    pub use crate::event::{PointerEvent, PointerKind};
    pub use crate::geometry::{CornerRadius, Point, Rect};
    pub use crate::layout::{Constraint, Size};
    pub use crate::node::{
        AttrPatch, CursorIcon, Dimension, Display, Edges, Node, Overflow, PropKey, PropTraits,
    };
    pub use crate::root::{Root, RootConfig};
    pub use crate::tree::{NodeId, Scene};
}
