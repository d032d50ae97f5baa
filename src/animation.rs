//! The interpolation-engine boundary.
//!
//! Animated attribute changes hand a snapshot of current numeric values
//! plus the targets to an [`InterpolationEngine`]; each host tick the
//! engine yields interpolated samples which the Root applies by direct
//! assignment, then makes the repaint decision. Easing math lives outside
//! this crate — [`FixedStepEngine`] is the linear reference engine used
//! when none is supplied and by tests.

use std::collections::HashMap;

use crate::node::{PropKey, PropSample};
use crate::tree::NodeId;

/// Engine-side handle to one running interpolation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenHandle(pub u64);

/// One animated property: where it started and where it is going.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub key: PropKey,
    pub from: f32,
    pub to: f32,
}

/// The time-based interpolation engine the scene graph delegates to.
///
/// Pull-based: the host tick loop drives `advance`, which writes the
/// current interpolated value for every track and reports completion.
/// After completion the Root releases the handle; `advance` is never
/// called on a released handle.
pub trait InterpolationEngine {
    /// Register a new sequence for `tracks`.
    fn begin(&mut self, tracks: &[Track]) -> TweenHandle;

    /// Advance one tick. Appends one sample per track to `out`; returns
    /// true when the sequence has reached its targets.
    fn advance(&mut self, handle: TweenHandle, tracks: &[Track], out: &mut Vec<PropSample>)
        -> bool;

    /// Drop a sequence, completed or cancelled mid-flight.
    fn release(&mut self, handle: TweenHandle);
}

/// Linear interpolation over a fixed number of ticks.
///
/// Zero ticks snaps to the target on the first advance.
#[derive(Debug, Default)]
pub struct FixedStepEngine {
    ticks: u32,
    elapsed: HashMap<u64, u32>,
    next_handle: u64,
}

impl FixedStepEngine {
    pub fn new(ticks: u32) -> Self {
        Self {
            ticks,
            elapsed: HashMap::new(),
            next_handle: 0,
        }
    }

    /// An engine that applies targets on the first tick — the disabled-
    /// animation configuration.
    pub fn instant() -> Self {
        Self::new(0)
    }
}

impl InterpolationEngine for FixedStepEngine {
    fn begin(&mut self, _tracks: &[Track]) -> TweenHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.elapsed.insert(handle, 0);
        TweenHandle(handle)
    }

    fn advance(
        &mut self,
        handle: TweenHandle,
        tracks: &[Track],
        out: &mut Vec<PropSample>,
    ) -> bool {
        let elapsed = self.elapsed.entry(handle.0).or_insert(0);
        *elapsed += 1;
        let factor = if self.ticks == 0 {
            1.0
        } else {
            (*elapsed as f32 / self.ticks as f32).min(1.0)
        };
        for track in tracks {
            out.push(PropSample {
                key: track.key,
                value: track.from + (track.to - track.from) * factor,
            });
        }
        *elapsed >= self.ticks
    }

    fn release(&mut self, handle: TweenHandle) {
        self.elapsed.remove(&handle.0);
    }
}

/// A running interpolation owned by the Root.
#[derive(Debug)]
pub(crate) struct Tween {
    pub handle: TweenHandle,
    pub node: NodeId,
    pub tracks: Vec<Track>,
    /// A layout-affecting property is in play: every tick escalates to a
    /// full repaint instead of a dirty-mark.
    pub needs_layout: bool,
}
