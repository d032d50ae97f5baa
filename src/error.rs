use thiserror::Error;

/// Failures surfaced by the scene graph.
///
/// There is no exception-style control flow anywhere else: missing
/// dimensions resolve through constraint defaults, malformed geometry
/// passes through uninterpreted, and key lookup misses yield `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// A layout-dependent operation (repaint, hit-test, bounding box) was
    /// invoked before the first layout pass measured the node.
    #[error("layout has not run: operation invoked before first layout pass")]
    LayoutNotRun,

    /// The node handle is stale — its slot was recycled after removal.
    #[error("node is no longer in the scene (stale handle)")]
    NodeGone,
}

pub type Result<T> = std::result::Result<T, SceneError>;
