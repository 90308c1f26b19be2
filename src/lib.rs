//! Graphmotion lays out and animates graphs for interactive canvases.
//!
//! The pieces fit together like this:
//!
//! - Build a [`Graph`] and share it through a [`SharedGraph`]
//! - Pick a [`PlacementSettings`] strategy, optionally with [`ForceSettings`]
//! - Create a [`GraphEngine`] and call [`GraphEngine::tick`] once per frame
//!
//! Each tick returns a [`FrameOutput`] with interpolated vertex and edge values plus the
//! viewport transform to draw them with. Drawing itself is left to the host.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Animated values, easing and writer arbitration.
pub mod animation;
/// Engine that drives one graph on one canvas.
pub mod engine;
/// Focus transitions and focus paths.
pub mod focus;
/// Force-directed simulation.
pub mod forces;
/// Geometry, errors and shared primitives.
pub mod foundation;
/// Host-driven frame timing.
pub mod frame;
/// Graph model, adjacency views and change notification.
pub mod graph;
/// Initial placement strategies.
pub mod placement;
/// World-to-screen transform, fitting and gestures.
pub mod viewport;

pub use crate::foundation::core::{BoundingRect, Padding, Point, Size, Vec2};
pub use crate::foundation::error::{GraphError, GraphResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{AnimationSettings, BatchAnimationSettings};
pub use crate::engine::{EngineSettings, FrameOutput, GraphEngine};
pub use crate::focus::{FocusPath, FocusSettings, FocusState, FocusWaypoint};
pub use crate::forces::ForceSettings;
pub use crate::frame::{Clock, FrameInfo, ManualClock, SystemClock};
pub use crate::graph::events::{GraphEvent, GraphObserver};
pub use crate::graph::model::{EdgeData, Graph, GraphData, GraphKind, RemovalData, VertexData};
pub use crate::graph::shared::SharedGraph;
pub use crate::placement::{PlacementResult, PlacementSettings, place_vertices};
pub use crate::viewport::{ViewportSettings, ViewportTransform};
