use std::collections::BTreeMap;

use crate::animation::tween::{AnimationSettings, Tween};
use crate::foundation::core::Point;
use crate::graph::connections::EdgeOrder;

/// Lifecycle of an entity in the render set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MountPhase {
    /// Entering: `progress` animates `0 -> 1`.
    Mounting,
    /// Fully visible.
    Mounted,
    /// Leaving: `progress` animates toward `0`; purged once that completes.
    Unmounting,
}

/// Animated state of one vertex.
#[derive(Clone, Debug)]
pub struct VertexAnimation {
    position: Tween<Point>,
    scale: Tween<f64>,
    progress: Tween<f64>,
    phase: MountPhase,
}

/// Animated state of one edge.
#[derive(Clone, Debug)]
pub struct EdgeAnimation {
    progress: Tween<f64>,
    order: Tween<f64>,
    count: Tween<f64>,
    phase: MountPhase,
}

/// Interpolated vertex values for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VertexFrame {
    /// Vertex key.
    pub key: String,
    /// Current position.
    pub position: Point,
    /// Focus emphasis: the focus `vertex_scale` while the vertex is focused, `1` otherwise.
    pub scale: f64,
    /// Mount progress (`0` hidden, `1` visible).
    pub progress: f64,
    /// Lifecycle phase.
    pub phase: MountPhase,
}

/// Interpolated edge values for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EdgeFrame {
    /// Edge key.
    pub key: String,
    /// Mount progress.
    pub progress: f64,
    /// Fan-out slot, animated.
    pub order: f64,
    /// Parallel edge count, animated.
    pub count: f64,
    /// Lifecycle phase.
    pub phase: MountPhase,
}

/// What completed during one [`AnimationOrchestrator::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Vertices whose position animation just reached its target.
    pub settled_positions: Vec<String>,
    /// Vertices that finished mounting.
    pub mounted_vertices: Vec<String>,
    /// Edges that finished mounting.
    pub mounted_edges: Vec<String>,
    /// Vertices removed from the render set after their exit animation.
    pub purged_vertices: Vec<String>,
    /// Edges removed from the render set after their exit animation.
    pub purged_edges: Vec<String>,
}

/// Owns every animated value of the render set and advances them against a clock.
#[derive(Clone, Debug, Default)]
pub struct AnimationOrchestrator {
    vertices: BTreeMap<String, VertexAnimation>,
    edges: BTreeMap<String, EdgeAnimation>,
    now_ms: f64,
}

impl AnimationOrchestrator {
    /// Empty render set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the latest call that advanced the clock.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn observe(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    /// Add a vertex at `position` and fade it in; revives a vertex that is still leaving.
    pub fn mount_vertex(
        &mut self,
        key: &str,
        position: Point,
        now_ms: f64,
        settings: &AnimationSettings,
    ) {
        self.observe(now_ms);
        if let Some(existing) = self.vertices.get_mut(key) {
            existing.progress.retarget(now_ms, 1.0, settings);
            existing.position.retarget(now_ms, position, &settings.timing());
            existing.phase = MountPhase::Mounting;
            return;
        }
        self.vertices.insert(
            key.to_owned(),
            VertexAnimation {
                position: Tween::settled(position),
                scale: Tween::settled(1.0),
                progress: Tween::new(0.0, 1.0, now_ms, settings),
                phase: MountPhase::Mounting,
            },
        );
    }

    /// Start the exit animation; the vertex stays in the render set until it completes.
    pub fn unmount_vertex(&mut self, key: &str, now_ms: f64, settings: &AnimationSettings) -> bool {
        self.observe(now_ms);
        let Some(v) = self.vertices.get_mut(key) else {
            return false;
        };
        if v.phase == MountPhase::Unmounting {
            return false;
        }
        v.progress.retarget(now_ms, 0.0, settings);
        v.phase = MountPhase::Unmounting;
        true
    }

    /// Add an edge and fade it in.
    pub fn mount_edge(
        &mut self,
        key: &str,
        order: EdgeOrder,
        now_ms: f64,
        settings: &AnimationSettings,
    ) {
        self.observe(now_ms);
        if let Some(existing) = self.edges.get_mut(key) {
            existing.progress.retarget(now_ms, 1.0, settings);
            let timing = settings.timing();
            existing.order.retarget(now_ms, order.order as f64, &timing);
            existing.count.retarget(now_ms, order.count as f64, &timing);
            existing.phase = MountPhase::Mounting;
            return;
        }
        self.edges.insert(
            key.to_owned(),
            EdgeAnimation {
                progress: Tween::new(0.0, 1.0, now_ms, settings),
                order: Tween::settled(order.order as f64),
                count: Tween::settled(order.count as f64),
                phase: MountPhase::Mounting,
            },
        );
    }

    /// Start an edge's exit animation.
    pub fn unmount_edge(&mut self, key: &str, now_ms: f64, settings: &AnimationSettings) -> bool {
        self.observe(now_ms);
        let Some(e) = self.edges.get_mut(key) else {
            return false;
        };
        if e.phase == MountPhase::Unmounting {
            return false;
        }
        e.progress.retarget(now_ms, 0.0, settings);
        e.phase = MountPhase::Unmounting;
        true
    }

    /// Animate a vertex toward `target`.
    pub fn animate_position(
        &mut self,
        key: &str,
        target: Point,
        now_ms: f64,
        settings: &AnimationSettings,
    ) -> bool {
        self.observe(now_ms);
        match self.vertices.get_mut(key) {
            Some(v) => {
                v.position.retarget(now_ms, target, settings);
                true
            }
            None => false,
        }
    }

    /// Move a vertex immediately, cancelling any position animation.
    pub fn set_position(&mut self, key: &str, position: Point) -> bool {
        match self.vertices.get_mut(key) {
            Some(v) => {
                v.position.jump(position);
                true
            }
            None => false,
        }
    }

    /// Animate a vertex scale multiplier.
    pub fn animate_scale(
        &mut self,
        key: &str,
        scale: f64,
        now_ms: f64,
        settings: &AnimationSettings,
    ) -> bool {
        self.observe(now_ms);
        match self.vertices.get_mut(key) {
            Some(v) => {
                v.scale.retarget(now_ms, scale, settings);
                true
            }
            None => false,
        }
    }

    /// Set a vertex scale immediately.
    pub fn set_scale(&mut self, key: &str, scale: f64) -> bool {
        match self.vertices.get_mut(key) {
            Some(v) => {
                v.scale.jump(scale);
                true
            }
            None => false,
        }
    }

    /// Scale the vertex is animating toward.
    pub fn target_scale(&self, key: &str) -> Option<f64> {
        self.vertices.get(key).map(|v| *v.scale.target())
    }

    /// Animate an edge toward a new fan-out slot.
    pub fn animate_edge_order(
        &mut self,
        key: &str,
        order: EdgeOrder,
        now_ms: f64,
        settings: &AnimationSettings,
    ) -> bool {
        self.observe(now_ms);
        let Some(e) = self.edges.get_mut(key) else {
            return false;
        };
        let (o, c) = (order.order as f64, order.count as f64);
        if *e.order.target() != o {
            e.order.retarget(now_ms, o, settings);
        }
        if *e.count.target() != c {
            e.count.retarget(now_ms, c, &settings.timing());
        }
        true
    }

    /// Position at the latest observed time.
    pub fn position(&self, key: &str) -> Option<Point> {
        self.vertices.get(key).map(|v| v.position.value(self.now_ms))
    }

    /// Position the vertex is animating toward.
    pub fn target_position(&self, key: &str) -> Option<Point> {
        self.vertices.get(key).map(|v| *v.position.target())
    }

    /// Lifecycle phase of a vertex in the render set.
    pub fn vertex_phase(&self, key: &str) -> Option<MountPhase> {
        self.vertices.get(key).map(|v| v.phase)
    }

    /// Lifecycle phase of an edge in the render set.
    pub fn edge_phase(&self, key: &str) -> Option<MountPhase> {
        self.edges.get(key).map(|e| e.phase)
    }

    /// Return `true` when `key` is in the render set (including while leaving).
    pub fn contains_vertex(&self, key: &str) -> bool {
        self.vertices.contains_key(key)
    }

    /// Return `true` when the edge is in the render set.
    pub fn contains_edge(&self, key: &str) -> bool {
        self.edges.contains_key(key)
    }

    /// Return `true` while the vertex's position animation runs.
    pub fn position_in_flight(&self, key: &str) -> bool {
        self.vertices
            .get(key)
            .is_some_and(|v| v.position.in_flight(self.now_ms))
    }

    /// Keys of vertices that are not leaving.
    pub fn live_vertices(&self) -> impl Iterator<Item = &str> {
        self.vertices
            .iter()
            .filter(|(_, v)| v.phase != MountPhase::Unmounting)
            .map(|(k, _)| k.as_str())
    }

    /// Keys of edges that are not leaving.
    pub fn live_edges(&self) -> impl Iterator<Item = &str> {
        self.edges
            .iter()
            .filter(|(_, e)| e.phase != MountPhase::Unmounting)
            .map(|(k, _)| k.as_str())
    }

    /// Number of vertices in the render set.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges in the render set.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Advance to `now_ms`: fire completion hooks, settle phases and purge finished exits.
    ///
    /// An entity is purged only after its exit hook has run within this same call.
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        self.observe(now_ms);
        let now = self.now_ms;
        let mut report = TickReport::default();

        for (key, v) in &mut self.vertices {
            if v.position.poll(now) {
                report.settled_positions.push(key.clone());
            }
            v.scale.poll(now);
            if v.progress.poll(now) {
                match v.phase {
                    MountPhase::Mounting => {
                        v.phase = MountPhase::Mounted;
                        report.mounted_vertices.push(key.clone());
                    }
                    MountPhase::Unmounting => report.purged_vertices.push(key.clone()),
                    MountPhase::Mounted => {}
                }
            }
        }
        for (key, e) in &mut self.edges {
            e.order.poll(now);
            e.count.poll(now);
            if e.progress.poll(now) {
                match e.phase {
                    MountPhase::Mounting => {
                        e.phase = MountPhase::Mounted;
                        report.mounted_edges.push(key.clone());
                    }
                    MountPhase::Unmounting => report.purged_edges.push(key.clone()),
                    MountPhase::Mounted => {}
                }
            }
        }

        for key in &report.purged_vertices {
            self.vertices.remove(key);
        }
        for key in &report.purged_edges {
            self.edges.remove(key);
        }
        if !report.purged_vertices.is_empty() || !report.purged_edges.is_empty() {
            tracing::debug!(
                vertices = report.purged_vertices.len(),
                edges = report.purged_edges.len(),
                "purged exited entities"
            );
        }
        report
    }

    /// Interpolated vertex values at the latest observed time.
    pub fn vertex_frames(&self) -> Vec<VertexFrame> {
        let now = self.now_ms;
        self.vertices
            .iter()
            .map(|(key, v)| VertexFrame {
                key: key.clone(),
                position: v.position.value(now),
                scale: v.scale.value(now),
                progress: v.progress.value(now),
                phase: v.phase,
            })
            .collect()
    }

    /// Interpolated edge values at the latest observed time.
    pub fn edge_frames(&self) -> Vec<EdgeFrame> {
        let now = self.now_ms;
        self.edges
            .iter()
            .map(|(key, e)| EdgeFrame {
                key: key.clone(),
                progress: e.progress.value(now),
                order: e.order.value(now),
                count: e.count.value(now),
                phase: e.phase,
            })
            .collect()
    }

    /// Drop all animation state.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/orchestrator.rs"]
mod tests;
