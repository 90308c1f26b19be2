//! The engine ties the graph, placement, forces, animation, focus and viewport together.
//!
//! Graph mutations never touch engine state directly: the engine observes the graph through an
//! inbox and applies whatever arrived at the start of the next [`GraphEngine::tick`], so every
//! frame works on one consistent snapshot.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::animation::arbiter::{PositionWriter, WriterTable};
use crate::animation::orchestrator::{
    AnimationOrchestrator, EdgeFrame, MountPhase, TickReport, VertexFrame,
};
use crate::animation::tween::{AnimationSettings, Tween};
use crate::focus::{Alignment, FocusPath, FocusResolver, FocusSettings, FocusState, focus_transform};
use crate::forces::{ForceSettings, ForceSimulation, SimulationState, place_new_vertices};
use crate::foundation::core::{BoundingRect, Point, Size, Vec2};
use crate::foundation::error::{GraphError, GraphResult};
use crate::frame::FrameInfo;
use crate::graph::connections::Connections;
use crate::graph::events::{GraphEvent, GraphObserver, ObserverId};
use crate::graph::shared::SharedGraph;
use crate::placement::{PlacementResult, PlacementSettings, place_vertices};
use crate::viewport::{AutoSizer, ViewportSettings, ViewportTransform};

/// Everything the engine can be configured with.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Radius of every vertex circle, in world units.
    pub vertex_radius: f64,
    /// Initial placement strategy.
    pub placement: PlacementSettings,
    /// Force simulation; `None` keeps the static placement.
    pub forces: Option<ForceSettings>,
    /// Default animation for mounts, layout changes and refits.
    pub animation: AnimationSettings,
    /// Viewport fitting and gestures.
    pub viewport: ViewportSettings,
    /// Default framing of a focused vertex.
    pub focus: FocusSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            vertex_radius: 20.0,
            placement: PlacementSettings::default(),
            forces: None,
            animation: AnimationSettings::default(),
            viewport: ViewportSettings::default(),
            focus: FocusSettings::default(),
        }
    }
}

impl EngineSettings {
    /// Parse and validate.
    pub fn from_json(s: &str) -> GraphResult<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every section.
    pub fn validate(&self) -> GraphResult<()> {
        if !self.vertex_radius.is_finite() || self.vertex_radius < 0.0 {
            return Err(GraphError::configuration(
                "vertex_radius must be finite and >= 0",
            ));
        }
        self.placement.validate()?;
        if let Some(forces) = &self.forces {
            forces.validate()?;
        }
        self.animation.validate()?;
        self.viewport.validate()?;
        self.focus.validate()
    }
}

/// What a host needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameOutput {
    /// Frame index and timing.
    pub frame: FrameInfo,
    /// Every vertex in the render set, leaving ones included.
    pub vertices: Vec<VertexFrame>,
    /// Every edge in the render set, leaving ones included.
    pub edges: Vec<EdgeFrame>,
    /// Effective world-to-screen transform, focus included.
    pub transform: ViewportTransform,
    /// Bounds of the live vertices, expanded by the vertex radius.
    pub bounding_rect: BoundingRect,
    /// Focus lifecycle state.
    pub focus_state: FocusState,
    /// Vertex focused through the graph, if any.
    pub focused_key: Option<String>,
    /// Whether the force simulation ran this frame.
    pub simulation_active: bool,
    /// Animations that completed during this frame.
    #[serde(skip)]
    pub completed: TickReport,
}

#[derive(Debug, Default)]
struct Inbox {
    events: Vec<GraphEvent>,
}

impl GraphObserver for Inbox {
    fn on_graph_event(&mut self, event: &GraphEvent) {
        self.events.push(event.clone());
    }
}

#[derive(Clone, Debug)]
enum FocusTarget {
    Vertex { key: String, settings: FocusSettings },
    Path { path: FocusPath, progress: f64 },
}

impl FocusTarget {
    fn keys(&self) -> Vec<String> {
        match self {
            Self::Vertex { key, .. } => vec![key.clone()],
            Self::Path { path, .. } => path.keys().map(str::to_owned).collect(),
        }
    }

    fn animation(&self, defaults: &FocusSettings) -> AnimationSettings {
        match self {
            Self::Vertex { settings, .. } => settings.animation.clone(),
            Self::Path { .. } => defaults.animation.clone(),
        }
    }
}

/// Animation hints gathered from one tick's events.
///
/// Structure itself is always read from the graph; keys missing here use the default animation.
#[derive(Debug, Default)]
struct Changes {
    inserted_vertices: Vec<(String, AnimationSettings)>,
    removed_vertices: BTreeMap<String, AnimationSettings>,
    inserted_edges: BTreeMap<String, AnimationSettings>,
    removed_edges: BTreeMap<String, AnimationSettings>,
}

impl Changes {
    fn is_empty(&self) -> bool {
        self.inserted_vertices.is_empty()
            && self.removed_vertices.is_empty()
            && self.inserted_edges.is_empty()
            && self.removed_edges.is_empty()
    }
}

/// Layout-and-animation engine for one graph on one canvas.
#[derive(Debug)]
pub struct GraphEngine {
    graph: SharedGraph,
    settings: EngineSettings,
    canvas: Size,
    inbox: Rc<RefCell<Inbox>>,
    subscription: Option<ObserverId>,
    connections: Connections,
    placement: PlacementResult,
    orchestrator: AnimationOrchestrator,
    writers: WriterTable,
    simulation: Option<ForceSimulation>,
    settling: BTreeSet<String>,
    viewport: Tween<ViewportTransform>,
    restore: ViewportTransform,
    auto_sizer: AutoSizer,
    focus: FocusResolver,
    focus_target: Option<FocusTarget>,
    focus_overrides: BTreeMap<String, FocusSettings>,
    frame: Option<FrameInfo>,
    torn_down: bool,
}

impl GraphEngine {
    /// Validate `settings`, place the current graph, mount it and start observing changes.
    #[tracing::instrument(skip(graph, settings), fields(width = canvas.width, height = canvas.height))]
    pub fn new(
        graph: SharedGraph,
        settings: EngineSettings,
        canvas: Size,
        now_ms: f64,
    ) -> GraphResult<Self> {
        settings.validate()?;
        check_canvas(canvas)?;
        let simulation = settings
            .forces
            .clone()
            .map(ForceSimulation::new)
            .transpose()?;

        let (connections, ordered_edges) =
            graph.read(|g| (g.connections().clone(), g.ordered_edges().clone()))?;
        let placement = place_vertices(&connections, settings.vertex_radius, &settings.placement)?;

        let inbox = Rc::new(RefCell::new(Inbox::default()));
        let subscription = graph.subscribe(&inbox)?;

        let mount = settings.animation.timing();
        let mut orchestrator = AnimationOrchestrator::new();
        let mut settling = BTreeSet::new();
        for (key, position) in &placement.vertices_positions {
            orchestrator.mount_vertex(key, *position, now_ms, &mount);
            settling.insert(key.clone());
        }
        for (key, order) in ordered_edges.iter() {
            orchestrator.mount_edge(key, order, now_ms, &mount);
        }

        let fitted = ViewportTransform::fit(placement.bounding_rect, canvas, &settings.viewport);
        let mut auto_sizer = AutoSizer::new(settings.viewport.auto_sizing_timeout_ms);
        auto_sizer.mark_fitted(placement.bounding_rect);
        tracing::debug!(
            vertices = orchestrator.vertex_count(),
            edges = orchestrator.edge_count(),
            forces = simulation.is_some(),
            "engine mounted"
        );

        Ok(Self {
            graph,
            settings,
            canvas,
            inbox,
            subscription: Some(subscription),
            connections,
            placement,
            orchestrator,
            writers: WriterTable::new(),
            simulation,
            settling,
            viewport: Tween::settled(fitted),
            restore: fitted,
            auto_sizer,
            focus: FocusResolver::new(),
            focus_target: None,
            focus_overrides: BTreeMap::new(),
            frame: None,
            torn_down: false,
        })
    }

    /// Advance one frame.
    ///
    /// Applies buffered graph changes, advances animations, runs the force simulation, resolves
    /// focus and auto-sizing. After [`teardown`](Self::teardown) this returns an empty frame.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, now_ms: f64) -> GraphResult<FrameOutput> {
        let frame = match self.frame {
            Some(previous) => previous.next(now_ms),
            None => FrameInfo::first(now_ms),
        };
        self.frame = Some(frame);
        if self.torn_down {
            return Ok(FrameOutput {
                frame,
                ..FrameOutput::default()
            });
        }
        let now = frame.now_ms;

        let events = std::mem::take(&mut self.inbox.borrow_mut().events);
        if !events.is_empty() {
            self.apply_events(events, now)?;
        }

        let completed = self.orchestrator.tick(now);
        self.settle(&completed);

        let mut simulation_active = false;
        if let Some(sim) = &mut self.simulation {
            if !sim.is_active() && self.settling.is_empty() {
                sim.activate();
            }
            sim.tick(&self.connections, &mut self.orchestrator, &self.writers);
            simulation_active = sim.is_active();
        }

        let bounding_rect = self.bounding_rect();
        if self.focus.holds_focus() {
            self.follow_path_scales(now);
            if let Some(goal) = self.focus_goal() {
                self.focus.follow(goal, now);
            }
        }
        let focus_override = self.focus.tick(now);

        if self
            .auto_sizer
            .should_refit(bounding_rect, now, self.focus.is_active())
        {
            let fitted = ViewportTransform::fit(bounding_rect, self.canvas, &self.settings.viewport);
            self.viewport
                .retarget(now, fitted, &self.settings.animation.timing());
        }
        let base = self.viewport.value(now);
        self.viewport.poll(now);

        Ok(FrameOutput {
            frame,
            vertices: self.orchestrator.vertex_frames(),
            edges: self.orchestrator.edge_frames(),
            transform: focus_override.unwrap_or(base),
            bounding_rect,
            focus_state: self.focus.state(),
            focused_key: self.focused_key().map(str::to_owned),
            simulation_active,
            completed,
        })
    }

    /// Halt every per-frame activity and drop animation state.
    ///
    /// Idempotent; also runs on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(id) = self.subscription.take()
            && let Err(err) = self.graph.unsubscribe(id)
        {
            tracing::warn!(%err, "could not unsubscribe; the observer is dropped instead");
        }
        self.inbox = Rc::default();
        if let Some(sim) = &mut self.simulation {
            sim.teardown();
        }
        self.orchestrator.clear();
        self.writers.clear();
        self.settling.clear();
        self.focus.clear();
        self.focus_target = None;
        self.torn_down = true;
        tracing::debug!("engine torn down");
    }

    /// Return `true` after [`teardown`](Self::teardown).
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Settings in effect.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Latest static placement.
    pub fn placement(&self) -> &PlacementResult {
        &self.placement
    }

    /// Current animated position of a vertex in the render set.
    pub fn vertex_position(&self, key: &str) -> Option<Point> {
        self.orchestrator.position(key)
    }

    /// Position a vertex is animating toward.
    pub fn target_position(&self, key: &str) -> Option<Point> {
        self.orchestrator.target_position(key)
    }

    /// Return `true` while `key` is in the render set, leaving included.
    pub fn is_rendered(&self, key: &str) -> bool {
        self.orchestrator.contains_vertex(key)
    }

    /// Bounds of the live vertices, expanded by the vertex radius.
    pub fn bounding_rect(&self) -> BoundingRect {
        let points = self
            .orchestrator
            .live_vertices()
            .filter_map(|k| self.orchestrator.position(k))
            .collect::<Vec<_>>();
        BoundingRect::around(points.iter(), self.settings.vertex_radius)
    }

    /// Effective transform at `now_ms`, focus included.
    pub fn transform(&self, now_ms: f64) -> ViewportTransform {
        self.focus
            .current(now_ms)
            .unwrap_or_else(|| self.viewport.value(now_ms))
    }

    /// Simulation state, `None` when forces are disabled.
    pub fn simulation_state(&self) -> Option<SimulationState> {
        self.simulation.as_ref().map(ForceSimulation::state)
    }

    /// Focus lifecycle state.
    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    /// Vertex focused through the graph.
    pub fn focused_key(&self) -> Option<&str> {
        match &self.focus_target {
            Some(FocusTarget::Vertex { key, .. }) => Some(key),
            _ => None,
        }
    }

    /// Current writer of a vertex position.
    pub fn position_writer(&self, key: &str) -> Option<PositionWriter> {
        self.writers.owner(key)
    }

    /// Focus `key` with the default framing; applied on the next tick.
    pub fn focus(&mut self, key: &str) -> GraphResult<()> {
        self.graph.focus(key)
    }

    /// Focus `key` with custom framing; applied on the next tick.
    pub fn focus_with(&mut self, key: &str, settings: FocusSettings) -> GraphResult<()> {
        settings.validate()?;
        let already_focused = self.graph.read(|g| g.focused() == Some(key))?;
        self.graph.focus(key)?;
        match &mut self.focus_target {
            Some(FocusTarget::Vertex {
                key: current,
                settings: active,
            }) if already_focused && current.as_str() == key => *active = settings,
            _ => {
                self.focus_overrides.insert(key.to_owned(), settings);
            }
        }
        Ok(())
    }

    /// Clear graph focus; applied on the next tick.
    pub fn blur(&mut self) -> GraphResult<()> {
        self.graph.blur()
    }

    /// Follow a multi-step focus path driven by [`set_focus_progress`](Self::set_focus_progress).
    ///
    /// Replaces any current focus. Every waypoint vertex must exist.
    pub fn set_focus_path(&mut self, path: FocusPath, progress: f64, now_ms: f64) -> GraphResult<()> {
        if let Some(missing) = path.keys().find(|k| !self.graph.has_vertex(k)) {
            return Err(GraphError::not_found(format!("focus path vertex '{missing}'")));
        }
        self.start_focus(FocusTarget::Path { path, progress }, now_ms);
        Ok(())
    }

    /// Move along the active focus path; returns `false` when no path is active.
    pub fn set_focus_progress(&mut self, progress: f64) -> bool {
        match &mut self.focus_target {
            Some(FocusTarget::Path { progress: p, .. }) => {
                *p = progress;
                true
            }
            _ => false,
        }
    }

    /// Leave the active focus path, if any.
    pub fn clear_focus_path(&mut self, now_ms: f64) {
        if matches!(self.focus_target, Some(FocusTarget::Path { .. })) {
            self.end_focus(now_ms);
        }
    }

    /// Pan by a screen-space delta. Ends any focus.
    pub fn pan(&mut self, delta: Vec2, now_ms: f64) {
        let next = self.take_over_viewport(now_ms).pan(delta);
        self.viewport.jump(next);
    }

    /// Pinch-zoom around `focal`. Ends any focus.
    pub fn pinch(&mut self, factor: f64, focal: Point, now_ms: f64) {
        let next = self
            .take_over_viewport(now_ms)
            .pinch(factor, focal, &self.settings.viewport);
        self.viewport.jump(next);
    }

    /// Step to the next configured scale around `focal`. Ends any focus.
    pub fn double_tap(&mut self, focal: Point, now_ms: f64) {
        let next = self
            .take_over_viewport(now_ms)
            .double_tap(focal, &self.settings.viewport);
        self.viewport.jump(next);
    }

    /// Move a vertex with the pointer; returns `false` when a focus holds it.
    pub fn drag_vertex(&mut self, key: &str, world: Point) -> GraphResult<bool> {
        if !self.orchestrator.contains_vertex(key) {
            return Err(GraphError::not_found(format!("vertex '{key}'")));
        }
        if !self.writers.claim(key, PositionWriter::Gesture) {
            return Ok(false);
        }
        self.orchestrator.set_position(key, world);
        Ok(true)
    }

    /// End a drag started with [`drag_vertex`](Self::drag_vertex).
    pub fn release_vertex(&mut self, key: &str) -> bool {
        self.writers.release(key, PositionWriter::Gesture)
    }

    /// Change the canvas size; the next tick refits when auto-sizing is on.
    pub fn resize(&mut self, canvas: Size) -> GraphResult<()> {
        check_canvas(canvas)?;
        self.canvas = canvas;
        self.auto_sizer.invalidate();
        Ok(())
    }

    /// Switch placement strategy and animate every vertex to the new layout.
    #[tracing::instrument(skip(self, placement))]
    pub fn set_placement(&mut self, placement: PlacementSettings, now_ms: f64) -> GraphResult<()> {
        placement.validate()?;
        let result = place_vertices(&self.connections, self.settings.vertex_radius, &placement)?;
        self.settings.placement = placement;
        let moving = self.settings.animation.timing();
        for (key, target) in &result.vertices_positions {
            self.move_to_layout(key, *target, now_ms, &moving);
        }
        self.placement = result;
        Ok(())
    }

    fn apply_events(&mut self, events: Vec<GraphEvent>, now: f64) -> GraphResult<()> {
        let fallback = self.settings.animation.timing();
        let mut changes = Changes::default();
        let mut focus_change = None;
        for event in events {
            match event {
                GraphEvent::VertexInserted { key, animation } => {
                    let s = animation.resolve(&key, &fallback);
                    changes.inserted_vertices.push((key, s));
                }
                GraphEvent::VertexRemoved {
                    key,
                    removed_edges,
                    animation,
                } => {
                    for edge in removed_edges {
                        let s = animation.resolve(&edge, &fallback);
                        changes.removed_edges.insert(edge, s);
                    }
                    let s = animation.resolve(&key, &fallback);
                    changes.removed_vertices.insert(key, s);
                }
                GraphEvent::EdgeInserted { key, animation } => {
                    let s = animation.resolve(&key, &fallback);
                    changes.inserted_edges.insert(key, s);
                }
                GraphEvent::EdgeRemoved { key, animation } => {
                    let s = animation.resolve(&key, &fallback);
                    changes.removed_edges.insert(key, s);
                }
                GraphEvent::BatchApplied(batch) => {
                    let a = &batch.animation;
                    for key in batch.removed_edges {
                        let s = a.resolve(&key, &fallback);
                        changes.removed_edges.insert(key, s);
                    }
                    for key in batch.removed_vertices {
                        let s = a.resolve(&key, &fallback);
                        changes.removed_vertices.insert(key, s);
                    }
                    for key in batch.inserted_vertices {
                        let s = a.resolve(&key, &fallback);
                        changes.inserted_vertices.push((key, s));
                    }
                    for key in batch.inserted_edges {
                        let s = a.resolve(&key, &fallback);
                        changes.inserted_edges.insert(key, s);
                    }
                }
                GraphEvent::FocusChanged { key } => focus_change = Some(key),
            }
        }
        let applied = if changes.is_empty() {
            Ok(())
        } else {
            self.apply_structure(changes, now)
        };
        if let Some(key) = focus_change {
            self.apply_focus_change(key, now);
        }
        applied
    }

    /// Bring the render set in line with the graph snapshot.
    ///
    /// Entities are diffed against the graph rather than taken from the events alone, so a tick
    /// that failed halfway is caught up by the next structural change.
    fn apply_structure(&mut self, changes: Changes, now: f64) -> GraphResult<()> {
        let (connections, ordered_edges) = self
            .graph
            .read(|g| (g.connections().clone(), g.ordered_edges().clone()))?;
        self.connections = connections;
        let fallback = self.settings.animation.timing();

        let stale_edges = self
            .orchestrator
            .live_edges()
            .filter(|k| ordered_edges.get(k).is_none())
            .map(str::to_owned)
            .collect::<Vec<_>>();
        for key in stale_edges {
            let s = changes.removed_edges.get(&key).unwrap_or(&fallback);
            self.orchestrator.unmount_edge(&key, now, s);
        }
        let stale_vertices = self
            .orchestrator
            .live_vertices()
            .filter(|k| !self.connections.contains(k))
            .map(str::to_owned)
            .collect::<Vec<_>>();
        for key in stale_vertices {
            let s = changes.removed_vertices.get(&key).unwrap_or(&fallback);
            self.orchestrator.unmount_vertex(&key, now, s);
            self.settling.remove(&key);
        }

        let mut inserted = changes
            .inserted_vertices
            .into_iter()
            .filter(|(k, _)| self.connections.contains(k))
            .collect::<Vec<_>>();
        let listed = inserted
            .iter()
            .map(|(k, _)| k.clone())
            .collect::<BTreeSet<_>>();
        let missing = self
            .connections
            .keys()
            .filter(|k| !listed.contains(*k) && !self.is_live(k))
            .map(|k| (k.to_owned(), fallback.clone()))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            tracing::debug!(count = missing.len(), "mounting vertices absent from the render set");
            inserted.extend(missing);
        }
        let fresh = inserted
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<BTreeSet<_>>();

        let forces = self.simulation.as_ref().map(|sim| sim.settings().clone());
        if let Some(forces) = forces {
            let placed = self
                .orchestrator
                .live_vertices()
                .filter(|k| self.connections.contains(k) && !fresh.contains(k))
                .filter_map(|k| self.orchestrator.position(k).map(|p| (k.to_owned(), p)))
                .collect::<BTreeMap<_, _>>();
            let unseen = inserted
                .iter()
                .filter(|(k, _)| !self.orchestrator.contains_vertex(k))
                .map(|(k, _)| k.clone())
                .collect::<Vec<_>>();
            let seeded = place_new_vertices(
                &self.connections,
                &placed,
                &unseen,
                self.settings.vertex_radius,
                &forces,
            );
            for (key, s) in &inserted {
                let at = seeded
                    .get(key)
                    .copied()
                    .or_else(|| self.orchestrator.position(key))
                    .unwrap_or(Point::ZERO);
                self.orchestrator.mount_vertex(key, at, now, s);
            }
        } else {
            let placement = place_vertices(
                &self.connections,
                self.settings.vertex_radius,
                &self.settings.placement,
            )?;
            for (key, s) in &inserted {
                if let Some(at) = placement.position(key) {
                    self.orchestrator.mount_vertex(key, at, now, s);
                }
            }
            for (key, target) in &placement.vertices_positions {
                if !fresh.contains(key.as_str()) {
                    self.move_to_layout(key, *target, now, &fallback);
                }
            }
            self.placement = placement;
        }

        for (key, order) in ordered_edges.iter() {
            let leaving = self
                .orchestrator
                .edge_phase(key)
                .is_none_or(|p| p == MountPhase::Unmounting);
            match changes.inserted_edges.get(key) {
                Some(s) => self.orchestrator.mount_edge(key, order, now, s),
                None if leaving => self.orchestrator.mount_edge(key, order, now, &fallback),
                None => {
                    self.orchestrator
                        .animate_edge_order(key, order, now, &fallback);
                }
            }
        }
        tracing::debug!(
            vertices = self.connections.len(),
            rendered = self.orchestrator.vertex_count(),
            "graph changes applied"
        );
        Ok(())
    }

    fn is_live(&self, key: &str) -> bool {
        self.orchestrator
            .vertex_phase(key)
            .is_some_and(|p| p != MountPhase::Unmounting)
    }

    fn settle(&mut self, report: &TickReport) {
        for key in &report.settled_positions {
            self.writers.release(key, PositionWriter::Placement);
        }
        for key in report.mounted_vertices.iter().chain(&report.purged_vertices) {
            self.settling.remove(key);
        }
        for key in &report.purged_vertices {
            self.writers.forget(key);
        }
    }

    fn move_to_layout(&mut self, key: &str, target: Point, now: f64, settings: &AnimationSettings) {
        if self.orchestrator.target_position(key) == Some(target) {
            return;
        }
        if self.writers.claim(key, PositionWriter::Placement) {
            self.orchestrator
                .animate_position(key, target, now, settings);
        }
    }

    fn apply_focus_change(&mut self, key: Option<String>, now: f64) {
        match key {
            Some(key) => {
                let settings = self
                    .focus_overrides
                    .remove(&key)
                    .unwrap_or_else(|| self.settings.focus.clone());
                self.start_focus(FocusTarget::Vertex { key, settings }, now);
            }
            None => {
                if matches!(self.focus_target, Some(FocusTarget::Vertex { .. })) {
                    self.end_focus(now);
                }
            }
        }
    }

    fn start_focus(&mut self, target: FocusTarget, now: f64) {
        let current = self.transform(now);
        if !self.focus.holds_focus() {
            self.restore = self.viewport.value(now);
        }
        self.release_focus_claims(now);
        for key in target.keys() {
            self.writers.claim(&key, PositionWriter::Focus);
        }
        let animation = target.animation(&self.settings.focus);
        match &target {
            FocusTarget::Vertex { key, settings } => {
                self.orchestrator
                    .animate_scale(key, settings.vertex_scale, now, &animation);
            }
            FocusTarget::Path { path, progress } => {
                for (key, scale) in path.vertex_scales(*progress) {
                    self.orchestrator.animate_scale(key, scale, now, &animation);
                }
            }
        }
        self.focus_target = Some(target);
        let goal = self.focus_goal().unwrap_or(current);
        self.focus.focus(current, goal, now, &animation);
    }

    fn end_focus(&mut self, now: f64) {
        let current = self.transform(now);
        self.release_focus_claims(now);
        let animation = match self.focus_target.take() {
            Some(target) => target.animation(&self.settings.focus),
            None => self.settings.focus.animation.clone(),
        };
        let restore = if self.auto_sizer.enabled() {
            let rect = self.bounding_rect();
            self.auto_sizer.mark_fitted(rect);
            ViewportTransform::fit(rect, self.canvas, &self.settings.viewport)
        } else {
            self.restore
        };
        self.viewport.jump(restore);
        self.focus.blur(current, restore, now, &animation);
    }

    /// Hand focused vertices back to the layout and return their scale to `1`.
    fn release_focus_claims(&mut self, now: f64) {
        let (keys, animation) = match &self.focus_target {
            Some(target) => (target.keys(), target.animation(&self.settings.focus)),
            None => return,
        };
        let moving = self.settings.animation.timing();
        for key in keys {
            self.orchestrator.animate_scale(&key, 1.0, now, &animation);
            if self.writers.release(&key, PositionWriter::Focus)
                && self.simulation.is_none()
                && let Some(target) = self.placement.position(&key)
            {
                self.move_to_layout(&key, target, now, &moving);
            }
        }
    }

    /// Scrubbing a path moves vertex emphasis directly once the focus has arrived.
    fn follow_path_scales(&mut self, now: f64) {
        let Some(FocusTarget::Path { path, progress }) = &self.focus_target else {
            return;
        };
        let scales = path
            .vertex_scales(*progress)
            .into_iter()
            .map(|(k, s)| (k.to_owned(), s))
            .collect::<Vec<_>>();
        let arrived = self.focus.state() == FocusState::Focused;
        for (key, scale) in scales {
            if self.orchestrator.target_scale(&key) == Some(scale) {
                continue;
            }
            if arrived {
                self.orchestrator.set_scale(&key, scale);
            } else {
                self.orchestrator
                    .animate_scale(&key, scale, now, &self.settings.focus.animation);
            }
        }
    }

    fn focus_goal(&self) -> Option<ViewportTransform> {
        let frame = |key: &str, alignment: &Alignment, vertex_scale: f64| {
            self.orchestrator.position(key).map(|p| {
                focus_transform(
                    p,
                    self.settings.vertex_radius,
                    vertex_scale,
                    alignment,
                    self.canvas,
                    self.settings.viewport.padding,
                )
            })
        };
        match self.focus_target.as_ref()? {
            FocusTarget::Vertex { key, settings } => {
                frame(key, &settings.alignment, settings.vertex_scale)
            }
            FocusTarget::Path { path, progress } => {
                path.resolve(*progress, |w| frame(&w.key, &w.alignment, w.vertex_scale))
            }
        }
    }

    /// Gestures take the viewport from wherever it is on screen and end any focus.
    fn take_over_viewport(&mut self, now: f64) -> ViewportTransform {
        self.auto_sizer.record_gesture(now);
        let current = self.transform(now);
        if self.focus.is_active() {
            let graph_focus = matches!(self.focus_target, Some(FocusTarget::Vertex { .. }));
            self.release_focus_claims(now);
            self.focus_target = None;
            self.focus.clear();
            if graph_focus && let Err(err) = self.graph.blur() {
                tracing::warn!(%err, "could not blur the graph after a gesture");
            }
        }
        current
    }
}

impl Drop for GraphEngine {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn check_canvas(canvas: Size) -> GraphResult<()> {
    if !canvas.width.is_finite()
        || !canvas.height.is_finite()
        || canvas.width < 0.0
        || canvas.height < 0.0
    {
        return Err(GraphError::configuration(
            "canvas size must be finite and >= 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
