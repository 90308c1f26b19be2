//! Force-directed refinement of vertex positions.
//!
//! Each tick adds the net force on a vertex straight onto its position. There is no velocity or
//! damping term, so the layout keeps drifting slightly instead of reaching a true equilibrium.

use std::collections::BTreeMap;

use crate::animation::arbiter::{PositionWriter, WriterTable};
use crate::animation::orchestrator::AnimationOrchestrator;
use crate::foundation::core::{BoundingRect, Point, Vec2};
use crate::foundation::error::{GraphError, GraphResult};
use crate::foundation::math::{MIN_DISTANCE, fallback_direction, finite_or_zero, golden_direction};
use crate::graph::connections::Connections;

/// Tuning of the force model.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ForceSettings {
    /// Multiplier of the logarithmic spring pulling neighbors together.
    pub attraction_force_factor: f64,
    /// Rest length of the spring: neighbors closer than this push apart.
    pub attraction_scale: f64,
    /// Strength of the inverse-square repulsion between every pair.
    pub repulsion_scale: f64,
    /// Gap kept when seeding newly inserted vertices.
    pub min_vertex_spacing: f64,
}

impl Default for ForceSettings {
    fn default() -> Self {
        Self {
            attraction_force_factor: 1.0,
            attraction_scale: 100.0,
            repulsion_scale: 10_000.0,
            min_vertex_spacing: 50.0,
        }
    }
}

impl ForceSettings {
    /// Check that every parameter is usable inside the frame loop.
    pub fn validate(&self) -> GraphResult<()> {
        let checks = [
            ("attraction_force_factor", self.attraction_force_factor, false),
            ("attraction_scale", self.attraction_scale, true),
            ("repulsion_scale", self.repulsion_scale, false),
            ("min_vertex_spacing", self.min_vertex_spacing, false),
        ];
        for (name, value, strictly_positive) in checks {
            let ok = value.is_finite() && if strictly_positive { value > 0.0 } else { value >= 0.0 };
            if !ok {
                return Err(GraphError::configuration(format!(
                    "forces.{name} must be finite and {}",
                    if strictly_positive { "> 0" } else { ">= 0" }
                )));
            }
        }
        Ok(())
    }
}

/// Whether the simulation runs on each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    /// Not registered for frames.
    Inactive,
    /// Runs every frame until torn down.
    Active,
}

/// Per-frame force integrator.
#[derive(Clone, Debug)]
pub struct ForceSimulation {
    settings: ForceSettings,
    state: SimulationState,
    ticks: u64,
}

impl ForceSimulation {
    /// Inactive simulation with validated settings.
    pub fn new(settings: ForceSettings) -> GraphResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: SimulationState::Inactive,
            ticks: 0,
        })
    }

    /// Current settings.
    pub fn settings(&self) -> &ForceSettings {
        &self.settings
    }

    /// Current state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Return `true` once activated.
    pub fn is_active(&self) -> bool {
        self.state == SimulationState::Active
    }

    /// Number of ticks that ran while active.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start running on every frame. Idempotent.
    pub fn activate(&mut self) {
        if self.state == SimulationState::Inactive {
            tracing::debug!("force simulation activated");
            self.state = SimulationState::Active;
        }
    }

    /// Stop for good; only an explicit [`activate`](Self::activate) restarts it.
    pub fn teardown(&mut self) {
        if self.state == SimulationState::Active {
            tracing::debug!(ticks = self.ticks, "force simulation halted");
        }
        self.state = SimulationState::Inactive;
    }

    /// Net force on every vertex of `positions`.
    ///
    /// Neighbors attract with `ln(d / attraction_scale) * factor`; every pair repels with
    /// `repulsion_scale / d^2`. Distances are floored at one unit and coincident vertices split
    /// along a direction derived from their indices.
    pub fn compute_forces(
        &self,
        connections: &Connections,
        positions: &BTreeMap<String, Point>,
    ) -> BTreeMap<String, Vec2> {
        let keys = positions.keys().collect::<Vec<_>>();
        let points = positions.values().copied().collect::<Vec<_>>();
        let index = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_str(), i))
            .collect::<BTreeMap<_, _>>();
        let s = &self.settings;

        let mut out = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            let mut force = Vec2::ZERO;
            for neighbor in connections.neighbors(key) {
                let Some(&j) = index.get(neighbor.as_str()) else {
                    continue;
                };
                if j == i {
                    continue;
                }
                let (dir, d) = direction(&points, i, j);
                force += dir * ((d / s.attraction_scale).ln() * s.attraction_force_factor);
            }
            for j in 0..points.len() {
                if j == i {
                    continue;
                }
                let (dir, d) = direction(&points, i, j);
                force -= dir * (s.repulsion_scale / (d * d));
            }
            out.insert((*key).clone(), finite_or_zero(force));
        }
        out
    }

    /// Advance one frame: move every live vertex the simulation is allowed to write.
    ///
    /// Vertices owned by another writer, or with a placement animation still in flight, keep
    /// their position but still push the others. Returns how many vertices moved.
    pub fn tick(
        &mut self,
        connections: &Connections,
        orchestrator: &mut AnimationOrchestrator,
        writers: &WriterTable,
    ) -> usize {
        if !self.is_active() {
            return 0;
        }
        let positions = orchestrator
            .live_vertices()
            .filter(|k| connections.contains(k))
            .filter_map(|k| orchestrator.position(k).map(|p| (k.to_owned(), p)))
            .collect::<BTreeMap<_, _>>();
        let forces = self.compute_forces(connections, &positions);

        let mut moved = 0;
        for (key, force) in forces {
            if force == Vec2::ZERO
                || !writers.can_write(&key, PositionWriter::Simulation)
                || orchestrator.position_in_flight(&key)
            {
                continue;
            }
            if let Some(p) = positions.get(&key) {
                orchestrator.set_position(&key, *p + force);
                moved += 1;
            }
        }
        self.ticks += 1;
        moved
    }
}

fn direction(points: &[Point], i: usize, j: usize) -> (Vec2, f64) {
    let delta = points[j] - points[i];
    let len = delta.hypot();
    let dir = if len > f64::EPSILON {
        delta / len
    } else {
        let base = fallback_direction(i.min(j), i.max(j));
        if i < j { base } else { -base }
    };
    (dir, len.max(MIN_DISTANCE))
}

/// Seed positions for vertices that joined a running simulation.
///
/// A vertex with placed neighbors lands `2r + spacing` away from their centroid along a
/// golden-angle direction, stepping outwards until it clears every placed vertex. A vertex with
/// no placed neighbors goes one step right of the current layout, level with its top row.
pub fn place_new_vertices(
    connections: &Connections,
    placed: &BTreeMap<String, Point>,
    new_keys: &[String],
    vertex_radius: f64,
    settings: &ForceSettings,
) -> BTreeMap<String, Point> {
    let step = 2.0 * vertex_radius + settings.min_vertex_spacing;
    let mut all = placed.clone();
    let mut out = BTreeMap::new();

    for (n, key) in new_keys.iter().enumerate() {
        let anchors = connections
            .neighbors(key)
            .iter()
            .filter_map(|k| all.get(k).copied())
            .collect::<Vec<_>>();
        let position = if all.is_empty() {
            Point::ZERO
        } else if anchors.is_empty() {
            free_slot_beside(&all, vertex_radius, step)
        } else {
            let sum = anchors
                .iter()
                .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
            let centroid = (sum / anchors.len() as f64).to_point();
            near(centroid, &all, step, n)
        };
        all.insert(key.clone(), position);
        out.insert(key.clone(), position);
    }
    out
}

fn clear_of(p: Point, placed: &BTreeMap<String, Point>, step: f64) -> bool {
    placed.values().all(|q| (p - *q).hypot() >= step - 1e-9)
}

fn near(centroid: Point, placed: &BTreeMap<String, Point>, step: f64, salt: usize) -> Point {
    let candidate = |attempt: usize| {
        centroid + golden_direction(salt + attempt) * (step * (1.0 + attempt as f64 / 8.0))
    };
    (0..64)
        .map(candidate)
        .find(|p| clear_of(*p, placed, step))
        .unwrap_or_else(|| candidate(64))
}

/// One step right of the layout's right edge, on its top row; clear of everything by construction.
fn free_slot_beside(placed: &BTreeMap<String, Point>, vertex_radius: f64, step: f64) -> Point {
    let rect = BoundingRect::around(placed.values(), vertex_radius);
    Point::new(rect.right() - vertex_radius + step, rect.top() + vertex_radius)
}

#[cfg(test)]
#[path = "../../tests/unit/forces/mod.rs"]
mod tests;
