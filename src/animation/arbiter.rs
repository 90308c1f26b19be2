use std::collections::BTreeMap;

/// Component allowed to move a vertex position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionWriter {
    /// Force simulation tick.
    Simulation,
    /// Placement animation in flight.
    Placement,
    /// Direct manipulation by a pointer gesture.
    Gesture,
    /// Focus transition holding the vertex still.
    Focus,
}

impl PositionWriter {
    fn rank(self) -> u8 {
        match self {
            Self::Simulation => 0,
            Self::Placement => 1,
            Self::Gesture => 2,
            Self::Focus => 3,
        }
    }
}

/// Per-vertex single-writer table.
///
/// A vertex with no entry is free: any writer may move it. A claimed vertex may only be moved by
/// its owner. Higher-ranked writers (focus > gesture > placement > simulation) preempt lower ones.
#[derive(Clone, Debug, Default)]
pub struct WriterTable {
    owners: BTreeMap<String, PositionWriter>,
}

impl WriterTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `key`; fails when a higher-ranked writer holds it.
    pub fn claim(&mut self, key: &str, writer: PositionWriter) -> bool {
        match self.owners.get(key).copied() {
            Some(current) if current == writer => true,
            Some(current) if current.rank() > writer.rank() => false,
            previous => {
                if let Some(previous) = previous {
                    tracing::trace!(key, ?previous, ?writer, "position writer preempted");
                }
                self.owners.insert(key.to_owned(), writer);
                true
            }
        }
    }

    /// Give `key` back; ignored unless `writer` is the owner.
    pub fn release(&mut self, key: &str, writer: PositionWriter) -> bool {
        if self.owners.get(key) == Some(&writer) {
            self.owners.remove(key);
            return true;
        }
        false
    }

    /// Current owner of `key`.
    pub fn owner(&self, key: &str) -> Option<PositionWriter> {
        self.owners.get(key).copied()
    }

    /// Return `true` when `writer` may move `key` right now.
    pub fn can_write(&self, key: &str, writer: PositionWriter) -> bool {
        self.owners.get(key).is_none_or(|owner| *owner == writer)
    }

    /// Drop any entry for a purged vertex.
    pub fn forget(&mut self, key: &str) {
        self.owners.remove(key);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/arbiter.rs"]
mod tests;
