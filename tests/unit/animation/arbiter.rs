use super::*;

#[test]
fn free_vertex_accepts_any_writer() {
    let table = WriterTable::new();
    assert!(table.can_write("a", PositionWriter::Simulation));
    assert!(table.can_write("a", PositionWriter::Gesture));
    assert_eq!(table.owner("a"), None);
}

#[test]
fn placement_suspends_simulation_until_released() {
    let mut table = WriterTable::new();
    assert!(table.claim("a", PositionWriter::Placement));
    assert!(!table.can_write("a", PositionWriter::Simulation));
    assert!(!table.claim("a", PositionWriter::Simulation));
    assert!(table.release("a", PositionWriter::Placement));
    assert!(table.can_write("a", PositionWriter::Simulation));
}

#[test]
fn focus_preempts_and_release_by_non_owner_is_ignored() {
    let mut table = WriterTable::new();
    table.claim("a", PositionWriter::Placement);
    assert!(table.claim("a", PositionWriter::Focus));
    assert!(!table.release("a", PositionWriter::Placement));
    assert_eq!(table.owner("a"), Some(PositionWriter::Focus));
    assert!(table.release("a", PositionWriter::Focus));
    assert_eq!(table.owner("a"), None);
}
