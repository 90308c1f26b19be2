use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::animation::ease::Ease;

fn linear(ms: f64) -> AnimationSettings {
    AnimationSettings::new(ms, Ease::Linear)
}

#[test]
fn mount_fades_in_then_settles() {
    let mut orch = AnimationOrchestrator::new();
    orch.mount_vertex("a", Point::new(1.0, 2.0), 0.0, &linear(100.0));
    assert_eq!(orch.vertex_phase("a"), Some(MountPhase::Mounting));
    orch.tick(50.0);
    let frame = &orch.vertex_frames()[0];
    assert_eq!(frame.progress, 0.5);
    assert_eq!(frame.position, Point::new(1.0, 2.0));

    let report = orch.tick(100.0);
    assert_eq!(report.mounted_vertices, vec!["a".to_string()]);
    assert_eq!(orch.vertex_phase("a"), Some(MountPhase::Mounted));
}

#[test]
fn unmounted_vertex_stays_until_exit_hook_fired() {
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let mut orch = AnimationOrchestrator::new();
    orch.mount_vertex("a", Point::ZERO, 0.0, &AnimationSettings::instant());
    orch.tick(0.0);

    let exit = linear(200.0).with_on_complete(move || flag.set(true));
    assert!(orch.unmount_vertex("a", 10.0, &exit));
    for now in [50.0, 100.0, 150.0, 209.0] {
        let report = orch.tick(now);
        assert!(report.purged_vertices.is_empty());
        assert!(orch.contains_vertex("a"));
        assert!(!fired.get());
    }
    let report = orch.tick(210.0);
    assert!(fired.get());
    assert_eq!(report.purged_vertices, vec!["a".to_string()]);
    assert!(!orch.contains_vertex("a"));
}

#[test]
fn remount_while_leaving_continues_from_current_progress() {
    let mut orch = AnimationOrchestrator::new();
    orch.mount_vertex("a", Point::ZERO, 0.0, &AnimationSettings::instant());
    orch.tick(0.0);
    orch.unmount_vertex("a", 0.0, &linear(100.0));
    orch.tick(50.0);
    orch.mount_vertex("a", Point::ZERO, 50.0, &linear(100.0));
    orch.tick(50.0);
    assert_eq!(orch.vertex_frames()[0].progress, 0.5);
    orch.tick(150.0);
    assert_eq!(orch.vertex_phase("a"), Some(MountPhase::Mounted));
}

#[test]
fn position_retarget_has_no_discontinuity() {
    let mut orch = AnimationOrchestrator::new();
    orch.mount_vertex("a", Point::ZERO, 0.0, &AnimationSettings::instant());
    orch.animate_position("a", Point::new(100.0, 0.0), 0.0, &linear(100.0));
    orch.tick(50.0);
    assert_eq!(orch.position("a"), Some(Point::new(50.0, 0.0)));
    orch.animate_position("a", Point::new(0.0, 0.0), 50.0, &linear(100.0));
    assert_eq!(orch.position("a"), Some(Point::new(50.0, 0.0)));
    let report = orch.tick(150.0);
    assert_eq!(report.settled_positions, vec!["a".to_string()]);
    assert_eq!(orch.position("a"), Some(Point::ZERO));
}

#[test]
fn edge_order_animates_and_edges_purge() {
    let mut orch = AnimationOrchestrator::new();
    orch.mount_edge("e", EdgeOrder { order: 0, count: 1 }, 0.0, &linear(100.0));
    orch.animate_edge_order("e", EdgeOrder { order: 1, count: 2 }, 0.0, &linear(100.0));
    orch.tick(50.0);
    let frame = &orch.edge_frames()[0];
    assert_eq!(frame.order, 0.5);
    assert_eq!(frame.count, 1.5);
    orch.unmount_edge("e", 100.0, &AnimationSettings::instant());
    let report = orch.tick(100.0);
    assert_eq!(report.purged_edges, vec!["e".to_string()]);
    assert_eq!(orch.edge_count(), 0);
}

#[test]
fn scale_animates_and_jumps() {
    let mut orch = AnimationOrchestrator::new();
    orch.mount_vertex("a", Point::ZERO, 0.0, &linear(0.0));
    orch.tick(0.0);
    assert!(orch.animate_scale("a", 3.0, 0.0, &linear(100.0)));
    orch.tick(50.0);
    assert_eq!(orch.vertex_frames()[0].scale, 2.0);
    assert_eq!(orch.target_scale("a"), Some(3.0));

    assert!(orch.set_scale("a", 1.0));
    assert_eq!(orch.vertex_frames()[0].scale, 1.0);
    assert!(!orch.set_scale("missing", 2.0));
}

#[test]
fn leaving_edges_are_not_live() {
    let mut orch = AnimationOrchestrator::new();
    let order = EdgeOrder { order: 0, count: 1 };
    orch.mount_edge("ab", order, 0.0, &linear(10.0));
    orch.mount_edge("bc", order, 0.0, &linear(10.0));
    orch.unmount_edge("ab", 5.0, &linear(10.0));
    assert_eq!(orch.live_edges().collect::<Vec<_>>(), ["bc"]);
    assert_eq!(orch.edge_count(), 2);
}
