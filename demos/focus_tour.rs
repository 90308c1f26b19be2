use graphmotion::{
    Clock as _, EngineSettings, FocusPath, FocusWaypoint, ForceSettings, Graph, GraphData,
    GraphEngine, GraphKind, ManualClock, SharedGraph, Size,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/small_graph.json");
    let graph = SharedGraph::new(Graph::from_data(
        GraphKind::Undirected,
        GraphData::from_json(s)?,
    )?);
    let settings = EngineSettings {
        forces: Some(ForceSettings::default()),
        ..EngineSettings::default()
    };

    let clock = ManualClock::new(0.0);
    let mut engine = GraphEngine::new(graph, settings, Size::new(800.0, 600.0), 0.0)?;
    let path = FocusPath::new(vec![
        FocusWaypoint::new(0.0, "hub"),
        FocusWaypoint::new(0.5, "c"),
        FocusWaypoint::new(1.0, "d"),
    ])?;
    engine.set_focus_path(path, 0.0, clock.now_ms())?;

    for step in 0..=10 {
        engine.set_focus_progress(f64::from(step) / 10.0);
        let out = engine.tick(clock.advance(100.0))?;
        println!(
            "t={:>5} progress={:.1} scale={:.2} translate=({:.1}, {:.1}) {:?}",
            out.frame.now_ms,
            f64::from(step) / 10.0,
            out.transform.scale,
            out.transform.translate.x,
            out.transform.translate.y,
            out.focus_state,
        );
    }

    Ok(())
}
