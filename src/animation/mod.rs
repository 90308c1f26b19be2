pub mod arbiter;
pub mod ease;
pub mod orchestrator;
pub mod tween;
