pub mod connections;
pub mod events;
pub mod model;
pub mod shared;
