pub mod body;
pub mod physics;
pub mod rng;
pub mod scene;
pub mod time;
