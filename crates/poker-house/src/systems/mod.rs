pub mod insanity;
pub mod movement;
pub mod render;
pub mod targeting;
pub mod trip;
