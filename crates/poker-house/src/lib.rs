pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod extensions;
pub mod house;

// Re-export key types at crate root for convenience
pub use api::error::EntityError;
pub use api::game::{EngineContext, Game, GameConfig, PlayerConfig, RenderContext};
pub use api::types::{EntityId, GameEvent, IdAllocator};
pub use components::entity::{Entity, EntityKind};
pub use components::interactable::{InteractAction, Interactable};
pub use components::item::{Card, Chip, ChipColor, Item, Rank, Substance, Suit, Weapon};
pub use components::person::{Person, PersonRole, SeatAssignment};
pub use components::table::PokerTable;
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionCategory, CollisionPair,
    PhysicsWorld,
};
pub use core::body::{Collider, RigidBody};
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use renderer::camera::Camera;
pub use renderer::instance::{RenderBuffer, RenderInstance, RenderKind};
pub use input::queue::{InputEvent, InputQueue, InputState, Key};
pub use house::player::Player;
pub use house::PokerHouse;
