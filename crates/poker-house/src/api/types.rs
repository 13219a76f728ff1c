use serde::{Deserialize, Serialize};

/// Unique identifier for an object in the scene.
///
/// Also used for objects that live privately inside a container (cards in a
/// deck), so identity survives moving between the scene and a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out unique entity ids for one session.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A gameplay event emitted by the simulation during a frame.
/// Drained by the runner; the core never reads them back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// `person` sat down at `seat` of `table`.
    Seated { person: EntityId, table: EntityId, seat: usize },
    /// `person` left their seat.
    Stood { person: EntityId },
    /// `item` was moved from the scene into `person`'s inventory.
    PickedUp { person: EntityId, item: EntityId },
    /// `person` put an item back into the scene as `item`.
    Dropped { person: EntityId, item: EntityId },
    /// A shot was fired; `hit` is the person struck, if any.
    Shot { shooter: EntityId, hit: Option<EntityId> },
    /// `victim` was killed by `killer`.
    Killed { victim: EntityId, killer: EntityId },
    /// A weapon ran dry and was discarded.
    WeaponDepleted { owner: EntityId },
    /// A substance was consumed.
    SubstanceUsed { person: EntityId },
    /// The dealer died; the pot stacks can now be taken.
    PotsOpened,
    /// `person` took a pot worth `value`.
    PotTaken { person: EntityId, value: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
