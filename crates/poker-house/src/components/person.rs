use crate::api::types::EntityId;
use crate::components::inventory::Inventory;

/// Standing height of a person with height multiplier 1.0.
pub const PERSON_BASE_HEIGHT: f32 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonRole {
    Player,
    Enemy,
    /// Runs the game at `table`.
    Dealer { table: EntityId },
}

/// Where a person is sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatAssignment {
    pub table: EntityId,
    pub seat: usize,
}

/// A humanoid: the player, an enemy or a dealer.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub role: PersonRole,
    /// Height multiplier applied to [`PERSON_BASE_HEIGHT`].
    pub height: f32,
    pub inventory: Inventory,
    seat: Option<SeatAssignment>,
}

impl Person {
    pub fn new(name: impl Into<String>, role: PersonRole) -> Self {
        Self {
            name: name.into(),
            role,
            height: 1.0,
            inventory: Inventory::new(),
            seat: None,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn type_string(&self) -> &'static str {
        match self.role {
            PersonRole::Player => "object_person_player",
            PersonRole::Enemy => "object_person_enemy",
            PersonRole::Dealer { .. } => "object_person_dealer",
        }
    }

    pub fn is_dealer(&self) -> bool {
        matches!(self.role, PersonRole::Dealer { .. })
    }

    pub fn is_player(&self) -> bool {
        self.role == PersonRole::Player
    }

    /// Full standing height, the vertical extent of the hitbox.
    pub fn hitbox_height(&self) -> f32 {
        PERSON_BASE_HEIGHT * self.height
    }

    pub fn seat(&self) -> Option<SeatAssignment> {
        self.seat
    }

    pub fn is_seated(&self) -> bool {
        self.seat.is_some()
    }

    /// Mirror of the table's occupancy. Only the seating code in
    /// `EngineContext` keeps the two in step.
    pub(crate) fn set_seat(&mut self, seat: Option<SeatAssignment>) {
        self.seat = seat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_classify() {
        let dealer = Person::new("Vic", PersonRole::Dealer { table: EntityId(3) });
        let enemy = Person::new("Sal", PersonRole::Enemy);
        assert!(dealer.is_dealer());
        assert!(!enemy.is_dealer());
        assert_eq!(dealer.type_string(), "object_person_dealer");
        assert_eq!(enemy.type_string(), "object_person_enemy");
    }

    #[test]
    fn hitbox_scales_with_height() {
        let tall = Person::new("Big", PersonRole::Enemy).with_height(1.2);
        assert!((tall.hitbox_height() - 2.16).abs() < 1e-5);
    }
}
