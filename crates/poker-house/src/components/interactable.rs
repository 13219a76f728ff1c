/// What happens when the player interacts with an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractAction {
    /// Move the entity's item into the player's inventory.
    PickUp,
    /// Sit at (or stand up from) a poker table.
    TakeSeat,
    /// Take every chip of a pot stack.
    TakePot,
}

/// Makes an entity targetable by the player's crosshair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interactable {
    /// Farthest distance along the view ray at which the entity can be targeted.
    pub range: f32,
    pub can_interact: bool,
    pub action: InteractAction,
}

impl Interactable {
    pub const DEFAULT_RANGE: f32 = 5.0;

    pub fn new(action: InteractAction) -> Self {
        Self {
            range: Self::DEFAULT_RANGE,
            can_interact: true,
            action,
        }
    }

    pub fn pick_up() -> Self {
        Self::new(InteractAction::PickUp)
    }

    pub fn take_seat() -> Self {
        Self::new(InteractAction::TakeSeat)
    }

    /// Pots start locked until the round ends.
    pub fn take_pot() -> Self {
        Self {
            can_interact: false,
            ..Self::new(InteractAction::TakePot)
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }
}
