//! Things a person can carry: cards, chips, weapons and substances.

use serde::{Deserialize, Serialize};

use crate::api::error::EntityError;
use crate::api::types::EntityId;
use crate::systems::trip::SessionEffects;

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn name(self) -> &'static str {
        match self {
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rank::Two => "two",
            Rank::Three => "three",
            Rank::Four => "four",
            Rank::Five => "five",
            Rank::Six => "six",
            Rank::Seven => "seven",
            Rank::Eight => "eight",
            Rank::Nine => "nine",
            Rank::Ten => "ten",
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
            Rank::Ace => "ace",
        }
    }
}

/// A playing card. The id gives every physical card its own identity,
/// so two aces of spades from different decks stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub id: EntityId,
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(id: EntityId, suit: Suit, rank: Rank) -> Self {
        Self { id, suit, rank }
    }
}

// ---------------------------------------------------------------------------
// Chips
// ---------------------------------------------------------------------------

/// Chip color, fixed per denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipColor {
    White,
    Red,
    Blue,
    Green,
    Black,
}

impl ChipColor {
    /// Linear RGB used by the renderer.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            ChipColor::White => [0.95, 0.95, 0.95],
            ChipColor::Red => [0.8, 0.1, 0.1],
            ChipColor::Blue => [0.1, 0.2, 0.8],
            ChipColor::Green => [0.1, 0.6, 0.2],
            ChipColor::Black => [0.05, 0.05, 0.05],
        }
    }
}

/// A casino chip. Only the fixed denominations exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chip {
    value: u32,
}

impl Chip {
    pub const DENOMINATIONS: [u32; 5] = [1, 5, 10, 25, 100];

    pub fn new(value: u32) -> Result<Self, EntityError> {
        Self::color_for(value)?;
        Ok(Self { value })
    }

    /// Color of a denomination, or an error for values that are not chips.
    pub fn color_for(value: u32) -> Result<ChipColor, EntityError> {
        match value {
            100 => Ok(ChipColor::Black),
            25 => Ok(ChipColor::Green),
            10 => Ok(ChipColor::Blue),
            5 => Ok(ChipColor::Red),
            1 => Ok(ChipColor::White),
            other => Err(EntityError::InvalidDenomination(other)),
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn color(&self) -> ChipColor {
        match self.value {
            100 => ChipColor::Black,
            25 => ChipColor::Green,
            10 => ChipColor::Blue,
            5 => ChipColor::Red,
            _ => ChipColor::White,
        }
    }

    /// Break `amount` into the fewest chips, largest first.
    pub fn make_change(mut amount: u32) -> Vec<Chip> {
        let mut chips = Vec::new();
        for &value in Self::DENOMINATIONS.iter().rev() {
            while amount >= value {
                chips.push(Chip { value });
                amount -= value;
            }
        }
        chips
    }
}

// ---------------------------------------------------------------------------
// Weapons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
}

/// A firearm. Each weapon tracks its own ammo, so weapons never stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub kind: WeaponKind,
    ammo: u32,
    max_ammo: u32,
    fire_interval: f32,
    cooldown: f32,
}

impl Weapon {
    pub const PISTOL_AMMO: u32 = 6;
    pub const PISTOL_FIRE_INTERVAL: f32 = 0.35;

    pub fn pistol() -> Self {
        Self {
            kind: WeaponKind::Pistol,
            ammo: Self::PISTOL_AMMO,
            max_ammo: Self::PISTOL_AMMO,
            fire_interval: Self::PISTOL_FIRE_INTERVAL,
            cooldown: 0.0,
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    pub fn can_shoot(&self) -> bool {
        self.ammo > 0
    }

    /// Loaded and off cooldown.
    pub fn ready(&self) -> bool {
        self.can_shoot() && self.cooldown <= 0.0
    }

    /// Spend one round. Returns `false` (and changes nothing) when empty.
    pub fn shoot(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        self.cooldown = self.fire_interval;
        true
    }

    /// Advance the fire cooldown.
    pub fn tick(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    fn name(&self) -> &'static str {
        match self.kind {
            WeaponKind::Pistol => "pistol",
        }
    }
}

// ---------------------------------------------------------------------------
// Substances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Substance {
    Adrenaline,
    Cocaine,
    Shrooms,
    Vodka,
    Weed,
    Molly,
    Salvia,
}

impl Substance {
    pub fn name(self) -> &'static str {
        match self {
            Substance::Adrenaline => "adrenaline",
            Substance::Cocaine => "cocaine",
            Substance::Shrooms => "shrooms",
            Substance::Vodka => "vodka",
            Substance::Weed => "weed",
            Substance::Molly => "molly",
            Substance::Salvia => "salvia",
        }
    }

    /// Apply the substance's effect. Returns whether anything happened.
    pub fn consume(self, effects: &mut SessionEffects) -> bool {
        match self {
            Substance::Shrooms => {
                effects.trip.start();
                log::info!("shrooms consumed, trip started");
                true
            }
            other => {
                log::debug!("{} consumed, no effect", other.name());
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Anything that fits in an inventory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item {
    Card(Card),
    Chip(Chip),
    Weapon(Weapon),
    Substance(Substance),
}

impl Item {
    /// Ancestry string, e.g. `object_interactable_item_card_spades_ace`.
    pub fn type_string(&self) -> String {
        match self {
            Item::Card(card) => format!(
                "object_interactable_item_card_{}_{}",
                card.suit.name(),
                card.rank.name()
            ),
            Item::Chip(chip) => format!("object_interactable_item_chip_{}", chip.value()),
            Item::Weapon(weapon) => format!("object_interactable_item_weapon_{}", weapon.name()),
            Item::Substance(substance) => {
                format!("object_interactable_item_substance_{}", substance.name())
            }
        }
    }

    /// Key used to group items into inventory stacks.
    /// Cards carry their identity, so no two cards ever share a stack.
    pub fn stack_key(&self) -> String {
        match self {
            Item::Card(card) => format!("{}#{}", self.type_string(), card.id.0),
            _ => self.type_string(),
        }
    }

    pub fn can_stack(&self) -> bool {
        !matches!(self, Item::Weapon(_))
    }

    /// Number shown next to the item in the inventory, if any.
    /// Weapons always show remaining ammo.
    pub fn display_count(&self, stack_count: u32) -> Option<u32> {
        match self {
            Item::Weapon(weapon) => Some(weapon.ammo()),
            _ if stack_count > 1 => Some(stack_count),
            _ => None,
        }
    }

    pub fn usable(&self) -> bool {
        matches!(self, Item::Weapon(_) | Item::Substance(_))
    }

    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Item::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_chip(&self) -> Option<&Chip> {
        match self {
            Item::Chip(chip) => Some(chip),
            _ => None,
        }
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Item::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut Weapon> {
        match self {
            Item::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_substance(&self) -> Option<Substance> {
        match self {
            Item::Substance(substance) => Some(*substance),
            _ => None,
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.as_weapon().is_some()
    }
}
