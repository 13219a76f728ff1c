use glam::Vec3;
use std::f32::consts::TAU;

use crate::api::types::EntityId;
use crate::components::deck::Deck;
use crate::components::item::Card;

pub const MAX_SEATS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seat {
    pub position: Vec3,
    pub occupant: Option<EntityId>,
}

impl Seat {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Seat bookkeeping and the table's own deck.
///
/// The table only tracks occupancy. Moving bodies in and out of seats, and
/// keeping a person to one seat across all tables, is done by
/// `EngineContext::seat_person` / `unseat_person`.
#[derive(Debug, Clone, PartialEq)]
pub struct PokerTable {
    seats: [Seat; MAX_SEATS],
    half_extents: Vec3,
    deck: Deck,
}

impl PokerTable {
    /// Table centered at `center` (floor level) with seats evenly spaced on a
    /// circle of `seat_radius`.
    pub fn new(center: Vec3, half_extents: Vec3, seat_radius: f32, deck: Deck) -> Self {
        let seats = std::array::from_fn(|i| {
            let angle = i as f32 / MAX_SEATS as f32 * TAU;
            Seat {
                position: center + Vec3::new(angle.cos(), 0.0, angle.sin()) * seat_radius,
                occupant: None,
            }
        });
        Self {
            seats,
            half_extents,
            deck,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn seats(&self) -> &[Seat; MAX_SEATS] {
        &self.seats
    }

    pub fn seat(&self, index: usize) -> Option<&Seat> {
        self.seats.get(index)
    }

    /// Nearest unoccupied seat to `pos`, if any is open.
    pub fn find_closest_open_seat(&self, pos: Vec3) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, seat) in self.seats.iter().enumerate() {
            if seat.is_occupied() {
                continue;
            }
            let dist = seat.position.distance_squared(pos);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Put `person` in seat `index`. Fails on an out-of-range or occupied
    /// seat, or when the person already sits at this table.
    pub fn seat_person(&mut self, person: EntityId, index: usize) -> bool {
        if self.find_seat_index(person).is_some() {
            return false;
        }
        match self.seats.get_mut(index) {
            Some(seat) if !seat.is_occupied() => {
                seat.occupant = Some(person);
                true
            }
            _ => false,
        }
    }

    /// Free whichever seat `person` holds. Returns the freed index.
    pub fn unseat_person(&mut self, person: EntityId) -> Option<usize> {
        let index = self.find_seat_index(person)?;
        self.seats[index].occupant = None;
        Some(index)
    }

    /// Empty every seat. Returns who was sitting.
    pub fn vacate_all(&mut self) -> Vec<EntityId> {
        self.seats.iter_mut().filter_map(|s| s.occupant.take()).collect()
    }

    pub fn find_seat_index(&self, person: EntityId) -> Option<usize> {
        self.seats.iter().position(|s| s.occupant == Some(person))
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        self.deck.draw_card()
    }
}
