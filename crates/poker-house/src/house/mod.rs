//! The poker house: room layout and the player-driven game loop.

pub mod player;
pub mod room;

use glam::{Mat4, Quat, Vec3};

use crate::api::game::{EngineContext, Game, GameConfig, RenderContext};
use crate::components::item::{Chip, Item, Substance, Weapon};
use crate::components::person::PersonRole;
use crate::input::queue::InputState;
use crate::renderer::instance::{RenderInstance, RenderKind};
use player::Player;

pub const ROOM_HALF_WIDTH: f32 = 6.0;
pub const ROOM_HALF_DEPTH: f32 = 6.0;
pub const ROOM_HEIGHT: f32 = 3.0;
pub const PLAYER_START: Vec3 = Vec3::new(0.0, 0.0, 4.5);
/// Seat the enemy holds at the table.
pub const ENEMY_SEAT: usize = 0;
pub const POTS: [u32; 2] = [265, 140];
pub const COMMUNITY_CARDS: usize = 5;

const HELD_ITEM_DISTANCE: f32 = 0.5;

pub struct PokerHouse {
    config: GameConfig,
    player: Option<Player>,
}

impl PokerHouse {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            player: None,
        }
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }
}

impl Default for PokerHouse {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game for PokerHouse {
    fn config(&self) -> GameConfig {
        self.config.clone()
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        room::spawn_room(ctx, ROOM_HALF_WIDTH, ROOM_HALF_DEPTH, ROOM_HEIGHT);

        let table = room::spawn_table(ctx, Vec3::ZERO);
        room::spawn_dealer(ctx, table);
        let enemy_seat = ctx
            .scene
            .get(table)
            .and_then(|e| e.as_table())
            .and_then(|t| t.seat(ENEMY_SEAT))
            .map(|s| s.position);
        if let Some(pos) = enemy_seat {
            let enemy = room::spawn_enemy(ctx, "Enemy", pos);
            ctx.seat_person(table, enemy, ENEMY_SEAT);
        }

        let top = ctx.scene.get(table).map_or(Vec3::ZERO, |e| e.pos);
        for (i, amount) in POTS.into_iter().enumerate() {
            let x = if i == 0 { -0.4 } else { 0.4 };
            room::spawn_pot(ctx, top + Vec3::new(x, 0.0, -0.4), amount);
        }
        room::deal_to_table(ctx, table, COMMUNITY_CARDS);

        for (value, pos) in [
            (5, Vec3::new(-3.0, 0.5, 3.0)),
            (25, Vec3::new(3.0, 0.5, -3.0)),
            (100, Vec3::new(-4.0, 0.5, -2.0)),
        ] {
            if let Ok(chip) = Chip::new(value) {
                let id = ctx.next_id();
                room::spawn_loose_item(ctx, id, Item::Chip(chip), pos);
            }
        }
        let pistol = ctx.next_id();
        room::spawn_loose_item(ctx, pistol, Item::Weapon(Weapon::pistol()), Vec3::new(1.5, 0.5, 4.0));
        let shrooms = ctx.next_id();
        room::spawn_loose_item(ctx, shrooms, Item::Substance(Substance::Shrooms), Vec3::new(-1.5, 0.5, 4.0));

        self.player = Some(Player::spawn(ctx, self.config.player, PLAYER_START));
        log::info!("poker house ready: {} entities", ctx.scene.len());
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputState) {
        if let Some(player) = self.player.as_mut() {
            player.update(ctx, input, self.config.fixed_dt);
        }
    }

    /// Draw the selected item floating in front of the player's eye.
    fn render(&self, ctx: &mut RenderContext) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let Some(entity) = ctx.scene.get(player.entity()).filter(|e| e.active) else {
            return;
        };
        let Some(person) = entity.as_person().filter(|p| p.role == PersonRole::Player) else {
            return;
        };
        let Some(stack) = person.inventory.get(player.selected()) else {
            return;
        };
        let eye = entity.pos + Vec3::Y * self.config.player.eye_offset;
        let at = eye + player.forward() * HELD_ITEM_DISTANCE;
        let rotation = Quat::from_rotation_y(player.yaw());
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(0.5), rotation, at);
        let kind = match stack.item {
            Item::Card(_) => RenderKind::Card,
            Item::Chip(_) => RenderKind::Chip,
            Item::Weapon(_) => RenderKind::Weapon,
            Item::Substance(_) => RenderKind::Substance,
        };
        ctx.render_buffer.push(RenderInstance::new(kind, model).with_lighting(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    fn house() -> (PokerHouse, EngineContext) {
        let mut game = PokerHouse::default();
        let mut ctx = EngineContext::new(&game.config());
        game.init(&mut ctx);
        (game, ctx)
    }

    #[test]
    fn init_builds_the_house() {
        let (game, ctx) = house();
        let player = game.player().unwrap();
        assert!(player.is_alive(&ctx));

        let pots = ctx
            .scene
            .iter()
            .filter(|e| e.as_chip_stack().is_some_and(|s| s.is_pot()))
            .count();
        assert_eq!(pots, POTS.len());
        let people: Vec<&Entity> = ctx.scene.iter().filter(|e| e.as_person().is_some()).collect();
        assert_eq!(people.len(), 3);
        assert_eq!(people.iter().filter(|e| e.is_dealer()).count(), 1);

        let table = ctx.scene.find_by_name("poker_table").unwrap();
        assert_eq!(table.as_table().unwrap().occupied_count(), 2);
    }

    #[test]
    fn player_starts_standing_on_the_floor() {
        let (mut game, mut ctx) = house();
        let input = InputState::new();
        for _ in 0..30 {
            ctx.step_physics(1.0 / 60.0);
            ctx.update_entities(1.0 / 60.0);
            game.update(&mut ctx, &input);
            ctx.flush_despawns();
        }
        let pos = game.player().unwrap().position(&ctx).unwrap();
        assert!((pos.y - 0.9).abs() < 0.05, "capsule center at y={}", pos.y);
        assert!((pos.z - PLAYER_START.z).abs() < 0.05);
    }
}
