//! Spawn helpers for the house: room shell, tables, people and loose items.

use glam::Vec3;

use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::components::chips::ChipStack;
use crate::components::deck::Deck;
use crate::components::entity::{Entity, EntityKind};
use crate::components::interactable::Interactable;
use crate::components::item::{Item, Weapon};
use crate::components::person::{Person, PersonRole};
use crate::components::table::PokerTable;
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, CollisionCategory};

pub const WALL_THICKNESS: f32 = 0.5;
pub const TABLE_HALF_EXTENTS: Vec3 = Vec3::new(1.2, 0.4, 0.8);
pub const SEAT_RADIUS: f32 = 2.0;
/// Seat the dealer takes at a freshly spawned table.
pub const DEALER_SEAT: usize = 6;

const NPC_HALF_HEIGHT: f32 = 0.5;
const NPC_RADIUS: f32 = 0.4;
const ITEM_MASS: f32 = 0.1;

pub fn spawn_floor(ctx: &mut EngineContext, half_width: f32, half_depth: f32) -> EntityId {
    let id = ctx.next_id();
    let entity = Entity::new(id, EntityKind::Floor)
        .with_name("floor")
        .with_scale(Vec3::new(half_width * 2.0, 1.0, half_depth * 2.0));
    ctx.spawn_static(
        entity,
        ColliderDesc::Plane { normal: Vec3::Y, offset: 0.0 },
        Vec3::ZERO,
        CollisionCategory::World,
    )
}

pub fn spawn_ceiling(ctx: &mut EngineContext, half_width: f32, half_depth: f32, height: f32) -> EntityId {
    let id = ctx.next_id();
    let entity = Entity::new(id, EntityKind::Ceiling)
        .with_name("ceiling")
        .with_pos(Vec3::new(0.0, height, 0.0))
        .with_scale(Vec3::new(half_width * 2.0, 1.0, half_depth * 2.0));
    ctx.spawn_static(
        entity,
        ColliderDesc::Plane { normal: Vec3::NEG_Y, offset: -height },
        Vec3::ZERO,
        CollisionCategory::World,
    )
}

/// Axis-aligned wall block centered at `center`.
pub fn spawn_wall(ctx: &mut EngineContext, center: Vec3, half_extents: Vec3) -> EntityId {
    let id = ctx.next_id();
    let entity = Entity::new(id, EntityKind::Wall)
        .with_pos(center)
        .with_scale(half_extents * 2.0);
    ctx.spawn_static(
        entity,
        ColliderDesc::Cuboid { half_extents },
        Vec3::ZERO,
        CollisionCategory::World,
    )
}

/// Floor, ceiling and four walls enclosing `[-half_width, half_width] x
/// [-half_depth, half_depth]`.
pub fn spawn_room(ctx: &mut EngineContext, half_width: f32, half_depth: f32, height: f32) -> Vec<EntityId> {
    let t = WALL_THICKNESS * 0.5;
    let y = height * 0.5;
    let mut ids = vec![
        spawn_floor(ctx, half_width, half_depth),
        spawn_ceiling(ctx, half_width, half_depth, height),
    ];
    let x_wall = Vec3::new(t, y, half_depth + WALL_THICKNESS);
    let z_wall = Vec3::new(half_width + WALL_THICKNESS, y, t);
    ids.push(spawn_wall(ctx, Vec3::new(-half_width - t, y, 0.0), x_wall));
    ids.push(spawn_wall(ctx, Vec3::new(half_width + t, y, 0.0), x_wall));
    ids.push(spawn_wall(ctx, Vec3::new(0.0, y, -half_depth - t), z_wall));
    ids.push(spawn_wall(ctx, Vec3::new(0.0, y, half_depth + t), z_wall));
    log::debug!("room {}x{}x{} built", half_width * 2.0, height, half_depth * 2.0);
    ids
}

/// Poker table standing on the floor at `floor_center`, with a fresh
/// shuffled deck. The entity sits at the center of the table top.
pub fn spawn_table(ctx: &mut EngineContext, floor_center: Vec3) -> EntityId {
    let mut deck = Deck::new(&mut ctx.ids);
    deck.shuffle(&mut ctx.rng);
    let table = PokerTable::new(floor_center, TABLE_HALF_EXTENTS, SEAT_RADIUS, deck);

    let id = ctx.next_id();
    let top = floor_center + Vec3::Y * TABLE_HALF_EXTENTS.y * 2.0;
    let entity = Entity::new(id, EntityKind::PokerTable(table))
        .with_name("poker_table")
        .with_pos(top)
        .with_scale(TABLE_HALF_EXTENTS * 2.0)
        .with_interactable(Interactable::take_seat());
    ctx.spawn_static(
        entity,
        ColliderDesc::Cuboid { half_extents: TABLE_HALF_EXTENTS },
        Vec3::NEG_Y * TABLE_HALF_EXTENTS.y,
        CollisionCategory::Table,
    )
}

/// A non-player person standing at `floor_pos`. NPCs have no body, only a
/// static capsule that blocks the player.
pub fn spawn_npc(ctx: &mut EngineContext, person: Person, floor_pos: Vec3) -> EntityId {
    let id = ctx.next_id();
    let entity = Entity::new(id, EntityKind::Person(person)).with_pos(floor_pos);
    ctx.spawn_static(
        entity,
        ColliderDesc::CapsuleY { half_height: NPC_HALF_HEIGHT, radius: NPC_RADIUS },
        Vec3::Y * (NPC_HALF_HEIGHT + NPC_RADIUS),
        CollisionCategory::Player,
    )
}

/// The dealer for `table`, seated at [`DEALER_SEAT`].
pub fn spawn_dealer(ctx: &mut EngineContext, table: EntityId) -> Option<EntityId> {
    let seat_pos = ctx
        .scene
        .get(table)
        .and_then(Entity::as_table)
        .and_then(|t| t.seat(DEALER_SEAT))
        .map(|s| s.position)?;
    let dealer = spawn_npc(ctx, Person::new("Dealer", PersonRole::Dealer { table }), seat_pos);
    if !ctx.seat_person(table, dealer, DEALER_SEAT) {
        log::warn!("dealer seat at table {} is taken", table.0);
    }
    Some(dealer)
}

/// An armed enemy standing at `floor_pos`.
pub fn spawn_enemy(ctx: &mut EngineContext, name: &str, floor_pos: Vec3) -> EntityId {
    let mut person = Person::new(name, PersonRole::Enemy);
    person.inventory.add(Item::Weapon(Weapon::pistol()));
    spawn_npc(ctx, person, floor_pos)
}

fn item_shape(item: &Item) -> ColliderDesc {
    match item {
        Item::Card(_) => ColliderDesc::Cuboid { half_extents: Vec3::new(0.032, 0.005, 0.045) },
        Item::Chip(_) => ColliderDesc::Cuboid { half_extents: Vec3::new(0.02, 0.0035, 0.02) },
        Item::Weapon(_) => ColliderDesc::Cuboid { half_extents: Vec3::new(0.1, 0.05, 0.02) },
        Item::Substance(_) => ColliderDesc::Ball { radius: 0.05 },
    }
}

/// A pick-up-able item with its own dynamic body, falling from `pos`.
/// Cards use their own id as the entity id.
pub fn spawn_loose_item(ctx: &mut EngineContext, id: EntityId, item: Item, pos: Vec3) -> EntityId {
    let desc = BodyDesc::dynamic(item_shape(&item))
        .with_position(pos)
        .with_mass(ITEM_MASS)
        .with_category(CollisionCategory::Item);
    let entity = Entity::new(id, EntityKind::Item(item)).with_interactable(Interactable::pick_up());
    ctx.spawn_with_body(entity, desc, ColliderMaterial::default())
}

/// A pick-up-able item resting on a table top. Items fall through tables, so
/// these have no body.
pub fn spawn_table_item(ctx: &mut EngineContext, id: EntityId, item: Item, pos: Vec3) -> EntityId {
    let entity = Entity::new(id, EntityKind::Item(item))
        .with_pos(pos)
        .with_interactable(Interactable::pick_up());
    ctx.spawn(entity)
}

/// A locked pot worth `amount`, made of the largest chips that fit.
pub fn spawn_pot(ctx: &mut EngineContext, pos: Vec3, amount: u32) -> EntityId {
    let id = ctx.next_id();
    let entity = Entity::new(id, EntityKind::ChipStack(ChipStack::pot(amount)))
        .with_pos(pos)
        .with_interactable(Interactable::take_pot());
    ctx.spawn(entity)
}

/// Draw `count` cards from `table`'s deck and lay them face up in a row on
/// the table top, centered on the table. Returns the spawned card ids.
pub fn deal_to_table(ctx: &mut EngineContext, table: EntityId, count: usize) -> Vec<EntityId> {
    const SPACING: f32 = 0.1;

    let Some(top) = ctx.scene.get(table).map(|e| e.pos) else {
        return Vec::new();
    };
    let mut dealt = Vec::with_capacity(count);
    let first_x = -(count.saturating_sub(1) as f32) * SPACING * 0.5;
    for i in 0..count {
        let card = match ctx.scene.get_mut(table).and_then(Entity::as_table_mut) {
            Some(t) => t.deal_card(),
            None => None,
        };
        let Some(card) = card else {
            log::warn!("table {} ran out of cards", table.0);
            break;
        };
        let at = top + Vec3::new(first_x + i as f32 * SPACING, 0.0, 0.0);
        dealt.push(spawn_table_item(ctx, card.id, Item::Card(card), at));
    }
    dealt
}
