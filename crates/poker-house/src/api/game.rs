use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{EntityId, GameEvent, IdAllocator};
use crate::components::entity::{Entity, EntityKind};
use crate::components::item::Item;
use crate::components::person::SeatAssignment;
use crate::core::body::{Collider, RigidBody};
use crate::core::physics::{
    BodyDesc, ColliderDesc, ColliderMaterial, CollisionCategory, CollisionPair, Penetration,
    PhysicsWorld, MAX_STEP_DT,
};
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::input::queue::InputState;
use crate::renderer::instance::RenderBuffer;
use crate::systems::insanity::InsanityConfig;
use crate::systems::targeting::{ShotParams, TargetingParams};
use crate::systems::trip::SessionEffects;

/// Player tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walking speed in units per second.
    pub move_speed: f32,
    /// Radians per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Largest look angle above or below the horizon.
    pub pitch_limit: f32,
    pub capsule_radius: f32,
    pub capsule_half_height: f32,
    pub mass: f32,
    /// Eye height above the capsule center.
    pub eye_offset: f32,
    /// How far in front of the eye a dropped item appears.
    pub drop_distance: f32,
    pub targeting: TargetingParams,
    pub shot: ShotParams,
    pub insanity: InsanityConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            mouse_sensitivity: 0.0025,
            pitch_limit: 1.5,
            capsule_radius: 0.4,
            capsule_half_height: 0.5,
            mass: 70.0,
            eye_offset: 0.7,
            drop_distance: 0.8,
            targeting: TargetingParams::default(),
            shot: ShotParams::default(),
            insanity: InsanityConfig::default(),
        }
    }
}

/// Session configuration. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub gravity: Vec3,
    /// Largest dt handed to the physics step.
    pub max_physics_dt: f32,
    /// Seed for deck shuffles.
    pub seed: u64,
    /// Initial capacity of the draw list.
    pub max_instances: usize,
    pub player: PlayerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            max_physics_dt: MAX_STEP_DT,
            seed: 42,
            max_instances: 512,
            player: PlayerConfig::default(),
        }
    }
}

/// The contract a game fulfils for the runner.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the initial scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One simulation step, after physics sync and before removals are flushed.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputState);

    /// Optional pass for extra draw instances after the scene is drawn.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Everything one session owns. Passed explicitly to every subsystem;
/// tests build as many isolated contexts as they like.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub ids: IdAllocator,
    pub rng: Rng,
    pub effects: SessionEffects,
    pub events: Vec<GameEvent>,
    max_physics_dt: f32,
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            physics: PhysicsWorld::new(config.gravity),
            ids: IdAllocator::new(),
            rng: Rng::new(config.seed),
            effects: SessionEffects::default(),
            events: Vec::new(),
            max_physics_dt: config.max_physics_dt,
            collision_events: Vec::new(),
        }
    }

    pub fn next_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (events, collision events).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        self.collision_events.clear();
    }

    // -- Spawning --

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        id
    }

    /// Spawn an entity with a simulated body. The entity takes the body's
    /// starting pose.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let body = RigidBody::from_desc(&mut self.physics, entity.id, desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.spawn(entity)
    }

    /// Spawn an entity with a static collider at `entity.pos + offset`.
    pub fn spawn_static(
        &mut self,
        entity: Entity,
        shape: ColliderDesc,
        offset: Vec3,
        category: CollisionCategory,
    ) -> EntityId {
        let collider =
            Collider::init_static(&mut self.physics, entity.id, shape, entity.pos, offset, category);
        self.spawn(entity.with_collider(collider))
    }

    /// Copy an existing entity to `position` under a new id. The copy gets
    /// its own physics objects built from the template's descriptions.
    pub fn spawn_clone(&mut self, template: EntityId, position: Vec3) -> Option<EntityId> {
        let mut entity = self.scene.get(template)?.clone();
        let id = self.ids.next_id();
        entity.id = id;
        entity.pos = position;
        match &mut entity.kind {
            EntityKind::Item(Item::Card(card)) => card.id = id,
            EntityKind::Person(person) => person.set_seat(None),
            EntityKind::PokerTable(table) => {
                table.vacate_all();
                table.deck_mut().reissue_ids(&mut self.ids);
            }
            _ => {}
        }
        if let Some(body) = entity.body {
            let desc = body.desc().with_position(position).with_rotation(entity.rotation);
            entity.body = Some(RigidBody::from_desc(&mut self.physics, id, desc, body.material()));
        }
        if let Some(collider) = entity.collider {
            entity.collider = Some(collider.duplicate(&mut self.physics, id, position));
        }
        log::debug!("cloned {} into {}", template.0, id.0);
        Some(self.spawn(entity))
    }

    /// Remove an entity now, tearing down its physics and any seat it held.
    /// Removing a table leaves its occupants unseated where they are.
    /// Use [`EngineContext::queue_despawn`] while iterating the scene.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.release_seat(id);
        let occupants = self
            .scene
            .get_mut(id)
            .and_then(Entity::as_table_mut)
            .map(|table| table.vacate_all())
            .unwrap_or_default();
        for person in occupants {
            if let Some(p) = self.scene.get_mut(person).and_then(Entity::as_person_mut) {
                p.set_seat(None);
            }
        }
        let entity = self.scene.despawn(id)?;
        if let Some(body) = entity.body {
            body.remove(&mut self.physics);
        }
        if let Some(collider) = entity.collider {
            collider.remove(&mut self.physics);
        }
        log::debug!("despawned {} ({})", id.0, entity.type_string());
        Some(entity)
    }

    /// Defer removal until [`EngineContext::flush_despawns`].
    /// The entity goes inactive right away.
    pub fn queue_despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.active = false;
        }
        self.scene.queue_despawn(id);
    }

    /// Remove everything queued. Returns how many entities went away.
    pub fn flush_despawns(&mut self) -> usize {
        self.scene
            .take_pending_despawns()
            .into_iter()
            .filter_map(|id| self.despawn(id))
            .count()
    }

    // -- Per-step --

    /// Step physics, keeping this step's collision events. Returns whether a
    /// step ran.
    pub fn step_physics(&mut self, dt: f32) -> bool {
        self.collision_events.clear();
        let dt = dt.min(self.max_physics_dt);
        self.physics.step_into(dt, &mut self.collision_events)
    }

    /// Sync every body-backed entity from physics, then run per-entity
    /// updates and session effects.
    pub fn update_entities(&mut self, dt: f32) {
        for entity in self.scene.iter_mut() {
            entity.sync_from_physics(&self.physics);
        }
        for entity in self.scene.iter_mut() {
            entity.update(&mut self.physics, dt);
        }
        self.effects.tick(dt);
    }

    /// Collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    // -- Queries --

    /// Penetrations of `shape` at `position` against every static collider
    /// in the scene, except `exclude`'s own.
    pub fn contacts_with(
        &self,
        shape: &ColliderDesc,
        category: CollisionCategory,
        position: Vec3,
        exclude: EntityId,
    ) -> Vec<Penetration> {
        let colliders = self
            .scene
            .iter()
            .filter(|e| e.active && e.id != exclude)
            .filter_map(|e| e.static_collider().map(Collider::handle));
        self.physics.penetrations(shape, category, position, colliders)
    }

    // -- Seating --

    /// Which seat, at any table, `person` holds.
    pub fn find_seat_of(&self, person: EntityId) -> Option<SeatAssignment> {
        self.scene.iter().find_map(|e| {
            let seat = e.as_table()?.find_seat_index(person)?;
            Some(SeatAssignment { table: e.id, seat })
        })
    }

    /// Seat `person` at seat `index` of `table` and move them there.
    /// Fails if the person is already seated anywhere, is not a person, or
    /// the seat is taken or out of range.
    pub fn seat_person(&mut self, table: EntityId, person: EntityId, index: usize) -> bool {
        if self.find_seat_of(person).is_some() {
            return false;
        }
        if self.scene.get(person).and_then(Entity::as_person).is_none() {
            return false;
        }
        let seat_pos = {
            let Some(t) = self.scene.get_mut(table).and_then(Entity::as_table_mut) else {
                return false;
            };
            if !t.seat_person(person, index) {
                return false;
            }
            match t.seat(index) {
                Some(seat) => seat.position,
                None => return false,
            }
        };
        if let Some(p) = self.scene.get_mut(person).and_then(Entity::as_person_mut) {
            p.set_seat(Some(SeatAssignment { table, seat: index }));
        }
        self.sit_down(person, seat_pos);
        log::info!("{} sat at table {} seat {}", person.0, table.0, index);
        self.emit_event(GameEvent::Seated { person, table, seat: index });
        true
    }

    /// Free `person`'s seat and stand them up where the seat is.
    pub fn unseat_person(&mut self, person: EntityId) -> Option<SeatAssignment> {
        let assignment = self.release_seat(person)?;
        let seat_pos = self
            .scene
            .get(assignment.table)
            .and_then(Entity::as_table)
            .and_then(|t| t.seat(assignment.seat))
            .map(|s| s.position);
        if let Some(pos) = seat_pos {
            self.stand_up(person, pos);
        }
        log::info!("{} left table {}", person.0, assignment.table.0);
        self.emit_event(GameEvent::Stood { person });
        Some(assignment)
    }

    /// Clear occupancy on the table and the person, without moving anyone.
    fn release_seat(&mut self, person: EntityId) -> Option<SeatAssignment> {
        let assignment = self.find_seat_of(person)?;
        if let Some(t) = self.scene.get_mut(assignment.table).and_then(Entity::as_table_mut) {
            t.unseat_person(person);
        }
        if let Some(p) = self.scene.get_mut(person).and_then(Entity::as_person_mut) {
            p.set_seat(None);
        }
        Some(assignment)
    }

    /// Put a person's body at a seat, killing momentum. Seats are at floor
    /// level; bodies are lifted to their resting height.
    pub fn sit_down(&mut self, person: EntityId, seat_pos: Vec3) {
        self.place_person(person, seat_pos);
    }

    pub fn stand_up(&mut self, person: EntityId, pos: Vec3) {
        self.place_person(person, pos);
    }

    fn place_person(&mut self, person: EntityId, floor_pos: Vec3) {
        let Some(entity) = self.scene.get_mut(person) else {
            return;
        };
        match entity.body {
            Some(body) => {
                let rest = body.shape().rest_height();
                let pos = Vec3::new(floor_pos.x, floor_pos.y + rest, floor_pos.z);
                body.teleport(&mut self.physics, pos);
                entity.pos = pos;
            }
            None => entity.pos = floor_pos,
        }
    }

    // -- Combat --

    /// Kill `victim`: unseat them, open the pots if they ran the table,
    /// and queue their removal. Returns false if there is nobody to kill.
    pub fn kill(&mut self, victim: EntityId, killer: EntityId) -> bool {
        let is_dealer = match self.scene.get(victim) {
            Some(e) if e.active && e.as_person().is_some() => e.is_dealer(),
            _ => return false,
        };
        self.unseat_person(victim);
        if is_dealer {
            self.open_pots();
        }
        self.queue_despawn(victim);
        log::info!("{} killed {}", killer.0, victim.0);
        self.emit_event(GameEvent::Killed { victim, killer });
        true
    }

    /// Unlock every pot chip stack. Returns how many were unlocked.
    pub fn open_pots(&mut self) -> usize {
        let mut opened = 0;
        for entity in self.scene.iter_mut() {
            let is_pot = entity.as_chip_stack().is_some_and(|s| s.is_pot());
            if let (true, Some(interactable)) = (is_pot, entity.interactable.as_mut()) {
                if !interactable.can_interact {
                    interactable.can_interact = true;
                    opened += 1;
                }
            }
        }
        if opened > 0 {
            log::info!("{} pots opened", opened);
            self.emit_event(GameEvent::PotsOpened);
        }
        opened
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

/// Extra draw access for [`Game::render`].
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub render_buffer: &'a mut RenderBuffer,
}
