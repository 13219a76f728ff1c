//! First-person player: movement, look, targeting, interaction, shooting.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::api::game::{EngineContext, PlayerConfig};
use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::{Entity, EntityKind};
use crate::components::interactable::InteractAction;
use crate::components::inventory::{Inventory, ItemStack};
use crate::components::item::Item;
use crate::components::person::{Person, PersonRole};
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, CollisionCategory};
use crate::house::room;
use crate::input::queue::{InputState, Key};
use crate::renderer::camera::Camera;
use crate::systems::insanity::InsanityMeter;
use crate::systems::movement::{move_direction, slide_move};
use crate::systems::targeting::{closest_interactable, raycast_people, Hitbox, TargetCandidate};

/// Controller for the player's entity. The entity itself (body, inventory)
/// lives in the scene; this holds view and selection state.
pub struct Player {
    entity: EntityId,
    config: PlayerConfig,
    yaw: f32,
    pitch: f32,
    selected: usize,
    insanity: InsanityMeter,
    target: Option<EntityId>,
}

impl Player {
    /// Spawn the player's capsule standing on the floor at `floor_pos`.
    pub fn spawn(ctx: &mut EngineContext, config: PlayerConfig, floor_pos: Vec3) -> Self {
        let shape = ColliderDesc::CapsuleY {
            half_height: config.capsule_half_height,
            radius: config.capsule_radius,
        };
        let desc = BodyDesc::dynamic(shape)
            .with_position(floor_pos + Vec3::Y * shape.rest_height())
            .with_mass(config.mass)
            .with_category(CollisionCategory::Player)
            .with_fixed_rotation(true);
        let id = ctx.next_id();
        let person = Person::new("Player", PersonRole::Player);
        let entity = Entity::new(id, EntityKind::Person(person)).with_name("player");
        ctx.spawn_with_body(entity, desc, ColliderMaterial::default());
        log::info!("player {} spawned at {:?}", id.0, floor_pos);

        Self {
            entity: id,
            config,
            yaw: 0.0,
            pitch: 0.0,
            selected: 0,
            insanity: InsanityMeter::new(config.insanity),
            target: None,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Face a direction. Pitch is clamped to the look limit.
    pub fn set_view(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw.rem_euclid(TAU);
        self.pitch = pitch.clamp(-self.config.pitch_limit, self.config.pitch_limit);
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// What the crosshair was on at the end of the last update.
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn insanity(&self) -> &InsanityMeter {
        &self.insanity
    }

    pub fn is_alive(&self, ctx: &EngineContext) -> bool {
        ctx.scene.get(self.entity).is_some_and(|e| e.active)
    }

    pub fn is_seated(&self, ctx: &EngineContext) -> bool {
        ctx.find_seat_of(self.entity).is_some()
    }

    /// Capsule center.
    pub fn position(&self, ctx: &EngineContext) -> Option<Vec3> {
        let body = ctx.scene.get(self.entity)?.body?;
        Some(body.update(&ctx.physics).0)
    }

    pub fn eye_position(&self, ctx: &EngineContext) -> Option<Vec3> {
        self.position(ctx).map(|p| p + Vec3::Y * self.config.eye_offset)
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    pub fn camera(&self, ctx: &EngineContext, aspect: f32) -> Camera {
        let mut camera = Camera::new(aspect);
        camera.position = self.eye_position(ctx).unwrap_or(Vec3::ZERO);
        camera.yaw = self.yaw;
        camera.pitch = self.pitch;
        camera
    }

    pub fn inventory<'a>(&self, ctx: &'a EngineContext) -> Option<&'a Inventory> {
        ctx.scene
            .get(self.entity)
            .and_then(Entity::as_person)
            .map(|p| &p.inventory)
    }

    fn inventory_mut<'a>(&self, ctx: &'a mut EngineContext) -> Option<&'a mut Inventory> {
        ctx.scene
            .get_mut(self.entity)
            .and_then(Entity::as_person_mut)
            .map(|p| &mut p.inventory)
    }

    pub fn selected_stack<'a>(&self, ctx: &'a EngineContext) -> Option<&'a ItemStack> {
        self.inventory(ctx)?.get(self.selected)
    }

    /// One simulation step.
    pub fn update(&mut self, ctx: &mut EngineContext, input: &InputState, dt: f32) {
        if !self.is_alive(ctx) {
            return;
        }
        self.look(input);
        self.cycle_selection(ctx, input);

        let moving = self.move_body(ctx, input, dt);
        self.insanity.update(dt, moving);

        self.target = self.find_target(ctx);
        if input.was_pressed(Key::Interact) {
            self.interact(ctx);
        }
        if input.was_pressed(Key::Use) {
            self.use_selected(ctx);
        }
        if input.was_pressed(Key::Drop) {
            self.drop_selected(ctx);
        }
        self.clamp_selection(ctx);
    }

    fn look(&mut self, input: &InputState) {
        let delta = input.mouse_delta() * self.config.mouse_sensitivity;
        self.set_view(self.yaw - delta.x, self.pitch - delta.y);
    }

    // -- Inventory selection --

    fn cycle_selection(&mut self, ctx: &EngineContext, input: &InputState) {
        let count = self.inventory(ctx).map_or(0, Inventory::len);
        if count == 0 {
            self.selected = 0;
            return;
        }
        if input.was_pressed(Key::NextItem) {
            self.selected = (self.selected + 1) % count;
        }
        if input.was_pressed(Key::PrevItem) {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    pub fn select_next(&mut self, ctx: &EngineContext) {
        let count = self.inventory(ctx).map_or(0, Inventory::len);
        self.selected = if count == 0 { 0 } else { (self.selected + 1) % count };
    }

    pub fn select_previous(&mut self, ctx: &EngineContext) {
        let count = self.inventory(ctx).map_or(0, Inventory::len);
        self.selected = if count == 0 { 0 } else { (self.selected + count - 1) % count };
    }

    /// Keep the selection on a real stack after the inventory shrinks.
    fn clamp_selection(&mut self, ctx: &EngineContext) {
        let count = self.inventory(ctx).map_or(0, Inventory::len);
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    // -- Movement --

    /// Returns whether the player actually moved.
    fn move_body(&mut self, ctx: &mut EngineContext, input: &InputState, dt: f32) -> bool {
        let Some(body) = ctx.scene.get(self.entity).and_then(|e| e.body) else {
            return false;
        };

        if let Some(seat) = ctx.find_seat_of(self.entity) {
            let seat_pos = ctx
                .scene
                .get(seat.table)
                .and_then(Entity::as_table)
                .and_then(|t| t.seat(seat.seat))
                .map(|s| s.position);
            if let Some(pos) = seat_pos {
                ctx.sit_down(self.entity, pos);
            }
            return false;
        }

        let forward = input.axis(Key::Back, Key::Forward);
        let strafe = input.axis(Key::Left, Key::Right);
        let delta = move_direction(self.yaw, forward, strafe) * self.config.move_speed * dt;
        let start = body.update(&ctx.physics).0;

        let shape = body.shape();
        let me = self.entity;
        let end = slide_move(start, delta, |at| {
            ctx.contacts_with(&shape, CollisionCategory::Player, at, me)
                .into_iter()
                .map(|c| c.normal)
                .collect()
        });

        // Vertical motion stays with physics; horizontal velocity is zeroed.
        ctx.physics.set_horizontal_position(body.handle(), end.x, end.z);
        if let Some(e) = ctx.scene.get_mut(me) {
            e.pos.x = end.x;
            e.pos.z = end.z;
        }
        (end - start).length_squared() > 1e-10
    }

    // -- Targeting and interaction --

    fn find_target(&self, ctx: &EngineContext) -> Option<EntityId> {
        let eye = self.eye_position(ctx)?;
        let candidates = ctx
            .scene
            .iter()
            .filter(|e| e.id != self.entity && e.can_interact())
            .filter_map(|e| {
                Some(TargetCandidate {
                    id: e.id,
                    position: e.pos,
                    range: e.interactable?.range,
                })
            });
        closest_interactable(eye, self.forward(), candidates, &self.config.targeting)
            .map(|(id, _)| id)
    }

    fn interact(&mut self, ctx: &mut EngineContext) {
        if self.is_seated(ctx) {
            ctx.unseat_person(self.entity);
            return;
        }
        let Some(target) = self.target else {
            return;
        };
        let action = ctx
            .scene
            .get(target)
            .filter(|e| e.can_interact())
            .and_then(|e| e.interactable)
            .map(|i| i.action);
        match action {
            Some(InteractAction::PickUp) => self.pick_up(ctx, target),
            Some(InteractAction::TakeSeat) => self.take_seat(ctx, target),
            Some(InteractAction::TakePot) => self.take_pot(ctx, target),
            None => {}
        }
    }

    fn pick_up(&mut self, ctx: &mut EngineContext, target: EntityId) {
        let Some(item) = ctx.scene.get(target).and_then(Entity::as_item).copied() else {
            return;
        };
        let Some(inventory) = self.inventory_mut(ctx) else {
            return;
        };
        inventory.add(item);
        ctx.queue_despawn(target);
        log::info!("picked up {}", item.type_string());
        ctx.emit_event(GameEvent::PickedUp {
            person: self.entity,
            item: target,
        });
    }

    fn take_seat(&mut self, ctx: &mut EngineContext, table: EntityId) {
        let Some(pos) = self.position(ctx) else {
            return;
        };
        let seat = ctx
            .scene
            .get(table)
            .and_then(Entity::as_table)
            .and_then(|t| t.find_closest_open_seat(pos));
        match seat {
            Some(index) => {
                ctx.seat_person(table, self.entity, index);
            }
            None => log::debug!("table {} is full", table.0),
        }
    }

    fn take_pot(&mut self, ctx: &mut EngineContext, pot: EntityId) {
        let chips = match ctx.scene.get_mut(pot).and_then(Entity::as_chip_stack_mut) {
            Some(stack) => stack.take_all(),
            None => return,
        };
        let value: u32 = chips.iter().map(|c| c.value()).sum();
        if let Some(inventory) = self.inventory_mut(ctx) {
            for chip in chips {
                inventory.add(Item::Chip(chip));
            }
        }
        ctx.queue_despawn(pot);
        log::info!("took a pot worth {}", value);
        ctx.emit_event(GameEvent::PotTaken {
            person: self.entity,
            value,
        });
    }

    // -- Using items --

    fn use_selected(&mut self, ctx: &mut EngineContext) {
        let Some(item) = self.selected_stack(ctx).map(|s| s.item) else {
            return;
        };
        if !item.usable() {
            return;
        }
        match item {
            Item::Weapon(_) => self.shoot(ctx),
            Item::Substance(substance) => {
                let selected = self.selected;
                if let Some(inventory) = self.inventory_mut(ctx) {
                    inventory.remove_one(selected);
                }
                substance.consume(&mut ctx.effects);
                ctx.emit_event(GameEvent::SubstanceUsed {
                    person: self.entity,
                });
            }
            Item::Card(_) | Item::Chip(_) => {}
        }
    }

    fn shoot(&mut self, ctx: &mut EngineContext) {
        let selected = self.selected;
        let remaining = {
            let Some(weapon) = self
                .inventory_mut(ctx)
                .and_then(|inv| inv.get_mut(selected))
                .and_then(|s| s.item.as_weapon_mut())
            else {
                return;
            };
            if !weapon.ready() || !weapon.shoot() {
                return;
            }
            weapon.ammo()
        };
        let Some(eye) = self.eye_position(ctx) else {
            return;
        };

        let hitboxes = ctx
            .scene
            .iter()
            .filter(|e| e.active && e.id != self.entity)
            .filter_map(|e| {
                let person = e.as_person()?;
                Some(Hitbox {
                    id: e.id,
                    base: feet_position(e),
                    height: person.hitbox_height(),
                })
            });
        let hit = raycast_people(eye, self.forward(), hitboxes, &self.config.shot).map(|(id, _)| id);
        ctx.emit_event(GameEvent::Shot {
            shooter: self.entity,
            hit,
        });

        if let Some(victim) = hit {
            if ctx.kill(victim, self.entity) {
                self.insanity.record_kill();
            }
        }

        if remaining == 0 {
            if let Some(inventory) = self.inventory_mut(ctx) {
                inventory.remove_stack(selected);
            }
            log::info!("weapon empty, discarded");
            ctx.emit_event(GameEvent::WeaponDepleted { owner: self.entity });
        }
    }

    /// Put one of the selected item back into the world in front of the player.
    fn drop_selected(&mut self, ctx: &mut EngineContext) {
        let Some(eye) = self.eye_position(ctx) else {
            return;
        };
        let selected = self.selected;
        let Some(mut item) = self.inventory_mut(ctx).and_then(|inv| inv.remove_one(selected)) else {
            return;
        };

        let flat = Vec3::new(self.forward().x, 0.0, self.forward().z).normalize_or_zero();
        let at = eye + flat * self.config.drop_distance;
        let id = match &mut item {
            Item::Card(card) if !ctx.scene.contains(card.id) => card.id,
            Item::Card(card) => {
                card.id = ctx.next_id();
                card.id
            }
            _ => ctx.next_id(),
        };
        room::spawn_loose_item(ctx, id, item, at);
        log::info!("dropped {}", item.type_string());
        ctx.emit_event(GameEvent::Dropped {
            person: self.entity,
            item: id,
        });
    }
}

/// Bottom of a person: bodies are centered, body-less people stand on `pos`.
fn feet_position(entity: &Entity) -> Vec3 {
    match entity.body {
        Some(body) => entity.pos - Vec3::Y * body.shape().rest_height(),
        None => entity.pos,
    }
}
