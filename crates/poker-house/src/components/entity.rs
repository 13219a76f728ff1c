use glam::{Mat3, Mat4, Quat, Vec3};

use crate::api::types::EntityId;
use crate::components::chips::ChipStack;
use crate::components::interactable::Interactable;
use crate::components::item::Item;
use crate::components::person::Person;
use crate::components::table::PokerTable;
use crate::core::body::{euler_from_matrix, Collider, RigidBody};
use crate::core::physics::PhysicsWorld;

/// What an entity is. Closed set; capability queries on [`Entity`] read it.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Item(Item),
    Person(Person),
    PokerTable(PokerTable),
    ChipStack(ChipStack),
    Wall,
    Floor,
    Ceiling,
    Prop,
}

/// Fat entity: one struct with optional components.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Inactive entities are skipped by updates, targeting and drawing.
    pub active: bool,
    pub pos: Vec3,
    /// Orientation. Euler angles are only ever derived from this.
    pub rotation: Quat,
    pub scale: Vec3,
    pub uses_lighting: bool,
    pub interactable: Option<Interactable>,
    /// Simulated body. When present, physics owns `pos` and `rotation`.
    pub body: Option<RigidBody>,
    pub collider: Option<Collider>,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            name: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            uses_lighting: true,
            interactable: None,
            body: None,
            collider: None,
            kind,
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_lighting(mut self, uses_lighting: bool) -> Self {
        self.uses_lighting = uses_lighting;
        self
    }

    pub fn with_interactable(mut self, interactable: Interactable) -> Self {
        self.interactable = Some(interactable);
        self
    }

    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    // -- Classification --

    /// Full-ancestry type string, for logs and stack keys.
    pub fn type_string(&self) -> String {
        match &self.kind {
            EntityKind::Item(item) => item.type_string(),
            EntityKind::Person(person) => person.type_string().to_string(),
            EntityKind::PokerTable(_) => "object_interactable_poker_table".to_string(),
            EntityKind::ChipStack(stack) if stack.is_pot() => {
                "object_interactable_chip_stack_pot".to_string()
            }
            EntityKind::ChipStack(_) => "object_interactable_chip_stack".to_string(),
            EntityKind::Wall => "object_wall".to_string(),
            EntityKind::Floor => "object_floor".to_string(),
            EntityKind::Ceiling => "object_ceiling".to_string(),
            EntityKind::Prop => "object".to_string(),
        }
    }

    pub fn is_interactable(&self) -> bool {
        self.interactable.is_some()
    }

    /// Interactable and currently accepting interaction.
    pub fn can_interact(&self) -> bool {
        self.active && self.interactable.is_some_and(|i| i.can_interact)
    }

    pub fn as_item(&self) -> Option<&Item> {
        match &self.kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut Item> {
        match &mut self.kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.as_item().is_some_and(Item::is_weapon)
    }

    pub fn as_person(&self) -> Option<&Person> {
        match &self.kind {
            EntityKind::Person(person) => Some(person),
            _ => None,
        }
    }

    pub fn as_person_mut(&mut self) -> Option<&mut Person> {
        match &mut self.kind {
            EntityKind::Person(person) => Some(person),
            _ => None,
        }
    }

    pub fn is_dealer(&self) -> bool {
        self.as_person().is_some_and(Person::is_dealer)
    }

    pub fn as_table(&self) -> Option<&PokerTable> {
        match &self.kind {
            EntityKind::PokerTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut PokerTable> {
        match &mut self.kind {
            EntityKind::PokerTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_chip_stack(&self) -> Option<&ChipStack> {
        match &self.kind {
            EntityKind::ChipStack(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn as_chip_stack_mut(&mut self) -> Option<&mut ChipStack> {
        match &mut self.kind {
            EntityKind::ChipStack(stack) => Some(stack),
            _ => None,
        }
    }

    /// Collider that blocks player movement: any collider without a body.
    pub fn static_collider(&self) -> Option<&Collider> {
        self.collider.as_ref().filter(|c| c.is_static())
    }

    // -- Transform --

    /// Derived Euler angles (XYZ). Lossy near gimbal lock.
    pub fn euler_angles(&self) -> Vec3 {
        euler_from_matrix(Mat3::from_quat(self.rotation))
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.pos)
    }

    // -- Per-frame --

    /// Copy the simulated pose into the entity. No-op without a body.
    pub fn sync_from_physics(&mut self, world: &PhysicsWorld) {
        if let Some(body) = &self.body {
            let (pos, rot) = body.update(world);
            self.pos = pos;
            self.rotation = rot;
        }
    }

    /// Advance timers and push the entity's position into its static collider.
    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        if !self.active {
            return;
        }
        if let Some(collider) = self.static_collider() {
            let target = self.pos + collider.offset();
            if world.collider_translation(collider.handle()) != Some(target) {
                collider.update_from_object(world, self.pos);
            }
        }
        match &mut self.kind {
            EntityKind::Item(item) => {
                if let Some(weapon) = item.as_weapon_mut() {
                    weapon.tick(dt);
                }
            }
            EntityKind::Person(person) => person.inventory.tick(dt),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::item::{Card, Chip, Rank, Suit, Weapon};
    use crate::components::person::PersonRole;
    use crate::core::physics::{ColliderDesc, CollisionCategory};

    #[test]
    fn pistol_is_item_and_weapon() {
        let pistol = Entity::new(EntityId(1), EntityKind::Item(Item::Weapon(Weapon::pistol())));
        assert!(pistol.as_item().is_some());
        assert!(pistol.is_weapon());
        assert_eq!(pistol.type_string(), "object_interactable_item_weapon_pistol");
    }

    #[test]
    fn card_is_item_not_weapon() {
        let card = Card::new(EntityId(2), Suit::Clubs, Rank::Queen);
        let e = Entity::new(EntityId(2), EntityKind::Item(Item::Card(card)));
        assert!(e.as_item().is_some());
        assert!(!e.is_weapon());
        assert!(e.as_person().is_none());
    }

    #[test]
    fn dealer_classification() {
        let dealer = Entity::new(
            EntityId(3),
            EntityKind::Person(Person::new("Vic", PersonRole::Dealer { table: EntityId(9) })),
        );
        assert!(dealer.is_dealer());
        assert_eq!(dealer.type_string(), "object_person_dealer");
        assert!(dealer.as_item().is_none());
    }

    #[test]
    fn can_interact_requires_flag_and_activity() {
        let chip = Item::Chip(Chip::new(10).unwrap());
        let mut e = Entity::new(EntityId(4), EntityKind::Item(chip))
            .with_interactable(Interactable::pick_up());
        assert!(e.can_interact());
        e.active = false;
        assert!(!e.can_interact());

        let pot = Entity::new(EntityId(5), EntityKind::ChipStack(ChipStack::pot(50)))
            .with_interactable(Interactable::take_pot());
        assert!(pot.is_interactable());
        assert!(!pot.can_interact());
    }

    #[test]
    fn static_collider_is_structural() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let id = EntityId(6);
        let collider = Collider::init_static(
            &mut world,
            id,
            ColliderDesc::Cuboid { half_extents: Vec3::ONE },
            Vec3::ZERO,
            Vec3::ZERO,
            CollisionCategory::World,
        );
        let wall = Entity::new(id, EntityKind::Wall).with_collider(collider);
        assert!(wall.static_collider().is_some());

        let prop = Entity::new(EntityId(7), EntityKind::Prop);
        assert!(prop.static_collider().is_none());
    }

    #[test]
    fn moved_owner_drags_static_collider() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let id = EntityId(8);
        let offset = Vec3::new(0.0, 0.5, 0.0);
        let collider = Collider::init_static(
            &mut world,
            id,
            ColliderDesc::Ball { radius: 0.5 },
            Vec3::ZERO,
            offset,
            CollisionCategory::World,
        );
        let handle = collider.handle();
        let mut e = Entity::new(id, EntityKind::Prop).with_collider(collider);
        e.pos = Vec3::new(2.0, 0.0, 0.0);
        e.update(&mut world, 0.016);
        let at = world.collider_translation(handle).unwrap();
        assert!((at - Vec3::new(2.0, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn model_matrix_places_entity() {
        let e = Entity::new(EntityId(9), EntityKind::Prop).with_pos(Vec3::new(1.0, 2.0, 3.0));
        let p = e.model_matrix().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }
}
