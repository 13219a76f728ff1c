use glam::{Quat, Vec3};
use rapier3d::na;
use rapier3d::parry::query;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::api::types::EntityId;

/// Largest timestep the integrator accepts. Longer frames are clamped.
pub const MAX_STEP_DT: f32 = 0.1;

// ---------------------------------------------------------------------------
// Conversion helpers — glam ↔ nalgebra
// ---------------------------------------------------------------------------

pub(crate) fn vec3_to_na(v: Vec3) -> na::Vector3<f32> {
    na::Vector3::new(v.x, v.y, v.z)
}

pub(crate) fn na_to_vec3(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn quat_to_na(q: Quat) -> na::UnitQuaternion<f32> {
    na::UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

pub(crate) fn na_to_quat(q: &na::UnitQuaternion<f32>) -> Quat {
    let c = q.quaternion().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

fn isometry(pos: Vec3, rot: Quat) -> na::Isometry3<f32> {
    na::Isometry3::from_parts(na::Translation3::new(pos.x, pos.y, pos.z), quat_to_na(rot))
}

// ---------------------------------------------------------------------------
// Collision categories
// ---------------------------------------------------------------------------

/// Collision category of a collider.
///
/// Pairs collide only when each side's filter accepts the other's membership:
/// - the player collides with everything except items,
/// - items collide with everything except the player,
/// - the table accepts only the player, so items fall through it,
/// - world geometry (walls, floor, ceiling) collides with everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCategory {
    Player,
    Item,
    Table,
    World,
}

impl CollisionCategory {
    pub const PLAYER_BIT: u32 = 1 << 0;
    pub const ITEM_BIT: u32 = 1 << 1;
    pub const TABLE_BIT: u32 = 1 << 2;
    pub const WORLD_BIT: u32 = 1 << 3;

    pub fn membership(self) -> u32 {
        match self {
            CollisionCategory::Player => Self::PLAYER_BIT,
            CollisionCategory::Item => Self::ITEM_BIT,
            CollisionCategory::Table => Self::TABLE_BIT,
            CollisionCategory::World => Self::WORLD_BIT,
        }
    }

    pub fn filter(self) -> u32 {
        match self {
            CollisionCategory::Player => u32::MAX & !Self::ITEM_BIT,
            CollisionCategory::Item => u32::MAX & !Self::PLAYER_BIT,
            CollisionCategory::Table => Self::PLAYER_BIT,
            CollisionCategory::World => u32::MAX,
        }
    }

    /// Whether colliders of these two categories generate contacts.
    pub fn collides_with(self, other: CollisionCategory) -> bool {
        (self.membership() & other.filter()) != 0 && (other.membership() & self.filter()) != 0
    }

    fn interaction_groups(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.membership()),
            Group::from_bits_truncate(self.filter()),
        )
    }
}

// ---------------------------------------------------------------------------
// Descriptions
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    CapsuleY { half_height: f32, radius: f32 },
    /// Infinite plane `dot(normal, p) = offset`. Only valid for static colliders.
    Plane { normal: Vec3, offset: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderDesc::CapsuleY { half_height, radius } => {
                ColliderBuilder::capsule_y(half_height, radius)
            }
            ColliderDesc::Plane { normal, offset } => {
                ColliderBuilder::halfspace(na::Unit::new_normalize(vec3_to_na(normal)))
                    .translation(vec3_to_na(normal.normalize_or_zero() * offset))
            }
        }
    }

    fn shared_shape(&self) -> SharedShape {
        match *self {
            ColliderDesc::Ball { radius } => SharedShape::ball(radius),
            ColliderDesc::Cuboid { half_extents } => {
                SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderDesc::CapsuleY { half_height, radius } => {
                SharedShape::capsule_y(half_height, radius)
            }
            ColliderDesc::Plane { normal, .. } => {
                SharedShape::halfspace(na::Unit::new_normalize(vec3_to_na(normal)))
            }
        }
    }

    pub fn is_plane(&self) -> bool {
        matches!(self, ColliderDesc::Plane { .. })
    }

    /// Height of the shape's center above a floor it rests on upright.
    pub fn rest_height(&self) -> f32 {
        match *self {
            ColliderDesc::Ball { radius } => radius,
            ColliderDesc::Cuboid { half_extents } => half_extents.y,
            ColliderDesc::CapsuleY { half_height, radius } => half_height + radius,
            ColliderDesc::Plane { .. } => 0.0,
        }
    }
}

/// Surface properties for a collider. Contact friction and bounce are fixed
/// per collider rather than tuned per contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.1,
            friction: 0.8,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub fixed_rotation: bool,
    pub collider: ColliderDesc,
    /// Explicit mass. `None` derives mass from the material density.
    pub mass: Option<f32>,
    pub category: CollisionCategory,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            fixed_rotation: false,
            collider,
            mass: None,
            category: CollisionCategory::Item,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            fixed_rotation: true,
            category: CollisionCategory::World,
            ..Self::dynamic(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_category(mut self, category: CollisionCategory) -> Self {
        self.category = category;
        self
    }
}

/// Handle pair for a body and its single collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

/// A penetrating contact found by [`PhysicsWorld::penetrations`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Surface normal of the obstacle, pointing toward the probe.
    pub normal: Vec3,
    /// Penetration depth (positive).
    pub depth: f32,
}

// ---------------------------------------------------------------------------
// Event collector
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns the rigid-body simulation: bodies, colliders, broad and narrow phase.
///
/// Contacts are rebuilt by the narrow phase every step; the only thing handed
/// back to the game is the list of collision start/stop events of that step.
pub struct PhysicsWorld {
    gravity: na::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector (Y-up).
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> BodyHandles {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .position(isometry(desc.position, desc.rotation))
            .linvel(vec3_to_na(desc.velocity))
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .user_data(entity_id.0 as u128)
            .build();

        let body = self.bodies.insert(rb);

        let mut builder = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .collision_groups(desc.category.interaction_groups())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(entity_id.0 as u128);
        builder = match desc.mass {
            Some(mass) => builder.mass(mass),
            None => builder.density(material.density),
        };

        let collider = self
            .colliders
            .insert_with_parent(builder.build(), body, &mut self.bodies);

        BodyHandles { body, collider }
    }

    /// Create a collider with no body, placed directly in world space.
    /// Planes ignore `position` (they are placed by normal + offset).
    pub fn create_static_collider(
        &mut self,
        entity_id: EntityId,
        shape: &ColliderDesc,
        position: Vec3,
        category: CollisionCategory,
        material: ColliderMaterial,
    ) -> ColliderHandle {
        let mut builder = shape
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .collision_groups(category.interaction_groups())
            .user_data(entity_id.0 as u128);
        if !shape.is_plane() {
            builder = builder.translation(vec3_to_na(position));
        }
        self.colliders.insert(builder.build())
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.bodies.remove(
            body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Remove a collider that has no parent body.
    pub fn remove_collider(&mut self, collider: ColliderHandle) {
        self.colliders
            .remove(collider, &mut self.island_manager, &mut self.bodies, true);
    }

    /// Move a static collider to a new world position.
    pub fn set_collider_translation(&mut self, collider: ColliderHandle, pos: Vec3) {
        if let Some(c) = self.colliders.get_mut(collider) {
            c.set_translation(vec3_to_na(pos));
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Zero, negative or non-finite `dt` does nothing and returns `false`.
    /// `dt` above [`MAX_STEP_DT`] is clamped to keep the solver stable.
    pub fn step(&mut self, dt: f32) -> bool {
        let mut events = Vec::new();
        self.step_into(dt, &mut events)
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, dt: f32, collision_events: &mut Vec<CollisionPair>) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        self.integration_parameters.dt = dt.min(MAX_STEP_DT);

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            let entity_a = self.collider_to_entity(h1);
            let entity_b = self.collider_to_entity(h2);

            if let (Some(a), Some(b)) = (entity_a, entity_b) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
        true
    }

    /// The integration timestep used by the most recent step.
    pub fn last_dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: RigidBodyHandle, vel: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_linvel(vec3_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: RigidBodyHandle) -> Vec3 {
        self.bodies
            .get(body)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Get the current angular velocity of a body.
    pub fn angular_velocity(&self, body: RigidBodyHandle) -> Vec3 {
        self.bodies
            .get(body)
            .map(|rb| na_to_vec3(rb.angvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Place a body at `pos` and clear all of its velocity.
    pub fn teleport(&mut self, body: RigidBodyHandle, pos: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_translation(vec3_to_na(pos), true);
            rb.set_linvel(na::Vector3::zeros(), true);
            rb.set_angvel(na::Vector3::zeros(), true);
        }
    }

    /// Move a body horizontally while keeping its simulated height.
    /// Horizontal velocity is cleared; vertical velocity is kept for gravity.
    pub fn set_horizontal_position(&mut self, body: RigidBodyHandle, x: f32, z: f32) {
        if let Some(rb) = self.bodies.get_mut(body) {
            let t = *rb.translation();
            rb.set_translation(na::Vector3::new(x, t.y, z), true);
            let v = *rb.linvel();
            rb.set_linvel(na::Vector3::new(0.0, v.y, 0.0), true);
        }
    }

    /// Get the current position and orientation of a body.
    pub fn body_pose(&self, body: RigidBodyHandle) -> (Vec3, Quat) {
        self.bodies
            .get(body)
            .map(|rb| (na_to_vec3(rb.translation()), na_to_quat(rb.rotation())))
            .unwrap_or((Vec3::ZERO, Quat::IDENTITY))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders in the simulation (attached or static).
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Query the shape of a collider.
    /// Returns `None` if the collider no longer exists or has an unsupported shape.
    pub fn collider_shape(&self, collider: ColliderHandle) -> Option<ColliderDesc> {
        let collider = self.colliders.get(collider)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ColliderDesc::Ball { radius: ball.radius })
        } else if let Some(cuboid) = shape.as_cuboid() {
            Some(ColliderDesc::Cuboid {
                half_extents: na_to_vec3(&cuboid.half_extents),
            })
        } else if let Some(capsule) = shape.as_capsule() {
            Some(ColliderDesc::CapsuleY {
                half_height: capsule.half_height(),
                radius: capsule.radius,
            })
        } else if let Some(halfspace) = shape.as_halfspace() {
            let normal = na_to_vec3(&halfspace.normal);
            let offset = normal.dot(na_to_vec3(&collider.position().translation.vector));
            Some(ColliderDesc::Plane { normal, offset })
        } else {
            None
        }
    }

    /// World position of a collider.
    pub fn collider_translation(&self, collider: ColliderHandle) -> Option<Vec3> {
        self.colliders
            .get(collider)
            .map(|c| na_to_vec3(&c.position().translation.vector))
    }

    /// Test `shape` placed at `at` against the given colliders and return every
    /// penetrating contact whose category pair collides with `category`.
    pub fn penetrations(
        &self,
        shape: &ColliderDesc,
        category: CollisionCategory,
        at: Vec3,
        against: impl IntoIterator<Item = ColliderHandle>,
    ) -> Vec<Penetration> {
        let probe = shape.shared_shape();
        let probe_pos = isometry(at, Quat::IDENTITY);
        let probe_groups = category.interaction_groups();

        let mut hits = Vec::new();
        for handle in against {
            let collider = match self.colliders.get(handle) {
                Some(c) => c,
                None => continue,
            };
            if !collider.collision_groups().test(probe_groups) {
                continue;
            }
            let contact = query::contact(
                &probe_pos,
                &*probe,
                collider.position(),
                collider.shape(),
                0.0,
            );
            if let Ok(Some(contact)) = contact {
                if contact.dist < 0.0 {
                    hits.push(Penetration {
                        normal: na_to_vec3(&contact.normal2.into_inner()),
                        depth: -contact.dist,
                    });
                }
            }
        }
        hits
    }

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        Some(EntityId(collider.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0))
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let handles = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 1.0 }),
            ColliderMaterial::default(),
        );
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);
        world.remove_body(handles.body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn gravity_pulls_dynamic_body_down() {
        let mut world = world();
        let handles = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
                .with_position(Vec3::new(0.0, 10.0, 0.0)),
            ColliderMaterial::default(),
        );

        for _ in 0..10 {
            assert!(world.step(1.0 / 60.0));
        }
        let (pos, _) = world.body_pose(handles.body);
        assert!(pos.y < 10.0, "body should fall: y={}", pos.y);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut world = world();
        let handles = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
                .with_position(Vec3::new(0.0, 10.0, 0.0)),
            ColliderMaterial::default(),
        );

        assert!(!world.step(0.0));
        assert!(!world.step(-1.0));
        assert!(!world.step(f32::NAN));
        let (pos, _) = world.body_pose(handles.body);
        assert_eq!(pos.y, 10.0);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut world = world();
        world.step(5.0);
        assert!((world.last_dt() - MAX_STEP_DT).abs() < 1e-6);
        world.step(0.02);
        assert!((world.last_dt() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn category_filtering_rules() {
        use CollisionCategory::*;
        assert!(!Player.collides_with(Item));
        assert!(!Item.collides_with(Player));
        assert!(Player.collides_with(Table));
        assert!(!Item.collides_with(Table));
        assert!(Player.collides_with(World));
        assert!(Item.collides_with(World));
        assert!(Item.collides_with(Item));
        assert!(!Table.collides_with(World));
    }

    #[test]
    fn items_fall_through_the_table() {
        let mut world = world();
        world.create_static_collider(
            EntityId(1),
            &ColliderDesc::Cuboid { half_extents: Vec3::new(2.0, 0.1, 2.0) },
            Vec3::new(0.0, 1.0, 0.0),
            CollisionCategory::Table,
            ColliderMaterial::default(),
        );
        let item = world.create_body(
            EntityId(2),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.1 })
                .with_position(Vec3::new(0.0, 1.5, 0.0)),
            ColliderMaterial::default(),
        );

        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        let (pos, _) = world.body_pose(item.body);
        assert!(pos.y < 0.8, "item should pass through table: y={}", pos.y);
    }

    #[test]
    fn items_rest_on_world_geometry() {
        let mut world = world();
        world.create_static_collider(
            EntityId(1),
            &ColliderDesc::Plane { normal: Vec3::Y, offset: 0.0 },
            Vec3::ZERO,
            CollisionCategory::World,
            ColliderMaterial::default(),
        );
        let item = world.create_body(
            EntityId(2),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.25 })
                .with_position(Vec3::new(0.0, 1.0, 0.0)),
            ColliderMaterial::default(),
        );

        for _ in 0..180 {
            world.step(1.0 / 60.0);
        }
        let (pos, _) = world.body_pose(item.body);
        assert!(pos.y > 0.1, "item should rest on the floor: y={}", pos.y);
    }

    #[test]
    fn teleport_clears_velocity() {
        let mut world = world();
        let handles = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 }),
            ColliderMaterial::default(),
        );
        world.set_velocity(handles.body, Vec3::new(3.0, -2.0, 1.0));
        world.teleport(handles.body, Vec3::new(4.0, 1.0, 4.0));

        assert_eq!(world.velocity(handles.body), Vec3::ZERO);
        assert_eq!(world.angular_velocity(handles.body), Vec3::ZERO);
        let (pos, _) = world.body_pose(handles.body);
        assert!((pos - Vec3::new(4.0, 1.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn horizontal_move_keeps_height_and_vertical_velocity() {
        let mut world = world();
        let handles = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
                .with_position(Vec3::new(0.0, 3.0, 0.0)),
            ColliderMaterial::default(),
        );
        world.set_velocity(handles.body, Vec3::new(5.0, -1.0, 5.0));
        world.set_horizontal_position(handles.body, 2.0, -2.0);

        let (pos, _) = world.body_pose(handles.body);
        assert!((pos - Vec3::new(2.0, 3.0, -2.0)).length() < 1e-5);
        let vel = world.velocity(handles.body);
        assert_eq!(vel.x, 0.0);
        assert_eq!(vel.z, 0.0);
        assert!((vel.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn collider_shapes_round_trip() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let ball = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 1.5 }),
            ColliderMaterial::default(),
        );
        let wall = world.create_static_collider(
            EntityId(2),
            &ColliderDesc::Cuboid { half_extents: Vec3::new(0.5, 2.0, 4.0) },
            Vec3::new(3.0, 2.0, 0.0),
            CollisionCategory::World,
            ColliderMaterial::default(),
        );

        match world.collider_shape(ball.collider) {
            Some(ColliderDesc::Ball { radius }) => assert!((radius - 1.5).abs() < 1e-5),
            other => panic!("expected Ball, got {:?}", other),
        }
        match world.collider_shape(wall) {
            Some(ColliderDesc::Cuboid { half_extents }) => {
                assert!((half_extents - Vec3::new(0.5, 2.0, 4.0)).length() < 1e-5)
            }
            other => panic!("expected Cuboid, got {:?}", other),
        }
        let pos = world.collider_translation(wall).unwrap();
        assert!((pos - Vec3::new(3.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn penetration_normal_points_away_from_wall() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let wall = world.create_static_collider(
            EntityId(1),
            &ColliderDesc::Cuboid { half_extents: Vec3::new(0.5, 2.0, 5.0) },
            Vec3::new(1.5, 1.5, 0.0),
            CollisionCategory::World,
            ColliderMaterial::default(),
        );
        let capsule = ColliderDesc::CapsuleY { half_height: 0.5, radius: 0.4 };

        let clear = world.penetrations(&capsule, CollisionCategory::Player, Vec3::new(0.0, 1.5, 0.0), [wall]);
        assert!(clear.is_empty());

        let hits = world.penetrations(&capsule, CollisionCategory::Player, Vec3::new(0.9, 1.5, 0.0), [wall]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].normal - Vec3::NEG_X).length() < 1e-3, "normal={:?}", hits[0].normal);
        assert!((hits[0].depth - 0.3).abs() < 1e-3);
    }

    #[test]
    fn penetrations_respect_categories() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let table = world.create_static_collider(
            EntityId(1),
            &ColliderDesc::Cuboid { half_extents: Vec3::splat(1.0) },
            Vec3::ZERO,
            CollisionCategory::Table,
            ColliderMaterial::default(),
        );
        let ball = ColliderDesc::Ball { radius: 0.5 };

        assert!(world.penetrations(&ball, CollisionCategory::Item, Vec3::ZERO, [table]).is_empty());
        assert_eq!(world.penetrations(&ball, CollisionCategory::Player, Vec3::ZERO, [table]).len(), 1);
    }

    #[test]
    fn collision_events_carry_entity_ids() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
                .with_velocity(Vec3::new(5.0, 0.0, 0.0)),
            ColliderMaterial::default(),
        );
        world.create_body(
            EntityId(2),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
                .with_position(Vec3::new(3.0, 0.0, 0.0))
                .with_velocity(Vec3::new(-5.0, 0.0, 0.0)),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..60 {
            world.step_into(1.0 / 60.0, &mut events);
        }
        let started = events.iter().find(|e| e.started).expect("balls should collide");
        let ids = [started.entity_a, started.entity_b];
        assert!(ids.contains(&EntityId(1)));
        assert!(ids.contains(&EntityId(2)));
    }

    #[test]
    fn builder_pattern() {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_mass(2.0)
            .with_category(CollisionCategory::Player)
            .with_fixed_rotation(true);

        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(desc.mass, Some(2.0));
        assert_eq!(desc.category, CollisionCategory::Player);
        assert!(desc.fixed_rotation);

        let fixed = BodyDesc::fixed(ColliderDesc::Ball { radius: 1.0 });
        assert_eq!(fixed.body_type, BodyType::Fixed);
        assert_eq!(fixed.category, CollisionCategory::World);
    }
}
