//! Per-entity physics bindings.
//!
//! [`RigidBody`] is a simulated body with one attached collider; physics owns
//! the entity's pose. [`Collider`] is the lighter binding used by immobile
//! world geometry: static colliders have no body and are positioned directly.

use glam::{Mat3, Mat4, Quat, Vec3};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::api::types::EntityId;
use crate::core::physics::{
    BodyDesc, ColliderDesc, ColliderMaterial, CollisionCategory, PhysicsWorld,
};

/// A dynamic body plus its collider, exclusively owned by one entity.
///
/// The description it was built from is kept so clones can get their own body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    desc: BodyDesc,
    material: ColliderMaterial,
}

impl RigidBody {
    pub fn from_desc(
        world: &mut PhysicsWorld,
        owner: EntityId,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> Self {
        let handles = world.create_body(owner, &desc, material);
        Self {
            body: handles.body,
            collider: handles.collider,
            desc,
            material,
        }
    }

    /// Dynamic box in the item category.
    pub fn init_box(
        world: &mut PhysicsWorld,
        owner: EntityId,
        position: Vec3,
        half_extents: Vec3,
        mass: f32,
    ) -> Self {
        let desc = BodyDesc::dynamic(ColliderDesc::Cuboid { half_extents })
            .with_position(position)
            .with_mass(mass)
            .with_category(CollisionCategory::Item);
        Self::from_desc(world, owner, desc, ColliderMaterial::default())
    }

    /// Dynamic sphere in the item category.
    pub fn init_sphere(
        world: &mut PhysicsWorld,
        owner: EntityId,
        position: Vec3,
        radius: f32,
        mass: f32,
    ) -> Self {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius })
            .with_position(position)
            .with_mass(mass)
            .with_category(CollisionCategory::Item);
        Self::from_desc(world, owner, desc, ColliderMaterial::default())
    }

    /// Dynamic Y-aligned capsule in the item category.
    pub fn init_capsule(
        world: &mut PhysicsWorld,
        owner: EntityId,
        position: Vec3,
        radius: f32,
        half_height: f32,
        mass: f32,
    ) -> Self {
        let desc = BodyDesc::dynamic(ColliderDesc::CapsuleY { half_height, radius })
            .with_position(position)
            .with_mass(mass)
            .with_category(CollisionCategory::Item);
        Self::from_desc(world, owner, desc, ColliderMaterial::default())
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider
    }

    pub fn desc(&self) -> &BodyDesc {
        &self.desc
    }

    pub fn material(&self) -> ColliderMaterial {
        self.material
    }

    pub fn shape(&self) -> ColliderDesc {
        self.desc.collider
    }

    /// Pull the current pose from the simulation.
    pub fn update(&self, world: &PhysicsWorld) -> (Vec3, Quat) {
        world.body_pose(self.body)
    }

    /// Transform built straight from the simulated rotation, no Euler round-trip.
    pub fn rotation_matrix(&self, world: &PhysicsWorld) -> Mat4 {
        let (_, rot) = world.body_pose(self.body);
        Mat4::from_quat(rot)
    }

    /// Euler angles of the simulated rotation. Lossy near gimbal lock;
    /// prefer [`RigidBody::rotation_matrix`] for anything but display.
    pub fn euler_angles(&self, world: &PhysicsWorld) -> Vec3 {
        let (_, rot) = world.body_pose(self.body);
        euler_from_matrix(Mat3::from_quat(rot))
    }

    /// Place the body at `pos` and kill all momentum.
    pub fn teleport(&self, world: &mut PhysicsWorld, pos: Vec3) {
        world.teleport(self.body, pos);
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Vec3 {
        world.velocity(self.body)
    }

    /// Destroy body and collider together.
    pub fn remove(self, world: &mut PhysicsWorld) {
        world.remove_body(self.body);
    }
}

/// Decompose a rotation matrix `R = Rx(a) * Ry(b) * Rz(c)` into `(a, b, c)`.
///
/// At `b = ±90°` only `a + c` is recoverable; `c` is reported as zero.
pub fn euler_from_matrix(m: Mat3) -> Vec3 {
    // m.<col>.<row>
    let r02 = m.z_axis.x;
    if r02.abs() < 0.999_999 {
        let b = r02.asin();
        let a = (-m.z_axis.y).atan2(m.z_axis.z);
        let c = (-m.y_axis.x).atan2(m.x_axis.x);
        Vec3::new(a, b, c)
    } else {
        let b = std::f32::consts::FRAC_PI_2.copysign(r02);
        let a = m.y_axis.z.atan2(m.y_axis.y);
        Vec3::new(a, b, 0.0)
    }
}

/// Collision binding for world geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    handle: ColliderHandle,
    body: Option<RigidBodyHandle>,
    shape: ColliderDesc,
    offset: Vec3,
    mass: f32,
    category: CollisionCategory,
    material: ColliderMaterial,
}

impl Collider {
    /// Collider with no body. Planes are placed by their equation and never move;
    /// other shapes sit at `position + offset`.
    pub fn init_static(
        world: &mut PhysicsWorld,
        owner: EntityId,
        shape: ColliderDesc,
        position: Vec3,
        offset: Vec3,
        category: CollisionCategory,
    ) -> Self {
        let material = ColliderMaterial::default();
        let handle = world.create_static_collider(owner, &shape, position + offset, category, material);
        Self {
            handle,
            body: None,
            shape,
            offset,
            mass: 0.0,
            category,
            material,
        }
    }

    /// Collider attached to a new dynamic body.
    pub fn init_dynamic(
        world: &mut PhysicsWorld,
        owner: EntityId,
        shape: ColliderDesc,
        position: Vec3,
        mass: f32,
        category: CollisionCategory,
    ) -> Self {
        let material = ColliderMaterial::default();
        let desc = BodyDesc::dynamic(shape)
            .with_position(position)
            .with_mass(mass)
            .with_category(category);
        let handles = world.create_body(owner, &desc, material);
        Self {
            handle: handles.collider,
            body: Some(handles.body),
            shape,
            offset: Vec3::ZERO,
            mass,
            category,
            material,
        }
    }

    pub fn is_static(&self) -> bool {
        self.body.is_none()
    }

    pub fn handle(&self) -> ColliderHandle {
        self.handle
    }

    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    pub fn shape(&self) -> ColliderDesc {
        self.shape
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn category(&self) -> CollisionCategory {
        self.category
    }

    /// Push the owner's position into a static, non-plane collider.
    pub fn update_from_object(&self, world: &mut PhysicsWorld, owner_pos: Vec3) {
        if self.is_static() && !self.shape.is_plane() {
            world.set_collider_translation(self.handle, owner_pos + self.offset);
        }
    }

    /// Rebuild this binding for another owner at another position.
    pub fn duplicate(&self, world: &mut PhysicsWorld, owner: EntityId, position: Vec3) -> Self {
        match self.body {
            None => {
                let handle = world.create_static_collider(
                    owner,
                    &self.shape,
                    position + self.offset,
                    self.category,
                    self.material,
                );
                Self { handle, ..*self }
            }
            Some(_) => Self::init_dynamic(world, owner, self.shape, position, self.mass, self.category),
        }
    }

    /// Destroy the collider, and its body if it has one.
    pub fn remove(self, world: &mut PhysicsWorld) {
        match self.body {
            Some(body) => world.remove_body(body),
            None => world.remove_collider(self.handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_shapes_create_item_bodies() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let a = RigidBody::init_box(&mut world, EntityId(1), Vec3::ZERO, Vec3::splat(0.1), 0.05);
        let b = RigidBody::init_sphere(&mut world, EntityId(2), Vec3::X, 0.2, 0.1);
        let c = RigidBody::init_capsule(&mut world, EntityId(3), Vec3::Z, 0.1, 0.3, 1.0);

        assert_eq!(world.body_count(), 3);
        for body in [a, b, c] {
            assert_eq!(body.desc().category, CollisionCategory::Item);
        }
        assert_eq!(b.shape(), ColliderDesc::Ball { radius: 0.2 });
    }

    #[test]
    fn remove_destroys_body_and_collider_together() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let body = RigidBody::init_box(&mut world, EntityId(1), Vec3::ZERO, Vec3::splat(0.5), 1.0);
        assert_eq!(world.collider_count(), 1);
        body.remove(&mut world);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn update_reads_pose_from_physics() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let body = RigidBody::init_sphere(&mut world, EntityId(1), Vec3::new(0.0, 5.0, 0.0), 0.2, 1.0);
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let (pos, _) = body.update(&world);
        assert!(pos.y < 5.0);
    }

    #[test]
    fn euler_decomposition_recovers_angles() {
        let (a, b, c) = (0.3_f32, -0.4_f32, 1.1_f32);
        let m = Mat3::from_rotation_x(a) * Mat3::from_rotation_y(b) * Mat3::from_rotation_z(c);
        let e = euler_from_matrix(m);
        assert!((e.x - a).abs() < 1e-4, "{:?}", e);
        assert!((e.y - b).abs() < 1e-4, "{:?}", e);
        assert!((e.z - c).abs() < 1e-4, "{:?}", e);
    }

    #[test]
    fn euler_decomposition_at_gimbal_lock_folds_into_x() {
        let m = Mat3::from_rotation_x(0.2)
            * Mat3::from_rotation_y(std::f32::consts::FRAC_PI_2)
            * Mat3::from_rotation_z(0.3);
        let e = euler_from_matrix(m);
        assert!((e.y - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
        assert_eq!(e.z, 0.0);
        assert!((e.x - 0.5).abs() < 1e-3, "{:?}", e);
    }

    #[test]
    fn rotation_matrix_matches_body_rotation() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let rot = Quat::from_rotation_y(0.7);
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 }).with_rotation(rot);
        let body = RigidBody::from_desc(&mut world, EntityId(1), desc, ColliderMaterial::default());

        let m = body.rotation_matrix(&world);
        let expected = Mat4::from_quat(rot);
        assert!(m.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn static_collider_follows_owner() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let collider = Collider::init_static(
            &mut world,
            EntityId(1),
            ColliderDesc::Cuboid { half_extents: Vec3::ONE },
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
            CollisionCategory::World,
        );
        assert!(collider.is_static());
        assert_eq!(world.body_count(), 0);

        collider.update_from_object(&mut world, Vec3::new(5.0, 0.0, 0.0));
        let pos = world.collider_translation(collider.handle()).unwrap();
        assert!((pos - Vec3::new(5.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn dynamic_collider_has_a_body() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let collider = Collider::init_dynamic(
            &mut world,
            EntityId(1),
            ColliderDesc::Ball { radius: 0.5 },
            Vec3::ZERO,
            1.0,
            CollisionCategory::Item,
        );
        assert!(!collider.is_static());
        assert_eq!(world.body_count(), 1);
        collider.remove(&mut world);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn plane_collider_ignores_owner_updates() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let plane = Collider::init_static(
            &mut world,
            EntityId(1),
            ColliderDesc::Plane { normal: Vec3::Y, offset: 2.0 },
            Vec3::ZERO,
            Vec3::ZERO,
            CollisionCategory::World,
        );
        plane.update_from_object(&mut world, Vec3::new(10.0, 10.0, 10.0));
        match world.collider_shape(plane.handle()) {
            Some(ColliderDesc::Plane { offset, .. }) => assert!((offset - 2.0).abs() < 1e-5),
            other => panic!("expected Plane, got {:?}", other),
        }
    }
}
