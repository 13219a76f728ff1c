use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// The single owning store of live entities.
/// Flat Vec in insertion order; lookups are linear scans.
pub struct Scene {
    entities: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(128),
            pending_despawns: Vec::new(),
        }
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            pending_despawns: Vec::new(),
        }
    }

    /// Add an entity to the end of the scene.
    pub fn spawn(&mut self, entity: Entity) {
        log::debug!("spawn {} ({})", entity.id.0, entity.type_string());
        self.entities.push(entity);
    }

    /// Remove an entity by ID, keeping the order of the rest.
    /// Physics teardown is the caller's job; see `EngineContext::despawn`.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Mark an entity for removal once the current pass is over.
    /// Queuing the same id twice is harmless.
    pub fn queue_despawn(&mut self, id: EntityId) {
        if !self.pending_despawns.contains(&id) {
            self.pending_despawns.push(id);
        }
    }

    pub fn is_despawn_queued(&self, id: EntityId) -> bool {
        self.pending_despawns.contains(&id)
    }

    /// Take the queued ids, leaving the queue empty.
    pub fn take_pending_despawns(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending_despawns)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over all entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Ids of every entity, in insertion order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    /// Find the first entity with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_despawns.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;
    use glam::Vec3;

    fn prop(id: u32) -> Entity {
        Entity::new(EntityId(id), EntityKind::Prop)
    }

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        scene.spawn(prop(1).with_pos(Vec3::new(1.0, 2.0, 3.0)));
        let e = scene.get(EntityId(1)).unwrap();
        assert_eq!(e.pos, Vec3::new(1.0, 2.0, 3.0));
        assert!(scene.get(EntityId(2)).is_none());
    }

    #[test]
    fn despawn_preserves_order() {
        let mut scene = Scene::new();
        for id in 1..=4 {
            scene.spawn(prop(id));
        }
        let removed = scene.despawn(EntityId(2)).unwrap();
        assert_eq!(removed.id, EntityId(2));
        assert_eq!(scene.ids(), vec![EntityId(1), EntityId(3), EntityId(4)]);
        assert!(scene.despawn(EntityId(2)).is_none());
    }

    #[test]
    fn queued_despawns_are_deduplicated() {
        let mut scene = Scene::new();
        scene.spawn(prop(1));
        scene.queue_despawn(EntityId(1));
        scene.queue_despawn(EntityId(1));
        assert!(scene.is_despawn_queued(EntityId(1)));
        assert_eq!(scene.take_pending_despawns(), vec![EntityId(1)]);
        assert!(scene.take_pending_despawns().is_empty());
        // Queuing does not remove anything by itself.
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn find_by_name() {
        let mut scene = Scene::new();
        scene.spawn(prop(1).with_name("lamp"));
        scene.spawn(prop(2).with_name("plant"));
        assert_eq!(scene.find_by_name("plant").unwrap().id, EntityId(2));
        assert!(scene.find_by_name("sofa").is_none());
    }
}
