use glam::{Mat4, Quat, Vec3};

use crate::components::entity::{Entity, EntityKind};
use crate::components::item::{Card, Item};
use crate::components::person::PersonRole;
use crate::core::scene::Scene;
use crate::renderer::instance::{RenderBuffer, RenderInstance, RenderKind};

pub const CARD_SIZE: Vec3 = Vec3::new(0.064, 0.002, 0.089);
pub const CHIP_SIZE: Vec3 = Vec3::new(0.04, 0.007, 0.04);

/// Face index 0..52, suit-major.
pub fn card_face_index(card: &Card) -> u32 {
    let suit = card.suit as u32;
    let rank = card.rank as u32;
    suit * 13 + rank
}

/// Rebuild the draw list from the scene in insertion order.
/// Containers emit one instance per privately owned card or chip.
pub fn build_draw_list(scene: &Scene, buffer: &mut RenderBuffer) {
    buffer.clear();
    for entity in scene.iter() {
        if !entity.active {
            continue;
        }
        emit_entity(entity, buffer);
    }
}

fn emit_entity(entity: &Entity, buffer: &mut RenderBuffer) {
    let model = entity.model_matrix();
    let lit = entity.uses_lighting;
    let instance = match &entity.kind {
        EntityKind::Wall => RenderInstance::new(RenderKind::Wall, model),
        EntityKind::Floor => RenderInstance::new(RenderKind::Floor, model),
        EntityKind::Ceiling => RenderInstance::new(RenderKind::Ceiling, model),
        EntityKind::Prop => RenderInstance::new(RenderKind::Prop, model),
        EntityKind::Person(person) => {
            let variant = match person.role {
                PersonRole::Player => 0,
                PersonRole::Enemy => 1,
                PersonRole::Dealer { .. } => 2,
            };
            RenderInstance::new(RenderKind::Person, model).with_variant(variant)
        }
        EntityKind::Item(item) => item_instance(item, model),
        EntityKind::PokerTable(table) => {
            buffer.push(RenderInstance::new(RenderKind::Table, model).with_lighting(lit));
            // The deck sits face down on the felt, one instance per card.
            // A table entity is positioned at the center of its top surface.
            let top = entity.pos;
            for (i, card) in table.deck().cards().iter().enumerate() {
                let at = top + Vec3::new(0.0, CARD_SIZE.y * (i as f32 + 0.5), 0.0);
                let m = Mat4::from_scale_rotation_translation(CARD_SIZE, Quat::IDENTITY, at);
                buffer.push(item_instance(&Item::Card(*card), m).with_lighting(lit));
            }
            return;
        }
        EntityKind::ChipStack(stack) => {
            for (i, chip) in stack.chips().iter().enumerate() {
                let at = entity.pos + Vec3::new(0.0, CHIP_SIZE.y * (i as f32 + 0.5), 0.0);
                let m = Mat4::from_scale_rotation_translation(CHIP_SIZE, entity.rotation, at);
                buffer.push(item_instance(&Item::Chip(*chip), m).with_lighting(lit));
            }
            return;
        }
    };
    buffer.push(instance.with_lighting(lit));
}

fn item_instance(item: &Item, model: Mat4) -> RenderInstance {
    match item {
        Item::Card(card) => {
            RenderInstance::new(RenderKind::Card, model).with_variant(card_face_index(card))
        }
        Item::Chip(chip) => RenderInstance::new(RenderKind::Chip, model)
            .with_color(chip.color().rgb())
            .with_variant(chip.value()),
        Item::Weapon(_) => RenderInstance::new(RenderKind::Weapon, model),
        Item::Substance(substance) => {
            RenderInstance::new(RenderKind::Substance, model).with_variant(*substance as u32)
        }
    }
}
