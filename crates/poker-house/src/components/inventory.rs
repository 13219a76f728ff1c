use crate::components::item::Item;

/// One inventory slot: a representative item and how many are held.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    pub item: Item,
    pub count: u32,
    pub type_key: String,
}

impl ItemStack {
    pub fn display_count(&self) -> Option<u32> {
        self.item.display_count(self.count)
    }
}

/// Ordered list of item stacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one item. Stackable items join the stack with the same key;
    /// everything else opens a new stack. Returns the stack index.
    pub fn add(&mut self, item: Item) -> usize {
        let key = item.stack_key();
        if item.can_stack() {
            if let Some(idx) = self.stacks.iter().position(|s| s.type_key == key) {
                self.stacks[idx].count += 1;
                return idx;
            }
        }
        self.stacks.push(ItemStack {
            item,
            count: 1,
            type_key: key,
        });
        self.stacks.len() - 1
    }

    /// Take one item out of a stack, dropping the stack when it runs out.
    pub fn remove_one(&mut self, index: usize) -> Option<Item> {
        let stack = self.stacks.get_mut(index)?;
        let item = stack.item;
        stack.count -= 1;
        if stack.count == 0 {
            self.stacks.remove(index);
        }
        Some(item)
    }

    /// Remove a whole stack.
    pub fn remove_stack(&mut self, index: usize) -> Option<ItemStack> {
        if index < self.stacks.len() {
            Some(self.stacks.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.stacks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ItemStack> {
        self.stacks.get_mut(index)
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Total value of all chips held, saturating at `u32::MAX`.
    pub fn chip_value(&self) -> u32 {
        self.stacks
            .iter()
            .filter_map(|s| s.item.as_chip().map(|c| c.value().saturating_mul(s.count)))
            .fold(0, u32::saturating_add)
    }

    /// Advance per-item timers (weapon cooldowns).
    pub fn tick(&mut self, dt: f32) {
        for stack in &mut self.stacks {
            if let Some(weapon) = stack.item.as_weapon_mut() {
                weapon.tick(dt);
            }
        }
    }
}
