use crate::components::item::Chip;

/// A pile of chips sitting on the table. The chips are owned by the stack and
/// drawn by it; they are not scene entities of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipStack {
    chips: Vec<Chip>,
    /// Pot stacks unlock when the dealer goes down.
    pot: bool,
}

impl ChipStack {
    pub fn new(chips: Vec<Chip>) -> Self {
        Self { chips, pot: false }
    }

    /// A pot stack made up of `amount` in the fewest chips.
    pub fn pot(amount: u32) -> Self {
        Self {
            chips: Chip::make_change(amount),
            pot: true,
        }
    }

    pub fn is_pot(&self) -> bool {
        self.pot
    }

    pub fn push(&mut self, chip: Chip) {
        self.chips.push(chip);
    }

    /// Empty the stack, returning its chips bottom to top.
    pub fn take_all(&mut self) -> Vec<Chip> {
        std::mem::take(&mut self.chips)
    }

    pub fn total_value(&self) -> u32 {
        self.chips.iter().map(Chip::value).sum()
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pot_holds_its_amount() {
        let stack = ChipStack::pot(265);
        assert!(stack.is_pot());
        assert_eq!(stack.total_value(), 265);
    }

    #[test]
    fn take_all_empties_the_stack() {
        let mut stack = ChipStack::new(vec![Chip::new(5).unwrap(), Chip::new(10).unwrap()]);
        let chips = stack.take_all();
        assert_eq!(chips.len(), 2);
        assert!(stack.is_empty());
        assert_eq!(stack.total_value(), 0);
    }
}
