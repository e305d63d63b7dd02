use bitflags::bitflags;

use crate::net::Direction;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeldInputs: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const ATTACK = 1 << 4;
        const SIT_STAND = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    Attack,
    SitStand,
}

impl Input {
    pub fn flag(self) -> HeldInputs {
        match self {
            Input::Up => HeldInputs::UP,
            Input::Down => HeldInputs::DOWN,
            Input::Left => HeldInputs::LEFT,
            Input::Right => HeldInputs::RIGHT,
            Input::Attack => HeldInputs::ATTACK,
            Input::SitStand => HeldInputs::SIT_STAND,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Input::Up => Some(Direction::Up),
            Input::Down => Some(Direction::Down),
            Input::Left => Some(Direction::Left),
            Input::Right => Some(Direction::Right),
            Input::Attack | Input::SitStand => None,
        }
    }

    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Input::Up,
            Direction::Down => Input::Down,
            Direction::Left => Input::Left,
            Direction::Right => Input::Right,
        }
    }
}

/// Tracks which inputs are held right now, sampled once per tick.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: HeldInputs,
    // Held directions in press order, newest last.
    direction_order: Vec<Direction>,
    typing: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, input: Input) {
        if self.held.contains(input.flag()) {
            return;
        }

        self.held.insert(input.flag());
        if let Some(direction) = input.direction() {
            self.direction_order.push(direction);
        }
    }

    pub fn release(&mut self, input: Input) {
        self.held.remove(input.flag());
        if let Some(direction) = input.direction() {
            self.direction_order.retain(|d| *d != direction);
        }
    }

    pub fn release_all(&mut self) {
        self.held = HeldInputs::empty();
        self.direction_order.clear();
    }

    pub fn is_held(&self, input: Input) -> bool {
        self.held.contains(input.flag())
    }

    pub fn held(&self) -> HeldInputs {
        self.held
    }

    /// The most recently pressed direction that is still held.
    pub fn latest_direction(&self) -> Option<Direction> {
        self.direction_order.last().copied()
    }

    /// True while a text field has focus; movement input is ignored then.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn set_typing(&mut self, typing: bool) {
        if typing {
            self.release_all();
        }
        self.typing = typing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_direction_follows_press_order() {
        let mut input = InputSampler::new();
        input.press(Input::Up);
        input.press(Input::Left);
        assert_eq!(input.latest_direction(), Some(Direction::Left));

        input.release(Input::Left);
        assert_eq!(input.latest_direction(), Some(Direction::Up));

        input.release(Input::Up);
        assert_eq!(input.latest_direction(), None);
    }

    #[test]
    fn repeated_press_does_not_reorder() {
        let mut input = InputSampler::new();
        input.press(Input::Up);
        input.press(Input::Right);
        input.press(Input::Up);
        assert_eq!(input.latest_direction(), Some(Direction::Right));
    }

    #[test]
    fn typing_releases_everything() {
        let mut input = InputSampler::new();
        input.press(Input::Attack);
        input.press(Input::Down);
        input.set_typing(true);

        assert!(input.is_typing());
        assert!(input.held().is_empty());
        assert_eq!(input.latest_direction(), None);
    }

    #[test]
    fn action_inputs_have_no_direction() {
        assert_eq!(Input::Attack.direction(), None);
        assert_eq!(Input::from_direction(Direction::Left), Input::Left);
        assert!(Input::SitStand.flag().contains(HeldInputs::SIT_STAND));
    }
}
