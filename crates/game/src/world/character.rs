use crate::net::{Coords, Direction, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SitState {
    #[default]
    Stand,
    Floor,
    Chair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

/// Equipped item ids; 0 means the slot is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Equipment {
    pub weapon: i32,
    pub shield: i32,
    pub armor: i32,
    pub hat: i32,
    pub boots: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub player_id: PlayerId,
    pub name: String,
    pub coords: Coords,
    pub direction: Direction,
    pub sit_state: SitState,
    pub gender: Gender,
    pub equipment: Equipment,
}

impl Character {
    pub fn new(player_id: PlayerId, name: impl Into<String>, coords: Coords) -> Self {
        Self {
            player_id,
            name: name.into(),
            coords,
            direction: Direction::Down,
            sit_state: SitState::Stand,
            gender: Gender::default(),
            equipment: Equipment::default(),
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_weapon(mut self, weapon: i32) -> Self {
        self.equipment.weapon = weapon;
        self
    }

    pub fn is_standing(&self) -> bool {
        self.sit_state == SitState::Stand
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npc {
    pub index: i32,
    pub id: i32,
    pub coords: Coords,
    pub direction: Direction,
}
