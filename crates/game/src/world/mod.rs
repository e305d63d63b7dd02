mod character;

use std::collections::{HashMap, HashSet};

use crate::asset::{ItemFile, ItemSubtype, MapFile, TileSpec, WarpTile};
use crate::net::{Coords, Direction, MapBounds, PlayerId};

pub use character::{Character, Equipment, Gender, Npc, SitState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    pub coords: Coords,
    pub open: bool,
}

/// Read-only queries the movement controller makes against the world.
pub trait WorldView {
    fn bounds(&self) -> MapBounds;

    /// In bounds, walkable terrain and nobody standing there.
    fn can_walk(&self, coords: Coords) -> bool;

    fn door_at(&self, coords: Coords) -> Option<Door>;

    /// A chair is at `coords` and a character facing `facing` can sit in it.
    fn is_facing_chair_at(&self, coords: Coords, facing: Direction) -> bool;

    fn occupied(&self, coords: Coords) -> bool;

    fn weapon_attack_kind(&self, weapon: i32) -> AttackKind;
}

/// Current map plus everything visible on it.
#[derive(Debug, Default)]
pub struct World {
    map: Option<MapFile>,
    tiles: HashMap<Coords, TileSpec>,
    warps: HashMap<Coords, WarpTile>,
    open_doors: HashSet<Coords>,
    characters: HashMap<PlayerId, Character>,
    npcs: HashMap<i32, Npc>,
    items: Option<ItemFile>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(map: MapFile) -> Self {
        let mut world = Self::new();
        world.set_map(map);
        world
    }

    pub fn set_map(&mut self, map: MapFile) {
        log::info!(
            "Loading map {:?} ({}x{})",
            map.name,
            map.width + 1,
            map.height + 1
        );
        self.tiles = map.tiles.iter().map(|t| (t.coords, t.spec)).collect();
        self.warps = map.warps.iter().map(|w| (w.coords, *w)).collect();
        self.open_doors.clear();
        self.npcs.clear();
        self.map = Some(map);
    }

    pub fn map(&self) -> Option<&MapFile> {
        self.map.as_ref()
    }

    pub fn set_items(&mut self, items: ItemFile) {
        self.items = Some(items);
    }

    pub fn tile_spec(&self, coords: Coords) -> Option<TileSpec> {
        self.tiles.get(&coords).copied()
    }

    pub fn set_door_open(&mut self, coords: Coords, open: bool) {
        if !self.warps.get(&coords).is_some_and(|w| w.door) {
            log::warn!("No door at {:?}", coords);
            return;
        }

        if open {
            self.open_doors.insert(coords);
        } else {
            self.open_doors.remove(&coords);
        }
    }

    pub fn add_character(&mut self, character: Character) {
        self.characters.insert(character.player_id, character);
    }

    pub fn character(&self, player_id: PlayerId) -> Option<&Character> {
        self.characters.get(&player_id)
    }

    pub fn character_mut(&mut self, player_id: PlayerId) -> Option<&mut Character> {
        self.characters.get_mut(&player_id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn add_npc(&mut self, npc: Npc) {
        self.npcs.insert(npc.index, npc);
    }

    pub fn npc(&self, index: i32) -> Option<&Npc> {
        self.npcs.get(&index)
    }

    pub fn npc_mut(&mut self, index: i32) -> Option<&mut Npc> {
        self.npcs.get_mut(&index)
    }
}

impl WorldView for World {
    fn bounds(&self) -> MapBounds {
        self.map.as_ref().map(MapFile::bounds).unwrap_or_default()
    }

    fn can_walk(&self, coords: Coords) -> bool {
        if self.map.is_none() || !self.bounds().contains(coords) {
            return false;
        }

        if self.tile_spec(coords).is_some_and(|spec| !spec.is_walkable()) {
            return false;
        }

        !self.occupied(coords)
    }

    fn door_at(&self, coords: Coords) -> Option<Door> {
        self.warps.get(&coords).filter(|w| w.door).map(|w| Door {
            coords: w.coords,
            open: self.open_doors.contains(&coords),
        })
    }

    fn is_facing_chair_at(&self, coords: Coords, facing: Direction) -> bool {
        // A chair is entered from the side it faces.
        self.tile_spec(coords)
            .and_then(|spec| spec.chair_facings())
            .is_some_and(|facings| facings.contains(&facing.opposite()))
    }

    fn occupied(&self, coords: Coords) -> bool {
        self.characters().any(|c| c.coords == coords)
            || self.npcs.values().any(|n| n.coords == coords)
    }

    fn weapon_attack_kind(&self, weapon: i32) -> AttackKind {
        let ranged = self
            .items
            .as_ref()
            .and_then(|items| items.get(weapon))
            .is_some_and(|record| record.subtype == ItemSubtype::Ranged);

        if ranged { AttackKind::Ranged } else { AttackKind::Melee }
    }
}
