use rkyv::{Archive, Deserialize, Serialize};

use crate::net::{Coords, Direction, FileKind, MapBounds, MapId};

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct ClassRecord {
    pub name: String,
    pub parent_type: u8,
    pub stat_group: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct ClassFile {
    pub rid: i32,
    pub records: Vec<ClassRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum ItemKind {
    General,
    Currency,
    Weapon,
    Shield,
    Armor,
    Hat,
    Boots,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum ItemSubtype {
    None,
    Ranged,
    Arrows,
    Wings,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct ItemRecord {
    pub name: String,
    pub graphic_id: i32,
    pub kind: ItemKind,
    pub subtype: ItemSubtype,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct ItemFile {
    pub rid: i32,
    pub records: Vec<ItemRecord>,
}

impl ItemFile {
    /// Item ids are 1-based; 0 means "nothing equipped".
    pub fn get(&self, id: i32) -> Option<&ItemRecord> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.records.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct NpcRecord {
    pub name: String,
    pub graphic_id: i32,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct NpcFile {
    pub rid: i32,
    pub records: Vec<NpcRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct SpellRecord {
    pub name: String,
    pub icon_id: i32,
    pub tp_cost: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct SpellFile {
    pub rid: i32,
    pub records: Vec<SpellRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum TileSpec {
    Wall,
    ChairDown,
    ChairLeft,
    ChairRight,
    ChairUp,
    ChairDownRight,
    ChairUpLeft,
    ChairAll,
    Chest,
    BankVault,
    NpcBoundary,
    Edge,
    FakeWall,
    Water,
    Spikes,
}

impl TileSpec {
    pub fn is_chair(&self) -> bool {
        self.chair_facings().is_some()
    }

    /// Directions a character may face while seated on this chair.
    pub fn chair_facings(&self) -> Option<&'static [Direction]> {
        match self {
            TileSpec::ChairDown => Some(&[Direction::Down]),
            TileSpec::ChairLeft => Some(&[Direction::Left]),
            TileSpec::ChairRight => Some(&[Direction::Right]),
            TileSpec::ChairUp => Some(&[Direction::Up]),
            TileSpec::ChairDownRight => Some(&[Direction::Down, Direction::Right]),
            TileSpec::ChairUpLeft => Some(&[Direction::Up, Direction::Left]),
            TileSpec::ChairAll => Some(&Direction::ALL),
            _ => None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        !matches!(
            self,
            TileSpec::Wall
                | TileSpec::Chest
                | TileSpec::BankVault
                | TileSpec::Edge
                | TileSpec::ChairDown
                | TileSpec::ChairLeft
                | TileSpec::ChairRight
                | TileSpec::ChairUp
                | TileSpec::ChairDownRight
                | TileSpec::ChairUpLeft
                | TileSpec::ChairAll
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct MapTile {
    pub coords: Coords,
    pub spec: TileSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct WarpTile {
    pub coords: Coords,
    pub destination_map: MapId,
    pub destination: Coords,
    pub door: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct MapFile {
    pub rid: i32,
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<MapTile>,
    pub warps: Vec<WarpTile>,
}

impl MapFile {
    pub fn bounds(&self) -> MapBounds {
        MapBounds::new(self.width, self.height)
    }
}

/// A decoded game-data file of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetValue {
    Class(ClassFile),
    Item(ItemFile),
    Npc(NpcFile),
    Spell(SpellFile),
    Map(MapFile),
}

impl AssetValue {
    pub fn kind(&self) -> FileKind {
        match self {
            AssetValue::Class(_) => FileKind::Class,
            AssetValue::Item(_) => FileKind::Item,
            AssetValue::Npc(_) => FileKind::Npc,
            AssetValue::Spell(_) => FileKind::Spell,
            AssetValue::Map(_) => FileKind::Map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_are_one_based() {
        let items = ItemFile {
            rid: 0,
            records: vec![ItemRecord {
                name: "Wooden Sword".into(),
                graphic_id: 1,
                kind: ItemKind::Weapon,
                subtype: ItemSubtype::None,
            }],
        };

        assert!(items.get(0).is_none());
        assert_eq!(items.get(1).map(|r| r.name.as_str()), Some("Wooden Sword"));
        assert!(items.get(2).is_none());
        assert!(items.get(-1).is_none());
    }

    #[test]
    fn chairs_block_walking() {
        assert!(!TileSpec::ChairAll.is_walkable());
        assert!(TileSpec::ChairAll.is_chair());
        assert!(TileSpec::NpcBoundary.is_walkable());
        assert!(!TileSpec::Wall.is_chair());
    }
}
