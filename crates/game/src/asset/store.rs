use std::collections::HashMap;

use crate::net::{FileKind, MapId};

use super::files::AssetValue;

/// Storage key of a persisted asset. Maps are stored per map id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Class,
    Item,
    Npc,
    Spell,
    Map(MapId),
}

impl AssetKey {
    pub fn for_kind(kind: FileKind, map_id: MapId) -> Self {
        match kind {
            FileKind::Class => AssetKey::Class,
            FileKind::Item => AssetKey::Item,
            FileKind::Npc => AssetKey::Npc,
            FileKind::Spell => AssetKey::Spell,
            FileKind::Map => AssetKey::Map(map_id),
        }
    }
}

/// Write-through cache of downloaded game data.
pub trait AssetStore {
    /// Overwrites any previous value under `key`.
    fn persist(&mut self, key: AssetKey, value: AssetValue);

    fn get(&self, key: &AssetKey) -> Option<&AssetValue>;
}

#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<AssetKey, AssetValue>,
    writes: usize,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Total number of `persist` calls, including overwrites.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl AssetStore for MemoryAssetStore {
    fn persist(&mut self, key: AssetKey, value: AssetValue) {
        log::debug!("Persisting {:?} asset", key);
        self.assets.insert(key, value);
        self.writes += 1;
    }

    fn get(&self, key: &AssetKey) -> Option<&AssetValue> {
        self.assets.get(key)
    }
}
